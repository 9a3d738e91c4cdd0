//! Storage Adapters
//!
//! Implementations of the repository ports.
//!
//! ## Available Adapters
//!
//! - **FileSessionRepository / FileRoadmapRepository** - YAML documents on disk
//! - **InMemorySessionRepository / InMemoryRoadmapRepository** - testing/development
//!
//! ## Usage
//!
//! ```ignore
//! let sessions = FileSessionRepository::new("./data");
//! let roadmaps = InMemoryRoadmapRepository::new();
//! ```

mod file_store;
mod in_memory;

pub use file_store::{FileRoadmapRepository, FileSessionRepository};
pub use in_memory::{InMemoryRoadmapRepository, InMemorySessionRepository};
