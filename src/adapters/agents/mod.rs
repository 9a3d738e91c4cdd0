//! AI collaborator adapters.
//!
//! ## Available Adapters
//!
//! - `AiServiceClient` - HTTP client for the remote agent service
//! - `LocalAgents` - Deterministic local substitutes
//! - `FallbackAgent` - Timeout + fallback decorator over any pair of the above
//! - `MockAgents` - Scriptable double for tests

mod ai_service_client;
mod fallback_agent;
mod local_fallback;
mod mock_agents;

pub use ai_service_client::{AiServiceClient, AiServiceConfig};
pub use fallback_agent::{with_fallback, FallbackAgent};
pub use local_fallback::LocalAgents;
pub use mock_agents::{MockAgents, MOCK_DEFAULT_SCORE, MOCK_STAGE_HOURS};
