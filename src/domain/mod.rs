//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (ids, timestamps, statuses, errors)
//! - `aptitude` - Adaptive interview sessions
//! - `roadmap` - Learning plans extended by aptitude feedback

pub mod aptitude;
pub mod foundation;
pub mod roadmap;
