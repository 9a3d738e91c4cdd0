//! Adapters - Implementations of port interfaces.
//!
//! - `agents` - remote agent client, local fallbacks, test doubles
//! - `auth` - bearer token validation
//! - `storage` - in-memory and YAML file repositories
//! - `http` - REST routes, DTOs and middleware
//! - `websocket` - real-time session channel

pub mod agents;
pub mod auth;
pub mod http;
pub mod storage;
pub mod websocket;
