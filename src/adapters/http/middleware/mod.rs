//! HTTP middleware for axum.
//!
//! - `auth` - token validation middleware and the `RequireAuth` extractor

pub mod auth;

pub use auth::{auth_middleware, AuthRejection, AuthState, RequireAuth};
