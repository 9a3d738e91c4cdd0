//! Token validation port.
//!
//! HTTP middleware hands the raw bearer token to a `SessionValidator` and
//! attaches the resulting identity to the request.

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};

/// Validates access tokens and extracts user identity.
///
/// # Contract
///
/// - `InvalidToken` for malformed tokens or bad signatures
/// - `TokenExpired` for expired tokens
/// - `ServiceUnavailable` for transient failures
#[async_trait]
pub trait SessionValidator: Send + Sync {
    /// `token` is the raw value without the `Bearer ` prefix.
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}
