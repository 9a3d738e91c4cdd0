//! Authentication adapters implementing the `SessionValidator` port.
//!
//! - `jwt` - HS256 tokens signed with a shared secret
//! - `mock` - fixed token table for tests

mod jwt;
mod mock;

pub use jwt::{AccessClaims, JwtSessionValidator};
pub use mock::MockSessionValidator;
