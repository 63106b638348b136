//! Authentication module
//!
//! Validates bearer JWTs issued by the identity provider. Identities are
//! owned by that provider; this service only verifies tokens.

mod jwt;
mod middleware;

pub use jwt::{Claims, JwtService};
pub use middleware::{authenticate, AuthUser};
