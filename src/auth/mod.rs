//! Authentication and authorization
//!
//! JWT verification establishes *who* the caller is; the access gate
//! ([`gate`]) decides *what* they may touch by consulting the vendor and
//! user tables before any protected read or write.

pub mod extractor;
pub mod gate;
pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, JwtConfig, JwtError, JwtService};
pub use middleware::require_auth;

/// Verified caller identity, injected into the request by the auth layer
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// Bare user key (the `sub` claim)
    pub id: String,
    pub username: String,
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            username: claims.username,
        }
    }
}
