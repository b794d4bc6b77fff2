//! Shared cryptographic helpers for Nexa services
//!
//! - `jwt`: HS256 token issue/validation behind an injectable `JwtManager`
//! - `password`: Argon2id hashing and password strength rules
//! - `csrf`: double-submit token generation and constant-time comparison
//! - `hash`: SHA-256 helpers

pub mod csrf;
pub mod hash;
pub mod jwt;
pub mod password;

pub use jwt::{Claims, JwtManager};
pub use password::PasswordError;
