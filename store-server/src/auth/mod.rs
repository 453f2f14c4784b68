//! Authentication
//!
//! JWT-based identity context: the token supplies the caller's user id and
//! admin privilege. Everything else about accounts is an external
//! collaborator.

pub mod extractor;
pub mod jwt;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
