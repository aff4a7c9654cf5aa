//! Token based authentication.
//!
//! This module contains:
//! - The [Claims] carried in a JSON Web Token
//! - The [TokenIssuer] and [TokenValidator] for creating and checking tokens
//! - The [auth_guard] middleware that protects routes

mod middleware;
mod token;

pub use middleware::{AuthState, auth_guard};
pub use token::{Claims, TokenIssuer, TokenValidator};
