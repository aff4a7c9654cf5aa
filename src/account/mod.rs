//! User accounts: registration, log-in and profiles.
//!
//! This module contains:
//! - The [AccountService] that registers and identifies users
//! - The request bodies for the account endpoints
//! - The route handlers for the account endpoints

pub(crate) mod email_endpoint;
mod form;
pub(crate) mod log_in_endpoint;
pub(crate) mod profile_endpoint;
pub(crate) mod register_endpoint;
mod service;

#[cfg(test)]
mod test_utils;

pub use email_endpoint::{EmailQuery, is_email_taken_endpoint};
pub use form::{AccountState, Credentials, ProfileForm};
pub use log_in_endpoint::log_in_endpoint;
pub use profile_endpoint::{get_profile_endpoint, update_profile_endpoint};
pub use register_endpoint::register_endpoint;
pub use service::{AccountService, AuthResult};
