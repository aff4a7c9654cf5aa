//! This file defines types that handle password validation and hashing.
//! `ValidatedPassword` wraps a string and ensures it is long enough.
//! `PasswordHash` converts a `ValidatedPassword` into a salted and hashed password.

use std::{fmt::Display, str::FromStr};

use bcrypt::{HashParts, hash, verify};
use unicode_segmentation::UnicodeSegmentation;

use crate::{Error, ValidationErrors};

/// The minimum number of characters in a password.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// A password that has been validated, but not yet hashed.
///
/// This struct can be used to construct a [PasswordHash].
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedPassword(String);

impl ValidatedPassword {
    /// Create and validate a new password from a string.
    ///
    /// # Errors
    ///
    /// Returns [Error::Validation] if the password is shorter than [MIN_PASSWORD_LENGTH]
    /// characters. Characters are counted as user-perceived characters, so "é" is one
    /// character regardless of how it is encoded.
    pub fn new(raw_password_string: &str) -> Result<Self, Error> {
        if raw_password_string.graphemes(true).count() < MIN_PASSWORD_LENGTH {
            return Err(Error::Validation(ValidationErrors::single(
                "password",
                &format!("Password must be at least {MIN_PASSWORD_LENGTH} characters long!"),
            )));
        }

        Ok(Self(raw_password_string.to_owned()))
    }

    /// Create a new `ValidatedPassword` without any validation.
    ///
    /// The caller should ensure that `raw_password_string` is a valid password.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if an invalid password is provided it may cause incorrect behaviour but will not affect memory safety.
    pub fn new_unchecked(raw_password_string: &str) -> Self {
        Self(raw_password_string.to_owned())
    }
}

impl Display for ValidatedPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", str::repeat("*", 8))
    }
}

/// The outcome of checking a password against a stored [PasswordHash].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordVerification {
    /// The password is correct.
    Match,
    /// The password is correct, but the stored hash was made with a lower cost than is
    /// currently used and should be replaced.
    NeedsRehash,
    /// The password is wrong, or the stored hash could not be read.
    NoMatch,
}

/// A salted and hashed password.
#[derive(Debug, Clone, PartialEq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// An alias for the default encryption cost for hashing passwords.
    pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

    /// Create a hashed password from a validated password with the specified `cost`.
    ///
    /// `cost` increases the rounds of hashing and therefore the time needed to verify a password.
    /// A value of at least 12 is recommended. Pass in [PasswordHash::DEFAULT_COST] to use the recommended cost.
    ///
    /// # Errors
    ///
    /// This function will return an error if the password could not be hashed.
    pub fn new(password: ValidatedPassword, cost: u32) -> Result<Self, Error> {
        match hash(&password.0, cost) {
            Ok(password_hash) => Ok(Self(password_hash)),
            Err(e) => Err(Error::HashingError(e.to_string())),
        }
    }

    /// Create a new `PasswordHash` without any validation.
    ///
    /// The caller should ensure that `raw_password_hash` is a valid password hash.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if an invalid hash is provided it will cause incorrect behaviour but not affect memory safety.
    pub fn new_unchecked(raw_password_hash: &str) -> Self {
        Self(raw_password_hash.to_owned())
    }

    /// Check that `raw_password` matches the stored password.
    ///
    /// `current_cost` is the cost new hashes are made with. A correct password for a hash
    /// made with a lower cost gives [PasswordVerification::NeedsRehash].
    ///
    /// A stored hash that cannot be parsed is treated as a wrong password so that
    /// corrupted records look the same to the client as a failed log-in.
    pub fn verify(&self, raw_password: &str, current_cost: u32) -> PasswordVerification {
        match verify(raw_password, &self.0) {
            Ok(true) => {}
            Ok(false) => return PasswordVerification::NoMatch,
            Err(error) => {
                tracing::warn!("Could not verify password against stored hash: {error}");
                return PasswordVerification::NoMatch;
            }
        }

        match HashParts::from_str(&self.0) {
            Ok(parts) if parts.get_cost() < current_cost => PasswordVerification::NeedsRehash,
            Ok(_) => PasswordVerification::Match,
            Err(error) => {
                tracing::warn!("Could not read the cost of a verified password hash: {error}");
                PasswordVerification::Match
            }
        }
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod validated_password_tests {
    use crate::{Error, password::ValidatedPassword};

    #[test]
    fn new_fails_on_empty() {
        let result = ValidatedPassword::new("");

        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn new_fails_on_short_password() {
        let result = ValidatedPassword::new("hunt2");

        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn new_succeeds_on_six_characters() {
        let result = ValidatedPassword::new("hunter");

        assert!(result.is_ok());
    }

    #[test]
    fn new_counts_characters_not_bytes() {
        // Five characters, but more than six bytes.
        let result = ValidatedPassword::new("éééé€");

        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn display_hides_password() {
        let password = ValidatedPassword::new_unchecked("hunter2");

        assert_eq!(password.to_string(), "********");
    }
}
