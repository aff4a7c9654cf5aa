//! Settings for signing and validating JSON Web Tokens.

use crate::Error;

/// How long tokens are valid for when no expiry is configured.
pub const DEFAULT_EXPIRATION_MINUTES: u32 = 60;

/// The settings shared by the [TokenIssuer](crate::TokenIssuer) and
/// [TokenValidator](crate::TokenValidator).
#[derive(Debug, Clone, PartialEq)]
pub struct JwtSettings {
    security_key: String,
    issuer: String,
    audience: String,
    expiration_minutes: u32,
}

impl JwtSettings {
    /// Create the JWT settings.
    ///
    /// `expiration_minutes` defaults to [DEFAULT_EXPIRATION_MINUTES] when `None`.
    ///
    /// # Errors
    ///
    /// Returns [Error::MissingSigningKey] if `security_key` is empty or only whitespace.
    /// The server should refuse to start in this case.
    pub fn new(
        security_key: &str,
        issuer: &str,
        audience: &str,
        expiration_minutes: Option<u32>,
    ) -> Result<Self, Error> {
        if security_key.trim().is_empty() {
            return Err(Error::MissingSigningKey);
        }

        Ok(Self {
            security_key: security_key.to_owned(),
            issuer: issuer.to_owned(),
            audience: audience.to_owned(),
            expiration_minutes: expiration_minutes.unwrap_or(DEFAULT_EXPIRATION_MINUTES),
        })
    }

    /// The shared secret used to sign tokens.
    pub fn security_key(&self) -> &str {
        &self.security_key
    }

    /// The value of the `iss` claim.
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// The value of the `aud` claim.
    pub fn audience(&self) -> &str {
        &self.audience
    }

    /// How long a token is valid for after it is issued.
    pub fn expiration_minutes(&self) -> u32 {
        self.expiration_minutes
    }
}
