//! Issuing and validating the JSON Web Tokens that identify a logged in user.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::{Error, JwtSettings, User, UserID};

// Adapted from https://github.com/tokio-rs/axum/blob/main/examples/jwt/src/main.rs

/// The contents of a JSON Web Token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// The ID of the user the token was issued to.
    pub sub: String,
    /// The email of the user the token was issued to.
    pub email: String,
    /// Who issued the token.
    pub iss: String,
    /// Who the token is intended for.
    pub aud: String,
    /// The time the token was issued, in seconds since the Unix epoch.
    pub iat: i64,
    /// The expiry time of the token, in seconds since the Unix epoch.
    pub exp: i64,
}

impl Claims {
    /// The ID of the user the token was issued to.
    ///
    /// # Errors
    ///
    /// Returns [Error::Unauthorized] if the subject is not a user ID.
    pub fn user_id(&self) -> Result<UserID, Error> {
        self.sub
            .parse::<i64>()
            .map(UserID::new)
            .map_err(|_| Error::Unauthorized)
    }
}

/// Creates signed tokens for users that have logged in or registered.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    issuer: String,
    audience: String,
    lifetime: Duration,
}

impl TokenIssuer {
    /// Create a token issuer from the JWT settings.
    pub fn new(settings: &JwtSettings) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(settings.security_key().as_bytes()),
            issuer: settings.issuer().to_owned(),
            audience: settings.audience().to_owned(),
            lifetime: Duration::minutes(settings.expiration_minutes().into()),
        }
    }

    /// Create a HS256 signed token for `user` that expires after the configured lifetime.
    ///
    /// # Errors
    ///
    /// Returns [Error::TokenCreation] if the token could not be encoded.
    pub fn issue(&self, user: &User) -> Result<String, Error> {
        let issued_at = OffsetDateTime::now_utc();
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: issued_at.unix_timestamp(),
            exp: (issued_at + self.lifetime).unix_timestamp(),
        };

        self.sign(&claims)
    }

    fn sign(&self, claims: &Claims) -> Result<String, Error> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|error| Error::TokenCreation(error.to_string()))
    }
}

/// Checks that tokens were issued by this server and have not expired.
#[derive(Clone)]
pub struct TokenValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenValidator {
    /// Create a token validator from the JWT settings.
    ///
    /// Tokens are only accepted if they are signed with HS256 using the
    /// configured key and carry the configured issuer and audience.
    /// No leeway is given on the expiry time.
    pub fn new(settings: &JwtSettings) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[settings.issuer()]);
        validation.set_audience(&[settings.audience()]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        validation.leeway = 0;

        Self {
            decoding_key: DecodingKey::from_secret(settings.security_key().as_bytes()),
            validation,
        }
    }

    /// Decode `token` and check its signature, issuer, audience, expiry and subject.
    ///
    /// # Errors
    ///
    /// Returns [Error::Unauthorized] if any of the checks fail.
    pub fn validate(&self, token: &str) -> Result<Claims, Error> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|error| {
                tracing::debug!("Rejected token: {error}");
                Error::Unauthorized
            })?
            .claims;

        claims.user_id()?;

        Ok(claims)
    }
}
