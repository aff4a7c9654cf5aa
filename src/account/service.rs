//! Registration, log-in and profile management for user accounts.

use email_address::EmailAddress;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    Error, PasswordHash, PasswordVerification, TokenIssuer, User, UserID, UserStore,
    ValidatedPassword,
};

/// The message sent to the client when the email or password is wrong.
///
/// The same message is used for unknown emails and wrong passwords so that a
/// client cannot tell which one it got wrong.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid Email or Password";

/// The outcome of a log-in or registration attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AuthResult {
    /// Whether the user was authenticated.
    pub success: bool,
    /// A message that can be shown to the user.
    pub message: String,
    /// The bearer token for the user if they were authenticated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl AuthResult {
    /// A successful attempt that gives the client `token`.
    pub fn success(message: &str, token: String) -> Self {
        Self {
            success: true,
            message: message.to_owned(),
            token: Some(token),
        }
    }

    /// A failed attempt without a token.
    pub fn failure(message: &str) -> Self {
        Self {
            success: false,
            message: message.to_owned(),
            token: None,
        }
    }
}

/// Handles registering users, logging them in and changing their profile.
#[derive(Clone)]
pub struct AccountService<U: UserStore> {
    user_store: U,
    token_issuer: TokenIssuer,
    password_cost: u32,
}

impl<U: UserStore> AccountService<U> {
    /// Create an account service.
    ///
    /// `password_cost` is the bcrypt cost used for new password hashes.
    /// Stored hashes made with a lower cost are replaced when the user next logs in.
    pub fn new(user_store: U, token_issuer: TokenIssuer, password_cost: u32) -> Self {
        Self {
            user_store,
            token_issuer,
            password_cost,
        }
    }

    #[cfg(test)]
    pub(crate) fn user_store(&self) -> &U {
        &self.user_store
    }

    /// Whether no registered user has `email`, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns an error if the user store could not be queried.
    pub fn is_email_available(&self, email: &str) -> Result<bool, Error> {
        tracing::info!("Checking availability for email: {email}");

        match self.user_store.get_by_email(email) {
            Ok(_) => Ok(false),
            Err(Error::NotFound) => Ok(true),
            Err(error) => Err(error),
        }
    }

    /// Register a new user and log them in.
    ///
    /// # Errors
    ///
    /// Returns [Error::DuplicateEmail] if a user with `email` already exists,
    /// including when another registration for the same email finishes first.
    /// Returns other errors if the password could not be hashed, the user could
    /// not be stored or the token could not be created.
    pub fn register(
        &mut self,
        email: &EmailAddress,
        password: ValidatedPassword,
    ) -> Result<AuthResult, Error> {
        tracing::info!("Adding new user with email: {email}");

        if !self.is_email_available(email.as_str())? {
            tracing::warn!("User registration failed, {email} is already in use.");
            return Err(Error::DuplicateEmail);
        }

        let password_hash = PasswordHash::new(password, self.password_cost)?;
        let user = self
            .user_store
            .create(email, password_hash)
            .inspect_err(|error| {
                if *error == Error::DuplicateEmail {
                    tracing::warn!(
                        "User registration failed, {email} was registered concurrently."
                    );
                }
            })?;
        let token = self.token_issuer.issue(&user)?;

        tracing::info!("User with email {email} registered successfully.");

        Ok(AuthResult::success("Registration successful.", token))
    }

    /// Check the credentials of a user and give them a new token.
    ///
    /// An unknown email and a wrong password give the same failed [AuthResult].
    /// If the password is right but its hash was made with a lower cost than the
    /// current one, the password is hashed again and stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the user store could not be queried or the token could not be created.
    pub fn login(&mut self, email: &str, password: &str) -> Result<AuthResult, Error> {
        tracing::info!("Identifying user with email: {email}");

        let user = match self.user_store.get_by_email(email) {
            Ok(user) => user,
            Err(Error::NotFound) => {
                tracing::warn!("Log-in attempt for unknown email: {email}.");
                return Ok(AuthResult::failure(INVALID_CREDENTIALS_MESSAGE));
            }
            Err(error) => return Err(error),
        };

        match user.password_hash.verify(password, self.password_cost) {
            PasswordVerification::NoMatch => {
                tracing::warn!("Invalid credentials for email: {email}.");
                return Ok(AuthResult::failure(INVALID_CREDENTIALS_MESSAGE));
            }
            PasswordVerification::NeedsRehash => self.rehash_password(&user, password),
            PasswordVerification::Match => {}
        }

        let token = self.token_issuer.issue(&user)?;

        tracing::info!("User with email {email} logged in successfully.");

        Ok(AuthResult::success("Login successful.", token))
    }

    fn rehash_password(&mut self, user: &User, password: &str) {
        let result = PasswordHash::new(
            ValidatedPassword::new_unchecked(password),
            self.password_cost,
        )
        .and_then(|password_hash| {
            self.user_store
                .update_password_hash(user.id, &password_hash)
        });

        match result {
            Ok(()) => tracing::info!("Upgraded the password hash for user {}.", user.id),
            Err(error) => tracing::error!(
                "Could not upgrade the password hash for user {}: {error}",
                user.id
            ),
        }
    }

    /// Get the user with `email`, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns an error if the user store could not be queried.
    pub fn get_profile(&self, email: &str) -> Result<Option<User>, Error> {
        tracing::info!("Retrieving the user with email: {email}");

        match self.user_store.get_by_email(email) {
            Ok(user) => Ok(Some(user)),
            Err(Error::NotFound) => Ok(None),
            Err(error) => Err(error),
        }
    }

    /// Set the names of the user that has both `user_id` and `email`.
    ///
    /// Returns `Ok(None)` and changes nothing if no user has both.
    ///
    /// # Errors
    ///
    /// Returns an error if the user store could not be updated.
    pub fn update_profile(
        &mut self,
        user_id: UserID,
        email: &str,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> Result<Option<User>, Error> {
        tracing::info!("Updating user profile with ID: {user_id}");

        self.user_store
            .update_profile(user_id, email, first_name, last_name)
    }
}
