//! The request bodies and shared state for the account endpoints.

use std::str::FromStr;

use axum::extract::FromRef;
use email_address::EmailAddress;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::{
    AppState, Error, SQLiteUserStore, ValidatedPassword, ValidationErrors,
    account::AccountService,
};

/// The state needed by the account endpoints.
#[derive(Clone)]
pub struct AccountState {
    /// Registers users, logs them in and manages their profiles.
    pub account_service: AccountService<SQLiteUserStore>,
}

impl FromRef<AppState> for AccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            account_service: AccountService::new(
                SQLiteUserStore::new(state.db_connection.clone()),
                state.token_issuer.clone(),
                state.password_cost,
            ),
        }
    }
}

pub(crate) fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::new("required").with_message("Email is required.".into()));
    }

    EmailAddress::from_str(email)
        .map(|_| ())
        .map_err(|_| ValidationError::new("email").with_message("Invalid email format!".into()))
}

fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::new("required").with_message("Password is required.".into()));
    }

    ValidatedPassword::new(password).map(|_| ()).map_err(|_| {
        ValidationError::new("length")
            .with_message("Password must be at least 6 characters long!".into())
    })
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.chars().count() >= 3 {
        return Ok(());
    }

    Err(ValidationError::new("length")
        .with_message("Name must be at least 3 characters long.".into()))
}

/// The email and password sent to register or log in.
#[derive(Clone, Deserialize, Validate, ToSchema)]
pub struct Credentials {
    /// The user's email address.
    #[serde(default)]
    #[validate(custom(function = "validate_email"))]
    pub email: String,
    /// The user's password in plain text.
    #[serde(default)]
    #[validate(custom(function = "validate_password"))]
    pub password: String,
}

impl Credentials {
    /// Validate the credentials and parse them into the types needed to register a user.
    ///
    /// # Errors
    ///
    /// Returns [Error::Validation] if the email is not a valid address or the password is too short.
    pub fn into_registration(self) -> Result<(EmailAddress, ValidatedPassword), Error> {
        self.validate()?;

        let email = EmailAddress::from_str(&self.email).map_err(|_| {
            Error::Validation(ValidationErrors::single("email", "Invalid email format!"))
        })?;
        let password = ValidatedPassword::new(&self.password)?;

        Ok((email, password))
    }
}

/// The JSON body for changing a user's name.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileForm {
    /// The email of the user being changed, which must match the user ID in the path.
    #[serde(default)]
    #[validate(custom(function = "validate_email"))]
    pub email: String,
    /// The new given name.
    #[validate(custom(function = "validate_name"))]
    pub first_name: Option<String>,
    /// The new family name.
    #[validate(custom(function = "validate_name"))]
    pub last_name: Option<String>,
}
