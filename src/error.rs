//! Defines the app level error type and its conversion to JSON problem responses.

use std::{collections::BTreeMap, fmt::Display};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use uuid::Uuid;

use crate::account::AuthResult;

/// The message sent to the client when registering with an email that is already in use.
pub const DUPLICATE_EMAIL_MESSAGE: &str = "An account with this email already exists.";

const INTERNAL_ERROR_DETAIL: &str =
    "An error occurred while processing your request. Please try again later.";

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The client sent a request body or query that failed validation.
    ///
    /// Holds the error messages for each invalid field.
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    /// The email used to register is already in use.
    ///
    /// This is returned both when the email is found before inserting the new
    /// user and when the insert itself hits the unique constraint on the email
    /// column, which happens when two registrations for the same email race.
    #[error("the email is already in use")]
    DuplicateEmail,

    /// The bearer token is missing, malformed, signed with the wrong key,
    /// issued by someone else or expired.
    #[error("the request is not authorized")]
    Unauthorized,

    /// The requested resource was not found.
    ///
    /// For single-record transaction operations this is also returned when the
    /// record exists but belongs to another user.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The JWT signing key was empty or missing from the configuration.
    #[error("the JWT security key is missing from the configuration")]
    MissingSigningKey,

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The JWT could not be encoded.
    #[error("could not create token: {0}")]
    TokenCreation(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(value: validator::ValidationErrors) -> Self {
        Error::Validation(value.into())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Json(ProblemDetails {
                    title: "Validation failed",
                    status: StatusCode::BAD_REQUEST.as_u16(),
                    detail: None,
                    instance: None,
                    errors: Some(errors),
                }),
            )
                .into_response(),
            Error::DuplicateEmail => (
                StatusCode::BAD_REQUEST,
                Json(AuthResult::failure(DUPLICATE_EMAIL_MESSAGE)),
            )
                .into_response(),
            Error::Unauthorized => ProblemDetails::new(
                StatusCode::UNAUTHORIZED,
                "Unauthorized",
                "A valid bearer token is required.",
            )
            .into_response(),
            Error::NotFound => ProblemDetails::new(
                StatusCode::NOT_FOUND,
                "Not Found",
                "The requested resource could not be found.",
            )
            .into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                let correlation_id = Uuid::new_v4();
                tracing::error!(%correlation_id, "An unexpected error occurred: {}", error);

                ProblemDetails {
                    instance: Some(correlation_id.to_string()),
                    ..ProblemDetails::new(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Internal Server Error",
                        INTERNAL_ERROR_DETAIL,
                    )
                }
                .into_response()
            }
        }
    }
}

/// The JSON body for error responses.
#[derive(Debug, Serialize)]
pub(crate) struct ProblemDetails {
    pub title: &'static str,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<&'static str>,
    /// Identifies this occurrence of the error in the server logs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<ValidationErrors>,
}

impl ProblemDetails {
    pub fn new(status: StatusCode, title: &'static str, detail: &'static str) -> Self {
        Self {
            title,
            status: status.as_u16(),
            detail: Some(detail),
            instance: None,
            errors: None,
        }
    }
}

impl IntoResponse for ProblemDetails {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (status, Json(self)).into_response()
    }
}

/// Error messages for invalid request fields, keyed by the field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    /// Create an empty set of validation errors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create validation errors with a single `message` for `field`.
    pub fn single(field: &str, message: &str) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// Add an error `message` for `field`.
    pub fn add(&mut self, field: &str, message: &str) {
        self.0
            .entry(field.to_owned())
            .or_default()
            .push(message.to_owned());
    }

    /// Whether there are no errors.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The error messages for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Return `Ok(())` if there are no errors, otherwise wrap `self` in [Error::Validation].
    pub fn into_result(self) -> Result<(), Error> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(self))
        }
    }
}

impl From<validator::ValidationErrors> for ValidationErrors {
    fn from(value: validator::ValidationErrors) -> Self {
        let mut errors = Self::new();

        for (field, field_errors) in value.field_errors() {
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map(|message| message.to_string())
                    .unwrap_or_else(|| format!("{field} is invalid ({})", error.code));
                errors.add(&field, &message);
            }
        }

        errors
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<String> = self
            .0
            .iter()
            .map(|(field, messages)| format!("{field}: {}", messages.join(", ")))
            .collect();

        write!(f, "{}", messages.join("; "))
    }
}
