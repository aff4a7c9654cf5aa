//! Defines the endpoint for logging in a user.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use validator::Validate;

use crate::{
    Error,
    account::{AccountState, Credentials},
};

/// A route handler for logging in a user.
///
/// Responds with 200 OK and the token if the credentials are correct,
/// otherwise 401 Unauthorized with a failed [AuthResult](crate::AuthResult).
#[utoipa::path(
    post,
    path = "/api/Account/Login",
    request_body = Credentials,
    responses(
        (status = 200, description = "Logged in", body = crate::AuthResult),
        (status = 400, description = "The email or password is missing or invalid"),
        (status = 401, description = "Wrong email or password", body = crate::AuthResult),
        (status = 500, description = "Internal server error")
    ),
    tag = "Account"
)]
pub async fn log_in_endpoint(
    State(mut state): State<AccountState>,
    Json(credentials): Json<Credentials>,
) -> Result<Response, Error> {
    tracing::info!(
        "Attempting to log in user with email: {}...",
        credentials.email
    );

    credentials.validate().inspect_err(|_| {
        tracing::warn!("Invalid login attempt.");
    })?;

    let result = state
        .account_service
        .login(&credentials.email, &credentials.password)?;

    let status = if result.success {
        StatusCode::OK
    } else {
        StatusCode::UNAUTHORIZED
    };

    Ok((status, Json(result)).into_response())
}
