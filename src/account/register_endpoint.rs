//! Defines the endpoint for registering a new user.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    Error,
    account::{AccountState, Credentials},
};

/// A route handler for registering a new user.
///
/// Responds with 201 Created and a token for the new user. An email that is
/// already registered gives 400 Bad Request with a failed [AuthResult](crate::AuthResult).
#[utoipa::path(
    post,
    path = "/api/Account/Register",
    request_body = Credentials,
    responses(
        (status = 201, description = "Registered and logged in", body = crate::AuthResult),
        (status = 400, description = "The email is taken, or the email or password is invalid"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Account"
)]
pub async fn register_endpoint(
    State(mut state): State<AccountState>,
    Json(credentials): Json<Credentials>,
) -> Result<Response, Error> {
    tracing::info!(
        "Registering a new user with email: {}...",
        credentials.email
    );

    let (email, password) = credentials.into_registration().inspect_err(|_| {
        tracing::warn!("Invalid user registration attempt.");
    })?;

    let result = state.account_service.register(&email, password)?;

    Ok((StatusCode::CREATED, Json(result)).into_response())
}
