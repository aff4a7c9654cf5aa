//! Defines the endpoint for checking whether an email is already registered.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use validator::Validate;

use crate::{
    Error,
    account::{AccountState, form::validate_email},
};

/// The query string for the email check.
#[derive(Debug, Deserialize, Validate)]
pub struct EmailQuery {
    /// The email address to look for.
    #[serde(default)]
    #[validate(custom(function = "validate_email"))]
    pub email: String,
}

/// A route handler that responds with `true` if a user has already registered
/// with the email in the query string, ignoring case, and `false` otherwise.
#[utoipa::path(
    get,
    path = "/api/Account/IsEmailAlreadyTaken",
    params(("email" = String, Query, description = "The email to check")),
    responses(
        (status = 200, description = "Whether the email is taken", body = bool),
        (status = 400, description = "The email is missing or invalid"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Account"
)]
pub async fn is_email_taken_endpoint(
    State(state): State<AccountState>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<bool>, Error> {
    query.validate()?;

    let is_taken = !state.account_service.is_email_available(&query.email)?;

    Ok(Json(is_taken))
}
