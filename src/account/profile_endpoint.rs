//! Defines the endpoints for reading and changing a user's profile.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use validator::Validate;

use crate::{
    Error, User, UserID,
    account::{AccountState, EmailQuery, ProfileForm},
};

/// A route handler for getting the profile of the user with the email in the query string.
#[utoipa::path(
    get,
    path = "/api/Account/UserProfile",
    params(("email" = String, Query, description = "The email of the user")),
    responses(
        (status = 200, description = "The user's profile", body = User),
        (status = 400, description = "The email is missing or invalid"),
        (status = 404, description = "No user has the email"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Account"
)]
pub async fn get_profile_endpoint(
    State(state): State<AccountState>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<User>, Error> {
    tracing::info!("Getting the profile of user: {}", query.email);

    query.validate()?;

    match state.account_service.get_profile(&query.email)? {
        Some(user) => {
            tracing::info!("User with email {} is found.", query.email);
            Ok(Json(user))
        }
        None => {
            tracing::warn!("User with email {} does not exist.", query.email);
            Err(Error::NotFound)
        }
    }
}

/// A route handler for changing the names of a user.
///
/// The email in the body must belong to the user with the ID in the path,
/// otherwise nothing is changed and 404 Not Found is returned.
#[utoipa::path(
    put,
    path = "/api/Account/UpdateUserProfile/{user_id}",
    params(("user_id" = i64, Path, description = "The ID of the user")),
    request_body = ProfileForm,
    responses(
        (status = 200, description = "The updated profile", body = User),
        (status = 400, description = "A field is invalid"),
        (status = 404, description = "No user has both the ID and the email"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Account"
)]
pub async fn update_profile_endpoint(
    State(mut state): State<AccountState>,
    Path(user_id): Path<UserID>,
    Json(form): Json<ProfileForm>,
) -> Result<Json<User>, Error> {
    tracing::info!("Updating user profile for user with ID: {user_id}...");

    form.validate().inspect_err(|_| {
        tracing::warn!("Invalid profile update attempt.");
    })?;

    let updated_user = state.account_service.update_profile(
        user_id,
        &form.email,
        form.first_name.as_deref(),
        form.last_name.as_deref(),
    )?;

    match updated_user {
        Some(user) => {
            tracing::info!("User profile for user with ID {user_id} updated successfully.");
            Ok(Json(user))
        }
        None => {
            tracing::warn!("No user with ID {user_id} and the given email exists.");
            Err(Error::NotFound)
        }
    }
}
