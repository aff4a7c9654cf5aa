//! Authentication middleware that validates bearer tokens.

use axum::{
    extract::{FromRef, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};

use crate::{AppState, Error, auth::TokenValidator};

/// The state needed for the auth middleware
#[derive(Clone)]
pub struct AuthState {
    /// Checks the bearer tokens sent by clients.
    pub token_validator: TokenValidator,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            token_validator: state.token_validator.clone(),
        }
    }
}

/// Middleware function that checks for a valid bearer token in the `Authorization` header.
/// The user ID is placed into the request and then the request executed normally if the token is valid,
/// otherwise a 401 Unauthorized response is returned.
///
/// **Note**: Route handlers can use the function argument `Extension(user_id): Extension<UserID>` to receive the user ID.
pub async fn auth_guard(
    State(state): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(Authorization(bearer)) = request.headers().typed_get::<Authorization<Bearer>>() else {
        tracing::debug!("Missing or malformed bearer token for {}", request.uri());
        return Error::Unauthorized.into_response();
    };

    let user_id = match state
        .token_validator
        .validate(bearer.token())
        .and_then(|claims| claims.user_id())
    {
        Ok(user_id) => user_id,
        Err(error) => return error.into_response(),
    };

    request.extensions_mut().insert(user_id);
    next.run(request).await
}
