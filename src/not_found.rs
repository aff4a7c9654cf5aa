//! The JSON response for requests to paths without a route.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::error::ProblemDetails;

/// The fallback route handler for paths that do not match any route.
pub async fn get_404_not_found() -> Response {
    ProblemDetails::new(
        StatusCode::NOT_FOUND,
        "Not Found",
        "There is no endpoint at this path.",
    )
    .into_response()
}
