//! Defines the endpoint for listing the current user's transactions.

use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{Error, TransactionStore, UserID, transaction::TransactionState};

/// A route handler for getting all of the current user's transactions.
///
/// Responds with 204 No Content if the user has no transactions.
#[utoipa::path(
    get,
    path = "/api/Transactions/All",
    responses(
        (status = 200, description = "The user's transactions", body = [crate::Transaction]),
        (status = 204, description = "The user has no transactions"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Transactions"
)]
pub async fn get_transactions_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    tracing::info!("Fetching all transactions for user {user_id}...");

    let transactions = state.transaction_store.get_by_owner(user_id)?;

    if transactions.is_empty() {
        tracing::warn!("No transactions found for user {user_id}!");
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    Ok(Json(transactions).into_response())
}
