//! Defines the endpoint for changing an existing transaction.

use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::{
    Error, Transaction, TransactionID, TransactionStore, UserID,
    transaction::{TransactionForm, TransactionState},
};

/// A route handler for changing the type, amount and category of one of the current user's transactions.
///
/// Transactions belonging to other users are reported as not found and left unchanged.
#[utoipa::path(
    put,
    path = "/api/Transactions/Update/{transaction_id}",
    params(("transaction_id" = i64, Path, description = "The ID of the transaction")),
    request_body = TransactionForm,
    responses(
        (status = 200, description = "The updated transaction", body = Transaction),
        (status = 400, description = "A field is invalid"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "The user has no transaction with the ID"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Transactions"
)]
pub async fn edit_transaction_endpoint(
    State(mut state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionID>,
    Json(form): Json<TransactionForm>,
) -> Result<Json<Transaction>, Error> {
    tracing::info!("Updating transaction {transaction_id}...");

    let changes = form.into_changes()?;

    match state
        .transaction_store
        .update(transaction_id, user_id, changes)
    {
        Ok(transaction) => {
            tracing::info!("Transaction {transaction_id} updated successfully.");
            Ok(Json(transaction))
        }
        Err(Error::NotFound) => {
            tracing::warn!("Transaction {transaction_id} not found for user {user_id}!");
            Err(Error::NotFound)
        }
        Err(error) => Err(error),
    }
}
