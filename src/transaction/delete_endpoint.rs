//! Defines the endpoint for deleting a transaction.

use axum::{
    Extension,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{Error, TransactionID, TransactionStore, UserID, transaction::TransactionState};

/// A route handler for deleting one of the current user's transactions.
///
/// Responds with 204 No Content on success and 404 Not Found if the user has no
/// transaction with the given ID, including when it was already deleted.
#[utoipa::path(
    delete,
    path = "/api/Transactions/Delete/{transaction_id}",
    params(("transaction_id" = i64, Path, description = "The ID of the transaction")),
    responses(
        (status = 204, description = "The transaction was deleted"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "The user has no transaction with the ID"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Transactions"
)]
pub async fn delete_transaction_endpoint(
    State(mut state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionID>,
) -> Result<StatusCode, Error> {
    tracing::info!("Deleting transaction {transaction_id}...");

    if state.transaction_store.delete(transaction_id, user_id)? {
        tracing::info!("Transaction {transaction_id} deleted successfully.");
        Ok(StatusCode::NO_CONTENT)
    } else {
        tracing::warn!("Transaction {transaction_id} not found for user {user_id}!");
        Err(Error::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        Extension,
        extract::{Path, State},
        http::StatusCode,
    };

    use crate::{
        Error, TransactionStore,
        transaction::{
            delete_transaction_endpoint,
            test_utils::{get_test_state, new_transaction},
        },
    };

    #[tokio::test]
    async fn deletes_transaction() {
        let (mut state, alice, _) = get_test_state();
        let transaction = state
            .transaction_store
            .create(new_transaction("Expense", 50.0, "Food"), alice)
            .unwrap();

        let status = delete_transaction_endpoint(
            State(state.clone()),
            Extension(alice),
            Path(transaction.id),
        )
        .await;

        assert_eq!(status, Ok(StatusCode::NO_CONTENT));
        assert_eq!(
            state.transaction_store.get(transaction.id, alice),
            Err(Error::NotFound)
        );
    }

    #[tokio::test]
    async fn deleting_twice_is_not_found() {
        let (mut state, alice, _) = get_test_state();
        let transaction = state
            .transaction_store
            .create(new_transaction("Expense", 50.0, "Food"), alice)
            .unwrap();

        delete_transaction_endpoint(State(state.clone()), Extension(alice), Path(transaction.id))
            .await
            .unwrap();
        let status = delete_transaction_endpoint(
            State(state.clone()),
            Extension(alice),
            Path(transaction.id),
        )
        .await;

        assert_eq!(status, Err(Error::NotFound));
    }

    #[tokio::test]
    async fn cannot_delete_other_users_transaction() {
        let (mut state, alice, bob) = get_test_state();
        let transaction = state
            .transaction_store
            .create(new_transaction("Expense", 50.0, "Food"), alice)
            .unwrap();

        let status =
            delete_transaction_endpoint(State(state.clone()), Extension(bob), Path(transaction.id))
                .await;

        assert_eq!(status, Err(Error::NotFound));
        assert_eq!(state.transaction_store.count(), Ok(1));
    }
}
