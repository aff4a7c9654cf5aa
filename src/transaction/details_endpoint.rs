//! Defines the endpoint for getting a single transaction.

use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::{
    Error, Transaction, TransactionID, TransactionStore, UserID, transaction::TransactionState,
};

/// A route handler for getting one of the current user's transactions.
///
/// Transactions belonging to other users are reported as not found.
#[utoipa::path(
    get,
    path = "/api/Transactions/Details/{transaction_id}",
    params(("transaction_id" = i64, Path, description = "The ID of the transaction")),
    responses(
        (status = 200, description = "The transaction", body = Transaction),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "The user has no transaction with the ID"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Transactions"
)]
pub async fn get_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionID>,
) -> Result<Json<Transaction>, Error> {
    match state.transaction_store.get(transaction_id, user_id) {
        Ok(transaction) => {
            tracing::info!("Transaction {transaction_id} found.");
            Ok(Json(transaction))
        }
        Err(Error::NotFound) => {
            tracing::warn!("Transaction {transaction_id} not found for user {user_id}!");
            Err(Error::NotFound)
        }
        Err(error) => Err(error),
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        Extension,
        extract::{Path, State},
    };

    use crate::{
        Error, TransactionID, TransactionStore,
        transaction::{
            get_transaction_endpoint,
            test_utils::{get_test_state, new_transaction},
        },
    };

    #[tokio::test]
    async fn gets_owned_transaction() {
        let (mut state, alice, _) = get_test_state();
        let transaction = state
            .transaction_store
            .create(new_transaction("Income", 1000.0, "Salary"), alice)
            .unwrap();

        let got = get_transaction_endpoint(State(state), Extension(alice), Path(transaction.id))
            .await
            .unwrap();

        assert_eq!(got.0, transaction);
    }

    #[tokio::test]
    async fn missing_transaction_is_not_found() {
        let (state, alice, _) = get_test_state();

        let result =
            get_transaction_endpoint(State(state), Extension(alice), Path(TransactionID::new(42)))
                .await;

        assert_eq!(result.map(|json| json.0), Err(Error::NotFound));
    }

    #[tokio::test]
    async fn other_users_transaction_is_not_found() {
        let (mut state, alice, bob) = get_test_state();
        let transaction = state
            .transaction_store
            .create(new_transaction("Expense", 50.0, "Food"), alice)
            .unwrap();

        let result =
            get_transaction_endpoint(State(state), Extension(bob), Path(transaction.id)).await;

        assert_eq!(result.map(|json| json.0), Err(Error::NotFound));
    }
}
