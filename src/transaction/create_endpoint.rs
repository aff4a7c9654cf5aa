//! Defines the endpoint for creating a new transaction.

use axum::{
    Extension, Json,
    extract::State,
    http::{StatusCode, header::LOCATION},
    response::{IntoResponse, Response},
};

use crate::{
    Error, TransactionStore, UserID,
    endpoints::{self, format_endpoint},
    transaction::{TransactionForm, TransactionState},
};

/// A route handler for creating a new transaction owned by the current user.
///
/// Responds with 201 Created, the new transaction and a `Location` header pointing to it.
#[utoipa::path(
    post,
    path = "/api/Transactions/Create",
    request_body = TransactionForm,
    responses(
        (status = 201, description = "The new transaction", body = crate::Transaction),
        (status = 400, description = "A field is invalid"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Transactions"
)]
pub async fn create_transaction_endpoint(
    State(mut state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    Json(form): Json<TransactionForm>,
) -> Result<Response, Error> {
    tracing::info!("Creating a new transaction...");

    let new_transaction = form.into_new_transaction().inspect_err(|_| {
        tracing::warn!("Invalid transaction for user {user_id}!");
    })?;
    let transaction = state.transaction_store.create(new_transaction, user_id)?;

    tracing::info!("Created transaction {}.", transaction.id);

    Ok((
        StatusCode::CREATED,
        [(
            LOCATION,
            format_endpoint(endpoints::TRANSACTION_DETAILS, transaction.id.as_i64()),
        )],
        Json(transaction),
    )
        .into_response())
}
