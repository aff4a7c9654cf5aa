//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use crate::{
    AppState,
    account::{
        get_profile_endpoint, is_email_taken_endpoint, log_in_endpoint, register_endpoint,
        update_profile_endpoint,
    },
    auth::auth_guard,
    endpoints,
    not_found::get_404_not_found,
    openapi::swagger_ui_router,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, edit_transaction_endpoint,
        get_transaction_endpoint, get_transactions_endpoint,
    },
};

/// Return a router with all the app's routes.
///
/// The account routes and the API documentation are open to anyone, the transaction routes
/// need a valid bearer token.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::IS_EMAIL_TAKEN, get(is_email_taken_endpoint))
        .route(endpoints::LOG_IN, post(log_in_endpoint))
        .route(endpoints::REGISTER, post(register_endpoint))
        .route(endpoints::USER_PROFILE, get(get_profile_endpoint))
        .route(endpoints::UPDATE_USER_PROFILE, put(update_profile_endpoint));

    let protected_routes = Router::new()
        .route(endpoints::TRANSACTIONS, get(get_transactions_endpoint))
        .route(endpoints::TRANSACTION_DETAILS, get(get_transaction_endpoint))
        .route(
            endpoints::CREATE_TRANSACTION,
            post(create_transaction_endpoint),
        )
        .route(
            endpoints::UPDATE_TRANSACTION,
            put(edit_transaction_endpoint),
        )
        .route(
            endpoints::DELETE_TRANSACTION,
            delete(delete_transaction_endpoint),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    protected_routes
        .merge(unprotected_routes)
        .merge(swagger_ui_router())
        .fallback(get_404_not_found)
        .with_state(state)
}
