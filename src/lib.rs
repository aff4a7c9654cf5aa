//! A REST API for tracking personal income and expenses.
//!
//! Users register and log in with an email and password and receive a JSON Web
//! Token. The token is sent as a bearer token with every request to the
//! transaction endpoints, and each user can only see and change their own
//! transactions.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod account;
mod app_state;
mod auth;
mod config;
mod db;
mod endpoints;
mod error;
mod logging;
mod not_found;
mod openapi;
mod password;
mod routing;
mod timestamps;
mod transaction;
mod user;

pub use account::{AccountService, AuthResult};
pub use app_state::AppState;
pub use auth::{Claims, TokenIssuer, TokenValidator};
pub use config::{DEFAULT_EXPIRATION_MINUTES, JwtSettings};
pub use db::initialize as initialize_db;
pub use error::{Error, ValidationErrors};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use openapi::{ApiDoc, OPENAPI_JSON, SWAGGER_UI};
pub use password::{MIN_PASSWORD_LENGTH, PasswordHash, PasswordVerification, ValidatedPassword};
pub use routing::build_router;
pub use timestamps::Timestamps;
pub use transaction::{
    NewTransaction, SQLiteTransactionStore, Transaction, TransactionChanges, TransactionID,
    TransactionStore,
};
pub use user::{SQLiteUserStore, User, UserID, UserStore};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("Could not install the Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("Could not install the terminate signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
