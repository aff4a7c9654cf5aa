//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{Error, JwtSettings, TokenIssuer, TokenValidator, db::initialize};

/// The state of the REST server.
#[derive(Clone)]
pub struct AppState {
    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,

    /// Signs the tokens handed out on log-in and registration.
    pub token_issuer: TokenIssuer,

    /// Checks the bearer tokens sent to the protected routes.
    pub token_validator: TokenValidator,

    /// The bcrypt cost used when hashing passwords.
    pub password_cost: u32,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        jwt_settings: &JwtSettings,
        password_cost: u32,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            db_connection: Arc::new(Mutex::new(db_connection)),
            token_issuer: TokenIssuer::new(jwt_settings),
            token_validator: TokenValidator::new(jwt_settings),
            password_cost,
        })
    }
}
