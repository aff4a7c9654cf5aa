use std::{
    str::FromStr,
    sync::{Arc, Mutex},
};

use email_address::EmailAddress;
use rusqlite::Connection;

use crate::{
    AuthResult, JwtSettings, SQLiteUserStore, TokenIssuer, ValidatedPassword, initialize_db,
    account::{AccountService, AccountState},
};

pub const TEST_COST: u32 = 4;

pub fn test_settings() -> JwtSettings {
    JwtSettings::new("averysecretkey", "expenses", "expenses-client", None).unwrap()
}

/// An account state backed by an in-memory database with no users.
pub fn get_test_state() -> AccountState {
    let connection = Connection::open_in_memory().unwrap();
    initialize_db(&connection).unwrap();

    AccountState {
        account_service: AccountService::new(
            SQLiteUserStore::new(Arc::new(Mutex::new(connection))),
            TokenIssuer::new(&test_settings()),
            TEST_COST,
        ),
    }
}

pub fn register_test_user(state: &AccountState, email: &str, password: &str) -> AuthResult {
    state
        .account_service
        .clone()
        .register(
            &EmailAddress::from_str(email).unwrap(),
            ValidatedPassword::new(password).unwrap(),
        )
        .unwrap()
}
