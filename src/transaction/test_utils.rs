use std::{
    str::FromStr,
    sync::{Arc, Mutex},
};

use email_address::EmailAddress;
use rusqlite::Connection;

use crate::{
    PasswordHash, SQLiteTransactionStore, SQLiteUserStore, UserID, UserStore, initialize_db,
    transaction::{NewTransaction, TransactionState},
};

/// A transaction state backed by an in-memory database with two registered users.
pub fn get_test_state() -> (TransactionState, UserID, UserID) {
    let connection = Connection::open_in_memory().unwrap();
    initialize_db(&connection).unwrap();
    let connection = Arc::new(Mutex::new(connection));

    let mut user_store = SQLiteUserStore::new(connection.clone());
    let alice = user_store
        .create(
            &EmailAddress::from_str("alice@example.com").unwrap(),
            PasswordHash::new_unchecked("hunter2"),
        )
        .unwrap();
    let bob = user_store
        .create(
            &EmailAddress::from_str("bob@example.com").unwrap(),
            PasswordHash::new_unchecked("hunter3"),
        )
        .unwrap();

    let state = TransactionState {
        transaction_store: SQLiteTransactionStore::new(connection),
    };

    (state, alice.id, bob.id)
}

pub fn new_transaction(transaction_type: &str, amount: f64, category: &str) -> NewTransaction {
    NewTransaction {
        transaction_type: transaction_type.to_owned(),
        amount,
        category: category.to_owned(),
        created_at: None,
    }
}
