//! The transaction model and the SQLite store that keeps each user's transactions apart.

use std::{
    fmt::Display,
    sync::{Arc, Mutex},
};

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;

use crate::{
    Error, Timestamps, UserID,
    db::{CreateTable, MapRow},
};

/// A newtype wrapper for integer transaction IDs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash, ToSchema)]
pub struct TransactionID(i64);

impl TransactionID {
    /// Create a new transaction ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the transaction ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for TransactionID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// An income or expense recorded by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionID,
    /// Whether the transaction is "Income" or an "Expense".
    #[serde(rename = "type")]
    pub transaction_type: String,
    /// The amount of money that came in or went out.
    pub amount: f64,
    /// What the money was for, e.g. "Food" or "Salary".
    pub category: String,
    /// The ID of the user that owns the transaction.
    pub user_id: UserID,
    /// When the transaction happened and when it was last changed.
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

/// The data needed to record a new transaction.
///
/// The owner is not part of this struct, it is always the user making the request.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// Whether the transaction is "Income" or an "Expense".
    pub transaction_type: String,
    /// The amount of money that came in or went out.
    pub amount: f64,
    /// What the money was for.
    pub category: String,
    /// When the transaction happened. Defaults to the time it is stored.
    pub created_at: Option<OffsetDateTime>,
}

/// The fields of a transaction that may be changed after it is created.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionChanges {
    /// Whether the transaction is "Income" or an "Expense".
    pub transaction_type: String,
    /// The amount of money that came in or went out.
    pub amount: f64,
    /// What the money was for.
    pub category: String,
}

/// Stores transactions and only ever hands them back to the user that owns them.
///
/// A transaction owned by another user is treated exactly as if it did not exist.
pub trait TransactionStore {
    /// Get all of the transactions owned by `owner`, oldest ID first.
    fn get_by_owner(&self, owner: UserID) -> Result<Vec<Transaction>, Error>;

    /// Get the transaction with `id` if it is owned by `owner`.
    ///
    /// Returns [Error::NotFound] if there is no such transaction or it belongs to another user.
    fn get(&self, id: TransactionID, owner: UserID) -> Result<Transaction, Error>;

    /// Record a new transaction owned by `owner`.
    fn create(&mut self, new_transaction: NewTransaction, owner: UserID)
    -> Result<Transaction, Error>;

    /// Overwrite the type, amount and category of the transaction with `id` owned by `owner`.
    ///
    /// Returns [Error::NotFound] if there is no such transaction or it belongs to another user.
    fn update(
        &mut self,
        id: TransactionID,
        owner: UserID,
        changes: TransactionChanges,
    ) -> Result<Transaction, Error>;

    /// Delete the transaction with `id` owned by `owner`.
    ///
    /// Returns `true` if a transaction was deleted and `false` if there was nothing to delete.
    fn delete(&mut self, id: TransactionID, owner: UserID) -> Result<bool, Error>;

    /// Get the number of transactions across all users.
    fn count(&self) -> Result<usize, Error>;
}

const TRANSACTION_COLUMNS: &str =
    "id, transaction_type, amount, category, user_id, created_at, updated_at";

/// Stores transactions in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new transaction store.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl TransactionStore for SQLiteTransactionStore {
    /// Get the transactions that belong to `owner`.
    ///
    /// A user without any transactions gets an empty vector.
    ///
    /// # Errors
    ///
    /// Returns [Error::DatabaseLockError] if the database lock is poisoned or
    /// [Error::SqlError] if an SQL related error occurred.
    fn get_by_owner(&self, owner: UserID) -> Result<Vec<Transaction>, Error> {
        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .prepare(&format!(
                "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE user_id = :user_id ORDER BY id"
            ))?
            .query_map(
                &[(":user_id", &owner.as_i64())],
                SQLiteTransactionStore::map_row,
            )?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
            .collect()
    }

    fn get(&self, id: TransactionID, owner: UserID) -> Result<Transaction, Error> {
        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .prepare(&format!(
                "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE id = :id AND user_id = :user_id"
            ))?
            .query_row(
                &[(":id", &id.as_i64()), (":user_id", &owner.as_i64())],
                SQLiteTransactionStore::map_row,
            )
            .map_err(|error| error.into())
    }

    /// Create a new transaction in the database.
    ///
    /// `updated_at` is always the time of the insert, `created_at` is the time
    /// given in `new_transaction` or the time of the insert if none is given.
    ///
    /// # Errors
    ///
    /// Returns [Error::SqlError] if `owner` does not refer to a user or another SQL related error occurred.
    fn create(
        &mut self,
        new_transaction: NewTransaction,
        owner: UserID,
    ) -> Result<Transaction, Error> {
        let timestamps = match new_transaction.created_at {
            Some(created_at) => Timestamps::created_at(created_at),
            None => Timestamps::now(),
        };

        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .prepare(&format!(
                "INSERT INTO \"transaction\" (transaction_type, amount, category, user_id, created_at, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                RETURNING {TRANSACTION_COLUMNS}"
            ))?
            .query_row(
                (
                    new_transaction.transaction_type,
                    new_transaction.amount,
                    new_transaction.category,
                    owner.as_i64(),
                    timestamps.created_at,
                    timestamps.updated_at,
                ),
                SQLiteTransactionStore::map_row,
            )
            .map_err(|error| error.into())
    }

    fn update(
        &mut self,
        id: TransactionID,
        owner: UserID,
        changes: TransactionChanges,
    ) -> Result<Transaction, Error> {
        let now = OffsetDateTime::now_utc();

        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .prepare(&format!(
                "UPDATE \"transaction\" SET transaction_type = ?1, amount = ?2, category = ?3, updated_at = ?4
                WHERE id = ?5 AND user_id = ?6
                RETURNING {TRANSACTION_COLUMNS}"
            ))?
            .query_row(
                (
                    changes.transaction_type,
                    changes.amount,
                    changes.category,
                    now,
                    id.as_i64(),
                    owner.as_i64(),
                ),
                SQLiteTransactionStore::map_row,
            )
            .map_err(|error| error.into())
    }

    fn delete(&mut self, id: TransactionID, owner: UserID) -> Result<bool, Error> {
        let rows_affected = self
            .connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .execute(
                "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
                (id.as_i64(), owner.as_i64()),
            )?;

        Ok(rows_affected > 0)
    }

    fn count(&self) -> Result<usize, Error> {
        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
                row.get(0)
            })
            .map_err(|error| error.into())
    }
}

impl CreateTable for SQLiteTransactionStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS \"transaction\" (
                    id INTEGER PRIMARY KEY,
                    transaction_type TEXT NOT NULL,
                    amount REAL NOT NULL,
                    category TEXT NOT NULL,
                    user_id INTEGER NOT NULL,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL,
                    FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                    )",
            (),
        )?;

        // Every query filters on the owner.
        connection.execute(
            "CREATE INDEX IF NOT EXISTS idx_transaction_user_id ON \"transaction\"(user_id)",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteTransactionStore {
    type ReturnType = Transaction;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        Ok(Transaction {
            id: TransactionID::new(row.get(offset)?),
            transaction_type: row.get(offset + 1)?,
            amount: row.get(offset + 2)?,
            category: row.get(offset + 3)?,
            user_id: UserID::new(row.get(offset + 4)?),
            timestamps: Timestamps {
                created_at: row.get(offset + 5)?,
                updated_at: row.get(offset + 6)?,
            },
        })
    }
}
