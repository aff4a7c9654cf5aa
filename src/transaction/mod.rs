//! Transaction management for the expense tracker.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and the store that keeps each user's transactions separate
//! - The request body shared by the create and update endpoints
//! - The route handlers for listing, reading, creating, updating and deleting transactions

mod core;
pub(crate) mod create_endpoint;
pub(crate) mod delete_endpoint;
pub(crate) mod details_endpoint;
pub(crate) mod edit_endpoint;
mod form;
pub(crate) mod list_endpoint;

#[cfg(test)]
mod test_utils;

pub use core::{
    NewTransaction, SQLiteTransactionStore, Transaction, TransactionChanges, TransactionID,
    TransactionStore,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use details_endpoint::get_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use form::{TransactionForm, TransactionState};
pub use list_endpoint::get_transactions_endpoint;
