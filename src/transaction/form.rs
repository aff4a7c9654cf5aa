//! The request body and shared state for the transaction endpoints.

use axum::extract::FromRef;
use serde::Deserialize;
use time::OffsetDateTime;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    AppState, Error, SQLiteTransactionStore, ValidationErrors,
    transaction::{NewTransaction, TransactionChanges},
};

/// The transaction types a client may send.
const TRANSACTION_TYPES: [&str; 2] = ["Income", "Expense"];

const TYPE_MESSAGE: &str = "Type must be either \"Income\" or \"Expense\".";

/// The state needed by the transaction endpoints.
#[derive(Debug, Clone)]
pub struct TransactionState {
    /// The store for the current user's transactions.
    pub transaction_store: SQLiteTransactionStore,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transaction_store: SQLiteTransactionStore::new(state.db_connection.clone()),
        }
    }
}

/// The JSON body for creating or updating a transaction.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionForm {
    /// Either "Income" or "Expense".
    #[serde(rename = "type", default)]
    pub transaction_type: String,
    /// The amount of money that came in or went out.
    #[serde(default)]
    pub amount: Option<f64>,
    /// What the money was for.
    #[serde(default)]
    #[validate(length(min = 1, message = "Category is required."))]
    pub category: String,
    /// When the transaction happened. Only used when creating a transaction.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
}

impl TransactionForm {
    /// Check every field and return the amount.
    ///
    /// Errors are keyed by the JSON field names, so the type error is under `type`.
    fn validated_amount(&self) -> Result<f64, Error> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(field_errors) => field_errors.into(),
        };

        if !TRANSACTION_TYPES.contains(&self.transaction_type.as_str()) {
            errors.add("type", TYPE_MESSAGE);
        }

        match self.amount {
            None => errors.add("amount", "Amount is required."),
            Some(amount) if !amount.is_finite() => errors.add("amount", "Amount must be a number."),
            Some(_) => {}
        }

        errors.into_result()?;

        self.amount.ok_or_else(|| {
            Error::Validation(ValidationErrors::single("amount", "Amount is required."))
        })
    }

    /// Validate the form and convert it into a [NewTransaction].
    ///
    /// # Errors
    ///
    /// Returns [Error::Validation] if the type is not "Income" or "Expense",
    /// the category is empty or the amount is missing.
    pub fn into_new_transaction(self) -> Result<NewTransaction, Error> {
        let amount = self.validated_amount()?;

        Ok(NewTransaction {
            transaction_type: self.transaction_type,
            amount,
            category: self.category,
            created_at: self.created_at,
        })
    }

    /// Validate the form and convert it into [TransactionChanges].
    ///
    /// `created_at` is ignored.
    ///
    /// # Errors
    ///
    /// Returns [Error::Validation] for the same reasons as [TransactionForm::into_new_transaction].
    pub fn into_changes(self) -> Result<TransactionChanges, Error> {
        let amount = self.validated_amount()?;

        Ok(TransactionChanges {
            transaction_type: self.transaction_type,
            amount,
            category: self.category,
        })
    }
}

#[cfg(test)]
mod transaction_form_tests {
    use time::macros::datetime;

    use crate::Error;

    use super::TransactionForm;

    fn form(transaction_type: &str, amount: Option<f64>, category: &str) -> TransactionForm {
        TransactionForm {
            transaction_type: transaction_type.to_owned(),
            amount,
            category: category.to_owned(),
            created_at: None,
        }
    }

    fn field_errors(result: Result<impl std::fmt::Debug, Error>, field: &str) -> Vec<String> {
        match result {
            Err(Error::Validation(errors)) => errors.get(field).unwrap_or_default().to_vec(),
            other => panic!("want validation error for {field}, got {other:?}"),
        }
    }

    #[test]
    fn accepts_income_and_expense() {
        assert!(
            form("Income", Some(1000.0), "Salary")
                .into_new_transaction()
                .is_ok()
        );
        assert!(form("Expense", Some(-5.0), "Food").into_changes().is_ok());
    }

    #[test]
    fn rejects_unknown_type() {
        let errors = field_errors(
            form("Transfer", Some(1.0), "Food").into_new_transaction(),
            "type",
        );

        assert_eq!(errors, vec!["Type must be either \"Income\" or \"Expense\"."]);
    }

    #[test]
    fn reports_every_invalid_field_by_json_name() {
        let result = form("", None, "").into_changes();

        let errors = match result {
            Err(Error::Validation(errors)) => errors,
            other => panic!("want validation errors, got {other:?}"),
        };
        assert_eq!(errors.get("type").map(<[String]>::len), Some(1));
        assert_eq!(errors.get("amount").map(<[String]>::len), Some(1));
        assert_eq!(errors.get("category").map(<[String]>::len), Some(1));
        assert_eq!(errors.get("transaction_type"), None);
    }

    #[test]
    fn rejects_empty_category() {
        let errors = field_errors(form("Expense", Some(1.0), "").into_changes(), "category");

        assert_eq!(errors, vec!["Category is required."]);
    }

    #[test]
    fn rejects_missing_amount() {
        let errors = field_errors(form("Expense", None, "Food").into_new_transaction(), "amount");

        assert_eq!(errors, vec!["Amount is required."]);
    }

    #[test]
    fn rejects_infinite_amount() {
        let errors = field_errors(
            form("Expense", Some(f64::INFINITY), "Food").into_new_transaction(),
            "amount",
        );

        assert_eq!(errors, vec!["Amount must be a number."]);
    }

    #[test]
    fn deserializes_camel_case_json() {
        let form: TransactionForm = serde_json::from_str(
            r#"{"type": "Income", "amount": 1000, "category": "Salary", "createdAt": "2024-03-01T09:30:00Z"}"#,
        )
        .unwrap();

        let new_transaction = form.into_new_transaction().unwrap();

        assert_eq!(new_transaction.transaction_type, "Income");
        assert_eq!(new_transaction.amount, 1000.0);
        assert_eq!(
            new_transaction.created_at,
            Some(datetime!(2024-03-01 09:30:00 UTC))
        );
    }
}
