//! This file defines the type `Transaction`, the core record of the application:
//! a single dated income or expense with a category, amount and description.

use std::fmt::Display;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    models::{DatabaseID, UserID},
};

/// Whether a transaction adds money (income) or removes money (expense).
///
/// The amount of a transaction is always non-negative, the type alone decides
/// the sign of its contribution to totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money earned, e.g. a salary payment.
    Income,
    /// Money spent, e.g. a grocery shop.
    Expense,
}

impl TransactionType {
    /// The lower-case string used on the wire and in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }

    /// Parse a transaction type from its wire string.
    ///
    /// Matching is case-insensitive to be lenient with clients.
    ///
    /// # Errors
    /// Returns [Error::InvalidTransactionType] for anything other than
    /// `income` or `expense`.
    pub fn parse(token: &str) -> Result<Self, Error> {
        match token.to_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            _ => Err(Error::InvalidTransactionType(token.to_string())),
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;

        Self::parse(text).map_err(|_| FromSqlError::InvalidType)
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: DatabaseID,
    /// The ID of the user that owns the transaction.
    pub user_id: UserID,
    /// Whether the transaction is an income or an expense.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// A free-text category label, case-preserved for display.
    pub category: String,
    /// The amount of money spent or earned. Always non-negative.
    pub amount: f64,
    /// A text description of what the transaction was for. May be empty.
    pub description: String,
    /// The calendar date the transaction happened on.
    pub transaction_date: Date,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(amount: f64, kind: TransactionType, user_id: UserID) -> TransactionBuilder {
        TransactionBuilder::new(amount, kind, user_id)
    }
}

/// A builder for creating [Transaction] instances.
///
/// Provides sensible defaults for the optional fields: today's date, an empty
/// description, and an empty category (displayed as `"Uncategorized"` in the
/// analytics).
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionBuilder {
    /// The amount of money spent or earned. Must be non-negative.
    pub amount: f64,
    /// Whether the transaction is an income or an expense.
    pub kind: TransactionType,
    /// The ID of the user that owns the transaction.
    pub user_id: UserID,
    /// The category label for the transaction.
    pub category: String,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The calendar date the transaction happened on.
    pub transaction_date: Date,
}

impl TransactionBuilder {
    /// Create a builder with today's date, an empty category and an empty
    /// description.
    pub fn new(amount: f64, kind: TransactionType, user_id: UserID) -> Self {
        Self {
            amount,
            kind,
            user_id,
            category: String::new(),
            description: String::new(),
            transaction_date: OffsetDateTime::now_utc().date(),
        }
    }

    /// Set the category for the transaction.
    pub fn category(mut self, category: &str) -> Self {
        self.category = category.to_string();
        self
    }

    /// Set the description for the transaction.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Set the date for the transaction.
    ///
    /// # Errors
    /// Returns [Error::FutureDate] if `date` is later than today.
    pub fn date(mut self, date: Date) -> Result<Self, Error> {
        if date > OffsetDateTime::now_utc().date() {
            return Err(Error::FutureDate(date));
        }

        self.transaction_date = date;
        Ok(self)
    }
}

#[cfg(test)]
mod transaction_type_tests {
    use crate::Error;

    use super::TransactionType;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(
            TransactionType::parse("Income"),
            Ok(TransactionType::Income)
        );
        assert_eq!(
            TransactionType::parse("EXPENSE"),
            Ok(TransactionType::Expense)
        );
    }

    #[test]
    fn parse_rejects_unknown_token() {
        assert_eq!(
            TransactionType::parse("transfer"),
            Err(Error::InvalidTransactionType("transfer".to_string()))
        );
    }

    #[test]
    fn serializes_to_lowercase() {
        let json = serde_json::to_string(&TransactionType::Expense).unwrap();

        assert_eq!(json, "\"expense\"");
    }
}
