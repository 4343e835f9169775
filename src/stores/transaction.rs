//! Defines the transaction store trait.

use std::ops::RangeInclusive;

use time::Date;

use crate::{
    Error,
    models::{DatabaseID, Transaction, TransactionBuilder, TransactionType, UserID},
};

/// Handles the creation and retrieval of transactions.
pub trait TransactionStore {
    /// Create a new transaction in the store.
    fn create(&mut self, builder: TransactionBuilder) -> Result<Transaction, Error>;

    /// Retrieve a transaction from the store by its ID.
    fn get(&self, id: DatabaseID) -> Result<Transaction, Error>;

    /// Retrieve transactions from the store in the way defined by `query`.
    fn get_query(&self, query: &TransactionQuery) -> Result<Vec<Transaction>, Error>;

    /// Count the transactions matching `query`, ignoring its limit/offset.
    fn count(&self, query: &TransactionQuery) -> Result<u64, Error>;

    /// Overwrite the stored transaction with the same ID as `transaction`.
    fn update(&mut self, transaction: &Transaction) -> Result<(), Error>;

    /// Delete a transaction from the store by its ID.
    fn delete(&mut self, id: DatabaseID) -> Result<(), Error>;
}

/// Defines how transactions should be fetched from
/// [TransactionStore::get_query].
#[derive(Debug, Clone)]
pub struct TransactionQuery {
    /// Only include transactions owned by this user.
    pub user_id: UserID,
    /// Include transactions within `date_range` (inclusive).
    pub date_range: Option<RangeInclusive<Date>>,
    /// Only include transactions of this type. `None` includes both types.
    pub kind: Option<TransactionType>,
    /// Selects up to the first N (`limit`) transactions.
    pub limit: Option<u64>,
    /// Skips the first `offset` transactions. Only applied with a limit.
    pub offset: u64,
    /// Orders transactions by date in the order `sort_date`. `None` returns
    /// transactions in the order they are stored.
    pub sort_date: Option<SortOrder>,
}

impl TransactionQuery {
    /// A query for all of `user_id`'s transactions, in storage order.
    pub fn for_user(user_id: UserID) -> Self {
        Self {
            user_id,
            date_range: None,
            kind: None,
            limit: None,
            offset: 0,
            sort_date: None,
        }
    }
}

/// The order to sort transactions in a [TransactionQuery].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Sort in order of increasing value.
    Ascending,
    /// Sort in order of decreasing value.
    Descending,
}
