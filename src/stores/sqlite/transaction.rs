//! Implements a SQLite backed transaction store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row, params_from_iter, types::Value};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{DatabaseID, Transaction, TransactionBuilder, UserID},
    stores::{SortOrder, TransactionQuery, TransactionStore},
};

/// Stores transactions in a SQLite database.
///
/// Note that because a transaction belongs to a [User](crate::models::User),
/// the user table must be set up in the database.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    /// Build the WHERE clause and its parameters for `query`.
    fn where_clause(query: &TransactionQuery) -> (String, Vec<Value>) {
        let mut clause_parts = vec!["user_id = ?1".to_string()];
        let mut parameters = vec![Value::Integer(query.user_id.as_i64())];

        if let Some(date_range) = &query.date_range {
            clause_parts.push(format!(
                "date BETWEEN ?{} AND ?{}",
                parameters.len() + 1,
                parameters.len() + 2,
            ));
            parameters.push(Value::Text(date_range.start().to_string()));
            parameters.push(Value::Text(date_range.end().to_string()));
        }

        if let Some(kind) = query.kind {
            clause_parts.push(format!("type = ?{}", parameters.len() + 1));
            parameters.push(Value::Text(kind.as_str().to_string()));
        }

        (
            String::from("WHERE ") + &clause_parts.join(" AND "),
            parameters,
        )
    }
}

impl TransactionStore for SQLiteTransactionStore {
    /// Create a new transaction in the database.
    ///
    /// # Errors
    /// This function will return a [Error::SqlError] if there is an SQL
    /// error, e.g. `builder.user_id` does not refer to a valid user.
    fn create(&mut self, builder: TransactionBuilder) -> Result<Transaction, Error> {
        let transaction = self
            .connection
            .lock()
            .unwrap()
            .prepare(
                "INSERT INTO \"transaction\" (user_id, type, category, amount, description, date)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 RETURNING id, user_id, type, category, amount, description, date",
            )?
            .query_row(
                (
                    builder.user_id,
                    builder.kind,
                    &builder.category,
                    builder.amount,
                    &builder.description,
                    builder.transaction_date,
                ),
                Self::map_row,
            )?;

        Ok(transaction)
    }

    /// Retrieve a transaction in the database by its `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a valid transaction,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn get(&self, id: DatabaseID) -> Result<Transaction, Error> {
        let transaction = self
            .connection
            .lock()
            .unwrap()
            .prepare(
                "SELECT id, user_id, type, category, amount, description, date
                 FROM \"transaction\" WHERE id = :id",
            )?
            .query_row(&[(":id", &id)], Self::map_row)?;

        Ok(transaction)
    }

    /// Query for transactions in the database.
    ///
    /// # Errors
    /// This function will return a [Error::SqlError] if there is an SQL error.
    fn get_query(&self, query: &TransactionQuery) -> Result<Vec<Transaction>, Error> {
        let (where_clause, parameters) = Self::where_clause(query);

        let mut query_string_parts = vec![
            "SELECT id, user_id, type, category, amount, description, date FROM \"transaction\""
                .to_string(),
            where_clause,
        ];

        match query.sort_date {
            Some(SortOrder::Ascending) => {
                query_string_parts.push("ORDER BY date ASC, id ASC".to_string())
            }
            Some(SortOrder::Descending) => {
                query_string_parts.push("ORDER BY date DESC, id DESC".to_string())
            }
            None => {}
        }

        if let Some(limit) = query.limit {
            query_string_parts.push(format!("LIMIT {limit} OFFSET {}", query.offset));
        }

        let query_string = query_string_parts.join(" ");

        self.connection
            .lock()
            .unwrap()
            .prepare(&query_string)?
            .query_map(params_from_iter(parameters.iter()), Self::map_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::SqlError))
            .collect()
    }

    /// Count the transactions matching `query`, ignoring its limit/offset.
    ///
    /// # Errors
    /// This function will return a [Error::SqlError] if there is an SQL error.
    fn count(&self, query: &TransactionQuery) -> Result<u64, Error> {
        let (where_clause, parameters) = Self::where_clause(query);
        let query_string = format!("SELECT COUNT(id) FROM \"transaction\" {where_clause}");

        let count: i64 = self.connection.lock().unwrap().query_row(
            &query_string,
            params_from_iter(parameters.iter()),
            |row| row.get(0),
        )?;

        Ok(count as u64)
    }

    /// Overwrite the stored transaction with the same ID as `transaction`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if the transaction is not in the database,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn update(&mut self, transaction: &Transaction) -> Result<(), Error> {
        let rows_affected = self.connection.lock().unwrap().execute(
            "UPDATE \"transaction\"
             SET type = ?1, category = ?2, amount = ?3, description = ?4, date = ?5
             WHERE id = ?6",
            (
                transaction.kind,
                &transaction.category,
                transaction.amount,
                &transaction.description,
                transaction.transaction_date,
                transaction.id,
            ),
        )?;

        if rows_affected == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }

    /// Delete a transaction from the database by its ID.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if the transaction is not in the database,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn delete(&mut self, id: DatabaseID) -> Result<(), Error> {
        let rows_affected = self
            .connection
            .lock()
            .unwrap()
            .execute("DELETE FROM \"transaction\" WHERE id = ?1", (id,))?;

        if rows_affected == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }
}

impl CreateTable for SQLiteTransactionStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS \"transaction\" (
                    id INTEGER PRIMARY KEY,
                    user_id INTEGER NOT NULL,
                    type TEXT NOT NULL,
                    category TEXT NOT NULL,
                    amount REAL NOT NULL,
                    description TEXT NOT NULL,
                    date TEXT NOT NULL,
                    FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteTransactionStore {
    type ReturnType = Transaction;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        Ok(Transaction {
            id: row.get(offset)?,
            user_id: UserID::new(row.get(offset + 1)?),
            kind: row.get(offset + 2)?,
            category: row.get(offset + 3)?,
            amount: row.get(offset + 4)?,
            description: row.get(offset + 5)?,
            transaction_date: row.get(offset + 6)?,
        })
    }
}

#[cfg(test)]
mod sqlite_transaction_store_tests {
    use time::{Duration, OffsetDateTime};

    use crate::{
        Error,
        models::{Transaction, TransactionType, User},
        stores::{
            SortOrder, TransactionQuery, TransactionStore,
            sqlite::test_utils::{test_connection, test_user},
        },
    };

    use super::SQLiteTransactionStore;

    fn get_store_and_user() -> (SQLiteTransactionStore, User) {
        let connection = test_connection();
        let user = test_user(connection.clone());

        (SQLiteTransactionStore::new(connection), user)
    }

    #[test]
    fn create_and_get_transaction() {
        let (mut store, user) = get_store_and_user();

        let created = store
            .create(
                Transaction::build(123.45, TransactionType::Expense, user.id)
                    .category("Food")
                    .description("Rust pie"),
            )
            .unwrap();
        let fetched = store.get(created.id).unwrap();

        assert_eq!(created, fetched);
        assert_eq!(fetched.category, "Food");
        assert_eq!(fetched.amount, 123.45);
    }

    #[test]
    fn get_fails_on_unknown_id() {
        let (store, _) = get_store_and_user();

        assert_eq!(store.get(999), Err(Error::NotFound));
    }

    #[test]
    fn query_filters_by_type() {
        let (mut store, user) = get_store_and_user();

        store
            .create(Transaction::build(100.0, TransactionType::Expense, user.id).category("Food"))
            .unwrap();
        store
            .create(Transaction::build(1000.0, TransactionType::Income, user.id).category("Salary"))
            .unwrap();

        let mut query = TransactionQuery::for_user(user.id);
        query.kind = Some(TransactionType::Income);

        let transactions = store.get_query(&query).unwrap();

        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].category, "Salary");
    }

    #[test]
    fn query_filters_by_date_range() {
        let (mut store, user) = get_store_and_user();
        let today = OffsetDateTime::now_utc().date();
        let last_week = today - Duration::days(7);
        let last_month = today - Duration::days(31);

        store
            .create(
                Transaction::build(10.0, TransactionType::Expense, user.id)
                    .date(last_month)
                    .unwrap(),
            )
            .unwrap();
        let recent = store
            .create(
                Transaction::build(20.0, TransactionType::Expense, user.id)
                    .date(last_week)
                    .unwrap(),
            )
            .unwrap();

        let mut query = TransactionQuery::for_user(user.id);
        query.date_range = Some((today - Duration::days(14))..=today);

        let transactions = store.get_query(&query).unwrap();

        assert_eq!(transactions, vec![recent]);
    }

    #[test]
    fn query_sorts_and_paginates() {
        let (mut store, user) = get_store_and_user();
        let today = OffsetDateTime::now_utc().date();

        for days_ago in 0..5 {
            store
                .create(
                    Transaction::build(1.0 + days_ago as f64, TransactionType::Expense, user.id)
                        .date(today - Duration::days(days_ago))
                        .unwrap(),
                )
                .unwrap();
        }

        let mut query = TransactionQuery::for_user(user.id);
        query.sort_date = Some(SortOrder::Descending);
        query.limit = Some(2);
        query.offset = 2;

        let transactions = store.get_query(&query).unwrap();

        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[0].transaction_date, today - Duration::days(2));
        assert_eq!(transactions[1].transaction_date, today - Duration::days(3));
    }

    #[test]
    fn count_ignores_pagination() {
        let (mut store, user) = get_store_and_user();

        for _ in 0..3 {
            store
                .create(Transaction::build(1.0, TransactionType::Expense, user.id))
                .unwrap();
        }

        let mut query = TransactionQuery::for_user(user.id);
        query.limit = Some(1);

        assert_eq!(store.count(&query).unwrap(), 3);
    }

    #[test]
    fn query_is_scoped_to_the_user() {
        let (mut store, user) = get_store_and_user();

        store
            .create(Transaction::build(1.0, TransactionType::Expense, user.id))
            .unwrap();

        let other_user_query =
            TransactionQuery::for_user(crate::models::UserID::new(user.id.as_i64() + 1));

        assert!(store.get_query(&other_user_query).unwrap().is_empty());
    }

    #[test]
    fn update_overwrites_fields() {
        let (mut store, user) = get_store_and_user();

        let mut transaction = store
            .create(Transaction::build(10.0, TransactionType::Expense, user.id).category("Food"))
            .unwrap();

        transaction.amount = 25.0;
        transaction.category = "Transport".to_string();
        store.update(&transaction).unwrap();

        assert_eq!(store.get(transaction.id).unwrap(), transaction);
    }

    #[test]
    fn update_fails_on_missing_transaction() {
        let (mut store, user) = get_store_and_user();

        let mut transaction = store
            .create(Transaction::build(10.0, TransactionType::Expense, user.id))
            .unwrap();
        transaction.id += 1;

        assert_eq!(store.update(&transaction), Err(Error::NotFound));
    }

    #[test]
    fn delete_removes_the_transaction() {
        let (mut store, user) = get_store_and_user();

        let transaction = store
            .create(Transaction::build(10.0, TransactionType::Expense, user.id))
            .unwrap();

        store.delete(transaction.id).unwrap();

        assert_eq!(store.get(transaction.id), Err(Error::NotFound));
        assert_eq!(store.delete(transaction.id), Err(Error::NotFound));
    }
}
