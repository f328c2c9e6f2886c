use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::Transaction;
use crate::spending::{self, WeeklySpending, DEFAULT_WINDOW_WEEKS};

use super::{require_category, require_user_id};

/// Transaction CRUD and the weekly report for one authenticated user.
///
/// Every operation resolves the username first, and row access is scoped by
/// ownership as a hard precondition: a transaction belonging to someone else
/// answers `TransactionNotFound`, so existence never leaks across users.
pub struct TransactionService<'a> {
    db: &'a Database,
}

impl<'a> TransactionService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub fn add_transaction(
        &self,
        username: &str,
        category_id: i64,
        amount: Decimal,
        description: &str,
        transaction_date: DateTime<Utc>,
    ) -> Result<Transaction> {
        let user_id = require_user_id(self.db, username)?;
        require_category(self.db, category_id)?;

        let mut txn = Transaction::new(
            user_id,
            category_id,
            amount,
            description.to_string(),
            transaction_date,
        );
        let id = self.db.insert_transaction(&txn)?;
        txn.id = Some(id);
        tracing::debug!(user_id, transaction_id = id, "recorded transaction");
        Ok(txn)
    }

    /// Rewrites the mutable fields of an owned transaction; the owner itself
    /// never changes.
    pub fn update_transaction(
        &self,
        username: &str,
        id: i64,
        category_id: i64,
        amount: Decimal,
        description: &str,
        transaction_date: DateTime<Utc>,
    ) -> Result<Transaction> {
        let user_id = require_user_id(self.db, username)?;
        let mut txn = self.owned_transaction(user_id, id)?;
        require_category(self.db, category_id)?;

        txn.category_id = category_id;
        txn.amount = amount;
        txn.description = description.to_string();
        txn.transaction_date = transaction_date;
        self.db.update_transaction(&txn)?;
        Ok(txn)
    }

    /// Permanent removal; there is no soft delete.
    pub fn delete_transaction(&self, username: &str, id: i64) -> Result<()> {
        let user_id = require_user_id(self.db, username)?;
        self.owned_transaction(user_id, id)?;
        self.db.delete_transaction(id)?;
        tracing::debug!(user_id, transaction_id = id, "deleted transaction");
        Ok(())
    }

    pub fn get_transaction(&self, username: &str, id: i64) -> Result<Transaction> {
        let user_id = require_user_id(self.db, username)?;
        self.owned_transaction(user_id, id)
    }

    pub fn list_transactions(&self, username: &str) -> Result<Vec<Transaction>> {
        let user_id = require_user_id(self.db, username)?;
        self.db.get_transactions(user_id, None, None)
    }

    pub fn list_transactions_by_category(
        &self,
        username: &str,
        category_id: i64,
    ) -> Result<Vec<Transaction>> {
        let user_id = require_user_id(self.db, username)?;
        require_category(self.db, category_id)?;
        self.db.get_transactions(user_id, Some(category_id), None)
    }

    /// Weekly report with the production defaults: a six-week window ending
    /// now.
    pub fn weekly_spending(&self, username: &str) -> Result<Vec<WeeklySpending>> {
        self.weekly_spending_as_of(username, Utc::now(), DEFAULT_WINDOW_WEEKS)
    }

    /// Report with an injectable reference time and window width, so callers
    /// (and tests) can pin the output.
    pub fn weekly_spending_as_of(
        &self,
        username: &str,
        as_of: DateTime<Utc>,
        window_weeks: usize,
    ) -> Result<Vec<WeeklySpending>> {
        let user_id = require_user_id(self.db, username)?;
        spending::weekly_spending(self.db, user_id, as_of, window_weeks)
    }

    // Ownership precondition: the row must exist and belong to the caller.
    // Both failures collapse into the same NotFound.
    fn owned_transaction(&self, user_id: i64, id: i64) -> Result<Transaction> {
        let txn = self
            .db
            .get_transaction_by_id(id)?
            .ok_or(Error::TransactionNotFound(id))?;
        if txn.user_id != user_id {
            return Err(Error::TransactionNotFound(id));
        }
        Ok(txn)
    }
}
