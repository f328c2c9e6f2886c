mod schema;

use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use rust_decimal::Decimal;

use crate::error::{Error, Result};
use crate::models::*;

/// Handle on the backing SQLite database.
///
/// A handle wraps a single connection and is not `Sync`: a thread-per-request
/// host opens one handle per worker. WAL journaling keeps concurrent readers
/// independent while SQLite serializes writers, and the partial unique
/// indexes on `budgets` uphold the one-row-per-scope invariant even when two
/// workers race a create.
pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        db.seed_default_categories()?;
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        db.seed_default_categories()?;
        Ok(db)
    }

    /// Conventional on-disk location for hosts that don't configure one.
    pub fn default_db_path() -> Result<PathBuf> {
        let proj_dirs =
            directories::ProjectDirs::from("com", "spendbook", "Spendbook").ok_or_else(|| {
                Error::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "could not determine platform data directory",
                ))
            })?;
        let data_dir = proj_dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;
        Ok(data_dir.join("spendbook.db"))
    }

    fn migrate(&mut self) -> Result<()> {
        // Check if schema_version table exists
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            // Fresh database - apply full schema
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            return Ok(());
        }

        // Existing database - check version and apply migrations
        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    fn seed_default_categories(&mut self) -> Result<()> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))?;
        if count > 0 {
            return Ok(());
        }

        let defaults = [
            "Bills & Subscriptions",
            "Clothing",
            "Coffee Shops",
            "Education",
            "Entertainment",
            "Fees & Charges",
            "Food & Dining",
            "Gas & Fuel",
            "Gifts & Donations",
            "Groceries",
            "Health & Fitness",
            "Home & Garden",
            "Housing",
            "Income",
            "Insurance",
            "Personal Care",
            "Public Transit",
            "Rent/Mortgage",
            "Restaurants",
            "Shopping",
            "Streaming",
            "Transportation",
            "Travel",
            "Uncategorized",
            "Utilities",
        ];

        let tx = self.conn.transaction()?;
        for name in &defaults {
            tx.execute(
                "INSERT OR IGNORE INTO categories (name) VALUES (?1)",
                params![name],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn raw_conn(&self) -> &Connection {
        &self.conn
    }

    // ── Users ─────────────────────────────────────────────────

    pub fn insert_user(&self, user: &User) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO users (username, email, created_at) VALUES (?1, ?2, ?3)",
            params![user.username, user.email, user.created_at],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let result = self.conn.query_row(
            "SELECT id, username, email, created_at FROM users WHERE username = ?1",
            params![username],
            map_user,
        );
        match result {
            Ok(u) => Ok(Some(u)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        let result = self.conn.query_row(
            "SELECT id, username, email, created_at FROM users WHERE id = ?1",
            params![id],
            map_user,
        );
        match result {
            Ok(u) => Ok(Some(u)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    // ── Categories ────────────────────────────────────────────

    pub fn insert_category(&self, cat: &Category) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO categories (name) VALUES (?1)",
            params![cat.name],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn get_categories(&self) -> Result<Vec<Category>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM categories ORDER BY name")?;
        let rows = stmt.query_map([], |row| {
            Ok(Category {
                id: Some(row.get(0)?),
                name: row.get(1)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub fn get_category_by_id(&self, id: i64) -> Result<Option<Category>> {
        let result = self.conn.query_row(
            "SELECT id, name FROM categories WHERE id = ?1",
            params![id],
            |row| {
                Ok(Category {
                    id: Some(row.get(0)?),
                    name: row.get(1)?,
                })
            },
        );
        match result {
            Ok(c) => Ok(Some(c)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    // ── Transactions ──────────────────────────────────────────

    pub fn insert_transaction(&self, txn: &Transaction) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO transactions (user_id, category_id, amount, description, transaction_date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                txn.user_id,
                txn.category_id,
                txn.amount.to_string(),
                txn.description,
                txn.transaction_date.to_rfc3339(),
                txn.created_at,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn get_transaction_by_id(&self, id: i64) -> Result<Option<Transaction>> {
        let result = self.conn.query_row(
            "SELECT id, user_id, category_id, amount, description, transaction_date, created_at
             FROM transactions WHERE id = ?1",
            params![id],
            map_transaction,
        );
        match result {
            Ok(t) => Ok(Some(t)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Transactions of one user, optionally narrowed to a category and/or a
    /// half-open `[start, end)` date range. Newest first.
    ///
    /// Stored timestamps are uniform RFC 3339 UTC, so the range comparison
    /// runs directly on the TEXT column.
    pub fn get_transactions(
        &self,
        user_id: i64,
        category_id: Option<i64>,
        date_range: Option<(DateTime<Utc>, DateTime<Utc>)>,
    ) -> Result<Vec<Transaction>> {
        let mut sql = String::from(
            "SELECT id, user_id, category_id, amount, description, transaction_date, created_at
             FROM transactions WHERE user_id = ?1",
        );
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = vec![Box::new(user_id)];

        if let Some(cid) = category_id {
            sql.push_str(&format!(" AND category_id = ?{}", param_values.len() + 1));
            param_values.push(Box::new(cid));
        }
        if let Some((start, end)) = date_range {
            sql.push_str(&format!(
                " AND transaction_date >= ?{} AND transaction_date < ?{}",
                param_values.len() + 1,
                param_values.len() + 2
            ));
            param_values.push(Box::new(start.to_rfc3339()));
            param_values.push(Box::new(end.to_rfc3339()));
        }

        sql.push_str(" ORDER BY transaction_date DESC, id DESC");

        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_ref.as_slice(), map_transaction)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Rewrites the mutable fields of a transaction. `user_id` and
    /// `created_at` are immutable and never touched.
    pub fn update_transaction(&self, txn: &Transaction) -> Result<()> {
        self.conn.execute(
            "UPDATE transactions
             SET category_id = ?1, amount = ?2, description = ?3, transaction_date = ?4
             WHERE id = ?5",
            params![
                txn.category_id,
                txn.amount.to_string(),
                txn.description,
                txn.transaction_date.to_rfc3339(),
                txn.id,
            ],
        )?;
        Ok(())
    }

    pub fn delete_transaction(&self, id: i64) -> Result<()> {
        self.conn
            .execute("DELETE FROM transactions WHERE id = ?1", params![id])?;
        Ok(())
    }

    // ── Budgets ───────────────────────────────────────────────

    pub fn insert_budget(&self, budget: &Budget) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO budgets (user_id, category_id, month, year, limit_amount, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                budget.user_id,
                budget.scope.category_id(),
                budget.month,
                budget.year,
                budget.limit_amount.to_string(),
                budget.created_at,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn get_budget_by_id(&self, id: i64) -> Result<Option<Budget>> {
        let result = self.conn.query_row(
            "SELECT id, user_id, category_id, month, year, limit_amount, created_at
             FROM budgets WHERE id = ?1",
            params![id],
            map_budget,
        );
        match result {
            Ok(b) => Ok(Some(b)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn get_budgets_for_user(&self, user_id: i64) -> Result<Vec<Budget>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, category_id, month, year, limit_amount, created_at
             FROM budgets WHERE user_id = ?1
             ORDER BY year DESC, month DESC, id",
        )?;
        let rows = stmt.query_map(params![user_id], map_budget)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// All budgets a user holds for one period: the overall row plus any
    /// per-category rows.
    pub fn get_budgets_for_period(
        &self,
        user_id: i64,
        month: &str,
        year: i32,
    ) -> Result<Vec<Budget>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, category_id, month, year, limit_amount, created_at
             FROM budgets WHERE user_id = ?1 AND month = ?2 AND year = ?3
             ORDER BY id",
        )?;
        let rows = stmt.query_map(params![user_id, month, year], map_budget)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Budget rows matching one exact scope. The NULL-category (overall) and
    /// category-valued branches are distinct queries and never mix.
    ///
    /// Most recently created first, so a caller resolving a corrupted store
    /// that holds duplicates can take the first row deterministically.
    pub fn find_budgets_for_scope(
        &self,
        user_id: i64,
        scope: BudgetScope,
        month: &str,
        year: i32,
    ) -> Result<Vec<Budget>> {
        let rows = match scope.category_id() {
            Some(category_id) => {
                let mut stmt = self.conn.prepare(
                    "SELECT id, user_id, category_id, month, year, limit_amount, created_at
                     FROM budgets
                     WHERE user_id = ?1 AND category_id = ?2 AND month = ?3 AND year = ?4
                     ORDER BY id DESC",
                )?;
                let rows =
                    stmt.query_map(params![user_id, category_id, month, year], map_budget)?;
                rows.collect::<std::result::Result<Vec<_>, _>>()?
            }
            None => {
                let mut stmt = self.conn.prepare(
                    "SELECT id, user_id, category_id, month, year, limit_amount, created_at
                     FROM budgets
                     WHERE user_id = ?1 AND category_id IS NULL AND month = ?2 AND year = ?3
                     ORDER BY id DESC",
                )?;
                let rows = stmt.query_map(params![user_id, month, year], map_budget)?;
                rows.collect::<std::result::Result<Vec<_>, _>>()?
            }
        };
        Ok(rows)
    }

    /// Only the limit is mutable; moving a budget to another scope or period
    /// is delete + recreate.
    pub fn update_budget(&self, budget: &Budget) -> Result<()> {
        self.conn.execute(
            "UPDATE budgets SET limit_amount = ?1 WHERE id = ?2",
            params![budget.limit_amount.to_string(), budget.id],
        )?;
        Ok(())
    }

    pub fn delete_budget(&self, id: i64) -> Result<()> {
        self.conn
            .execute("DELETE FROM budgets WHERE id = ?1", params![id])?;
        Ok(())
    }
}

// ── Row mapping ───────────────────────────────────────────────

fn map_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: Some(row.get(0)?),
        username: row.get(1)?,
        email: row.get(2)?,
        created_at: row.get(3)?,
    })
}

fn map_transaction(row: &rusqlite::Row<'_>) -> rusqlite::Result<Transaction> {
    let amount: String = row.get(3)?;
    let date: String = row.get(5)?;
    Ok(Transaction {
        id: Some(row.get(0)?),
        user_id: row.get(1)?,
        category_id: row.get(2)?,
        amount: parse_stored_decimal(3, &amount)?,
        description: row.get(4)?,
        transaction_date: parse_stored_timestamp(5, &date)?,
        created_at: row.get(6)?,
    })
}

fn map_budget(row: &rusqlite::Row<'_>) -> rusqlite::Result<Budget> {
    let amount: String = row.get(5)?;
    Ok(Budget {
        id: Some(row.get(0)?),
        user_id: row.get(1)?,
        scope: BudgetScope::from_category_id(row.get(2)?),
        month: row.get(3)?,
        year: row.get(4)?,
        limit_amount: parse_stored_decimal(5, &amount)?,
        created_at: row.get(6)?,
    })
}

// Corrupt stored text surfaces as a conversion failure, which the crate's
// error type classifies as a data-integrity problem rather than a value to
// silently default.
fn parse_stored_decimal(idx: usize, raw: &str) -> rusqlite::Result<Decimal> {
    Decimal::from_str(raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn parse_stored_timestamp(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}
