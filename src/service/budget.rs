use rust_decimal::Decimal;

use crate::budget;
use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{Budget, BudgetScope};

use super::{require_category, require_user_id};

/// Budget CRUD plus period resolution for one authenticated user.
///
/// Budgets are unique per (user, scope, month, year); creating a second one
/// for an occupied slot fails with `BudgetExists` rather than overwriting.
pub struct BudgetService<'a> {
    db: &'a Database,
}

impl<'a> BudgetService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub fn create_budget(
        &self,
        username: &str,
        scope: BudgetScope,
        month: u32,
        year: i32,
        limit_amount: Decimal,
    ) -> Result<Budget> {
        let user_id = require_user_id(self.db, username)?;
        if let BudgetScope::Category(category_id) = scope {
            require_category(self.db, category_id)?;
        }
        if limit_amount < Decimal::ZERO {
            return Err(Error::InvalidInput(
                "budget limit must not be negative".to_string(),
            ));
        }

        let month = Budget::month_key(month)?;
        if !self
            .db
            .find_budgets_for_scope(user_id, scope, &month, year)?
            .is_empty()
        {
            return Err(Error::BudgetExists);
        }

        let mut budget = Budget::new(user_id, scope, month, year, limit_amount);
        let id = self.db.insert_budget(&budget)?;
        budget.id = Some(id);
        tracing::debug!(user_id, budget_id = id, %scope, "created budget");
        Ok(budget)
    }

    /// Only the limit is mutable; scope and period are fixed at creation.
    pub fn update_budget(&self, username: &str, id: i64, limit_amount: Decimal) -> Result<Budget> {
        let user_id = require_user_id(self.db, username)?;
        let mut budget = self.owned_budget(user_id, id)?;
        if limit_amount < Decimal::ZERO {
            return Err(Error::InvalidInput(
                "budget limit must not be negative".to_string(),
            ));
        }

        budget.limit_amount = limit_amount;
        self.db.update_budget(&budget)?;
        Ok(budget)
    }

    pub fn delete_budget(&self, username: &str, id: i64) -> Result<()> {
        let user_id = require_user_id(self.db, username)?;
        self.owned_budget(user_id, id)?;
        self.db.delete_budget(id)?;
        tracing::debug!(user_id, budget_id = id, "deleted budget");
        Ok(())
    }

    pub fn get_budget(&self, username: &str, id: i64) -> Result<Budget> {
        let user_id = require_user_id(self.db, username)?;
        self.owned_budget(user_id, id)
    }

    pub fn list_budgets(&self, username: &str) -> Result<Vec<Budget>> {
        let user_id = require_user_id(self.db, username)?;
        self.db.get_budgets_for_user(user_id)
    }

    /// All of the caller's budgets for one month, overall and per-category
    /// alike.
    pub fn list_budgets_for_period(
        &self,
        username: &str,
        month: u32,
        year: i32,
    ) -> Result<Vec<Budget>> {
        let user_id = require_user_id(self.db, username)?;
        let month = Budget::month_key(month)?;
        self.db.get_budgets_for_period(user_id, &month, year)
    }

    /// Looks up the budget governing one scope in one month. Absence is the
    /// `BudgetNotFound` error; scopes never substitute for each other.
    pub fn resolve_budget(
        &self,
        username: &str,
        scope: BudgetScope,
        month: u32,
        year: i32,
    ) -> Result<Budget> {
        let user_id = require_user_id(self.db, username)?;
        budget::resolve_budget(self.db, user_id, scope, month, year)
    }

    fn owned_budget(&self, user_id: i64, id: i64) -> Result<Budget> {
        let budget = self.db.get_budget_by_id(id)?.ok_or(Error::BudgetNotFound)?;
        if budget.user_id != user_id {
            return Err(Error::BudgetNotFound);
        }
        Ok(budget)
    }
}
