use rust_decimal::Decimal;

use crate::error::{Error, Result};

/// What a budget applies to: all of a user's spending for the period, or a
/// single category. The two are distinct scopes and never substitute for
/// each other; looking up a category scope does not fall back to the
/// overall budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetScope {
    Overall,
    Category(i64),
}

impl BudgetScope {
    /// Storage form: overall budgets carry a NULL category.
    pub fn category_id(self) -> Option<i64> {
        match self {
            Self::Overall => None,
            Self::Category(id) => Some(id),
        }
    }

    pub fn from_category_id(category_id: Option<i64>) -> Self {
        match category_id {
            None => Self::Overall,
            Some(id) => Self::Category(id),
        }
    }
}

impl std::fmt::Display for BudgetScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Overall => write!(f, "overall"),
            Self::Category(id) => write!(f, "category {id}"),
        }
    }
}

/// A spending ceiling for one scope in one calendar month. At most one row
/// exists per (user, scope, month, year) key.
#[derive(Debug, Clone, PartialEq)]
pub struct Budget {
    pub id: Option<i64>,
    pub user_id: i64,
    pub scope: BudgetScope,
    /// Two-digit month key, "01".."12".
    pub month: String,
    pub year: i32,
    pub limit_amount: Decimal,
    pub created_at: String,
}

impl Budget {
    pub fn new(
        user_id: i64,
        scope: BudgetScope,
        month: String,
        year: i32,
        limit_amount: Decimal,
    ) -> Self {
        Self {
            id: None,
            user_id,
            scope,
            month,
            year,
            limit_amount,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Formats a calendar month as the stored two-digit key ("01".."12").
    pub fn month_key(month: u32) -> Result<String> {
        if !(1..=12).contains(&month) {
            return Err(Error::InvalidInput(format!(
                "month {month} is out of range (1-12)"
            )));
        }
        Ok(format!("{month:02}"))
    }
}
