use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{Budget, BudgetScope};

/// Resolves the single budget governing one scope in one period.
///
/// `BudgetScope::Overall` matches only the row with no category;
/// `BudgetScope::Category` matches only the row for that exact category.
/// The branches are mutually exclusive: a category with no budget of its
/// own resolves to nothing even when an overall budget exists for the same
/// month and year.
///
/// Absence is surfaced as [`Error::BudgetNotFound`]; no default budget is
/// ever synthesized, so callers can apply their own "no limit set" policy.
/// Should the store present several rows for one scope (the uniqueness
/// invariant was violated upstream), the most recently created row wins and
/// the anomaly is logged. The same row wins every call, never an arbitrary
/// one.
///
/// The caller is expected to have verified that `user_id` exists; this
/// lookup does not re-check it. Read-only.
pub fn resolve_budget(
    db: &Database,
    user_id: i64,
    scope: BudgetScope,
    month: u32,
    year: i32,
) -> Result<Budget> {
    let month_key = Budget::month_key(month)?;
    let matches = db.find_budgets_for_scope(user_id, scope, &month_key, year)?;
    if matches.len() > 1 {
        tracing::warn!(
            user_id,
            %scope,
            month = %month_key,
            year,
            rows = matches.len(),
            "budget scope holds multiple rows; resolving to the most recently created"
        );
    }
    // Rows arrive newest-first, so the deterministic pick is the head.
    matches.into_iter().next().ok_or(Error::BudgetNotFound)
}
