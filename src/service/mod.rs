mod budget;
mod category;
mod transaction;

pub use budget::BudgetService;
pub use category::CategoryService;
pub use transaction::TransactionService;

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::User;

/// Resolves the authenticated username to its stored user id.
///
/// Token handling happens upstream; services receive the username the auth
/// layer extracted and look up the row so ownership checks have an id to
/// bind to.
pub(crate) fn require_user_id(db: &Database, username: &str) -> Result<i64> {
    match db.get_user_by_username(username)? {
        Some(User { id: Some(id), .. }) => Ok(id),
        _ => Err(Error::UserNotFound(username.to_string())),
    }
}

pub(crate) fn require_category(db: &Database, category_id: i64) -> Result<()> {
    db.get_category_by_id(category_id)?
        .map(|_| ())
        .ok_or(Error::CategoryNotFound(category_id))
}
