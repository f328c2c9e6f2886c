mod budget;
mod category;
mod transaction;
mod user;

pub use budget::{Budget, BudgetScope};
pub use category::Category;
pub use transaction::Transaction;
pub use user::User;

#[cfg(test)]
mod tests;
