use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// A single dated amount recorded by a user.
///
/// The sign convention is fixed by the system, not chosen per user:
/// positive amounts are spending, negative amounts are money coming in
/// (income, refunds). `transaction_date` is supplied by the user and is
/// independent of `created_at`, which records when the row was written.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: Option<i64>,
    /// Owning user; immutable after creation.
    pub user_id: i64,
    pub category_id: i64,
    pub amount: Decimal,
    /// Free text, may be empty.
    pub description: String,
    pub transaction_date: DateTime<Utc>,
    pub created_at: String,
}

impl Transaction {
    pub fn new(
        user_id: i64,
        category_id: i64,
        amount: Decimal,
        description: String,
        transaction_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            user_id,
            category_id,
            amount,
            description,
            transaction_date,
            created_at: Utc::now().to_rfc3339(),
        }
    }

    pub fn is_expense(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    pub fn is_income(&self) -> bool {
        self.amount < Decimal::ZERO
    }

    pub fn abs_amount(&self) -> Decimal {
        self.amount.abs()
    }
}
