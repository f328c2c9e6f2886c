use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Typed failure surface of the backend core. The orchestration layer maps
/// these onto user-facing responses; nothing in here is swallowed or retried
/// internally.
#[derive(Debug, Error)]
pub enum Error {
    /// The underlying store call failed or timed out.
    #[error("storage unavailable: {0}")]
    Storage(#[source] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored row could not be parsed back into its model (corrupt amount
    /// or timestamp text). Surfaced rather than coerced to a default.
    #[error("stored data is corrupt: {0}")]
    DataIntegrity(String),

    #[error("user '{0}' not found")]
    UserNotFound(String),

    #[error("category {0} not found")]
    CategoryNotFound(i64),

    #[error("transaction {0} not found")]
    TransactionNotFound(i64),

    /// No budget row matches the requested scope and period. Absence is
    /// meaningful: callers decide the fallback policy (e.g. "no limit set").
    #[error("no budget set for the requested scope and period")]
    BudgetNotFound,

    /// Creating this budget would put two rows on one (user, scope, month,
    /// year) key.
    #[error("a budget already exists for this scope and period")]
    BudgetExists,

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// True for the variants an API layer maps to a "not found" response.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::UserNotFound(_)
                | Error::CategoryNotFound(_)
                | Error::TransactionNotFound(_)
                | Error::BudgetNotFound
        )
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            // Raised by the row mappers in `db` when stored text fails to
            // parse; everything else is a storage-level failure.
            rusqlite::Error::FromSqlConversionFailure(_, _, source) => {
                Error::DataIntegrity(source.to_string())
            }
            other => Error::Storage(other),
        }
    }
}
