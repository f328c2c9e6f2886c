/// Shared classification space referenced by both transactions and budgets.
/// Categories are reference data: a default catalog is seeded on first open
/// and users may extend it, but no category is owned by a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: Option<i64>,
    pub name: String,
}

impl Category {
    pub fn new(name: String) -> Self {
        Self { id: None, name }
    }

    /// Case-insensitive name lookup in a loaded catalog.
    pub fn find_by_name<'a>(categories: &'a [Category], name: &str) -> Option<&'a Category> {
        categories.iter().find(|c| c.name.eq_ignore_ascii_case(name))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
