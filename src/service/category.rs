use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::Category;

/// Category management. Categories are shared across users, so there is no
/// ownership check here, only name hygiene.
pub struct CategoryService<'a> {
    db: &'a Database,
}

impl<'a> CategoryService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub fn create_category(&self, name: &str) -> Result<Category> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidInput(
                "category name must not be empty".to_string(),
            ));
        }

        let existing = self.db.get_categories()?;
        if Category::find_by_name(&existing, name).is_some() {
            return Err(Error::InvalidInput(format!(
                "category '{name}' already exists"
            )));
        }

        let mut category = Category::new(name.to_string());
        let id = self.db.insert_category(&category)?;
        category.id = Some(id);
        tracing::debug!(category_id = id, name, "created category");
        Ok(category)
    }

    pub fn list_categories(&self) -> Result<Vec<Category>> {
        self.db.get_categories()
    }

    pub fn get_category(&self, id: i64) -> Result<Category> {
        self.db
            .get_category_by_id(id)?
            .ok_or(Error::CategoryNotFound(id))
    }
}
