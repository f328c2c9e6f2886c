/// A registered account holder. Credential material (password hashes, login
/// tokens) belongs to the auth layer, so none of it lives on this model.
/// The store only needs an identity row for ownership checks to point at.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Option<i64>,
    pub username: String,
    pub email: String,
    pub created_at: String,
}

impl User {
    pub fn new(username: String, email: String) -> Self {
        Self {
            id: None,
            username,
            email,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
