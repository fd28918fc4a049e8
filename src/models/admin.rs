use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::validation::{FieldError, Validate, Validator, MIN_ADMIN_PASSWORD_LEN};

/// Dashboard account. Never serialized: the hash stays server-side.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Admin {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewAdmin {
    pub username: String,
    pub password: String,
}

impl Validate for NewAdmin {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Validator::new()
            .required("username", &self.username)
            .check(
                "username",
                self.username.trim().chars().count() <= 64,
                "must be at most 64 characters",
            )
            .check(
                "password",
                self.password.chars().count() >= MIN_ADMIN_PASSWORD_LEN,
                "must be at least 8 characters",
            )
            .finish()
    }
}
