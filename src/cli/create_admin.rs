use anyhow::{Context, Result};

use crate::models::{Admin, NewAdmin};
use crate::storage::{Storage, StoreError};
use crate::util::password::hash_password;
use crate::validation::Validate;

/// Creates a dashboard account with an Argon2id-hashed password.
pub async fn run(store: &dyn Storage, username: &str, password: &str) -> Result<Admin> {
    let input = NewAdmin {
        username: username.trim().to_string(),
        password: password.to_string(),
    };
    if let Err(errors) = input.validate() {
        let summary: Vec<String> = errors
            .iter()
            .map(|e| format!("{} {}", e.field, e.message))
            .collect();
        anyhow::bail!("invalid admin: {}", summary.join("; "));
    }

    let hash = hash_password(&input.password).context("hashing password")?;
    match store.create_admin(&input.username, &hash).await {
        Ok(admin) => Ok(admin),
        Err(StoreError::Conflict(_)) => {
            anyhow::bail!("admin {:?} already exists", input.username)
        }
        Err(e) => Err(e.into()),
    }
}
