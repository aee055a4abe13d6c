use anyhow::Result;

use super::{constraint_error, Database, Write};
use crate::models::User;

impl Database {
    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, full_name, is_admin \
             FROM users WHERE lower(username) = lower($1)",
        )
        .bind(username.trim())
        .fetch_optional(self.get_pool())
        .await?;

        Ok(user)
    }

    pub async fn load_users(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, full_name, is_admin FROM users ORDER BY username ASC",
        )
        .fetch_all(self.get_pool())
        .await?;

        Ok(users)
    }

    pub async fn count_users(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(self.get_pool())
            .await?;

        Ok(count)
    }

    /// `user.password_hash` must already be hashed.
    pub async fn create_user(&self, user: &User) -> Result<i32> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO users (username, password_hash, full_name, is_admin)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.full_name)
        .bind(user.is_admin)
        .fetch_one(self.get_pool())
        .await
        .map_err(|e| constraint_error(
            e,
            Write::Save {
                duplicate: "A user with this username",
                record: "user",
            },
        ))?;

        Ok(id)
    }
}
