use crate::auth::repo_types::User;
use crate::error::{AppError, AppResult};
use sqlx::PgPool;

impl User {
    /// Find a user by (already trimmed) email.
    pub async fn find_by_email(db: &PgPool, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, last_activity_date, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Create a new user with hashed password.
    ///
    /// The email uniqueness constraint is the authoritative duplicate guard:
    /// a violation here (a sign-up racing past the handler's fast-path
    /// lookup) maps to `AccountExists`, same as the lookup hit.
    pub async fn create(
        db: &PgPool,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, password_hash, last_activity_date, created_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if e.as_database_error()
                .map(|db_err| db_err.is_unique_violation())
                .unwrap_or(false)
            {
                AppError::AccountExists
            } else {
                AppError::storage("Failed to create an account.", e)
            }
        })?;
        Ok(user)
    }
}
