use sqlx::SqlitePool;
use tracing::info;

use crate::database::models::User;

use super::RepositoryError;

const USER_COLUMNS: &str = "id, username, email, password";

/// Credential store. Passwords arrive here already hashed.
#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, email: &str, username: &str, password_hash: &str) -> Result<User, RepositoryError> {
        if self.find_by_email(email).await?.is_some() {
            return Err(RepositoryError::Conflict("Sorry, user already exists.".to_string()));
        }

        let taken: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM user WHERE username = ?)")
            .bind(username)
            .fetch_one(&self.pool)
            .await?;
        if taken {
            return Err(RepositoryError::Conflict("Sorry, username is already taken.".to_string()));
        }

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO user (email, username, password) VALUES (?, ?, ?) RETURNING {}",
            USER_COLUMNS
        ))
        .bind(email)
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            // Lost a race against a concurrent registration.
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepositoryError::Conflict("Sorry, user already exists.".to_string())
            }
            other => RepositoryError::Database(other),
        })?;

        info!("Registered user {} ({})", user.id, user.username);
        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {} FROM user WHERE email = ?", USER_COLUMNS))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn get(&self, id: i64) -> Result<User, RepositoryError> {
        sqlx::query_as::<_, User>(&format!("SELECT {} FROM user WHERE id = ?", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| RepositoryError::NotFound("User not found.".to_string()))
    }

    /// Removes the user; the schema cascades to their bucketlists and items.
    pub async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM user WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound("User not found.".to_string()));
        }

        info!("Deleted user {}", id);
        Ok(())
    }
}
