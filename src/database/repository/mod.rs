use thiserror::Error;

pub mod bucketlist;
pub mod item;
pub mod user;

pub use bucketlist::BucketlistRepository;
pub use item::ItemRepository;
pub use user::UserRepository;

/// Outcome of a repository call that did not produce a row.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    InvalidArgument(String),

    /// The query ran fine but matched nothing (as opposed to a missing parent).
    #[error("{0}")]
    EmptyResult(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Trimmed name, or InvalidArgument when nothing is left.
pub(crate) fn require_name(name: &str, message: &str) -> Result<String, RepositoryError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(RepositoryError::InvalidArgument(message.to_string()));
    }
    Ok(trimmed.to_string())
}

/// LIKE pattern matching `query` anywhere, with `%`, `_` and `\` taken literally.
/// Pair with `ESCAPE '\'`.
pub(crate) fn contains_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
pub(crate) mod test_support {
    use sqlx::SqlitePool;

    use crate::database::DatabaseManager;

    pub async fn pool() -> SqlitePool {
        DatabaseManager::in_memory().await.expect("in-memory database")
    }

    /// Insert a user row directly; hashing is irrelevant here.
    pub async fn user(pool: &SqlitePool, name: &str) -> i64 {
        sqlx::query_scalar("INSERT INTO user (username, email, password) VALUES (?, ?, 'x') RETURNING id")
            .bind(name)
            .bind(format!("{}@example.com", name))
            .fetch_one(pool)
            .await
            .expect("insert user")
    }
}
