use sqlx::SqlitePool;
use std::sync::Arc;

use crate::auth::TokenService;
use crate::config::AppConfig;
use crate::database::{BucketlistRepository, ItemRepository, UserRepository};

/// Shared by every handler: the pool, the immutable config and the token service.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Arc<AppConfig>,
    pub tokens: TokenService,
}

impl AppState {
    pub fn new(config: AppConfig, pool: SqlitePool) -> Self {
        let tokens = TokenService::new(&config.security.jwt_secret, config.security.token_ttl_secs);
        Self {
            pool,
            config: Arc::new(config),
            tokens,
        }
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.pool.clone())
    }

    pub fn bucketlists(&self) -> BucketlistRepository {
        BucketlistRepository::new(self.pool.clone(), self.config.bucketlists.name_scope)
    }

    pub fn items(&self) -> ItemRepository {
        ItemRepository::new(self.pool.clone())
    }
}
