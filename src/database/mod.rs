pub mod manager;
pub mod models;
pub mod pagination;
pub mod repository;

pub use manager::{DatabaseError, DatabaseManager};
pub use pagination::{Page, PageRequest};
pub use repository::{BucketlistRepository, ItemRepository, RepositoryError, UserRepository};
