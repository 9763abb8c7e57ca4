use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use crate::database::models::Item;
use crate::database::pagination::{Page, PageRequest};

use super::bucketlist::ITEM_COLUMNS;
use super::{require_name, RepositoryError};

/// Items are always reached through a parent bucketlist owned by the
/// acting user; an item under someone else's bucketlist does not exist.
#[derive(Clone)]
pub struct ItemRepository {
    pool: SqlitePool,
}

impl ItemRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, owner: i64, bucketlist_id: i64, name: &str) -> Result<Item, RepositoryError> {
        self.ensure_parent(owner, bucketlist_id).await?;
        let name = require_name(name, "Error, name the item.")?;

        let now = Utc::now();
        let item = sqlx::query_as::<_, Item>(&format!(
            "INSERT INTO bucketlistitem (name, date_created, date_modified, done, bucketlist_id) VALUES (?, ?, ?, FALSE, ?) RETURNING {}",
            ITEM_COLUMNS
        ))
        .bind(&name)
        .bind(now)
        .bind(now)
        .bind(bucketlist_id)
        .fetch_one(&self.pool)
        .await?;

        info!("User {} added item {} to bucketlist {}", owner, item.id, bucketlist_id);
        Ok(item)
    }

    pub async fn list(&self, owner: i64, bucketlist_id: i64, request: PageRequest) -> Result<Page<Item>, RepositoryError> {
        self.ensure_parent(owner, bucketlist_id).await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bucketlistitem WHERE bucketlist_id = ?")
            .bind(bucketlist_id)
            .fetch_one(&self.pool)
            .await?;

        let items = sqlx::query_as::<_, Item>(&format!(
            "SELECT {} FROM bucketlistitem WHERE bucketlist_id = ? ORDER BY item_id LIMIT ? OFFSET ?",
            ITEM_COLUMNS
        ))
        .bind(bucketlist_id)
        .bind(request.limit)
        .bind(request.offset())
        .fetch_all(&self.pool)
        .await?;

        if items.is_empty() {
            return Err(RepositoryError::EmptyResult("There are no items.".to_string()));
        }

        Ok(Page::new(items, request, total))
    }

    pub async fn get(&self, owner: i64, bucketlist_id: i64, item_id: i64) -> Result<Item, RepositoryError> {
        self.ensure_parent(owner, bucketlist_id).await?;

        sqlx::query_as::<_, Item>(&format!(
            "SELECT {} FROM bucketlistitem WHERE item_id = ? AND bucketlist_id = ?",
            ITEM_COLUMNS
        ))
        .bind(item_id)
        .bind(bucketlist_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| item_not_found(item_id))
    }

    pub async fn update(&self, owner: i64, bucketlist_id: i64, item_id: i64, name: &str) -> Result<Item, RepositoryError> {
        self.ensure_parent(owner, bucketlist_id).await?;
        let name = require_name(name, "Error. Invalid item")?;

        let item = sqlx::query_as::<_, Item>(&format!(
            "UPDATE bucketlistitem SET name = ?, date_modified = ? WHERE item_id = ? AND bucketlist_id = ? RETURNING {}",
            ITEM_COLUMNS
        ))
        .bind(&name)
        .bind(Utc::now())
        .bind(item_id)
        .bind(bucketlist_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| item_not_found(item_id))?;

        info!("User {} renamed item {}", owner, item_id);
        Ok(item)
    }

    pub async fn delete(&self, owner: i64, bucketlist_id: i64, item_id: i64) -> Result<(), RepositoryError> {
        self.ensure_parent(owner, bucketlist_id).await?;

        let result = sqlx::query("DELETE FROM bucketlistitem WHERE item_id = ? AND bucketlist_id = ?")
            .bind(item_id)
            .bind(bucketlist_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(item_not_found(item_id));
        }

        info!("User {} deleted item {}", owner, item_id);
        Ok(())
    }

    async fn ensure_parent(&self, owner: i64, bucketlist_id: i64) -> Result<(), RepositoryError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM bucketlists WHERE id = ? AND created_by = ?)")
            .bind(bucketlist_id)
            .bind(owner)
            .fetch_one(&self.pool)
            .await?;

        if !exists {
            return Err(RepositoryError::NotFound("Error, No bucketlist with such ID.".to_string()));
        }
        Ok(())
    }
}

fn item_not_found(item_id: i64) -> RepositoryError {
    RepositoryError::NotFound(format!("Error, No bucketlist item with ID {}.", item_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{NameScope, PaginationConfig};
    use crate::database::repository::{test_support, BucketlistRepository};

    struct Fixture {
        items: ItemRepository,
        bucketlists: BucketlistRepository,
        alice: i64,
        bob: i64,
        trip: i64,
    }

    async fn setup() -> Fixture {
        let pool = test_support::pool().await;
        let alice = test_support::user(&pool, "alice").await;
        let bob = test_support::user(&pool, "bob").await;
        let bucketlists = BucketlistRepository::new(pool.clone(), NameScope::Global);
        let trip = bucketlists.create(alice, "Trip").await.unwrap().id;
        Fixture {
            items: ItemRepository::new(pool),
            bucketlists,
            alice,
            bob,
            trip,
        }
    }

    fn first_page() -> PageRequest {
        PageRequest::new(None, None, &PaginationConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn create_defaults_to_not_done() {
        let f = setup().await;
        let item = f.items.create(f.alice, f.trip, "Pack bags").await.unwrap();

        assert_eq!(item.name, "Pack bags");
        assert!(!item.done);
        assert_eq!(item.bucketlist_id, f.trip);
        assert_eq!(f.items.get(f.alice, f.trip, item.id).await.unwrap(), item);
    }

    #[tokio::test]
    async fn create_under_missing_parent_is_not_found() {
        let f = setup().await;
        assert!(matches!(
            f.items.create(f.alice, f.trip + 100, "Pack").await,
            Err(RepositoryError::NotFound(_))
        ));
        // Someone else's bucketlist counts as missing.
        assert!(matches!(
            f.items.create(f.bob, f.trip, "Pack").await,
            Err(RepositoryError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn create_with_empty_name_is_invalid() {
        let f = setup().await;
        assert!(matches!(
            f.items.create(f.alice, f.trip, "").await,
            Err(RepositoryError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn same_name_allowed_in_different_bucketlists() {
        let f = setup().await;
        let other = f.bucketlists.create(f.alice, "Other").await.unwrap().id;
        f.items.create(f.alice, f.trip, "Pack").await.unwrap();
        assert!(f.items.create(f.alice, other, "Pack").await.is_ok());
    }

    #[tokio::test]
    async fn list_reports_empty_separately_from_missing_parent() {
        let f = setup().await;
        assert!(matches!(
            f.items.list(f.alice, f.trip, first_page()).await,
            Err(RepositoryError::EmptyResult(_))
        ));
        assert!(matches!(
            f.items.list(f.alice, f.trip + 1, first_page()).await,
            Err(RepositoryError::NotFound(_))
        ));

        f.items.create(f.alice, f.trip, "Pack").await.unwrap();
        f.items.create(f.alice, f.trip, "Fly").await.unwrap();
        let page = f.items.list(f.alice, f.trip, first_page()).await.unwrap();
        let names: Vec<_> = page.data.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Pack", "Fly"]);
        assert_eq!(page.total, 2);
    }

    #[tokio::test]
    async fn update_and_delete() {
        let f = setup().await;
        let item = f.items.create(f.alice, f.trip, "Pack").await.unwrap();

        let renamed = f.items.update(f.alice, f.trip, item.id, "Pack light").await.unwrap();
        assert_eq!(renamed.name, "Pack light");
        assert!(renamed.date_modified >= item.date_modified);

        assert!(matches!(
            f.items.update(f.alice, f.trip, item.id, " ").await,
            Err(RepositoryError::InvalidArgument(_))
        ));
        assert!(matches!(
            f.items.update(f.alice, f.trip, item.id + 1, "x").await,
            Err(RepositoryError::NotFound(_))
        ));

        f.items.delete(f.alice, f.trip, item.id).await.unwrap();
        assert!(matches!(
            f.items.delete(f.alice, f.trip, item.id).await,
            Err(RepositoryError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn item_must_belong_to_addressed_bucketlist() {
        let f = setup().await;
        let other = f.bucketlists.create(f.alice, "Other").await.unwrap().id;
        let item = f.items.create(f.alice, f.trip, "Pack").await.unwrap();

        assert!(matches!(
            f.items.get(f.alice, other, item.id).await,
            Err(RepositoryError::NotFound(_))
        ));
        assert!(matches!(
            f.items.delete(f.alice, other, item.id).await,
            Err(RepositoryError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn deleting_bucketlist_removes_its_items() {
        let f = setup().await;
        let item = f.items.create(f.alice, f.trip, "Pack").await.unwrap();

        f.bucketlists.delete(f.alice, f.trip).await.unwrap();
        assert!(matches!(
            f.items.get(f.alice, f.trip, item.id).await,
            Err(RepositoryError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn other_users_cannot_touch_items() {
        let f = setup().await;
        let item = f.items.create(f.alice, f.trip, "Pack").await.unwrap();

        assert!(matches!(f.items.get(f.bob, f.trip, item.id).await, Err(RepositoryError::NotFound(_))));
        assert!(matches!(
            f.items.update(f.bob, f.trip, item.id, "Mine").await,
            Err(RepositoryError::NotFound(_))
        ));
        assert!(matches!(f.items.delete(f.bob, f.trip, item.id).await, Err(RepositoryError::NotFound(_))));
    }
}
