use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::collections::HashMap;
use tracing::{debug, info};

use crate::config::NameScope;
use crate::database::models::{Bucketlist, BucketlistWithItems, Item};
use crate::database::pagination::{Page, PageRequest};

use super::{contains_pattern, require_name, RepositoryError};

const BUCKETLIST_COLUMNS: &str = "id, name, date_created, date_modified, created_by";
pub(crate) const ITEM_COLUMNS: &str = "item_id AS id, name, date_created, date_modified, done, bucketlist_id";

/// Bucketlists of a single owner. Every method takes the acting user and
/// never touches rows belonging to anyone else.
#[derive(Clone)]
pub struct BucketlistRepository {
    pool: SqlitePool,
    name_scope: NameScope,
}

impl BucketlistRepository {
    pub fn new(pool: SqlitePool, name_scope: NameScope) -> Self {
        Self { pool, name_scope }
    }

    pub async fn create(&self, owner: i64, name: &str) -> Result<Bucketlist, RepositoryError> {
        let name = require_name(name, "Name is not provided.")?;
        self.ensure_name_free(owner, &name, None).await?;

        let now = Utc::now();
        let bucketlist = sqlx::query_as::<_, Bucketlist>(&format!(
            "INSERT INTO bucketlists (name, date_created, date_modified, created_by) VALUES (?, ?, ?, ?) RETURNING {}",
            BUCKETLIST_COLUMNS
        ))
        .bind(&name)
        .bind(now)
        .bind(now)
        .bind(owner)
        .fetch_one(&self.pool)
        .await?;

        info!("User {} created bucketlist {}", owner, bucketlist.id);
        Ok(bucketlist)
    }

    /// One page of the owner's bucketlists, optionally narrowed to names
    /// containing `query`.
    ///
    /// Matching goes through SQLite `LIKE`, which folds case for ASCII
    /// letters only: `london` finds "London", `été` does not find "ÉTÉ".
    pub async fn list(
        &self,
        owner: i64,
        request: PageRequest,
        query: Option<&str>,
    ) -> Result<Page<BucketlistWithItems>, RepositoryError> {
        let pattern = query.map(contains_pattern);

        let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM bucketlists WHERE created_by = ");
        count.push_bind(owner);
        if let Some(pattern) = &pattern {
            count.push(" AND name LIKE ").push_bind(pattern.clone()).push(" ESCAPE '\\'");
        }
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM bucketlists WHERE created_by = ", BUCKETLIST_COLUMNS));
        select.push_bind(owner);
        if let Some(pattern) = &pattern {
            select.push(" AND name LIKE ").push_bind(pattern.clone()).push(" ESCAPE '\\'");
        }
        select
            .push(" ORDER BY id LIMIT ")
            .push_bind(request.limit)
            .push(" OFFSET ")
            .push_bind(request.offset());
        let rows: Vec<Bucketlist> = select.build_query_as().fetch_all(&self.pool).await?;

        debug!("Listed {} of {} bucketlists for user {}", rows.len(), total, owner);

        if rows.is_empty() {
            return Err(RepositoryError::EmptyResult("There are no bucketlists.".to_string()));
        }

        let data = self.attach_items(rows).await?;
        Ok(Page::new(data, request, total))
    }

    pub async fn get(&self, owner: i64, id: i64) -> Result<BucketlistWithItems, RepositoryError> {
        let bucketlist = self.find(owner, id).await?;
        let items = self.items_of(bucketlist.id).await?;
        Ok(BucketlistWithItems::new(bucketlist, items))
    }

    /// The bare row, scoped to `owner`.
    pub async fn find(&self, owner: i64, id: i64) -> Result<Bucketlist, RepositoryError> {
        sqlx::query_as::<_, Bucketlist>(&format!(
            "SELECT {} FROM bucketlists WHERE id = ? AND created_by = ?",
            BUCKETLIST_COLUMNS
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found(id))
    }

    pub async fn update(&self, owner: i64, id: i64, name: &str) -> Result<BucketlistWithItems, RepositoryError> {
        let name = require_name(name, "Name is not provided.")?;
        self.find(owner, id).await?;
        self.ensure_name_free(owner, &name, Some(id)).await?;

        let bucketlist = sqlx::query_as::<_, Bucketlist>(&format!(
            "UPDATE bucketlists SET name = ?, date_modified = ? WHERE id = ? AND created_by = ? RETURNING {}",
            BUCKETLIST_COLUMNS
        ))
        .bind(&name)
        .bind(Utc::now())
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found(id))?;

        info!("User {} renamed bucketlist {}", owner, id);
        let items = self.items_of(bucketlist.id).await?;
        Ok(BucketlistWithItems::new(bucketlist, items))
    }

    /// Removes the bucketlist; the schema cascades to its items.
    pub async fn delete(&self, owner: i64, id: i64) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM bucketlists WHERE id = ? AND created_by = ?")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }

        info!("User {} deleted bucketlist {}", owner, id);
        Ok(())
    }

    async fn ensure_name_free(&self, owner: i64, name: &str, except: Option<i64>) -> Result<(), RepositoryError> {
        let mut check = QueryBuilder::<Sqlite>::new("SELECT EXISTS(SELECT 1 FROM bucketlists WHERE name = ");
        check.push_bind(name.to_string());
        if self.name_scope == NameScope::Owner {
            check.push(" AND created_by = ").push_bind(owner);
        }
        if let Some(id) = except {
            check.push(" AND id != ").push_bind(id);
        }
        check.push(")");

        let taken: bool = check.build_query_scalar().fetch_one(&self.pool).await?;
        if taken {
            return Err(RepositoryError::Conflict("Bucketlist already exists".to_string()));
        }
        Ok(())
    }

    async fn items_of(&self, bucketlist_id: i64) -> Result<Vec<Item>, RepositoryError> {
        let items = sqlx::query_as::<_, Item>(&format!(
            "SELECT {} FROM bucketlistitem WHERE bucketlist_id = ? ORDER BY item_id",
            ITEM_COLUMNS
        ))
        .bind(bucketlist_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    // One query for the items of a whole page.
    async fn attach_items(&self, rows: Vec<Bucketlist>) -> Result<Vec<BucketlistWithItems>, RepositoryError> {
        let mut query = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {} FROM bucketlistitem WHERE bucketlist_id IN (",
            ITEM_COLUMNS
        ));
        let mut ids = query.separated(", ");
        for row in &rows {
            ids.push_bind(row.id);
        }
        query.push(") ORDER BY item_id");

        let items: Vec<Item> = query.build_query_as().fetch_all(&self.pool).await?;

        let mut by_parent: HashMap<i64, Vec<Item>> = HashMap::new();
        for item in items {
            by_parent.entry(item.bucketlist_id).or_default().push(item);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let items = by_parent.remove(&row.id).unwrap_or_default();
                BucketlistWithItems::new(row, items)
            })
            .collect())
    }
}

fn not_found(id: i64) -> RepositoryError {
    RepositoryError::NotFound(format!("Bucketlist {} not found.", id))
}
