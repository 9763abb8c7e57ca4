use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use super::item::Item;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Bucketlist {
    pub id: i64,
    pub name: String,
    pub date_created: DateTime<Utc>,
    pub date_modified: DateTime<Utc>,
    pub created_by: i64,
}

/// Wire shape of a bucketlist: the row plus its items.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketlistWithItems {
    pub id: i64,
    pub name: String,
    pub items: Vec<Item>,
    pub date_created: DateTime<Utc>,
    pub date_modified: DateTime<Utc>,
    pub created_by: i64,
}

impl BucketlistWithItems {
    pub fn new(bucketlist: Bucketlist, items: Vec<Item>) -> Self {
        Self {
            id: bucketlist.id,
            name: bucketlist.name,
            items,
            date_created: bucketlist.date_created,
            date_modified: bucketlist.date_modified,
            created_by: bucketlist.created_by,
        }
    }
}
