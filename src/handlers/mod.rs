// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) → Protected (bearer token, owner-scoped)
pub mod public;    // /auth/register, /auth/login
pub mod protected; // /auth/whoami, /auth/user, /bucketlists/*

use serde::{Deserialize, Serialize};

use crate::database::Page;

/// Query string shared by the paginated listings.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// Case-insensitive name search (bucketlists only).
    pub q: Option<String>,
}

impl ListQuery {
    /// The search term, ignoring blank `q=`.
    pub fn search(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }
}

/// Body of every create/rename request. A missing name reads as empty so
/// it is rejected with the same message as a blank one.
#[derive(Debug, Deserialize)]
pub struct NameRequest {
    #[serde(default)]
    pub name: String,
}

/// `{ nextpage, prevpage, data }` listing envelope.
#[derive(Debug, Serialize)]
pub struct PageResponse<T: Serialize> {
    pub nextpage: Option<String>,
    pub prevpage: Option<String>,
    pub data: Vec<T>,
}

impl<T: Serialize> PageResponse<T> {
    /// Links point back at `path`, carrying the search term along.
    pub fn from_page(page: Page<T>, path: &str, query: Option<&str>) -> Self {
        Self {
            nextpage: page.next_link(path, query),
            prevpage: page.prev_link(path, query),
            data: page.data,
        }
    }
}
