use crate::config::PaginationConfig;

use super::repository::RepositoryError;

/// A validated 1-based page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    /// Apply defaults and bounds. `limit` must stay strictly below `max_limit`.
    pub fn new(page: Option<i64>, limit: Option<i64>, config: &PaginationConfig) -> Result<Self, RepositoryError> {
        let page = page.unwrap_or(1);
        let limit = limit.unwrap_or(config.default_limit);

        if page < 1 {
            return Err(RepositoryError::InvalidArgument("Page should be >= 1.".to_string()));
        }
        if limit >= config.max_limit {
            return Err(RepositoryError::InvalidArgument(format!(
                "Limit should be < {}.",
                config.max_limit
            )));
        }
        if limit < 1 {
            return Err(RepositoryError::InvalidArgument("Limit should be >= 1.".to_string()));
        }
        // The window's end must be addressable as an i64 row count.
        if page.checked_mul(limit).is_none() {
            return Err(RepositoryError::InvalidArgument("Page is out of range.".to_string()));
        }

        Ok(Self { page, limit })
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

#[derive(Debug, Clone)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub page: i64,
    pub limit: i64,
    pub total: i64,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, request: PageRequest, total: i64) -> Self {
        Self {
            data,
            page: request.page,
            limit: request.limit,
            total,
        }
    }

    pub fn has_next(&self) -> bool {
        self.total > self.page.saturating_mul(self.limit)
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn next_link(&self, path: &str, query: Option<&str>) -> Option<String> {
        self.has_next().then(|| page_link(path, self.page + 1, self.limit, query))
    }

    pub fn prev_link(&self, path: &str, query: Option<&str>) -> Option<String> {
        self.has_prev().then(|| page_link(path, self.page - 1, self.limit, query))
    }
}

/// `path?page=N&limit=L[&q=...]`, ready to be followed by a client.
pub fn page_link(path: &str, page: i64, limit: i64, query: Option<&str>) -> String {
    let mut params = url::form_urlencoded::Serializer::new(String::new());
    params.append_pair("page", &page.to_string());
    params.append_pair("limit", &limit.to_string());
    if let Some(q) = query {
        params.append_pair("q", q);
    }
    format!("{}?{}", path, params.finish())
}
