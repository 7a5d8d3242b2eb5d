//! Pagination and search parameters
//!
//! Rendered into the exact query strings the patients table sends:
//! `?page=&limit=&field=&order=` with an optional `&search=` term.

use serde::{Deserialize, Serialize};

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Pagination and sorting parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageQuery {
    pub page: u32,
    pub limit: u32,
    pub field: String,
    pub order: SortOrder,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            field: "nom".to_string(),
            order: SortOrder::Asc,
        }
    }
}

impl PageQuery {
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn sorted_by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.field = field.into();
        self.order = order;
        self
    }

    /// Render as the backend's query string, without the leading `?`
    pub fn query_string(&self) -> String {
        format!(
            "page={}&limit={}&field={}&order={}",
            self.page,
            self.limit,
            self.field,
            self.order.as_str()
        )
    }
}

/// Pagination plus a search term
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub page: PageQuery,
    pub term: String,
}

impl SearchQuery {
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            page: PageQuery::default(),
            term: term.into(),
        }
    }

    pub fn with_page(mut self, page: PageQuery) -> Self {
        self.page = page;
        self
    }

    /// Render as the backend's query string, without the leading `?`
    pub fn query_string(&self) -> String {
        format!("{}&search={}", self.page.query_string(), self.term)
    }
}
