/// Pagination for list endpoints
///
/// `limit`, `page` and `sort` come from the query string. Parsing never
/// fails: anything missing, non-numeric or non-positive silently falls back
/// to the defaults, so `limit >= 1` and `page >= 1` always hold.

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use serde::{Deserialize, Serialize};
use std::future::{ready, Ready};

pub const DEFAULT_LIMIT: u64 = 10;
pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_SORT_FIELD: &str = "created_at";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// `"<field> [asc|desc]"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            field: DEFAULT_SORT_FIELD.to_string(),
            direction: SortDirection::Desc,
        }
    }
}

impl SortSpec {
    /// Empty input yields `created_at desc`; a bare field sorts ascending.
    pub fn parse(raw: &str) -> Self {
        let mut parts = raw.split_whitespace();
        let field = match parts.next() {
            Some(field) => field.to_string(),
            None => return Self::default(),
        };
        let direction = match parts.next() {
            Some(dir) if dir.eq_ignore_ascii_case("desc") => SortDirection::Desc,
            _ => SortDirection::Asc,
        };
        Self { field, direction }
    }

    /// Falls back to the default sort unless `field` is one the store
    /// knows how to order by.
    pub fn restrict(&self, allowed: &[&str]) -> SortSpec {
        if allowed.contains(&self.field.as_str()) {
            self.clone()
        } else {
            tracing::debug!(field = %self.field, "Unsortable field requested, using default sort");
            SortSpec::default()
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct PaginationQuery {
    limit: Option<String>,
    page: Option<String>,
    sort: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    limit: u64,
    page: u64,
    sort: SortSpec,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            page: DEFAULT_PAGE,
            sort: SortSpec::default(),
        }
    }
}

fn positive_or(raw: Option<&str>, default: u64) -> u64 {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .filter(|value| *value > 0)
        .map(|value| value as u64)
        .unwrap_or(default)
}

impl Pagination {
    pub fn new(limit: u64, page: u64, sort: SortSpec) -> Self {
        Self {
            limit: if limit == 0 { DEFAULT_LIMIT } else { limit },
            page: if page == 0 { DEFAULT_PAGE } else { page },
            sort,
        }
    }

    pub fn parse(raw_limit: Option<&str>, raw_page: Option<&str>, raw_sort: Option<&str>) -> Self {
        Self {
            limit: positive_or(raw_limit, DEFAULT_LIMIT),
            page: positive_or(raw_page, DEFAULT_PAGE),
            sort: raw_sort.map(SortSpec::parse).unwrap_or_default(),
        }
    }

    pub fn from_query_string(query: &str) -> Self {
        let query = web::Query::<PaginationQuery>::from_query(query)
            .map(web::Query::into_inner)
            .unwrap_or_default();
        Self::parse(query.limit.as_deref(), query.page.as_deref(), query.sort.as_deref())
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn sort(&self) -> &SortSpec {
        &self.sort
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    pub fn build_response<T>(&self, data: Vec<T>, total_rows: u64) -> PaginatedResponse<T> {
        PaginatedResponse {
            data,
            pagination: PaginationMeta {
                limit: self.limit,
                page: self.page,
                total_rows,
                total_pages: total_rows.div_ceil(self.limit),
            },
        }
    }
}

impl FromRequest for Pagination {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(Pagination::from_query_string(req.query_string())))
    }
}

#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationMeta {
    pub limit: u64,
    pub page: u64,
    pub total_rows: u64,
    pub total_pages: u64,
}
