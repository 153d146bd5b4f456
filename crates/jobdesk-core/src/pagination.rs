//! Page-based pagination for listing endpoints.
//!
//! Listing endpoints accept `page`/`limit`/`sort`/`order` query
//! parameters and respond with a `data` array plus a [`PaginationMeta`]
//! object. Out-of-range values are clamped rather than rejected:
//!
//! - `page`: 1-indexed, minimum 1 (default: 1)
//! - `limit`: items per page, clamped to [1, 50] (default: 10)
//! - `sort`: field name (default: `createdAt`; each endpoint maps the
//!   name onto a whitelisted column)
//! - `order`: `asc` or `desc`; anything else is treated as `desc`

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Default and maximum page sizes for listing endpoints.
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 50;

/// Default sort field for listing endpoints.
pub const DEFAULT_SORT: &str = "createdAt";

/// Deserializes an optional string into an optional i64.
///
/// Query parameters may arrive as empty strings, which are treated as
/// `None`; non-numeric values are a deserialization error. Also used by
/// filter structs for numeric bounds such as salary ranges.
pub fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => s.parse::<i64>().map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Sort direction for listing queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// SQL keyword for this direction.
    #[must_use]
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    /// Canonical lowercase form, as used in query strings and cache keys.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Query parameters for paginated listing endpoints.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct PaginationParams {
    /// Page number (1-indexed, default: 1)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
    /// Items per page (1-50, default: 10)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub limit: Option<i64>,
    /// Sort field name (default: `createdAt`)
    pub sort: Option<String>,
    /// Sort direction, `asc` or `desc` (default: `desc`)
    pub order: Option<String>,
}

impl PaginationParams {
    /// Returns the effective page, clamped to a minimum of 1.
    #[must_use]
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Returns the effective limit, clamped to [1, 50].
    #[must_use]
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    /// Returns the number of records to skip for the effective page.
    #[must_use]
    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.limit()
    }

    /// Returns the requested sort field name.
    ///
    /// Endpoints map this onto a whitelisted column; unknown names fall
    /// back to the creation timestamp.
    #[must_use]
    pub fn sort(&self) -> &str {
        self.sort.as_deref().filter(|s| !s.is_empty()).unwrap_or(DEFAULT_SORT)
    }

    /// Returns the sort direction. Only an explicit `asc` is ascending.
    #[must_use]
    pub fn order(&self) -> SortOrder {
        match self.order.as_deref() {
            Some("asc") => SortOrder::Asc,
            _ => SortOrder::Desc,
        }
    }
}

/// Metadata about a paginated response.
///
/// # Example JSON
///
/// ```json
/// {
///   "data": [...],
///   "pagination": {
///     "page": 3,
///     "limit": 10,
///     "total": 25,
///     "pages": 3,
///     "hasNext": false,
///     "hasPrev": true
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    /// Current page number (1-indexed)
    pub page: i64,
    /// Items per page
    pub limit: i64,
    /// Total number of matching items across all pages
    pub total: i64,
    /// Total number of pages
    pub pages: i64,
    /// Whether a later page exists
    pub has_next: bool,
    /// Whether an earlier page exists
    pub has_prev: bool,
}

impl PaginationMeta {
    /// Computes pagination metadata for a page window.
    ///
    /// `pages` is `ceil(total / limit)`; with `total == 0` there are no
    /// pages and `has_next` is false.
    #[must_use]
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        let pages = if limit > 0 { (total + limit - 1) / limit } else { 0 };
        Self {
            page,
            limit,
            total,
            pages,
            has_next: page < pages,
            has_prev: page > 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: Option<i64>, limit: Option<i64>) -> PaginationParams {
        PaginationParams {
            page,
            limit,
            sort: None,
            order: None,
        }
    }

    #[test]
    fn test_defaults() {
        let p = params(None, None);
        assert_eq!(p.page(), 1);
        assert_eq!(p.limit(), 10);
        assert_eq!(p.offset(), 0);
        assert_eq!(p.sort(), "createdAt");
        assert_eq!(p.order(), SortOrder::Desc);
    }

    #[test]
    fn test_page_clamped_to_one() {
        assert_eq!(params(Some(0), None).page(), 1);
        assert_eq!(params(Some(-5), None).page(), 1);
        assert_eq!(params(Some(3), None).page(), 3);
    }

    #[test]
    fn test_limit_clamped_to_range() {
        assert_eq!(params(None, Some(0)).limit(), 1);
        assert_eq!(params(None, Some(-10)).limit(), 1);
        assert_eq!(params(None, Some(50)).limit(), 50);
        assert_eq!(params(None, Some(51)).limit(), 50);
        assert_eq!(params(None, Some(500)).limit(), 50);
        assert_eq!(params(None, Some(25)).limit(), 25);
    }

    #[test]
    fn test_offset_from_page() {
        let p = params(Some(3), Some(20));
        assert_eq!(p.offset(), 40);
    }

    #[test]
    fn test_order_only_asc_is_ascending() {
        let mut p = params(None, None);
        p.order = Some("asc".to_string());
        assert_eq!(p.order(), SortOrder::Asc);
        p.order = Some("ascending".to_string());
        assert_eq!(p.order(), SortOrder::Desc);
        p.order = Some("DESC".to_string());
        assert_eq!(p.order(), SortOrder::Desc);
    }

    #[test]
    fn test_empty_sort_falls_back_to_default() {
        let mut p = params(None, None);
        p.sort = Some(String::new());
        assert_eq!(p.sort(), "createdAt");
    }

    #[test]
    fn test_deserialize_empty_strings_as_defaults() {
        let p: PaginationParams =
            serde_json::from_str(r#"{"page":"","limit":""}"#).unwrap();
        assert_eq!(p.page(), 1);
        assert_eq!(p.limit(), 10);
    }

    #[test]
    fn test_deserialize_string_numbers() {
        let p: PaginationParams =
            serde_json::from_str(r#"{"page":"2","limit":"30"}"#).unwrap();
        assert_eq!(p.page(), 2);
        assert_eq!(p.limit(), 30);
    }

    #[test]
    fn test_meta_pages_is_ceiling() {
        let meta = PaginationMeta::new(1, 10, 25);
        assert_eq!(meta.pages, 3);

        let meta = PaginationMeta::new(1, 10, 30);
        assert_eq!(meta.pages, 3);

        let meta = PaginationMeta::new(1, 10, 31);
        assert_eq!(meta.pages, 4);
    }

    #[test]
    fn test_meta_zero_total() {
        let meta = PaginationMeta::new(1, 10, 0);
        assert_eq!(meta.pages, 0);
        assert!(!meta.has_next);
        assert!(!meta.has_prev);
    }

    #[test]
    fn test_meta_last_page() {
        let meta = PaginationMeta::new(3, 10, 25);
        assert_eq!(meta.pages, 3);
        assert!(!meta.has_next);
        assert!(meta.has_prev);
    }

    #[test]
    fn test_meta_middle_page() {
        let meta = PaginationMeta::new(2, 10, 25);
        assert!(meta.has_next);
        assert!(meta.has_prev);
    }

    #[test]
    fn test_meta_serializes_camel_case() {
        let meta = PaginationMeta::new(1, 10, 25);
        let json = serde_json::to_string(&meta).unwrap();
        assert!(json.contains(r#""hasNext":true"#));
        assert!(json.contains(r#""hasPrev":false"#));
        assert!(json.contains(r#""pages":3"#));
    }
}
