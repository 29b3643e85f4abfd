//! Query parameters and pagination utilities

use crate::core::error::LezitResult;
use crate::core::workflow::{Lifecycle, parse_status};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;

/// Query parameters for pagination and filtering
///
/// This structure is used to extract pagination and filtering parameters
/// from URL query strings. All parameters have sensible defaults.
///
/// # Example
/// ```rust,ignore
/// GET /api/bookings?page=2&limit=10
/// GET /api/bookings?status=pending&sort=pickup_date:asc
/// GET /api/admin/users?role=vendor&status=active
/// GET /api/transactions?filter={"amount>": 1000}
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct QueryParams {
    /// Page number (starts at 1)
    #[serde(default = "default_page")]
    pub page: usize,

    /// Number of items per page
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Exact match on the `status` field
    #[serde(default)]
    pub status: Option<String>,

    /// Exact match on the `role` field
    #[serde(default)]
    pub role: Option<String>,

    /// Exact match on the `vehicle_type` field
    #[serde(default)]
    pub vehicle_type: Option<String>,

    /// Filters as JSON object
    ///
    /// # Format
    /// - Exact match: `{"field": "value"}`
    /// - Comparison: `{"field>": value, "field<": value, "field>=": value, "field<=": value}`
    #[serde(default)]
    pub filter: Option<String>,

    /// Sort field and direction
    ///
    /// # Format
    /// - `field:asc` or `field` (ascending)
    /// - `field:desc` (descending)
    ///
    /// Defaults to `created_at:desc`.
    #[serde(default)]
    pub sort: Option<String>,
}

fn default_page() -> usize {
    1
}

fn default_limit() -> usize {
    20
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
            status: None,
            role: None,
            vehicle_type: None,
            filter: None,
            sort: None,
        }
    }
}

impl QueryParams {
    /// Get page number, ensuring minimum of 1
    pub fn page(&self) -> usize {
        self.page.max(1)
    }

    /// Get limit, ensuring it doesn't exceed the maximum
    pub fn limit(&self) -> usize {
        self.limit.clamp(1, 100)
    }

    /// Reject a `status` filter naming no status of `S`
    pub fn ensure_status<S: Lifecycle>(&self) -> LezitResult<()> {
        match &self.status {
            Some(status) => parse_status::<S>("status", status).map(|_| ()),
            None => Ok(()),
        }
    }

    /// Parse filter JSON string into Value
    pub fn filter_value(&self) -> Option<Value> {
        self.filter
            .as_ref()
            .and_then(|s| serde_json::from_str(s).ok())
    }

    /// Filter, sort and page a collection
    pub fn apply<T: Serialize>(&self, items: Vec<T>) -> serde_json::Result<PaginatedResponse<T>> {
        let mut rows = items
            .into_iter()
            .map(|item| serde_json::to_value(&item).map(|json| (item, json)))
            .collect::<serde_json::Result<Vec<_>>>()?;

        let equals = [
            ("status", &self.status),
            ("role", &self.role),
            ("vehicle_type", &self.vehicle_type),
        ];
        for (field, wanted) in equals {
            if let Some(wanted) = wanted {
                rows.retain(|(_, json)| field_matches(&json[field], wanted));
            }
        }

        if let Some(Value::Object(filter)) = self.filter_value() {
            rows.retain(|(_, json)| {
                filter
                    .iter()
                    .all(|(key, expected)| condition_holds(json, key, expected))
            });
        }

        let sort = self.sort.as_deref().unwrap_or("created_at:desc");
        let (field, descending) = match sort.split_once(':') {
            Some((field, dir)) => (field, dir.eq_ignore_ascii_case("desc")),
            None => (sort, false),
        };
        rows.sort_by(|(_, a), (_, b)| {
            let ord = compare_values(&a[field], &b[field]);
            if descending { ord.reverse() } else { ord }
        });

        let total = rows.len();
        let page = self.page();
        let limit = self.limit();
        let data = rows
            .into_iter()
            .skip((page - 1) * limit)
            .take(limit)
            .map(|(item, _)| item)
            .collect();

        Ok(PaginatedResponse {
            data,
            pagination: PaginationMeta::new(page, limit, total),
        })
    }
}

fn field_matches(actual: &Value, wanted: &str) -> bool {
    match actual {
        Value::String(s) => s == wanted,
        Value::Null => false,
        other => other.to_string() == wanted,
    }
}

fn condition_holds(json: &Value, key: &str, expected: &Value) -> bool {
    for op in [">=", "<=", ">", "<"] {
        if let Some(field) = key.strip_suffix(op) {
            let ord = compare_values(&json[field], expected);
            return match op {
                ">=" => ord != Ordering::Less,
                "<=" => ord != Ordering::Greater,
                ">" => ord == Ordering::Greater,
                _ => ord == Ordering::Less,
            };
        }
    }
    &json[key] == expected
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        _ => a.to_string().cmp(&b.to_string()),
    }
}

/// Paginated response structure
///
/// This structure wraps paginated data with metadata about pagination state.
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    /// The paginated data
    pub data: Vec<T>,

    /// Pagination metadata
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    /// Convert every item, keeping the pagination metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedResponse<U> {
        PaginatedResponse {
            data: self.data.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}

/// Pagination metadata
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct PaginationMeta {
    /// Current page number (starts at 1)
    pub page: usize,

    /// Number of items per page
    pub limit: usize,

    /// Total number of items (after filters)
    pub total: usize,

    /// Total number of pages
    pub total_pages: usize,

    /// Whether there is a next page
    pub has_next: bool,

    /// Whether there is a previous page
    pub has_prev: bool,
}

impl PaginationMeta {
    /// Create pagination metadata from calculation
    pub fn new(page: usize, limit: usize, total: usize) -> Self {
        let limit = limit.max(1);
        let page = page.max(1);
        let total_pages = if total == 0 { 0 } else { total.div_ceil(limit) };
        let start = (page - 1) * limit;

        Self {
            page,
            limit,
            total,
            total_pages,
            has_next: start + limit < total,
            has_prev: page > 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Serialize, PartialEq)]
    struct Row {
        name: &'static str,
        status: &'static str,
        amount: f64,
        created_at: &'static str,
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { name: "a", status: "pending", amount: 10.0, created_at: "2026-01-01T00:00:00Z" },
            Row { name: "b", status: "quoted", amount: 250.0, created_at: "2026-01-03T00:00:00Z" },
            Row { name: "c", status: "pending", amount: 75.5, created_at: "2026-01-02T00:00:00Z" },
        ]
    }

    #[test]
    fn test_query_params_defaults() {
        let params = QueryParams::default();
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(), 20);
    }

    #[test]
    fn test_limit_is_clamped() {
        let params = QueryParams { limit: 1000, ..Default::default() };
        assert_eq!(params.limit(), 100);
        let params = QueryParams { limit: 0, page: 0, ..Default::default() };
        assert_eq!(params.limit(), 1);
        assert_eq!(params.page(), 1);
    }

    #[test]
    fn test_ensure_status_checks_the_lifecycle() {
        use crate::entities::BookingStatus;

        let params = QueryParams { status: Some("in_transit".into()), ..Default::default() };
        assert!(params.ensure_status::<BookingStatus>().is_ok());

        let params = QueryParams { status: Some("flying".into()), ..Default::default() };
        let err = params.ensure_status::<BookingStatus>().unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");

        assert!(QueryParams::default().ensure_status::<BookingStatus>().is_ok());
    }

    #[test]
    fn test_pagination_meta() {
        let meta = PaginationMeta::new(1, 20, 145);
        assert_eq!(meta.total, 145);
        assert_eq!(meta.total_pages, 8);
        assert!(!meta.has_prev);
        assert!(meta.has_next);

        let empty = PaginationMeta::new(1, 20, 0);
        assert_eq!(empty.total_pages, 0);
        assert!(!empty.has_next);
    }

    #[test]
    fn test_default_sort_is_newest_first() {
        let page = QueryParams::default().apply(rows()).unwrap();
        let names: Vec<_> = page.data.iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_status_filter_and_sort() {
        let params = QueryParams {
            status: Some("pending".into()),
            sort: Some("amount:desc".into()),
            ..Default::default()
        };
        let page = params.apply(rows()).unwrap();
        let names: Vec<_> = page.data.iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["c", "a"]);
        assert_eq!(page.pagination.total, 2);
    }

    #[test]
    fn test_json_filter_comparisons() {
        let params = QueryParams {
            filter: Some(json!({"amount>=": 75.5}).to_string()),
            sort: Some("amount".into()),
            ..Default::default()
        };
        let page = params.apply(rows()).unwrap();
        let names: Vec<_> = page.data.iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["c", "b"]);
    }

    #[test]
    fn test_paging() {
        let params = QueryParams { page: 2, limit: 2, ..Default::default() };
        let page = params.apply(rows()).unwrap();
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].name, "a");
        assert_eq!(page.pagination.total_pages, 2);
        assert!(page.pagination.has_prev);
        assert!(!page.pagination.has_next);
    }
}
