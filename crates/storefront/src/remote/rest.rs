//! PostgREST client implementation.
//!
//! Uses `reqwest` for HTTP. Requests authenticate with the access key both as
//! the `apikey` header and as a bearer token. Writes ask for
//! `Prefer: return=representation` so the stored rows (with store-assigned
//! ids, queue numbers and timestamps) come back in the response.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use corner_cafe_core::{OrderId, OrderStatus};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::rows::{CategoryRow, NewOrderItemRow, NewOrderRow, OrderItemRow, OrderRow};
use super::{OrderFilter, RemoteError, RemoteStore};
use crate::config::RemoteConfig;

/// Path of the REST API below the project URL.
const REST_PATH: &str = "rest/v1/";

const MENU_SELECT: &str = "id,name,slug,description,display_order,is_active,\
dishes(id,category_id,name,description,price,image_url,is_available,is_featured,prep_time_minutes,display_order)";

const CATEGORY_SELECT: &str = "id,name,slug,description,display_order,is_active";

const ORDER_SELECT: &str = "*,order_items(*,dishes(name,description,image_url))";

/// Tables exposed by the remote store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Categories,
    Dishes,
    Orders,
    OrderItems,
}

impl Table {
    /// Table name as used in the URL path.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Categories => "categories",
            Self::Dishes => "dishes",
            Self::Orders => "orders",
            Self::OrderItems => "order_items",
        }
    }
}

/// Sort direction for `order=` clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    const fn suffix(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// A PostgREST query: table, column selection, filters and ordering,
/// rendered as URL query parameters.
///
/// Filters and orderings on an embedded relation are written with the
/// relation as prefix, e.g. `eq("dishes.is_available", "true")`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    table: Table,
    params: Vec<(String, String)>,
}

impl Query {
    /// Start a query against `table`.
    #[must_use]
    pub const fn table(table: Table) -> Self {
        Self {
            table,
            params: Vec::new(),
        }
    }

    /// Columns to return (`select=`).
    #[must_use]
    pub fn select(self, columns: &str) -> Self {
        self.param("select", columns.to_string())
    }

    /// `column = value`.
    #[must_use]
    pub fn eq(self, column: &str, value: impl std::fmt::Display) -> Self {
        self.param(column, format!("eq.{value}"))
    }

    /// `column >= value`.
    #[must_use]
    pub fn gte(self, column: &str, value: impl std::fmt::Display) -> Self {
        self.param(column, format!("gte.{value}"))
    }

    /// `column < value`.
    #[must_use]
    pub fn lt(self, column: &str, value: impl std::fmt::Display) -> Self {
        self.param(column, format!("lt.{value}"))
    }

    /// Order by `column`. A `relation.column` orders an embedded relation.
    #[must_use]
    pub fn order(self, column: &str, direction: SortOrder) -> Self {
        let (key, column) = match column.split_once('.') {
            Some((relation, column)) => (format!("{relation}.order"), column),
            None => ("order".to_string(), column),
        };
        self.param(&key, format!("{column}.{}", direction.suffix()))
    }

    /// Return at most `n` rows.
    #[must_use]
    pub fn limit(self, n: u32) -> Self {
        self.param("limit", n.to_string())
    }

    /// The rendered `(key, value)` query parameters, in insertion order.
    #[must_use]
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    fn param(mut self, key: &str, value: String) -> Self {
        self.params.push((key.to_string(), value));
        self
    }
}

/// Error body returned by PostgREST.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: Option<String>,
    message: Option<String>,
}

// =============================================================================
// RestStore
// =============================================================================

/// Client for the remote store's REST interface.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct RestStore {
    inner: Arc<RestStoreInner>,
}

struct RestStoreInner {
    client: reqwest::Client,
    base: Url,
}

impl RestStore {
    /// Create a new REST client.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::Config` if the endpoint URL or key cannot be used
    /// in a request, or `RemoteError::Http` if the HTTP client fails to build.
    pub fn new(config: &RemoteConfig) -> Result<Self, RemoteError> {
        let raw_url = config
            .url
            .as_deref()
            .ok_or_else(|| RemoteError::Config("endpoint URL is not set".to_string()))?;
        let base = rest_base(raw_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(key) = &config.anon_key {
            let key = key.expose_secret();
            let mut api_key = HeaderValue::from_str(key)
                .map_err(|e| RemoteError::Config(format!("invalid access key: {e}")))?;
            api_key.set_sensitive(true);
            let mut bearer = HeaderValue::from_str(&format!("Bearer {key}"))
                .map_err(|e| RemoteError::Config(format!("invalid access key: {e}")))?;
            bearer.set_sensitive(true);
            headers.insert("apikey", api_key);
            headers.insert(AUTHORIZATION, bearer);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(RestStoreInner { client, base }),
        })
    }

    fn table_url(&self, table: Table) -> Result<Url, RemoteError> {
        self.inner
            .base
            .join(table.name())
            .map_err(|e| RemoteError::Config(format!("invalid table URL: {e}")))
    }

    /// Execute a GET for `query`.
    pub(crate) async fn select<T: DeserializeOwned>(
        &self,
        query: &Query,
    ) -> Result<Vec<T>, RemoteError> {
        let mut url = self.table_url(query.table)?;
        url.query_pairs_mut().extend_pairs(query.params());
        debug!(%url, "select");
        let response = self.inner.client.get(url).send().await?;
        Self::handle_response(response).await
    }

    /// POST `body` (an object or an array of objects) into `table`.
    pub(crate) async fn insert<T: DeserializeOwned, B: serde::Serialize + Sync + ?Sized>(
        &self,
        table: Table,
        body: &B,
    ) -> Result<Vec<T>, RemoteError> {
        let url = self.table_url(table)?;
        let response = self
            .inner
            .client
            .post(url)
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// PATCH the row of `table` whose `id` is `id`.
    pub(crate) async fn update<T: DeserializeOwned, B: serde::Serialize + Sync + ?Sized>(
        &self,
        table: Table,
        id: &str,
        patch: &B,
    ) -> Result<Vec<T>, RemoteError> {
        let mut url = self.table_url(table)?;
        url.query_pairs_mut().append_pair("id", &format!("eq.{id}"));
        let response = self
            .inner
            .client
            .patch(url)
            .header("Prefer", "return=representation")
            .json(patch)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// Handle API response and parse JSON.
    async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, RemoteError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(parse_error(status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse remote store response"
            );
            RemoteError::Parse(e.to_string())
        })
    }
}

impl std::fmt::Debug for RestStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestStore")
            .field("base", &self.inner.base.as_str())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl RemoteStore for RestStore {
    #[instrument(skip(self))]
    async fn probe(&self) -> Result<(), RemoteError> {
        let query = Query::table(Table::Categories).select("id").limit(1);
        self.select::<serde_json::Value>(&query).await.map(|_| ())
    }

    #[instrument(skip(self))]
    async fn fetch_menu(&self) -> Result<Vec<CategoryRow>, RemoteError> {
        self.select(&menu_query()).await
    }

    #[instrument(skip(self))]
    async fn fetch_categories(&self) -> Result<Vec<CategoryRow>, RemoteError> {
        let query = Query::table(Table::Categories)
            .select(CATEGORY_SELECT)
            .eq("is_active", true)
            .order("display_order", SortOrder::Asc);
        self.select(&query).await
    }

    #[instrument(skip(self, order), fields(total = %order.total_amount))]
    async fn insert_order(&self, order: &NewOrderRow) -> Result<OrderRow, RemoteError> {
        let rows: Vec<OrderRow> = self.insert(Table::Orders, order).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| RemoteError::Parse("insert returned no order row".to_string()))
    }

    #[instrument(skip(self, items), fields(count = items.len()))]
    async fn insert_order_items(
        &self,
        items: &[NewOrderItemRow],
    ) -> Result<Vec<OrderItemRow>, RemoteError> {
        self.insert(Table::OrderItems, items).await
    }

    #[instrument(skip(self), fields(order_id = %id))]
    async fn fetch_order(&self, id: &OrderId) -> Result<OrderRow, RemoteError> {
        let query = Query::table(Table::Orders)
            .select(ORDER_SELECT)
            .eq("id", id);
        let rows: Vec<OrderRow> = self.select(&query).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| RemoteError::NotFound(format!("order {id}")))
    }

    #[instrument(skip(self), fields(order_id = %id, status = %status))]
    async fn update_order_status(
        &self,
        id: &OrderId,
        status: &OrderStatus,
    ) -> Result<OrderRow, RemoteError> {
        let patch = serde_json::json!({ "status": status.as_str() });
        let rows: Vec<OrderRow> = self.update(Table::Orders, id.as_str(), &patch).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| RemoteError::NotFound(format!("order {id}")))
    }

    #[instrument(skip(self))]
    async fn list_orders(&self, filter: &OrderFilter) -> Result<Vec<OrderRow>, RemoteError> {
        self.select(&orders_query(filter)?).await
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// `<project url>/rest/v1/`, tolerating a trailing slash on the project URL.
fn rest_base(raw: &str) -> Result<Url, RemoteError> {
    let mut project = raw.trim_end_matches('/').to_string();
    project.push('/');
    Url::parse(&project)
        .and_then(|url| url.join(REST_PATH))
        .map_err(|e| RemoteError::Config(format!("invalid endpoint URL '{raw}': {e}")))
}

/// Active categories with their available dishes, both in display order.
fn menu_query() -> Query {
    Query::table(Table::Categories)
        .select(MENU_SELECT)
        .eq("is_active", true)
        .eq("dishes.is_available", true)
        .order("display_order", SortOrder::Asc)
        .order("dishes.display_order", SortOrder::Asc)
}

fn orders_query(filter: &OrderFilter) -> Result<Query, RemoteError> {
    let mut query = Query::table(Table::Orders)
        .select(ORDER_SELECT)
        .order("created_at", SortOrder::Desc);
    if let Some(status) = &filter.status {
        query = query.eq("status", status);
    }
    if let Some(day) = filter.day {
        let (start, end) = day_bounds(day)?;
        query = query.gte("created_at", start).lt("created_at", end);
    }
    Ok(query)
}

/// `[day 00:00Z, next day 00:00Z)` as RFC 3339 strings.
fn day_bounds(day: NaiveDate) -> Result<(String, String), RemoteError> {
    let next = day
        .checked_add_days(Days::new(1))
        .ok_or_else(|| RemoteError::Config(format!("date out of range: {day}")))?;
    Ok((
        format!("{}T00:00:00Z", day.format("%Y-%m-%d")),
        format!("{}T00:00:00Z", next.format("%Y-%m-%d")),
    ))
}

/// Build an error from a non-success response body.
fn parse_error(status: u16, body: &str) -> RemoteError {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => RemoteError::Api {
            status,
            code: parsed.code,
            message: parsed.message.unwrap_or_else(|| body.to_string()),
        },
        Err(_) => RemoteError::Api {
            status,
            code: None,
            message: body.chars().take(200).collect(),
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use secrecy::SecretString;

    use super::*;

    fn pairs(query: &Query) -> Vec<(&str, &str)> {
        query
            .params()
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }

    #[test]
    fn test_menu_query_filters_and_orders_embedded_dishes() {
        let query = menu_query();
        let params = pairs(&query);
        assert_eq!(params[0], ("select", MENU_SELECT));
        assert!(params.contains(&("is_active", "eq.true")));
        assert!(params.contains(&("dishes.is_available", "eq.true")));
        assert!(params.contains(&("order", "display_order.asc")));
        assert!(params.contains(&("dishes.order", "display_order.asc")));
    }

    #[test]
    fn test_orders_query_with_day_and_status() {
        let filter = OrderFilter {
            status: Some(OrderStatus::Ready),
            day: NaiveDate::from_ymd_opt(2026, 10, 18),
        };
        let query = orders_query(&filter).unwrap();
        let params = pairs(&query);
        assert!(params.contains(&("order", "created_at.desc")));
        assert!(params.contains(&("status", "eq.ready")));
        assert!(params.contains(&("created_at", "gte.2026-10-18T00:00:00Z")));
        assert!(params.contains(&("created_at", "lt.2026-10-19T00:00:00Z")));
    }

    #[test]
    fn test_orders_query_without_filters() {
        let query = orders_query(&OrderFilter::default()).unwrap();
        let keys: Vec<_> = pairs(&query).into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["select", "order"]);
    }

    #[test]
    fn test_day_bounds_cross_month() {
        let (start, end) = day_bounds(NaiveDate::from_ymd_opt(2026, 1, 31).unwrap()).unwrap();
        assert_eq!(start, "2026-01-31T00:00:00Z");
        assert_eq!(end, "2026-02-01T00:00:00Z");
    }

    #[test]
    fn test_rest_base_handles_trailing_slash() {
        assert_eq!(
            rest_base("https://qwzhtkrbplmn.supabase.co").unwrap().as_str(),
            "https://qwzhtkrbplmn.supabase.co/rest/v1/"
        );
        assert_eq!(
            rest_base("https://qwzhtkrbplmn.supabase.co/").unwrap().as_str(),
            "https://qwzhtkrbplmn.supabase.co/rest/v1/"
        );
        assert!(rest_base("not a url").is_err());
    }

    #[test]
    fn test_parse_error_reads_postgrest_body() {
        let err = parse_error(
            404,
            r#"{"code":"42P01","details":null,"hint":null,"message":"relation \"public.categories\" does not exist"}"#,
        );
        assert!(err.is_relation_missing());
        assert!(matches!(err, RemoteError::Api { status: 404, .. }));
    }

    #[test]
    fn test_parse_error_falls_back_to_raw_body() {
        let err = parse_error(502, "Bad Gateway");
        match err {
            RemoteError::Api { code, message, .. } => {
                assert!(code.is_none());
                assert_eq!(message, "Bad Gateway");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_new_requires_url() {
        let config = RemoteConfig {
            url: None,
            anon_key: Some(SecretString::from("key")),
            timeout: Duration::from_secs(1),
        };
        assert!(matches!(
            RestStore::new(&config),
            Err(RemoteError::Config(_))
        ));
    }

    #[test]
    fn test_new_rejects_key_with_newline() {
        let config = RemoteConfig {
            url: Some("https://qwzhtkrbplmn.supabase.co".to_string()),
            anon_key: Some(SecretString::from("bad\nkey")),
            timeout: Duration::from_secs(1),
        };
        assert!(matches!(
            RestStore::new(&config),
            Err(RemoteError::Config(_))
        ));
    }

    #[test]
    fn test_debug_does_not_leak_key() {
        let config = RemoteConfig {
            url: Some("https://qwzhtkrbplmn.supabase.co".to_string()),
            anon_key: Some(SecretString::from("super_secret_anon_key")),
            timeout: Duration::from_secs(1),
        };
        let store = RestStore::new(&config).unwrap();
        let debug_output = format!("{store:?}");
        assert!(debug_output.contains("rest/v1"));
        assert!(!debug_output.contains("super_secret_anon_key"));
    }
}
