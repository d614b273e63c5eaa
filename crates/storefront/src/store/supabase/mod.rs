//! Supabase PostgREST client.
//!
//! Talks to `/rest/v1/<table>` with the project API key sent both as the
//! `apikey` header and as a bearer token. Filters use PostgREST operators
//! (`eq.`, `in.(..)`, `is.true`) and ordering uses `order=created_at.desc`.

mod conversions;

pub use conversions::ProductRow;

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use uphaar_core::{Brand, NewOrder, OrderId, OrderRecord, OrderStatus, Product, ProductId, UserId};

use super::{OrderStore, ProductStore, Profile, ProfileStore, StoreError};
use crate::config::SupabaseConfig;
use conversions::convert_products;

const PRODUCTS: &str = "products";
const ORDERS: &str = "orders";
const PROFILES: &str = "profiles";
const NEWEST_FIRST: &str = "created_at.desc";

// =============================================================================
// SupabaseClient
// =============================================================================

/// Client for a Supabase project's REST API.
#[derive(Clone)]
pub struct SupabaseClient {
    inner: Arc<SupabaseClientInner>,
}

struct SupabaseClientInner {
    client: reqwest::Client,
    rest_url: String,
}

impl SupabaseClient {
    /// Create a new Supabase client.
    ///
    /// # Errors
    ///
    /// Returns error if the API key is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &SupabaseConfig) -> Result<Self, StoreError> {
        let key = config.anon_key.expose_secret();
        let mut headers = HeaderMap::new();

        let mut api_key = HeaderValue::from_str(key).map_err(|e| StoreError::Api {
            status: 0,
            message: format!("Invalid API key format: {e}"),
        })?;
        api_key.set_sensitive(true);
        headers.insert("apikey", api_key);

        let mut bearer = HeaderValue::from_str(&format!("Bearer {key}")).map_err(|e| {
            StoreError::Api {
                status: 0,
                message: format!("Invalid API key format: {e}"),
            }
        })?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(SupabaseClientInner {
                client,
                rest_url: rest_url(&config.url),
            }),
        })
    }

    fn table_url(&self, table: &str, params: &[(&str, &str)]) -> Result<Url, StoreError> {
        let base = format!("{}/{table}", self.inner.rest_url);
        Ok(Url::parse_with_params(&base, params)?)
    }

    /// Run a `GET` and decode the row array.
    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        params: &[(&str, &str)],
    ) -> Result<Vec<T>, StoreError> {
        let url = self.table_url(table, params)?;
        debug!(%url, "PostgREST select");

        let response = self.inner.client.get(url).send().await?;
        decode(response).await
    }

    /// Run a write that returns the affected rows.
    async fn write<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        method: reqwest::Method,
        table: &str,
        params: &[(&str, &str)],
        body: &B,
    ) -> Result<Vec<T>, StoreError> {
        let url = self.table_url(table, params)?;
        debug!(%url, %method, "PostgREST write");

        let response = self
            .inner
            .client
            .request(method, url)
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await?;
        decode(response).await
    }
}

/// REST root for a project URL, without a trailing slash.
fn rest_url(project: &Url) -> String {
    format!("{}/rest/v1", project.as_str().trim_end_matches('/'))
}

/// Build a PostgREST `in.(..)` filter, quoting every value.
fn in_filter(ids: &[ProductId]) -> String {
    let quoted: Vec<String> = ids
        .iter()
        .map(|id| format!("\"{}\"", id.as_str().replace('\\', "\\\\").replace('"', "\\\"")))
        .collect();
    format!("in.({})", quoted.join(","))
}

/// Check the status and decode a JSON response body.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, StoreError> {
    let status = response.status();

    // Get response body as text first for better error diagnostics
    let body = response.text().await?;

    if !status.is_success() {
        tracing::error!(
            status = %status,
            body = %body.chars().take(500).collect::<String>(),
            "Supabase returned non-success status"
        );
        return Err(StoreError::Api {
            status: status.as_u16(),
            message: body.chars().take(200).collect(),
        });
    }

    serde_json::from_str(&body).map_err(|e| {
        tracing::error!(
            error = %e,
            body = %body.chars().take(500).collect::<String>(),
            "Failed to parse Supabase response"
        );
        StoreError::Parse(e)
    })
}

// =============================================================================
// Ports
// =============================================================================

#[async_trait]
impl ProductStore for SupabaseClient {
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn products_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let filter = in_filter(ids);
        let rows = self
            .select(PRODUCTS, &[("select", "*"), ("id", filter.as_str())])
            .await?;
        Ok(convert_products(rows))
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn product_by_id(&self, id: &ProductId) -> Result<Option<Product>, StoreError> {
        let filter = format!("eq.{id}");
        let rows: Vec<ProductRow> = self
            .select(PRODUCTS, &[("select", "*"), ("id", filter.as_str()), ("limit", "1")])
            .await?;
        Ok(rows.into_iter().next().map(Product::from))
    }

    #[instrument(skip(self), fields(brand = %brand))]
    async fn products_by_brand(&self, brand: Brand) -> Result<Vec<Product>, StoreError> {
        let filter = format!("eq.{brand}");
        let rows = self
            .select(
                PRODUCTS,
                &[("select", "*"), ("category", filter.as_str()), ("order", NEWEST_FIRST)],
            )
            .await?;
        Ok(convert_products(rows))
    }

    #[instrument(skip(self))]
    async fn featured_products(&self) -> Result<Vec<Product>, StoreError> {
        let rows = self
            .select(
                PRODUCTS,
                &[("select", "*"), ("featured", "is.true"), ("order", NEWEST_FIRST)],
            )
            .await?;
        Ok(convert_products(rows))
    }

    #[instrument(skip(self))]
    async fn all_products(&self) -> Result<Vec<Product>, StoreError> {
        let rows = self
            .select(PRODUCTS, &[("select", "*"), ("order", NEWEST_FIRST)])
            .await?;
        Ok(convert_products(rows))
    }
}

#[async_trait]
impl OrderStore for SupabaseClient {
    #[instrument(skip(self, order), fields(user_id = %order.user_id, items = order.items.len()))]
    async fn insert_order(&self, order: &NewOrder) -> Result<OrderRecord, StoreError> {
        let rows: Vec<OrderRecord> = self
            .write(reqwest::Method::POST, ORDERS, &[], order)
            .await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::NotFound("inserted order row".to_string()))
    }

    #[instrument(skip(self), fields(user_id = %user))]
    async fn orders_for_user(&self, user: &UserId) -> Result<Vec<OrderRecord>, StoreError> {
        let filter = format!("eq.{user}");
        self.select(
            ORDERS,
            &[("select", "*"), ("user_id", filter.as_str()), ("order", NEWEST_FIRST)],
        )
        .await
    }

    #[instrument(skip(self))]
    async fn all_orders(&self) -> Result<Vec<OrderRecord>, StoreError> {
        self.select(ORDERS, &[("select", "*"), ("order", NEWEST_FIRST)])
            .await
    }

    #[instrument(skip(self), fields(order_id = %id, status = %status))]
    async fn update_order_status(
        &self,
        id: &OrderId,
        status: &OrderStatus,
    ) -> Result<OrderRecord, StoreError> {
        let filter = format!("eq.{id}");
        let body = serde_json::json!({ "status": status });
        let rows: Vec<OrderRecord> = self
            .write(reqwest::Method::PATCH, ORDERS, &[("id", filter.as_str())], &body)
            .await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::NotFound(format!("order {id}")))
    }
}

#[async_trait]
impl ProfileStore for SupabaseClient {
    #[instrument(skip(self), fields(user_id = %user))]
    async fn profile(&self, user: &UserId) -> Result<Option<Profile>, StoreError> {
        let filter = format!("eq.{user}");
        let rows: Vec<Profile> = self
            .select(PROFILES, &[("select", "*"), ("id", filter.as_str()), ("limit", "1")])
            .await?;
        Ok(rows.into_iter().next())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn client(url: &str) -> SupabaseClient {
        SupabaseClient::new(&SupabaseConfig {
            url: Url::parse(url).unwrap(),
            anon_key: SecretString::from("eyJhbGciOiJIUzI1NiJ9.aB3xY9mK2nL5pQ7r"),
        })
        .unwrap()
    }

    #[test]
    fn test_rest_url_trims_trailing_slash() {
        let url = Url::parse("https://abcd.supabase.co/").unwrap();
        assert_eq!(rest_url(&url), "https://abcd.supabase.co/rest/v1");
    }

    #[test]
    fn test_in_filter_quotes_values() {
        let ids = [ProductId::new("up-01"), ProductId::new("a,b"), ProductId::new("q\"x")];
        assert_eq!(in_filter(&ids), r#"in.("up-01","a,b","q\"x")"#);
    }

    #[test]
    fn test_table_url_encodes_params() {
        let client = client("https://abcd.supabase.co");
        let url = client
            .table_url(PRODUCTS, &[("select", "*"), ("id", "in.(\"up-01\")")])
            .unwrap();
        assert_eq!(url.path(), "/rest/v1/products");
        let id = url.query_pairs().find(|(k, _)| k == "id").unwrap().1;
        assert_eq!(id, "in.(\"up-01\")");
    }

    #[test]
    fn test_rejects_unprintable_key() {
        let result = SupabaseClient::new(&SupabaseConfig {
            url: Url::parse("https://abcd.supabase.co").unwrap(),
            anon_key: SecretString::from("bad\nkey"),
        });
        assert!(result.is_err());
    }
}
