//! Data API client implementation.
//!
//! This module provides the [`RestClient`] type for reading and writing rows
//! of the hosted tables.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::clients::rest::{Filter, RestError, TableQuery};
use crate::clients::{HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse};
use crate::config::PortalConfig;

/// `Prefer` header asking the data API to echo written rows back.
const RETURN_REPRESENTATION: &str = "return=representation";

/// `Prefer` header asking the data API not to echo written rows.
const RETURN_MINIMAL: &str = "return=minimal";

/// Client for the data API under `{project_url}/rest/v1`.
///
/// Every call takes the caller's access token; `None` falls back to the anon
/// key, which row level security treats as an anonymous visitor.
///
/// # Thread Safety
///
/// `RestClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use technexus_portal::clients::rest::{Order, RestClient, TableQuery};
/// use technexus_portal::store::Product;
///
/// let client = RestClient::new(&config)?;
/// let query = TableQuery::new("products")
///     .eq("is_active", true)
///     .order("created_at", Order::Descending);
/// let products: Vec<Product> = client.select(&query, None).await?;
/// ```
#[derive(Debug, Clone)]
pub struct RestClient {
    http_client: HttpClient,
}

// Verify RestClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RestClient>();
};

impl RestClient {
    /// Creates a new data API client.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::Http`] if the HTTP client cannot be created.
    pub fn new(config: &PortalConfig) -> Result<Self, RestError> {
        let http_client = HttpClient::new(config.project_url().rest_url(), config)?;
        Ok(Self { http_client })
    }

    /// Returns the base URL of the data API.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.http_client.base_url()
    }

    /// Reads the rows matching `query`.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::InvalidTable`] for a bad table name,
    /// [`RestError::Decode`] when rows do not match `T`, and
    /// [`RestError::Http`] for HTTP-level errors.
    pub async fn select<T: DeserializeOwned>(
        &self,
        query: &TableQuery,
        access_token: Option<&str>,
    ) -> Result<Vec<T>, RestError> {
        let table = validate_table(query.table())?;
        let request = HttpRequest::builder(HttpMethod::Get, table)
            .query_params(query.to_params())
            .build()
            .map_err(HttpError::from)?;

        let response = self.http_client.request(request, access_token).await?;
        decode_rows(table, response)
    }

    /// Inserts rows and returns them as stored.
    ///
    /// `rows` may be a single record or a slice of records.
    ///
    /// # Errors
    ///
    /// See [`RestClient::select`].
    pub async fn insert<B, T>(
        &self,
        table: &str,
        rows: &B,
        access_token: Option<&str>,
    ) -> Result<Vec<T>, RestError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let table = validate_table(table)?;
        let body = encode_body(table, rows)?;
        let request = HttpRequest::builder(HttpMethod::Post, table)
            .body(body)
            .header("Prefer", RETURN_REPRESENTATION)
            .build()
            .map_err(HttpError::from)?;

        let response = self.http_client.request(request, access_token).await?;
        decode_rows(table, response)
    }

    /// Inserts rows without reading them back.
    ///
    /// Use this for tables the caller may write but not read, such as the
    /// contact form inbox for anonymous visitors.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::InvalidTable`] for a bad table name and
    /// [`RestError::Http`] for HTTP-level errors.
    pub async fn insert_only<B>(
        &self,
        table: &str,
        rows: &B,
        access_token: Option<&str>,
    ) -> Result<(), RestError>
    where
        B: Serialize + ?Sized,
    {
        let table = validate_table(table)?;
        let body = encode_body(table, rows)?;
        let request = HttpRequest::builder(HttpMethod::Post, table)
            .body(body)
            .header("Prefer", RETURN_MINIMAL)
            .build()
            .map_err(HttpError::from)?;

        self.http_client.request(request, access_token).await?;
        Ok(())
    }

    /// Applies `patch` to the rows matching `filters` and returns them.
    ///
    /// # Errors
    ///
    /// See [`RestClient::select`].
    pub async fn update<B, T>(
        &self,
        table: &str,
        filters: &[Filter],
        patch: &B,
        access_token: Option<&str>,
    ) -> Result<Vec<T>, RestError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let table = validate_table(table)?;
        let body = encode_body(table, patch)?;
        let request = HttpRequest::builder(HttpMethod::Patch, table)
            .query_params(filters.iter().map(Filter::to_param))
            .body(body)
            .header("Prefer", RETURN_REPRESENTATION)
            .build()
            .map_err(HttpError::from)?;

        let response = self.http_client.request(request, access_token).await?;
        decode_rows(table, response)
    }

    /// Deletes the rows matching `filters`.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::InvalidTable`] for a bad table name and
    /// [`RestError::Http`] for HTTP-level errors.
    pub async fn delete(
        &self,
        table: &str,
        filters: &[Filter],
        access_token: Option<&str>,
    ) -> Result<(), RestError> {
        let table = validate_table(table)?;
        let request = HttpRequest::builder(HttpMethod::Delete, table)
            .query_params(filters.iter().map(Filter::to_param))
            .build()
            .map_err(HttpError::from)?;

        self.http_client.request(request, access_token).await?;
        Ok(())
    }
}

/// Accepts lowercase ASCII identifiers only.
fn validate_table(table: &str) -> Result<&str, RestError> {
    let valid = !table.is_empty()
        && table
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if valid {
        Ok(table)
    } else {
        Err(RestError::InvalidTable {
            table: table.to_string(),
        })
    }
}

fn encode_body<B: Serialize + ?Sized>(table: &str, body: &B) -> Result<serde_json::Value, RestError> {
    serde_json::to_value(body).map_err(|e| RestError::Decode {
        table: table.to_string(),
        message: e.to_string(),
    })
}

fn decode_rows<T: DeserializeOwned>(table: &str, response: HttpResponse) -> Result<Vec<T>, RestError> {
    // A single object comes back when the table returns one representation
    let body = match response.body {
        serde_json::Value::Array(rows) => serde_json::Value::Array(rows),
        serde_json::Value::Object(map) if map.is_empty() => serde_json::Value::Array(Vec::new()),
        other => serde_json::Value::Array(vec![other]),
    };

    serde_json::from_value(body).map_err(|e| RestError::Decode {
        table: table.to_string(),
        message: e.to_string(),
    })
}
