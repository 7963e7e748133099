//! HTTP request types for the portal client.
//!
//! This module provides the [`HttpRequest`] type and its builder for
//! constructing requests to the auth service and the data API.

use std::collections::HashMap;
use std::fmt;

use crate::clients::errors::InvalidHttpRequestError;

/// HTTP methods used by the auth service and the data API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    /// HTTP GET method for reading rows or the current user.
    Get,
    /// HTTP POST method for auth calls and row inserts.
    Post,
    /// HTTP PATCH method for row updates.
    Patch,
    /// HTTP DELETE method for row deletes.
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "get"),
            Self::Post => write!(f, "post"),
            Self::Patch => write!(f, "patch"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// An HTTP request relative to a client's base URL.
///
/// Bodies are always sent as JSON. Query parameters keep their insertion
/// order and may repeat, which filter expressions rely on.
///
/// # Example
///
/// ```rust
/// use technexus_portal::clients::{HttpRequest, HttpMethod};
/// use serde_json::json;
///
/// let request = HttpRequest::builder(HttpMethod::Post, "token")
///     .query_param("grant_type", "password")
///     .body(json!({"email": "user@example.com", "password": "secret"}))
///     .build()
///     .unwrap();
///
/// assert_eq!(request.path, "token");
/// assert_eq!(request.query, vec![("grant_type".to_string(), "password".to_string())]);
/// ```
#[derive(Clone, Debug)]
pub struct HttpRequest {
    /// The HTTP method for this request.
    pub http_method: HttpMethod,
    /// The path (relative to the client base URL) for this request.
    pub path: String,
    /// The JSON request body, if any.
    pub body: Option<serde_json::Value>,
    /// Query parameters, in order.
    pub query: Vec<(String, String)>,
    /// Additional headers to include in the request.
    pub extra_headers: HashMap<String, String>,
    /// Number of times to attempt the request (default: 1, see
    /// [`HttpRequestBuilder::tries`]).
    pub tries: u32,
}

impl HttpRequest {
    /// Creates a new builder for constructing an `HttpRequest`.
    #[must_use]
    pub fn builder(method: HttpMethod, path: impl Into<String>) -> HttpRequestBuilder {
        HttpRequestBuilder::new(method, path)
    }

    /// Validates the request, ensuring it meets all requirements.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if:
    /// - `http_method` is `Post` or `Patch` but `body` is `None`
    /// - `tries` is zero
    pub fn verify(&self) -> Result<(), InvalidHttpRequestError> {
        if matches!(self.http_method, HttpMethod::Post | HttpMethod::Patch) && self.body.is_none()
        {
            return Err(InvalidHttpRequestError::MissingBody {
                method: self.http_method.to_string(),
            });
        }

        if self.tries == 0 {
            return Err(InvalidHttpRequestError::ZeroTries);
        }

        Ok(())
    }
}

/// Builder for constructing [`HttpRequest`] instances.
#[derive(Debug)]
pub struct HttpRequestBuilder {
    http_method: HttpMethod,
    path: String,
    body: Option<serde_json::Value>,
    query: Vec<(String, String)>,
    extra_headers: HashMap<String, String>,
    tries: u32,
}

impl HttpRequestBuilder {
    fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            http_method: method,
            path: path.into(),
            body: None,
            query: Vec::new(),
            extra_headers: HashMap::new(),
            tries: 1,
        }
    }

    /// Sets the JSON request body.
    #[must_use]
    pub fn body(mut self, body: impl Into<serde_json::Value>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Appends a query parameter.
    #[must_use]
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Appends several query parameters.
    #[must_use]
    pub fn query_params<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Adds a single extra header.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.insert(key.into(), value.into());
        self
    }

    /// Sets the number of attempts for 429 and 5xx responses.
    ///
    /// The auth client, [`RestClient`](crate::RestClient) and the portal
    /// always send a single attempt. Callers that build their own idempotent
    /// requests for [`HttpClient::request`](crate::clients::HttpClient::request)
    /// opt in here. A 429 waits for its `Retry-After`.
    ///
    /// ```
    /// use technexus_portal::clients::{HttpMethod, HttpRequest};
    ///
    /// let request = HttpRequest::builder(HttpMethod::Get, "products")
    ///     .query_param("select", "*")
    ///     .tries(3)
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(request.tries, 3);
    /// ```
    #[must_use]
    pub const fn tries(mut self, tries: u32) -> Self {
        self.tries = tries;
        self
    }

    /// Builds and validates the request.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if validation fails.
    pub fn build(self) -> Result<HttpRequest, InvalidHttpRequestError> {
        let request = HttpRequest {
            http_method: self.http_method,
            path: self.path,
            body: self.body,
            query: self.query,
            extra_headers: self.extra_headers,
            tries: self.tries,
        };
        request.verify()?;
        Ok(request)
    }
}
