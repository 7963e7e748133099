//! HTTP client for the hosted backend.
//!
//! This module provides the [`HttpClient`] type shared by the auth service
//! client and the data API client.

use std::collections::HashMap;
use std::time::Duration;

use crate::clients::errors::{HttpError, HttpResponseError, MaxHttpRetriesExceededError};
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;
use crate::config::PortalConfig;

/// Fixed retry wait time in seconds when no `Retry-After` is given.
pub const RETRY_WAIT_TIME: u64 = 1;

/// Crate version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP client bound to one base URL of the backend project.
///
/// The client handles:
/// - URL construction from the base URL and request path
/// - Default headers: User-Agent, Accept and the `apikey` header
/// - The bearer token: the caller's access token, or the anon key
/// - Retry logic for 429 and 5xx responses when the request allows it
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use technexus_portal::clients::{HttpClient, HttpRequest, HttpMethod};
///
/// let client = HttpClient::new(config.project_url().rest_url(), &config)?;
/// let request = HttpRequest::builder(HttpMethod::Get, "products")
///     .query_param("select", "*")
///     .build()?;
/// let response = client.request(request, None).await?;
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
    anon_key: String,
    default_headers: HashMap<String, String>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the underlying reqwest client cannot
    /// be created (e.g., TLS initialization failure).
    pub fn new(base_url: impl Into<String>, config: &PortalConfig) -> Result<Self, HttpError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent =
            format!("{user_agent_prefix}Technexus Portal Client v{SDK_VERSION} | Rust {rust_version}");

        let anon_key = config.anon_key().as_ref().to_string();

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());
        default_headers.insert("apikey".to_string(), anon_key.clone());

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            base_url,
            anon_key,
            default_headers,
        })
    }

    /// Returns the base URL for this client.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Sends a request, authenticating with `access_token` or the anon key.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if:
    /// - Request validation fails (`InvalidRequest`)
    /// - Network error occurs (`Network`)
    /// - Non-2xx response received (`Response`)
    /// - Max retries exceeded (`MaxRetries`)
    pub async fn request(
        &self,
        request: HttpRequest,
        access_token: Option<&str>,
    ) -> Result<HttpResponse, HttpError> {
        request.verify()?;

        let url = if request.path.is_empty() {
            self.base_url.clone()
        } else {
            format!("{}/{}", self.base_url, request.path.trim_start_matches('/'))
        };

        let mut headers = self.default_headers.clone();
        let bearer = access_token.unwrap_or(&self.anon_key);
        headers.insert("Authorization".to_string(), format!("Bearer {bearer}"));
        if request.body.is_some() {
            headers.insert("Content-Type".to_string(), "application/json".to_string());
        }
        for (key, value) in &request.extra_headers {
            headers.insert(key.clone(), value.clone());
        }

        let mut tries: u32 = 0;
        loop {
            tries += 1;

            let mut req_builder = match request.http_method {
                HttpMethod::Get => self.client.get(&url),
                HttpMethod::Post => self.client.post(&url),
                HttpMethod::Patch => self.client.patch(&url),
                HttpMethod::Delete => self.client.delete(&url),
            };

            for (key, value) in &headers {
                req_builder = req_builder.header(key, value);
            }

            if !request.query.is_empty() {
                req_builder = req_builder.query(&request.query);
            }

            if let Some(body) = &request.body {
                req_builder = req_builder.body(body.to_string());
            }

            tracing::trace!(method = %request.http_method, url = %url, tries, "sending request");
            let res = req_builder.send().await?;

            let code = res.status().as_u16();
            let res_headers = Self::parse_response_headers(res.headers());
            let body_text = res.text().await.unwrap_or_default();

            let body = if body_text.trim().is_empty() {
                serde_json::json!({})
            } else {
                serde_json::from_str(&body_text).unwrap_or_else(|_| {
                    if code >= 500 {
                        serde_json::json!({ "message": body_text })
                    } else {
                        serde_json::json!({})
                    }
                })
            };

            let response = HttpResponse::new(code, res_headers, body);

            if response.is_ok() {
                return Ok(response);
            }

            let message = response.error_message();
            let error_reference = response.request_id().map(String::from);

            let should_retry = code == 429 || code >= 500;
            if !should_retry || request.tries == 1 {
                return Err(HttpError::Response(HttpResponseError {
                    code,
                    message,
                    error_code: response.error_code(),
                    error_reference,
                }));
            }

            if tries >= request.tries {
                return Err(HttpError::MaxRetries(MaxHttpRetriesExceededError {
                    code,
                    tries: request.tries,
                    message,
                    error_reference,
                }));
            }

            let delay = Self::calculate_retry_delay(&response, code);
            tracing::debug!(
                "Retrying {} {} after {:?} (status {}, attempt {} of {})",
                request.http_method,
                request.path,
                delay,
                code,
                tries,
                request.tries
            );
            tokio::time::sleep(delay).await;
        }
    }

    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }

    // 429 honours Retry-After; 5xx always waits the fixed delay
    fn calculate_retry_delay(response: &HttpResponse, status: u16) -> Duration {
        if status == 429 {
            if let Some(retry_after) = response.retry_request_after {
                if retry_after.is_finite() && retry_after >= 0.0 {
                    return Duration::from_secs_f64(retry_after);
                }
            }
        }
        Duration::from_secs(RETRY_WAIT_TIME)
    }
}
