//! HTTP response types for the portal client.

use std::collections::HashMap;

/// Headers that may carry a request id for error reports.
const REQUEST_ID_HEADERS: [&str; 2] = ["x-request-id", "sb-request-id"];

/// A parsed response from the auth service or the data API.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers, keyed by lowercased name.
    pub headers: HashMap<String, Vec<String>>,
    /// Parsed JSON body. Empty bodies become `{}`.
    pub body: serde_json::Value,
    /// Seconds to wait before retrying, from the `Retry-After` header.
    pub retry_request_after: Option<f64>,
}

impl HttpResponse {
    /// Creates a response and extracts the retry hint from the headers.
    #[must_use]
    pub fn new(code: u16, headers: HashMap<String, Vec<String>>, body: serde_json::Value) -> Self {
        let retry_request_after = headers
            .get("retry-after")
            .and_then(|values| values.first())
            .and_then(|value| value.trim().parse::<f64>().ok());

        Self {
            code,
            headers,
            body,
            retry_request_after,
        }
    }

    /// Returns `true` for 2xx status codes.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code < 300
    }

    /// Returns the first value of a header.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the request id reported by the backend, if any.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        REQUEST_ID_HEADERS
            .iter()
            .find_map(|name| self.header(name))
    }

    /// Returns the human readable error message from an error body.
    ///
    /// The auth service uses `msg` or `error_description`, the data API uses
    /// `message`; plain `error` strings are the fallback.
    #[must_use]
    pub fn error_message(&self) -> String {
        ["msg", "message", "error_description", "error"]
            .iter()
            .find_map(|key| self.body.get(*key).and_then(serde_json::Value::as_str))
            .map_or_else(|| format!("Request failed with status {}", self.code), String::from)
    }

    /// Returns the machine readable error code from an error body.
    ///
    /// Checks `error_code` first, then a string `code` (the data API uses
    /// Postgres codes such as `23505`), then a string `error` such as
    /// `invalid_grant`.
    #[must_use]
    pub fn error_code(&self) -> Option<String> {
        ["error_code", "code", "error"]
            .iter()
            .find_map(|key| self.body.get(*key).and_then(serde_json::Value::as_str))
            .map(String::from)
    }
}
