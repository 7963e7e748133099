//! HTTP client types for the hosted backend.
//!
//! This module provides the HTTP layer shared by the auth service client and
//! the data API client: request building, response parsing, retry handling and
//! error extraction from the backend's JSON error bodies.
//!
//! # Overview
//!
//! - [`HttpClient`]: The async HTTP client bound to one base URL
//! - [`HttpRequest`]: A request to be sent, built with [`HttpRequest::builder`]
//! - [`HttpResponse`]: A parsed response
//! - [`HttpMethod`]: Supported HTTP methods (GET, POST, PATCH, DELETE)
//! - [`rest::RestClient`]: Typed access to the hosted tables
//!
//! # Retry Behavior
//!
//! - **429 (Rate Limited)**: Retries using `Retry-After`, or 1 second if not present
//! - **5xx (Server Error)**: Retries with a fixed 1-second delay
//! - **Other errors (4xx)**: Returned immediately
//!
//! The default `tries` is 1, meaning no automatic retries. Auth calls never
//! opt in; the caller decides whether to resubmit a form.

mod errors;
mod http_client;
mod http_request;
mod http_response;
pub mod rest;

pub use errors::{
    HttpError, HttpResponseError, InvalidHttpRequestError, MaxHttpRetriesExceededError,
};
pub use http_client::{HttpClient, SDK_VERSION};
pub use http_request::{HttpMethod, HttpRequest, HttpRequestBuilder};
pub use http_response::HttpResponse;

pub use rest::{RestClient, RestError};
