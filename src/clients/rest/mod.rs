//! Data API client for the hosted tables.
//!
//! This module provides a typed client built on top of the
//! [`HttpClient`](crate::clients::HttpClient) for the row-oriented data API
//! under `{project_url}/rest/v1`.
//!
//! # Overview
//!
//! - [`RestClient`]: `select`, `insert`, `update` and `delete` over typed rows
//! - [`TableQuery`]: Read query builder (columns, equality filters, order, limit)
//! - [`Filter`]: Equality filter used to target updates and deletes
//! - [`RestError`]: Error type for data API operations

mod client;
mod errors;
mod query;

pub use client::RestClient;
pub use errors::RestError;
pub use query::{Filter, Order, TableQuery};
