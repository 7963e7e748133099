//! Query builder for the data API.
//!
//! Filters use the `column=op.value` convention and ordering uses
//! `order=column.asc|desc`.

use std::fmt;

/// Sort direction for [`TableQuery::order`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Order {
    /// Oldest or smallest first.
    Ascending,
    /// Newest or largest first.
    Descending,
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascending => f.write_str("asc"),
            Self::Descending => f.write_str("desc"),
        }
    }
}

/// A single `column=eq.value` filter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Filter {
    /// The column being compared.
    pub column: String,
    /// The value it must equal.
    pub value: String,
}

impl Filter {
    /// Creates an equality filter.
    #[must_use]
    pub fn eq(column: impl Into<String>, value: impl ToString) -> Self {
        Self {
            column: column.into(),
            value: value.to_string(),
        }
    }

    /// Returns the filter as a query parameter pair.
    #[must_use]
    pub fn to_param(&self) -> (String, String) {
        (self.column.clone(), format!("eq.{}", self.value))
    }
}

/// A read query against one table.
///
/// # Example
///
/// ```rust
/// use technexus_portal::clients::rest::{Order, TableQuery};
///
/// let query = TableQuery::new("products")
///     .select("*")
///     .eq("is_active", true)
///     .order("created_at", Order::Descending);
///
/// assert_eq!(query.table(), "products");
/// assert_eq!(
///     query.to_params(),
///     vec![
///         ("select".to_string(), "*".to_string()),
///         ("is_active".to_string(), "eq.true".to_string()),
///         ("order".to_string(), "created_at.desc".to_string()),
///     ]
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableQuery {
    table: String,
    select: String,
    filters: Vec<Filter>,
    order: Option<(String, Order)>,
    limit: Option<u32>,
}

impl TableQuery {
    /// Starts a query selecting every column of `table`.
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            select: "*".to_string(),
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    /// Sets the column list, including embedded relations such as
    /// `*, products(*)`.
    #[must_use]
    pub fn select(mut self, columns: impl Into<String>) -> Self {
        self.select = columns.into();
        self
    }

    /// Adds an equality filter.
    #[must_use]
    pub fn eq(mut self, column: impl Into<String>, value: impl ToString) -> Self {
        self.filters.push(Filter::eq(column, value));
        self
    }

    /// Sets the sort column and direction.
    #[must_use]
    pub fn order(mut self, column: impl Into<String>, direction: Order) -> Self {
        self.order = Some((column.into(), direction));
        self
    }

    /// Limits the number of rows returned.
    #[must_use]
    pub const fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Returns the table name.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Returns the filters in insertion order.
    #[must_use]
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// Renders the query parameters in a stable order.
    #[must_use]
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("select".to_string(), self.select.replace(' ', ""))];
        params.extend(self.filters.iter().map(Filter::to_param));
        if let Some((column, direction)) = &self.order {
            params.push(("order".to_string(), format!("{column}.{direction}")));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        params
    }
}
