//! Persistence collaborator boundary.
//!
//! The backend is a REST service exposing logical tables. The
//! [`Backend`] trait keeps the orchestrator independent of the HTTP
//! client; typed repositories wrap it per table.

pub mod player_repo;
pub mod report_repo;
pub mod rest;
pub mod session_repo;
pub mod temp_channel_repo;

use serde_json::Value;

use crate::platform::BoxFuture;

/// Column predicates rendered as `column=op.value` query pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter(Vec<(String, String)>);

impl Filter {
    /// Match every row.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Start a filter with an equality predicate.
    #[must_use]
    pub fn eq(column: &str, value: impl std::fmt::Display) -> Self {
        Self::all().and_eq(column, value)
    }

    /// Add an equality predicate.
    #[must_use]
    pub fn and_eq(mut self, column: &str, value: impl std::fmt::Display) -> Self {
        self.0.push((column.to_owned(), format!("eq.{value}")));
        self
    }

    /// Add a strictly-less-than predicate.
    #[must_use]
    pub fn and_lt(mut self, column: &str, value: impl std::fmt::Display) -> Self {
        self.0.push((column.to_owned(), format!("lt.{value}")));
        self
    }

    /// Query pairs in insertion order.
    #[must_use]
    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }
}

/// CRUD operations against the backend's logical tables.
///
/// Each call is one independent request; there is no transaction scope
/// spanning several calls.
pub trait Backend: Send + Sync {
    /// Insert one row and return the stored representation.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`](crate::AppError::Persistence) on failure.
    fn insert<'a>(&'a self, table: &'a str, row: Value) -> BoxFuture<'a, Vec<Value>>;

    /// Select rows matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`](crate::AppError::Persistence) on failure.
    fn select<'a>(&'a self, table: &'a str, filter: Filter) -> BoxFuture<'a, Vec<Value>>;

    /// Patch rows matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`](crate::AppError::Persistence) on failure.
    fn update<'a>(&'a self, table: &'a str, filter: Filter, patch: Value)
        -> BoxFuture<'a, Vec<Value>>;

    /// Delete rows matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`](crate::AppError::Persistence) on failure.
    fn delete<'a>(&'a self, table: &'a str, filter: Filter) -> BoxFuture<'a, ()>;
}
