//! Database client trait for catalog introspection.
//!
//! Keeps the introspection queries independent of how the caller obtained its
//! connection.

use crate::error::{LintError, LintResult};
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

/// A trait for types that can run read-only catalog queries.
///
/// Implemented for `tokio_postgres::Client` and `tokio_postgres::Transaction`.
#[async_trait::async_trait]
pub trait IntrospectClient: Sync {
    /// Execute a query and return all rows.
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> LintResult<Vec<Row>>;
}

#[async_trait::async_trait]
impl IntrospectClient for tokio_postgres::Client {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> LintResult<Vec<Row>> {
        self.query(sql, params).await.map_err(LintError::from)
    }
}

#[async_trait::async_trait]
impl<'a> IntrospectClient for tokio_postgres::Transaction<'a> {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> LintResult<Vec<Row>> {
        self.query(sql, params).await.map_err(LintError::from)
    }
}

/// Extension trait for reading row columns with decode errors mapped to [`LintError`].
pub trait RowExt {
    fn try_get_column<'a, T>(&'a self, column: &str) -> LintResult<T>
    where
        T: tokio_postgres::types::FromSql<'a>;
}

impl RowExt for Row {
    fn try_get_column<'a, T>(&'a self, column: &str) -> LintResult<T>
    where
        T: tokio_postgres::types::FromSql<'a>,
    {
        self.try_get(column)
            .map_err(|e| LintError::decode(column, e.to_string()))
    }
}
