//! Schema acquisition seam.

use crate::error::LintResult;
use crate::model::Schema;

/// Something that can produce a [`Schema`] snapshot.
///
/// Implemented by [`PgSchemaProvider`](crate::PgSchemaProvider) for live databases and
/// [`SchemaSnapshot`](crate::SchemaSnapshot) for files written earlier. A `Schema` value
/// is its own provider.
#[async_trait::async_trait]
pub trait SchemaProvider: Sync {
    async fn get_schema(&self) -> LintResult<Schema>;
}

#[async_trait::async_trait]
impl SchemaProvider for Schema {
    async fn get_schema(&self) -> LintResult<Schema> {
        Ok(self.clone())
    }
}
