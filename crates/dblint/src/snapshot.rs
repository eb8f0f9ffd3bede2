//! Schema snapshots on disk.
//!
//! A snapshot lets a schema be linted without a database connection, e.g. in CI or from a
//! checked-in fixture.

use crate::error::{LintError, LintResult};
use crate::model::Schema;
use crate::provider::SchemaProvider;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaSnapshot {
    pub version: u32,
    pub retrieved_at: DateTime<Utc>,
    /// Namespace the snapshot was read from.
    pub namespace: String,
    pub schema: Schema,
}

impl SchemaSnapshot {
    pub fn new(namespace: impl Into<String>, schema: Schema) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            retrieved_at: Utc::now(),
            namespace: namespace.into(),
            schema,
        }
    }

    pub fn read(path: &Path) -> LintResult<Self> {
        let data = std::fs::read(path).map_err(|e| {
            LintError::Other(format!("failed to read snapshot {}: {e}", path.display()))
        })?;

        let snapshot = serde_json::from_slice::<SchemaSnapshot>(&data).map_err(|e| {
            LintError::Serialization(format!(
                "Failed to parse schema snapshot {}: {e}",
                path.display()
            ))
        })?;

        if snapshot.version != SNAPSHOT_VERSION {
            return Err(LintError::Serialization(format!(
                "unsupported schema snapshot version {} in {}",
                snapshot.version,
                path.display()
            )));
        }
        Ok(snapshot)
    }

    /// Write the snapshot as pretty JSON, replacing `path` atomically.
    pub fn write(&self, path: &Path) -> LintResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| LintError::Other(e.to_string()))?;
            }
        }

        let tmp_path = path.with_extension("json.tmp");
        let data = serde_json::to_vec_pretty(self).map_err(|e| {
            LintError::Serialization(format!("Failed to serialize schema snapshot: {e}"))
        })?;

        std::fs::write(&tmp_path, data).map_err(|e| LintError::Other(e.to_string()))?;
        std::fs::rename(&tmp_path, path).map_err(|e| LintError::Other(e.to_string()))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl SchemaProvider for SchemaSnapshot {
    async fn get_schema(&self) -> LintResult<Schema> {
        Ok(self.schema.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Table, View};

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir()
            .join(format!("dblint-snapshot-{}-{name}", std::process::id()))
            .join("schema.json")
    }

    fn schema() -> Schema {
        Schema {
            tables: vec![Table {
                name: "users".into(),
                columns: vec![],
                constraints: vec![],
                foreign_keys: vec![],
                indexes: vec![],
                triggers: vec![],
            }],
            views: vec![View {
                name: "v_users".into(),
                table_names: vec!["users".into()],
                definition: None,
            }],
        }
    }

    #[test]
    fn write_then_read() {
        let path = temp_path("roundtrip");
        let snapshot = SchemaSnapshot::new("public", schema());
        snapshot.write(&path).unwrap();

        let loaded = SchemaSnapshot::read(&path).unwrap();
        assert_eq!(loaded, snapshot);
        assert!(!path.with_extension("json.tmp").exists());

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn rejects_unknown_version() {
        let path = temp_path("version");
        let mut snapshot = SchemaSnapshot::new("public", schema());
        snapshot.version = 99;
        snapshot.write(&path).unwrap();

        let err = SchemaSnapshot::read(&path).unwrap_err();
        assert!(matches!(err, LintError::Serialization(_)));

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = SchemaSnapshot::read(Path::new("/nonexistent/dblint/schema.json")).unwrap_err();
        assert!(matches!(err, LintError::Other(_)));
    }

    #[tokio::test]
    async fn snapshot_provides_its_schema() {
        let snapshot = SchemaSnapshot::new("public", schema());
        assert_eq!(snapshot.get_schema().await.unwrap(), schema());
    }
}
