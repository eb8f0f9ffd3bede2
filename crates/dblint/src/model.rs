//! Schema snapshot types consumed by the lint engine.
//!
//! A [`Schema`] is produced once by a [`SchemaProvider`](crate::provider::SchemaProvider)
//! and never mutated afterwards; every report type is derived from it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstraintType {
    #[serde(rename = "PRIMARY KEY")]
    PrimaryKey,
    #[serde(rename = "UNIQUE")]
    Unique,
    #[serde(rename = "CHECK")]
    Check,
    #[serde(rename = "EXCLUDE")]
    Exclude,
    #[serde(rename = "CONSTRAINT TRIGGER")]
    ConstraintTrigger,
    #[serde(rename = "FOREIGN KEY")]
    ForeignKey,
}

impl ConstraintType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PrimaryKey => "PRIMARY KEY",
            Self::Unique => "UNIQUE",
            Self::Check => "CHECK",
            Self::Exclude => "EXCLUDE",
            Self::ConstraintTrigger => "CONSTRAINT TRIGGER",
            Self::ForeignKey => "FOREIGN KEY",
        }
    }

    /// Map a `pg_constraint.contype` code.
    pub fn from_contype(contype: char) -> Option<Self> {
        match contype {
            'p' => Some(Self::PrimaryKey),
            'u' => Some(Self::Unique),
            'c' => Some(Self::Check),
            'x' => Some(Self::Exclude),
            't' => Some(Self::ConstraintTrigger),
            'f' => Some(Self::ForeignKey),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndexType {
    #[serde(rename = "REGULAR INDEX")]
    Regular,
    #[serde(rename = "UNIQUE INDEX")]
    Unique,
    #[serde(rename = "UNIQUE PARTIAL INDEX")]
    UniquePartial,
    #[serde(rename = "PARTIAL INDEX")]
    Partial,
}

impl IndexType {
    pub fn from_flags(is_unique: bool, is_partial: bool) -> Self {
        match (is_unique, is_partial) {
            (true, true) => Self::UniquePartial,
            (true, false) => Self::Unique,
            (false, true) => Self::Partial,
            (false, false) => Self::Regular,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Regular => "REGULAR INDEX",
            Self::Unique => "UNIQUE INDEX",
            Self::UniquePartial => "UNIQUE PARTIAL INDEX",
            Self::Partial => "PARTIAL INDEX",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerTiming {
    #[serde(rename = "BEFORE")]
    Before,
    #[serde(rename = "AFTER")]
    After,
    #[serde(rename = "INSTEAD OF")]
    InsteadOf,
}

impl TriggerTiming {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Before => "BEFORE",
            Self::After => "AFTER",
            Self::InsteadOf => "INSTEAD OF",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerLevel {
    #[serde(rename = "ROW")]
    Row,
    #[serde(rename = "STATEMENT")]
    Statement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerEvent {
    #[serde(rename = "INSERT")]
    Insert,
    #[serde(rename = "UPDATE")]
    Update,
    #[serde(rename = "DELETE")]
    Delete,
    #[serde(rename = "TRUNCATE")]
    Truncate,
}

impl TriggerEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Truncate => "TRUNCATE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReferentialAction {
    #[serde(rename = "NO ACTION")]
    NoAction,
    #[serde(rename = "RESTRICT")]
    Restrict,
    #[serde(rename = "CASCADE")]
    Cascade,
    #[serde(rename = "SET NULL")]
    SetNull,
    #[serde(rename = "SET DEFAULT")]
    SetDefault,
}

impl ReferentialAction {
    /// Map a `pg_constraint.confupdtype` / `confdeltype` code.
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'a' => Some(Self::NoAction),
            'r' => Some(Self::Restrict),
            'c' => Some(Self::Cascade),
            'n' => Some(Self::SetNull),
            'd' => Some(Self::SetDefault),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub name: String,
    pub data_type: String,
    pub nullable: bool,
    #[serde(default)]
    pub predicate: Option<String>,
    #[serde(default)]
    pub default_value: Option<String>,
    /// Constraint and index kinds this column takes part in, in wire spelling.
    #[serde(default)]
    pub part_of: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constraint {
    pub name: String,
    #[serde(rename = "type")]
    pub constraint_type: ConstraintType,
    pub columns: Vec<String>,
    #[serde(default)]
    pub predicate: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForeignKey {
    pub name: String,
    pub columns: Vec<String>,
    pub referenced_table: String,
    pub referenced_columns: Vec<String>,
    pub on_update_action: ReferentialAction,
    pub on_delete_action: ReferentialAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Index {
    pub name: String,
    #[serde(rename = "type")]
    pub index_type: IndexType,
    pub columns: Vec<String>,
    #[serde(default)]
    pub predicate: Option<String>,
    pub is_primary: bool,
    pub is_unique: bool,
    pub is_partial: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trigger {
    pub name: String,
    pub timing: TriggerTiming,
    pub level: TriggerLevel,
    pub events: Vec<TriggerEvent>,
    /// Empty means the trigger fires for every column.
    #[serde(default)]
    pub columns: Vec<String>,
    pub definition: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub name: String,
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub constraints: Vec<Constraint>,
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKey>,
    #[serde(default)]
    pub indexes: Vec<Index>,
    #[serde(default)]
    pub triggers: Vec<Trigger>,
}

impl Table {
    pub fn find_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_triggers(&self) -> bool {
        !self.triggers.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct View {
    pub name: String,
    pub table_names: Vec<String>,
    #[serde(default)]
    pub definition: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default)]
    pub tables: Vec<Table>,
    #[serde(default)]
    pub views: Vec<View>,
}

impl Schema {
    pub fn find_table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_type_follows_flags() {
        assert_eq!(IndexType::from_flags(false, false), IndexType::Regular);
        assert_eq!(IndexType::from_flags(true, false), IndexType::Unique);
        assert_eq!(IndexType::from_flags(true, true), IndexType::UniquePartial);
        assert_eq!(IndexType::from_flags(false, true), IndexType::Partial);
    }

    #[test]
    fn enums_use_catalog_spelling_on_the_wire() {
        assert_eq!(
            serde_json::to_string(&ConstraintType::PrimaryKey).unwrap(),
            "\"PRIMARY KEY\""
        );
        assert_eq!(
            serde_json::to_string(&IndexType::UniquePartial).unwrap(),
            "\"UNIQUE PARTIAL INDEX\""
        );
        assert_eq!(
            serde_json::to_string(&TriggerTiming::InsteadOf).unwrap(),
            "\"INSTEAD OF\""
        );
        assert_eq!(
            serde_json::to_string(&ReferentialAction::SetNull).unwrap(),
            "\"SET NULL\""
        );
        for ty in [
            ConstraintType::PrimaryKey,
            ConstraintType::Unique,
            ConstraintType::Check,
            ConstraintType::Exclude,
            ConstraintType::ConstraintTrigger,
            ConstraintType::ForeignKey,
        ] {
            assert_eq!(
                serde_json::to_string(&ty).unwrap(),
                format!("\"{}\"", ty.as_str())
            );
        }
    }

    #[test]
    fn column_uses_camel_case_fields() {
        let column: Column = serde_json::from_str(
            r#"{"name":"id","dataType":"bigint","nullable":false,"defaultValue":null}"#,
        )
        .unwrap();
        assert_eq!(column.data_type, "bigint");
        assert!(column.part_of.is_empty());
        assert!(column.predicate.is_none());
    }

    #[test]
    fn catalog_codes_decode() {
        assert_eq!(ConstraintType::from_contype('x'), Some(ConstraintType::Exclude));
        assert_eq!(ConstraintType::from_contype('n'), None);
        assert_eq!(ReferentialAction::from_code('n'), Some(ReferentialAction::SetNull));
        assert_eq!(ReferentialAction::from_code('?'), None);
    }
}
