//! Resolved lint configuration.
//!
//! [`LintConfig`] is built once by the caller and handed to the [`Linter`](crate::Linter).
//! Every lookup has a default, so an empty configuration always yields suggestions.

use crate::case::CaseStyle;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// PostgreSQL truncates identifiers longer than `NAMEDATALEN - 1` bytes.
pub const DEFAULT_MAX_LENGTH: usize = 63;

/// The kinds of named schema objects the linter reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityKind {
    Table,
    Column,
    Constraint,
    Index,
    ForeignKey,
    View,
    Trigger,
}

impl EntityKind {
    pub const ALL: [EntityKind; 7] = [
        Self::Table,
        Self::Column,
        Self::Constraint,
        Self::Index,
        Self::ForeignKey,
        Self::View,
        Self::Trigger,
    ];

    /// Wire spelling, as used in ignore-rule keys.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Table => "TABLE",
            Self::Column => "COLUMN",
            Self::Constraint => "CONSTRAINT",
            Self::Index => "INDEX",
            Self::ForeignKey => "FOREIGN_KEY",
            Self::View => "VIEW",
            Self::Trigger => "TRIGGER",
        }
    }

    /// Human wording used in validation messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Column => "column",
            Self::Constraint => "constraint",
            Self::Index => "index",
            Self::ForeignKey => "foreign key",
            Self::View => "view",
            Self::Trigger => "trigger",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaseStyles {
    pub table: CaseStyle,
    pub column: CaseStyle,
    pub constraint: CaseStyle,
    pub index: CaseStyle,
    pub foreign_key: CaseStyle,
    pub view: CaseStyle,
    pub trigger: CaseStyle,
}

impl CaseStyles {
    pub fn uniform(style: CaseStyle) -> Self {
        Self {
            table: style,
            column: style,
            constraint: style,
            index: style,
            foreign_key: style,
            view: style,
            trigger: style,
        }
    }

    pub fn for_kind(&self, kind: EntityKind) -> CaseStyle {
        match kind {
            EntityKind::Table => self.table,
            EntityKind::Column => self.column,
            EntityKind::Constraint => self.constraint,
            EntityKind::Index => self.index,
            EntityKind::ForeignKey => self.foreign_key,
            EntityKind::View => self.view,
            EntityKind::Trigger => self.trigger,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaxLengths {
    pub table: usize,
    pub column: usize,
    pub constraint: usize,
    pub index: usize,
    pub foreign_key: usize,
    pub view: usize,
    pub trigger: usize,
}

impl Default for MaxLengths {
    fn default() -> Self {
        Self::uniform(DEFAULT_MAX_LENGTH)
    }
}

impl MaxLengths {
    pub fn uniform(max: usize) -> Self {
        Self {
            table: max,
            column: max,
            constraint: max,
            index: max,
            foreign_key: max,
            view: max,
            trigger: max,
        }
    }

    pub fn for_kind(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Table => self.table,
            EntityKind::Column => self.column,
            EntityKind::Constraint => self.constraint,
            EntityKind::Index => self.index,
            EntityKind::ForeignKey => self.foreign_key,
            EntityKind::View => self.view,
            EntityKind::Trigger => self.trigger,
        }
    }
}

/// Explicit new names that bypass the generator.
///
/// Tables and views are keyed by their current name; every other kind is keyed by the
/// owning table's current name, then the entity's current name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomNames {
    pub tables: BTreeMap<String, String>,
    pub views: BTreeMap<String, String>,
    pub columns: BTreeMap<String, BTreeMap<String, String>>,
    pub constraints: BTreeMap<String, BTreeMap<String, String>>,
    pub indexes: BTreeMap<String, BTreeMap<String, String>>,
    pub triggers: BTreeMap<String, BTreeMap<String, String>>,
    pub foreign_keys: BTreeMap<String, BTreeMap<String, String>>,
}

impl CustomNames {
    pub fn table(&self, name: &str) -> Option<&str> {
        non_empty(self.tables.get(name))
    }

    pub fn view(&self, name: &str) -> Option<&str> {
        non_empty(self.views.get(name))
    }

    /// Look up an override for an entity owned by `table`.
    ///
    /// Tables and views have no owner; use [`CustomNames::table`] / [`CustomNames::view`].
    pub fn owned(&self, kind: EntityKind, table: &str, name: &str) -> Option<&str> {
        let map = match kind {
            EntityKind::Column => &self.columns,
            EntityKind::Constraint => &self.constraints,
            EntityKind::Index => &self.indexes,
            EntityKind::Trigger => &self.triggers,
            EntityKind::ForeignKey => &self.foreign_keys,
            EntityKind::Table | EntityKind::View => return None,
        };
        non_empty(map.get(table).and_then(|m| m.get(name)))
    }
}

fn non_empty(v: Option<&String>) -> Option<&str> {
    v.map(String::as_str).filter(|s| !s.is_empty())
}

/// Findings to accept: context entity name -> `"TYPE,ENTITY,IDENTIFIER"` -> reason.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IgnoreRules(pub BTreeMap<String, BTreeMap<String, String>>);

impl IgnoreRules {
    pub fn reason(&self, context: &str, key: &str) -> Option<&str> {
        self.0
            .get(context)
            .and_then(|m| m.get(key))
            .map(String::as_str)
    }

    pub fn insert(
        &mut self,
        context: impl Into<String>,
        key: impl Into<String>,
        reason: impl Into<String>,
    ) {
        self.0
            .entry(context.into())
            .or_default()
            .insert(key.into(), reason.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LintConfig {
    pub case: CaseStyles,
    pub max_length: MaxLengths,
    pub custom_names: CustomNames,
    pub ignore: IgnoreRules,
}

impl LintConfig {
    pub fn case_style(&self, kind: EntityKind) -> CaseStyle {
        self.case.for_kind(kind)
    }

    pub fn max_length(&self, kind: EntityKind) -> usize {
        self.max_length.for_kind(kind)
    }
}
