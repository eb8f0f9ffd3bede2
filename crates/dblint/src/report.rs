//! Lint report types.
//!
//! The JSON form of [`Lint`] is the interchange format written by the CLI; every linted
//! entity serializes its schema fields next to its `suggestion`.

use crate::config::EntityKind;
use crate::model::{Column, Constraint, ForeignKey, Index, Trigger, View};
use crate::stats::Stats;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub new_name: String,
    pub is_custom_identifier: bool,
    pub is_change_needed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationType {
    Info,
    Warning,
    Error,
}

impl ValidationType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Validation {
    #[serde(rename = "type")]
    pub validation_type: ValidationType,
    pub entity: EntityKind,
    /// The name the finding is about.
    pub identifier: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_ignored: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignored_reason: Option<String>,
}

impl Validation {
    pub fn new(
        validation_type: ValidationType,
        entity: EntityKind,
        identifier: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            validation_type,
            entity,
            identifier: identifier.into(),
            message: message.into(),
            is_ignored: false,
            ignored_reason: None,
        }
    }

    /// Key used by ignore rules: `TYPE,ENTITY,IDENTIFIER`.
    pub fn ignore_key(&self) -> String {
        format!(
            "{},{},{}",
            self.validation_type.as_str(),
            self.entity.as_str(),
            self.identifier
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintColumn {
    pub suggestion: Suggestion,
    #[serde(flatten)]
    pub column: Column,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintConstraint {
    pub suggestion: Suggestion,
    #[serde(flatten)]
    pub constraint: Constraint,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintIndex {
    pub suggestion: Suggestion,
    #[serde(flatten)]
    pub index: Index,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintTrigger {
    pub suggestion: Suggestion,
    #[serde(flatten)]
    pub trigger: Trigger,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintForeignKey {
    pub suggestion: Suggestion,
    #[serde(flatten)]
    pub foreign_key: ForeignKey,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LintTable {
    pub suggestion: Suggestion,
    pub name: String,
    pub columns: Vec<LintColumn>,
    pub constraints: Vec<LintConstraint>,
    pub foreign_keys: Vec<LintForeignKey>,
    pub indexes: Vec<LintIndex>,
    pub triggers: Vec<LintTrigger>,
    pub validations: Vec<Validation>,
    pub stats: Stats,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintView {
    pub suggestion: Suggestion,
    #[serde(flatten)]
    pub view: View,
    pub validations: Vec<Validation>,
    pub stats: Stats,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lint {
    pub tables: Vec<LintTable>,
    pub views: Vec<LintView>,
    pub stats: Stats,
}

impl Lint {
    /// Every error has been accepted by an ignore rule.
    pub fn is_passing(&self) -> bool {
        self.stats.is_passing()
    }

    pub fn validations(&self) -> impl Iterator<Item = &Validation> {
        self.tables
            .iter()
            .flat_map(|t| t.validations.iter())
            .chain(self.views.iter().flat_map(|v| v.validations.iter()))
    }
}
