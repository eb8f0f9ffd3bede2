//! Canonical name construction.
//!
//! Each function first honours a configured override, then composes the canonical name
//! from already-resolved parts and runs it through the case converter for its kind.
//! Column names passed in are the *new* names, in the entity's own column order.

use crate::case::convert;
use crate::config::{EntityKind, LintConfig};
use crate::inflect::pluralize;
use crate::model::{ConstraintType, IndexType, TriggerEvent, TriggerTiming};
use crate::prefix::{
    FOREIGN_KEY_PREFIX, TRIGGER_PREFIX, VIEW_PREFIX, constraint_prefix, index_prefix,
};
use crate::report::Suggestion;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestedName {
    pub new_name: String,
    pub is_custom_identifier: bool,
}

impl SuggestedName {
    fn custom(name: &str) -> Self {
        Self {
            new_name: name.to_string(),
            is_custom_identifier: true,
        }
    }

    fn generated(config: &LintConfig, kind: EntityKind, parts: &[&str]) -> Self {
        let joined = parts.join("_");
        Self {
            new_name: convert(&joined, config.case_style(kind)).new_identifier,
            is_custom_identifier: false,
        }
    }

    pub fn into_suggestion(self, old_name: &str) -> Suggestion {
        Suggestion {
            is_change_needed: old_name != self.new_name,
            new_name: self.new_name,
            is_custom_identifier: self.is_custom_identifier,
        }
    }
}

pub fn suggest_table_name(config: &LintConfig, table: &str) -> SuggestedName {
    if let Some(custom) = config.custom_names.table(table) {
        return SuggestedName::custom(custom);
    }
    let plural = pluralize(table);
    SuggestedName::generated(config, EntityKind::Table, &[&plural])
}

pub fn suggest_view_name(
    config: &LintConfig,
    view: &str,
    new_table_names: &[String],
) -> SuggestedName {
    if let Some(custom) = config.custom_names.view(view) {
        return SuggestedName::custom(custom);
    }
    let mut parts = vec![VIEW_PREFIX];
    parts.extend(new_table_names.iter().map(String::as_str));
    SuggestedName::generated(config, EntityKind::View, &parts)
}

pub fn suggest_column_name(config: &LintConfig, table: &str, column: &str) -> SuggestedName {
    if let Some(custom) = config.custom_names.owned(EntityKind::Column, table, column) {
        return SuggestedName::custom(custom);
    }
    SuggestedName::generated(config, EntityKind::Column, &[column])
}

pub fn suggest_constraint_name(
    config: &LintConfig,
    table: &str,
    new_table_name: &str,
    constraint: &str,
    new_column_names: &[String],
    constraint_type: ConstraintType,
) -> SuggestedName {
    if let Some(custom) = config
        .custom_names
        .owned(EntityKind::Constraint, table, constraint)
    {
        return SuggestedName::custom(custom);
    }
    let mut parts = vec![constraint_prefix(constraint_type), new_table_name];
    parts.extend(new_column_names.iter().map(String::as_str));
    SuggestedName::generated(config, EntityKind::Constraint, &parts)
}

pub fn suggest_index_name(
    config: &LintConfig,
    table: &str,
    new_table_name: &str,
    index: &str,
    new_column_names: &[String],
    index_type: IndexType,
) -> SuggestedName {
    if let Some(custom) = config.custom_names.owned(EntityKind::Index, table, index) {
        return SuggestedName::custom(custom);
    }
    let mut parts = vec![index_prefix(index_type), new_table_name];
    parts.extend(new_column_names.iter().map(String::as_str));
    SuggestedName::generated(config, EntityKind::Index, &parts)
}

/// An empty `new_column_names` (trigger fires for every column) adds no column tokens.
pub fn suggest_trigger_name(
    config: &LintConfig,
    table: &str,
    new_table_name: &str,
    trigger: &str,
    new_column_names: &[String],
    timing: TriggerTiming,
    events: &[TriggerEvent],
) -> SuggestedName {
    if let Some(custom) = config.custom_names.owned(EntityKind::Trigger, table, trigger) {
        return SuggestedName::custom(custom);
    }
    let mut parts = vec![TRIGGER_PREFIX, new_table_name, timing.as_str()];
    parts.extend(events.iter().map(|e| e.as_str()));
    parts.extend(new_column_names.iter().map(String::as_str));
    SuggestedName::generated(config, EntityKind::Trigger, &parts)
}

pub fn suggest_foreign_key_name(
    config: &LintConfig,
    table: &str,
    new_table_name: &str,
    foreign_key: &str,
    new_column_names: &[String],
    referenced_new_table_name: &str,
    referenced_new_column_names: &[String],
) -> SuggestedName {
    if let Some(custom) = config
        .custom_names
        .owned(EntityKind::ForeignKey, table, foreign_key)
    {
        return SuggestedName::custom(custom);
    }
    let mut parts = vec![FOREIGN_KEY_PREFIX, new_table_name];
    parts.extend(new_column_names.iter().map(String::as_str));
    parts.push(referenced_new_table_name);
    parts.extend(referenced_new_column_names.iter().map(String::as_str));
    SuggestedName::generated(config, EntityKind::ForeignKey, &parts)
}
