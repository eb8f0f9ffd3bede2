//! Naming-convention findings.

use crate::config::{EntityKind, LintConfig};
use crate::report::{Validation, ValidationType};

/// Check an old/new name pair of one entity.
///
/// Lengths are counted in characters. An empty result means the current name is already
/// canonical and within limits.
pub fn validate_name(
    config: &LintConfig,
    kind: EntityKind,
    name: &str,
    new_name: &str,
) -> Vec<Validation> {
    let max = config.max_length(kind);
    let label = kind.label();
    let mut validations = Vec::new();

    let len = name.chars().count();
    if len > max {
        validations.push(Validation::new(
            ValidationType::Error,
            kind,
            name,
            format!("Lengthy {label} name. Current: {len} Allowed: {max}."),
        ));
    }

    let new_len = new_name.chars().count();
    if new_len > max {
        validations.push(Validation::new(
            ValidationType::Error,
            kind,
            new_name,
            format!("New name of the {label} is lengthy. Current: {new_len} Allowed: {max}."),
        ));
    }

    if name != new_name {
        validations.push(Validation::new(
            ValidationType::Error,
            kind,
            name,
            format!("Change the {label} name."),
        ));
    }

    validations
}

pub fn validate_table_name(config: &LintConfig, name: &str, new_name: &str) -> Vec<Validation> {
    validate_name(config, EntityKind::Table, name, new_name)
}

pub fn validate_view_name(config: &LintConfig, name: &str, new_name: &str) -> Vec<Validation> {
    validate_name(config, EntityKind::View, name, new_name)
}

pub fn validate_column_name(config: &LintConfig, name: &str, new_name: &str) -> Vec<Validation> {
    validate_name(config, EntityKind::Column, name, new_name)
}

pub fn validate_constraint_name(
    config: &LintConfig,
    name: &str,
    new_name: &str,
) -> Vec<Validation> {
    validate_name(config, EntityKind::Constraint, name, new_name)
}

pub fn validate_index_name(config: &LintConfig, name: &str, new_name: &str) -> Vec<Validation> {
    validate_name(config, EntityKind::Index, name, new_name)
}

pub fn validate_trigger_name(config: &LintConfig, name: &str, new_name: &str) -> Vec<Validation> {
    validate_name(config, EntityKind::Trigger, name, new_name)
}

pub fn validate_foreign_key_name(
    config: &LintConfig,
    name: &str,
    new_name: &str,
) -> Vec<Validation> {
    validate_name(config, EntityKind::ForeignKey, name, new_name)
}

/// A single INFO finding.
pub fn info(kind: EntityKind, identifier: &str, message: &str) -> Vec<Validation> {
    vec![Validation::new(ValidationType::Info, kind, identifier, message)]
}

/// Mark findings accepted by an ignore rule under `context`.
///
/// Entries that are already ignored, or that match no rule, are left untouched.
pub fn enrich_with_ignore_reasons(
    config: &LintConfig,
    context: &str,
    mut validations: Vec<Validation>,
) -> Vec<Validation> {
    if config.ignore.is_empty() {
        return validations;
    }

    for v in validations.iter_mut().filter(|v| !v.is_ignored) {
        if let Some(reason) = config.ignore.reason(context, &v.ignore_key()) {
            v.is_ignored = true;
            v.ignored_reason = Some(reason.to_string());
        }
    }
    validations
}
