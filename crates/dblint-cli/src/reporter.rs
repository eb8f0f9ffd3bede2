//! Console rendering of a [`Lint`].

use colored::Colorize;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};
use dblint::{EntityKind, Lint, Suggestion, Validation, ValidationType};
use std::path::Path;

pub fn print_findings(lint: &Lint) {
    if let Some(table) = findings_table(lint) {
        println!("{table}");
    }
}

pub fn print_renames(lint: &Lint) {
    if let Some(table) = renames_table(lint) {
        println!("{table}");
    }
}

pub fn print_summary(lint: &Lint, report_path: &Path) {
    let stats = lint.stats;
    let status = if lint.is_passing() {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };

    println!(
        "{status} {} tables, {} views: {} errors ({} ignored), {} warnings, {} info",
        lint.tables.len(),
        lint.views.len(),
        stats.error.to_string().red(),
        stats.ignored_error,
        stats.warning.to_string().yellow(),
        stats.info.to_string().blue()
    );
    println!("  {} {}", "report:".dimmed(), report_path.display());
}

fn header(labels: &[&str]) -> Vec<Cell> {
    labels
        .iter()
        .map(|l| Cell::new(l).add_attribute(Attribute::Bold).fg(Color::Cyan))
        .collect()
}

fn new_table(labels: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header(labels));
    table
}

fn type_cell(v: &Validation) -> Cell {
    let cell = Cell::new(v.validation_type.as_str());
    if v.is_ignored {
        return cell.fg(Color::DarkGrey);
    }
    match v.validation_type {
        ValidationType::Error => cell.fg(Color::Red).add_attribute(Attribute::Bold),
        ValidationType::Warning => cell.fg(Color::Yellow),
        ValidationType::Info => cell.fg(Color::Blue),
    }
}

/// One row per validation, grouped by the owning table or view.
fn findings_table(lint: &Lint) -> Option<Table> {
    let owners = lint
        .tables
        .iter()
        .map(|t| (t.name.as_str(), &t.validations))
        .chain(lint.views.iter().map(|v| (v.view.name.as_str(), &v.validations)));

    let mut table = new_table(&["Owner", "Type", "Entity", "Identifier", "Message", "Ignored"]);
    let mut rows = 0;
    for (owner, validations) in owners {
        for v in validations {
            table.add_row(vec![
                Cell::new(owner),
                type_cell(v),
                Cell::new(v.entity.label()),
                Cell::new(&v.identifier),
                Cell::new(&v.message),
                Cell::new(v.ignored_reason.as_deref().unwrap_or("")),
            ]);
            rows += 1;
        }
    }

    (rows > 0).then_some(table)
}

/// Every entity whose suggested name differs from its current one.
fn renames_table(lint: &Lint) -> Option<Table> {
    let mut renames: Vec<(&str, EntityKind, &str, &Suggestion)> = Vec::new();

    for t in &lint.tables {
        let owner = t.name.as_str();
        renames.push((owner, EntityKind::Table, owner, &t.suggestion));
        renames.extend(
            t.columns
                .iter()
                .map(|c| (owner, EntityKind::Column, c.column.name.as_str(), &c.suggestion)),
        );
        renames.extend(t.constraints.iter().map(|c| {
            let name = c.constraint.name.as_str();
            (owner, EntityKind::Constraint, name, &c.suggestion)
        }));
        renames.extend(
            t.indexes
                .iter()
                .map(|i| (owner, EntityKind::Index, i.index.name.as_str(), &i.suggestion)),
        );
        renames.extend(
            t.triggers
                .iter()
                .map(|tr| (owner, EntityKind::Trigger, tr.trigger.name.as_str(), &tr.suggestion)),
        );
        renames.extend(t.foreign_keys.iter().map(|fk| {
            let name = fk.foreign_key.name.as_str();
            (owner, EntityKind::ForeignKey, name, &fk.suggestion)
        }));
    }
    for v in &lint.views {
        let name = v.view.name.as_str();
        renames.push((name, EntityKind::View, name, &v.suggestion));
    }

    renames.retain(|(_, _, _, s)| s.is_change_needed);
    if renames.is_empty() {
        return None;
    }

    let mut table = new_table(&["Owner", "Entity", "Current", "Suggested"]);
    for (owner, kind, current, suggestion) in renames {
        let suggested = Cell::new(&suggestion.new_name).fg(Color::Green);
        let suggested = if suggestion.is_custom_identifier {
            suggested.add_attribute(Attribute::Italic)
        } else {
            suggested
        };
        table.add_row(vec![
            Cell::new(owner),
            Cell::new(kind.label()),
            Cell::new(current),
            suggested,
        ]);
    }
    Some(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dblint::{Column, LintColumn, LintTable, Stats};

    fn suggestion(new_name: &str, is_change_needed: bool) -> Suggestion {
        Suggestion {
            new_name: new_name.to_string(),
            is_custom_identifier: false,
            is_change_needed,
        }
    }

    fn lint() -> Lint {
        let validations = vec![Validation::new(
            ValidationType::Error,
            EntityKind::Column,
            "userId",
            "Change the column name.",
        )];
        Lint {
            tables: vec![LintTable {
                suggestion: suggestion("users", false),
                name: "users".to_string(),
                columns: vec![LintColumn {
                    suggestion: suggestion("user_id", true),
                    column: Column {
                        name: "userId".to_string(),
                        data_type: "int4".to_string(),
                        nullable: false,
                        predicate: None,
                        default_value: None,
                        part_of: Vec::new(),
                    },
                }],
                constraints: Vec::new(),
                foreign_keys: Vec::new(),
                indexes: Vec::new(),
                triggers: Vec::new(),
                stats: Stats::from_validations(&validations),
                validations,
            }],
            views: Vec::new(),
            stats: Stats {
                info: 0,
                warning: 0,
                error: 1,
                ignored_error: 0,
            },
        }
    }

    #[test]
    fn findings_list_every_validation() {
        let table = findings_table(&lint()).unwrap();
        assert_eq!(table.row_iter().count(), 1);
        let rendered = table.to_string();
        assert!(rendered.contains("userId"));
        assert!(rendered.contains("Change the column name."));
    }

    #[test]
    fn renames_only_list_needed_changes() {
        let table = renames_table(&lint()).unwrap();
        assert_eq!(table.row_iter().count(), 1);
        assert!(table.to_string().contains("user_id"));
    }

    #[test]
    fn clean_lint_renders_nothing() {
        let clean = Lint::default();
        assert!(findings_table(&clean).is_none());
        assert!(renames_table(&clean).is_none());
    }
}
