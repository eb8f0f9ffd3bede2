//! The lint pipeline.
//!
//! Linting runs in two phases. [`NameMaps::resolve`] first computes the new name of every
//! table and every column; constraint, index, trigger, foreign key and view names are
//! composed from those, so the maps must be complete before any of them is linted. The
//! second phase is a pure function of the schema and the maps.

use crate::config::{EntityKind, LintConfig};
use crate::error::{LintError, LintResult};
use crate::model::{Schema, Table, View};
use crate::provider::SchemaProvider;
use crate::report::{
    Lint, LintColumn, LintConstraint, LintForeignKey, LintIndex, LintTable, LintTrigger,
    LintView, Suggestion, Validation,
};
use crate::stats::Stats;
use crate::suggest::{
    SuggestedName, suggest_column_name, suggest_constraint_name, suggest_foreign_key_name,
    suggest_index_name, suggest_table_name, suggest_trigger_name, suggest_view_name,
};
use crate::validate::{enrich_with_ignore_reasons, info, validate_name};
use std::collections::HashMap;
use tracing::{debug, info as log_info};

pub const TRIGGER_CAUTION: &str =
    "Table has trigger(s). Do re-check the trigger(s) if you have changed the table and/or column(s).";

/// Resolved table and column names, keyed by current names.
#[derive(Debug, Clone, Default)]
pub struct NameMaps {
    tables: HashMap<String, SuggestedName>,
    columns: HashMap<String, HashMap<String, SuggestedName>>,
}

impl NameMaps {
    pub fn resolve(schema: &Schema, config: &LintConfig) -> Self {
        let mut maps = NameMaps::default();
        for table in &schema.tables {
            maps.tables
                .insert(table.name.clone(), suggest_table_name(config, &table.name));

            let columns = table
                .columns
                .iter()
                .map(|c| {
                    (
                        c.name.clone(),
                        suggest_column_name(config, &table.name, &c.name),
                    )
                })
                .collect();
            maps.columns.insert(table.name.clone(), columns);
        }
        maps
    }

    pub fn table(&self, table: &str) -> LintResult<&SuggestedName> {
        self.tables
            .get(table)
            .ok_or_else(|| LintError::UnknownTable(table.to_string()))
    }

    pub fn column(&self, table: &str, column: &str) -> LintResult<&SuggestedName> {
        self.columns
            .get(table)
            .ok_or_else(|| LintError::UnknownTable(table.to_string()))?
            .get(column)
            .ok_or_else(|| LintError::unknown_column(table, column))
    }

    /// New names of `columns` of `table`, in the given order.
    pub fn new_column_names(&self, table: &str, columns: &[String]) -> LintResult<Vec<String>> {
        columns
            .iter()
            .map(|c| self.column(table, c).map(|s| s.new_name.clone()))
            .collect()
    }
}

/// Lints schemas against one configuration.
#[derive(Debug, Clone, Default)]
pub struct Linter {
    config: LintConfig,
}

impl Linter {
    pub fn new(config: LintConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LintConfig {
        &self.config
    }

    /// Fetch the schema once from `provider` and lint it.
    ///
    /// Provider errors are returned unchanged.
    pub async fn lint<P>(&self, provider: &P) -> LintResult<Lint>
    where
        P: SchemaProvider + ?Sized,
    {
        let schema = provider.get_schema().await?;
        self.lint_schema(&schema)
    }

    /// Lint an already acquired schema.
    ///
    /// Fails without a partial result when an entity references a table or column the
    /// schema does not contain.
    pub fn lint_schema(&self, schema: &Schema) -> LintResult<Lint> {
        let maps = NameMaps::resolve(schema, &self.config);

        let tables = schema
            .tables
            .iter()
            .map(|table| self.lint_table(table, &maps))
            .collect::<LintResult<Vec<_>>>()?;

        let views = schema
            .views
            .iter()
            .map(|view| self.lint_view(view, &maps))
            .collect::<LintResult<Vec<_>>>()?;

        let stats = Stats::total(
            tables
                .iter()
                .map(|t| t.stats)
                .chain(views.iter().map(|v| v.stats)),
        );

        log_info!(
            tables = tables.len(),
            views = views.len(),
            errors = stats.error,
            ignored_errors = stats.ignored_error,
            "schema linted"
        );

        Ok(Lint {
            tables,
            views,
            stats,
        })
    }

    fn lint_table(&self, table: &Table, maps: &NameMaps) -> LintResult<LintTable> {
        let mut ctx = EntityContext {
            config: &self.config,
            context: &table.name,
            validations: Vec::new(),
        };

        let resolved = maps.table(&table.name)?;
        let new_table_name = resolved.new_name.as_str();
        let suggestion = ctx.check(EntityKind::Table, &table.name, resolved.clone());

        let mut columns = Vec::with_capacity(table.columns.len());
        for column in &table.columns {
            let resolved = maps.column(&table.name, &column.name)?.clone();
            columns.push(LintColumn {
                suggestion: ctx.check(EntityKind::Column, &column.name, resolved),
                column: column.clone(),
            });
        }

        let mut constraints = Vec::with_capacity(table.constraints.len());
        for constraint in &table.constraints {
            let new_columns = maps.new_column_names(&table.name, &constraint.columns)?;
            let resolved = suggest_constraint_name(
                &self.config,
                &table.name,
                new_table_name,
                &constraint.name,
                &new_columns,
                constraint.constraint_type,
            );
            constraints.push(LintConstraint {
                suggestion: ctx.check(EntityKind::Constraint, &constraint.name, resolved),
                constraint: constraint.clone(),
            });
        }

        let mut indexes = Vec::with_capacity(table.indexes.len());
        for index in &table.indexes {
            let new_columns = maps.new_column_names(&table.name, &index.columns)?;
            let resolved = suggest_index_name(
                &self.config,
                &table.name,
                new_table_name,
                &index.name,
                &new_columns,
                index.index_type,
            );
            indexes.push(LintIndex {
                suggestion: ctx.check(EntityKind::Index, &index.name, resolved),
                index: index.clone(),
            });
        }

        let mut triggers = Vec::with_capacity(table.triggers.len());
        for trigger in &table.triggers {
            let new_columns = maps.new_column_names(&table.name, &trigger.columns)?;
            let resolved = suggest_trigger_name(
                &self.config,
                &table.name,
                new_table_name,
                &trigger.name,
                &new_columns,
                trigger.timing,
                &trigger.events,
            );
            triggers.push(LintTrigger {
                suggestion: ctx.check(EntityKind::Trigger, &trigger.name, resolved),
                trigger: trigger.clone(),
            });
        }
        if table.has_triggers() {
            ctx.push(info(EntityKind::Table, &table.name, TRIGGER_CAUTION));
        }

        let mut foreign_keys = Vec::with_capacity(table.foreign_keys.len());
        for fk in &table.foreign_keys {
            let new_columns = maps.new_column_names(&table.name, &fk.columns)?;
            let referenced = maps.table(&fk.referenced_table)?;
            let referenced_columns =
                maps.new_column_names(&fk.referenced_table, &fk.referenced_columns)?;
            let resolved = suggest_foreign_key_name(
                &self.config,
                &table.name,
                new_table_name,
                &fk.name,
                &new_columns,
                &referenced.new_name,
                &referenced_columns,
            );
            foreign_keys.push(LintForeignKey {
                suggestion: ctx.check(EntityKind::ForeignKey, &fk.name, resolved),
                foreign_key: fk.clone(),
            });
        }

        let validations = ctx.validations;
        let stats = Stats::from_validations(&validations);
        debug!(
            table = %table.name,
            new_name = %suggestion.new_name,
            validations = validations.len(),
            "linted table"
        );

        Ok(LintTable {
            suggestion,
            name: table.name.clone(),
            columns,
            constraints,
            foreign_keys,
            indexes,
            triggers,
            validations,
            stats,
        })
    }

    fn lint_view(&self, view: &View, maps: &NameMaps) -> LintResult<LintView> {
        let new_table_names = view
            .table_names
            .iter()
            .map(|t| maps.table(t).map(|s| s.new_name.clone()))
            .collect::<LintResult<Vec<_>>>()?;

        let mut ctx = EntityContext {
            config: &self.config,
            context: &view.name,
            validations: Vec::new(),
        };
        let resolved = suggest_view_name(&self.config, &view.name, &new_table_names);
        let suggestion = ctx.check(EntityKind::View, &view.name, resolved);

        let validations = ctx.validations;
        let stats = Stats::from_validations(&validations);
        debug!(view = %view.name, validations = validations.len(), "linted view");

        Ok(LintView {
            suggestion,
            view: view.clone(),
            validations,
            stats,
        })
    }
}

/// Collects the findings of one table or view.
struct EntityContext<'a> {
    config: &'a LintConfig,
    /// Name ignore rules are looked up under.
    context: &'a str,
    validations: Vec<Validation>,
}

impl EntityContext<'_> {
    /// Validate a resolved name and turn it into a report suggestion.
    ///
    /// Custom identifiers are taken as given and never produce findings.
    fn check(&mut self, kind: EntityKind, name: &str, resolved: SuggestedName) -> Suggestion {
        if !resolved.is_custom_identifier {
            let found = validate_name(self.config, kind, name, &resolved.new_name);
            self.push(found);
        }
        resolved.into_suggestion(name)
    }

    fn push(&mut self, found: Vec<Validation>) {
        if found.is_empty() {
            return;
        }
        let enriched = enrich_with_ignore_reasons(self.config, self.context, found);
        self.validations.extend(enriched);
    }
}
