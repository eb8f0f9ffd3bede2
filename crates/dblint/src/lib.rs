//! dblint
//!
//! Suggests canonical names for every table, column, constraint, index, trigger, foreign
//! key and view of a PostgreSQL schema and reports naming-convention violations.
//!
//! # Features
//!
//! - **Case conversion**: acronym-aware tokenizing into snake_case, camelCase or PascalCase
//! - **Name suggestions**: deterministic names composed from prefixes and resolved
//!   table/column names (`pk_user_groups_id`, `fk_orders_user_id_users_id`, ...)
//! - **Validation**: rename and length findings, with configurable ignore rules
//! - **Introspection**: read a live catalog or a JSON snapshot
//!
//! # Example
//!
//! ```ignore
//! use dblint::{LintConfig, Linter, PgSchemaProvider, IntrospectOptions};
//!
//! let provider = PgSchemaProvider::new(&client, IntrospectOptions::default());
//! let lint = Linter::new(LintConfig::default()).lint(&provider).await?;
//! if !lint.is_passing() {
//!     eprintln!("{} naming errors", lint.stats.error - lint.stats.ignored_error);
//! }
//! ```

pub mod case;
pub mod client;
pub mod config;
pub mod engine;
pub mod error;
pub mod inflect;
pub mod introspect;
pub mod model;
pub mod prefix;
pub mod provider;
pub mod report;
pub mod snapshot;
pub mod stats;
pub mod suggest;
pub mod validate;

pub use case::{CaseStyle, Conversion, convert, tokenize};
pub use client::{IntrospectClient, RowExt};
pub use config::{CaseStyles, CustomNames, EntityKind, IgnoreRules, LintConfig, MaxLengths};
pub use engine::{Linter, NameMaps, TRIGGER_CAUTION};
pub use error::{LintError, LintResult};
pub use introspect::{IntrospectOptions, PgSchemaProvider};
pub use model::{
    Column, Constraint, ConstraintType, ForeignKey, Index, IndexType, ReferentialAction, Schema,
    Table, Trigger, TriggerEvent, TriggerLevel, TriggerTiming, View,
};
pub use provider::SchemaProvider;
pub use report::{
    Lint, LintColumn, LintConstraint, LintForeignKey, LintIndex, LintTable, LintTrigger,
    LintView, Suggestion, Validation, ValidationType,
};
pub use snapshot::SchemaSnapshot;
pub use stats::Stats;
pub use suggest::SuggestedName;
