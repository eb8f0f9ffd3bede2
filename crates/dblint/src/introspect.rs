//! PostgreSQL catalog introspection.
//!
//! [`PgSchemaProvider`] reads one namespace through an [`IntrospectClient`] and assembles a
//! [`Schema`]. Catalog codes (`contype`, `confupdtype`, `tgtype`, ...) are decoded here so the
//! queries stay simple.

use crate::client::{IntrospectClient, RowExt};
use crate::error::LintResult;
use crate::model::{
    Column, Constraint, ConstraintType, ForeignKey, Index, IndexType, ReferentialAction, Schema,
    Table, Trigger, TriggerEvent, TriggerLevel, TriggerTiming, View,
};
use crate::provider::SchemaProvider;
use std::collections::{BTreeMap, HashSet};
use std::sync::OnceLock;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct IntrospectOptions {
    /// Namespace to read (default: `public`).
    pub schema: String,
    /// Tables left out of the snapshot entirely.
    pub ignore_tables: Vec<String>,
}

impl Default for IntrospectOptions {
    fn default() -> Self {
        Self {
            schema: "public".to_string(),
            ignore_tables: Vec::new(),
        }
    }
}

pub struct PgSchemaProvider<'a, C: IntrospectClient> {
    client: &'a C,
    options: IntrospectOptions,
}

impl<'a, C: IntrospectClient> PgSchemaProvider<'a, C> {
    pub fn new(client: &'a C, options: IntrospectOptions) -> Self {
        Self { client, options }
    }

    pub fn options(&self) -> &IntrospectOptions {
        &self.options
    }
}

#[async_trait::async_trait]
impl<C: IntrospectClient> SchemaProvider for PgSchemaProvider<'_, C> {
    async fn get_schema(&self) -> LintResult<Schema> {
        load_schema(self.client, &self.options).await
    }
}

/// Read every table and view of `options.schema`.
pub async fn load_schema<C: IntrospectClient>(
    client: &C,
    options: &IntrospectOptions,
) -> LintResult<Schema> {
    let namespace = options.schema.as_str();
    let ignored: HashSet<&str> = options.ignore_tables.iter().map(String::as_str).collect();

    let mut tables: BTreeMap<String, Table> = BTreeMap::new();
    for row in client.query(TABLES_SQL, &[&namespace]).await? {
        let name: String = row.try_get_column("table_name")?;
        if ignored.contains(name.as_str()) {
            debug!(table = %name, "skipping ignored table");
            continue;
        }
        tables.insert(
            name.clone(),
            Table {
                name,
                columns: Vec::new(),
                constraints: Vec::new(),
                foreign_keys: Vec::new(),
                indexes: Vec::new(),
                triggers: Vec::new(),
            },
        );
    }

    for row in client.query(COLUMNS_SQL, &[&namespace]).await? {
        let table_name: String = row.try_get_column("table_name")?;
        let Some(table) = tables.get_mut(&table_name) else {
            continue;
        };
        let data_type: String = row.try_get_column("data_type")?;
        table.columns.push(Column {
            name: row.try_get_column("column_name")?,
            data_type: compact_type_name(&data_type),
            nullable: row.try_get_column("nullable")?,
            predicate: row.try_get_column("predicate")?,
            default_value: row.try_get_column("default_value")?,
            part_of: Vec::new(),
        });
    }

    for row in client.query(CONSTRAINTS_SQL, &[&namespace]).await? {
        let table_name: String = row.try_get_column("table_name")?;
        let Some(table) = tables.get_mut(&table_name) else {
            continue;
        };
        let name: String = row.try_get_column("constraint_name")?;
        let contype: String = row.try_get_column("contype")?;
        let Some(constraint_type) = contype.chars().next().and_then(ConstraintType::from_contype)
        else {
            warn!(table = %table_name, constraint = %name, %contype, "unknown constraint type");
            continue;
        };
        let definition: String = row.try_get_column("definition")?;
        let predicate = match constraint_type {
            ConstraintType::Check => Some(check_predicate(&definition)),
            ConstraintType::Exclude => exclude_predicate(&definition),
            _ => None,
        };
        table.constraints.push(Constraint {
            name,
            constraint_type,
            columns: row.try_get_column("columns")?,
            predicate,
        });
    }

    let mut foreign_keys = Vec::new();
    for row in client.query(FOREIGN_KEYS_SQL, &[&namespace]).await? {
        let table_name: String = row.try_get_column("table_name")?;
        let name: String = row.try_get_column("name")?;
        let on_update: String = row.try_get_column("on_update")?;
        let on_delete: String = row.try_get_column("on_delete")?;
        let (Some(on_update_action), Some(on_delete_action)) =
            (referential_action(&on_update), referential_action(&on_delete))
        else {
            warn!(table = %table_name, foreign_key = %name, "unknown referential action");
            continue;
        };
        foreign_keys.push(ForeignKeyRow {
            table: table_name,
            referenced_schema: row.try_get_column("referenced_schema")?,
            foreign_key: ForeignKey {
                name,
                columns: row.try_get_column("columns")?,
                referenced_table: row.try_get_column("referenced_table")?,
                referenced_columns: row.try_get_column("referenced_columns")?,
                on_update_action,
                on_delete_action,
            },
        });
    }
    attach_foreign_keys(&mut tables, namespace, foreign_keys);

    for row in client.query(INDEXES_SQL, &[&namespace]).await? {
        let table_name: String = row.try_get_column("table_name")?;
        let Some(table) = tables.get_mut(&table_name) else {
            continue;
        };
        let is_unique: bool = row.try_get_column("is_unique")?;
        let is_partial: bool = row.try_get_column("is_partial")?;
        let key_defs: Vec<String> = row.try_get_column("key_defs")?;
        let columns = index_key_columns(&key_defs, &table.columns);
        table.indexes.push(Index {
            name: row.try_get_column("index_name")?,
            index_type: IndexType::from_flags(is_unique, is_partial),
            columns,
            predicate: row.try_get_column("predicate")?,
            is_primary: row.try_get_column("is_primary")?,
            is_unique,
            is_partial,
        });
    }

    for row in client.query(TRIGGERS_SQL, &[&namespace]).await? {
        let table_name: String = row.try_get_column("table_name")?;
        let Some(table) = tables.get_mut(&table_name) else {
            continue;
        };
        let tgtype: i32 = row.try_get_column("tgtype")?;
        let (timing, level, events) = decode_trigger_type(tgtype);
        table.triggers.push(Trigger {
            name: row.try_get_column("trigger_name")?,
            timing,
            level,
            events,
            columns: row.try_get_column("columns")?,
            definition: row.try_get_column("definition")?,
        });
    }

    let mut views = Vec::new();
    for row in client.query(VIEWS_SQL, &[&namespace]).await? {
        let name: String = row.try_get_column("view_name")?;
        let table_names = view_table_names(
            &tables,
            namespace,
            &name,
            row.try_get_column("table_schemas")?,
            row.try_get_column("table_names")?,
        );
        views.push(View {
            name,
            table_names,
            definition: row.try_get_column("definition")?,
        });
    }

    let mut tables: Vec<Table> = tables.into_values().collect();
    for table in &mut tables {
        table
            .constraints
            .sort_by(|a, b| {
                (a.constraint_type.as_str(), &a.name).cmp(&(b.constraint_type.as_str(), &b.name))
            });
        fill_part_of(table);
    }

    debug!(
        schema = %namespace,
        tables = tables.len(),
        views = views.len(),
        "schema introspected"
    );

    Ok(Schema { tables, views })
}

/// A foreign key as read from the catalog, before it is attached to its table.
struct ForeignKeyRow {
    table: String,
    referenced_schema: String,
    foreign_key: ForeignKey,
}

/// Attach foreign keys to their tables. Keys referencing another namespace or a table
/// left out of the snapshot are dropped.
fn attach_foreign_keys(
    tables: &mut BTreeMap<String, Table>,
    namespace: &str,
    rows: Vec<ForeignKeyRow>,
) {
    for row in rows {
        let fk = row.foreign_key;
        if row.referenced_schema != namespace || !tables.contains_key(&fk.referenced_table) {
            warn!(
                table = %row.table,
                foreign_key = %fk.name,
                referenced_schema = %row.referenced_schema,
                referenced_table = %fk.referenced_table,
                "skipping foreign key to a table outside the snapshot"
            );
            continue;
        }
        if let Some(table) = tables.get_mut(&row.table) {
            table.foreign_keys.push(fk);
        }
    }
}

/// Base tables of `view` that are part of the snapshot. `schemas` and `names` are the
/// parallel namespace and relation arrays read from the catalog.
fn view_table_names(
    tables: &BTreeMap<String, Table>,
    namespace: &str,
    view: &str,
    schemas: Vec<String>,
    names: Vec<String>,
) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(names.len());
    for (schema, table) in schemas.into_iter().zip(names) {
        if schema != namespace || !tables.contains_key(&table) {
            warn!(view = %view, %schema, %table, "view reads a table outside the snapshot");
            continue;
        }
        if !out.contains(&table) {
            out.push(table);
        }
    }
    out
}

fn referential_action(code: &str) -> Option<ReferentialAction> {
    code.chars().next().and_then(ReferentialAction::from_code)
}

/// Shorten `format_type` output to the usual aliases (`varchar(32)`, `timestamptz`, ...).
pub fn compact_type_name(formatted: &str) -> String {
    let mut base = formatted;
    let mut dims = 0;
    while let Some(stripped) = base.strip_suffix("[]") {
        base = stripped;
        dims += 1;
    }

    let compact = match base {
        "real" => "float4".to_string(),
        "double precision" => "float8".to_string(),
        _ => {
            if let Some(rest) = base.strip_prefix("character varying") {
                format!("varchar{rest}")
            } else if let Some(rest) = base.strip_prefix("character") {
                format!("char{rest}")
            } else if let Some(head) = base.strip_suffix(" with time zone") {
                if let Some(rest) = head.strip_prefix("timestamp") {
                    format!("timestamptz{rest}")
                } else if let Some(rest) = head.strip_prefix("time") {
                    format!("timetz{rest}")
                } else {
                    base.to_string()
                }
            } else if let Some(head) = base.strip_suffix(" without time zone") {
                head.to_string()
            } else {
                base.to_string()
            }
        }
    };

    format!("{compact}{}", "[]".repeat(dims))
}

/// `CHECK ((price >= 0))` -> `(price >= 0)`.
fn check_predicate(definition: &str) -> String {
    let trimmed = definition.trim();
    trimmed
        .strip_prefix("CHECK (")
        .and_then(|s| s.strip_suffix(')'))
        .unwrap_or(trimmed)
        .to_string()
}

/// The `WHERE (...)` clause of an EXCLUDE constraint, if any.
fn exclude_predicate(definition: &str) -> Option<String> {
    let (_, tail) = definition.rsplit_once(" WHERE (")?;
    tail.trim_end()
        .strip_suffix(')')
        .map(str::to_string)
}

/// Table columns referenced by index key definitions, in first-seen order.
///
/// Key definitions are either plain column names or expressions such as
/// `lower((email)::text)`; identifiers in them are matched case-insensitively against
/// the table's columns. Function names (`lower(`) and cast targets (`::text`) are skipped.
fn index_key_columns(key_defs: &[String], columns: &[Column]) -> Vec<String> {
    static IDENT_RE: OnceLock<regex::Regex> = OnceLock::new();
    let re = IDENT_RE.get_or_init(|| {
        regex::Regex::new(r"[A-Za-z_][A-Za-z0-9_$]*").expect("invalid built-in identifier regex")
    });

    let mut out: Vec<String> = Vec::new();
    for def in key_defs {
        let unquoted = def.replace('"', "");
        for m in re.find_iter(&unquoted) {
            let before = unquoted[..m.start()].trim_end();
            let after = unquoted[m.end()..].trim_start();
            if before.ends_with("::") || after.starts_with('(') {
                continue;
            }
            let token = m.as_str();
            let Some(column) = columns.iter().find(|c| c.name.eq_ignore_ascii_case(token)) else {
                continue;
            };
            if !out.contains(&column.name) {
                out.push(column.name.clone());
            }
        }
    }
    out
}

// pg_trigger.tgtype bits (see src/include/catalog/pg_trigger.h)
const TRIGGER_TYPE_ROW: i32 = 1 << 0;
const TRIGGER_TYPE_BEFORE: i32 = 1 << 1;
const TRIGGER_TYPE_INSERT: i32 = 1 << 2;
const TRIGGER_TYPE_DELETE: i32 = 1 << 3;
const TRIGGER_TYPE_UPDATE: i32 = 1 << 4;
const TRIGGER_TYPE_TRUNCATE: i32 = 1 << 5;
const TRIGGER_TYPE_INSTEAD: i32 = 1 << 6;

fn decode_trigger_type(tgtype: i32) -> (TriggerTiming, TriggerLevel, Vec<TriggerEvent>) {
    let timing = if tgtype & TRIGGER_TYPE_INSTEAD != 0 {
        TriggerTiming::InsteadOf
    } else if tgtype & TRIGGER_TYPE_BEFORE != 0 {
        TriggerTiming::Before
    } else {
        TriggerTiming::After
    };

    let level = if tgtype & TRIGGER_TYPE_ROW != 0 {
        TriggerLevel::Row
    } else {
        TriggerLevel::Statement
    };

    // Same order pg_get_triggerdef prints them in.
    let events = [
        (TRIGGER_TYPE_INSERT, TriggerEvent::Insert),
        (TRIGGER_TYPE_DELETE, TriggerEvent::Delete),
        (TRIGGER_TYPE_UPDATE, TriggerEvent::Update),
        (TRIGGER_TYPE_TRUNCATE, TriggerEvent::Truncate),
    ]
    .into_iter()
    .filter(|(bit, _)| tgtype & bit != 0)
    .map(|(_, event)| event)
    .collect();

    (timing, level, events)
}

/// Record on every column which constraint and index kinds it takes part in.
fn fill_part_of(table: &mut Table) {
    let memberships: Vec<(&str, &[String])> = table
        .constraints
        .iter()
        .map(|c| (c.constraint_type.as_str(), c.columns.as_slice()))
        .chain(
            table
                .indexes
                .iter()
                .map(|i| (i.index_type.as_str(), i.columns.as_slice())),
        )
        .collect();

    let mut part_of: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (kind, columns) in memberships {
        for column in columns {
            let kinds = part_of.entry(column.clone()).or_default();
            if !kinds.iter().any(|k| k == kind) {
                kinds.push(kind.to_string());
            }
        }
    }

    for column in &mut table.columns {
        column.part_of = part_of.remove(&column.name).unwrap_or_default();
    }
}

const TABLES_SQL: &str = r#"
SELECT c.relname::text AS table_name
FROM pg_catalog.pg_class c
JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace
WHERE n.nspname = $1
  AND c.relkind IN ('r', 'p')
ORDER BY c.relname
"#;

const COLUMNS_SQL: &str = r#"
SELECT
  c.relname::text AS table_name,
  a.attname::text AS column_name,
  pg_catalog.format_type(a.atttypid, a.atttypmod) AS data_type,
  NOT a.attnotnull AS nullable,
  pg_catalog.pg_get_expr(ad.adbin, ad.adrelid) AS default_value,
  (
    SELECT string_agg(
      regexp_replace(pg_catalog.pg_get_constraintdef(con.oid, true), '^CHECK \((.*)\)$', '\1'),
      ' AND ' ORDER BY con.conname
    )
    FROM pg_catalog.pg_constraint con
    WHERE con.conrelid = c.oid
      AND con.contype = 'c'
      AND a.attnum = ANY (con.conkey)
  ) AS predicate
FROM pg_catalog.pg_class c
JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace
JOIN pg_catalog.pg_attribute a ON a.attrelid = c.oid
LEFT JOIN pg_catalog.pg_attrdef ad ON ad.adrelid = c.oid AND ad.adnum = a.attnum
WHERE n.nspname = $1
  AND c.relkind IN ('r', 'p')
  AND a.attnum > 0
  AND NOT a.attisdropped
ORDER BY c.relname, a.attnum
"#;

const CONSTRAINTS_SQL: &str = r#"
SELECT
  c.relname::text AS table_name,
  con.conname::text AS constraint_name,
  con.contype::text AS contype,
  COALESCE(ARRAY(
    SELECT att.attname::text
    FROM unnest(con.conkey) WITH ORDINALITY AS k(attnum, ord)
    JOIN pg_catalog.pg_attribute att ON att.attrelid = con.conrelid AND att.attnum = k.attnum
    ORDER BY k.ord
  ), ARRAY[]::text[]) AS columns,
  pg_catalog.pg_get_constraintdef(con.oid, true) AS definition
FROM pg_catalog.pg_constraint con
JOIN pg_catalog.pg_class c ON c.oid = con.conrelid
JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace
WHERE n.nspname = $1
  AND c.relkind IN ('r', 'p')
  AND con.contype <> 'f'
ORDER BY c.relname, con.conname
"#;

const FOREIGN_KEYS_SQL: &str = r#"
SELECT
  c.relname::text AS table_name,
  con.conname::text AS name,
  COALESCE(ARRAY(
    SELECT att.attname::text
    FROM unnest(con.conkey) WITH ORDINALITY AS k(attnum, ord)
    JOIN pg_catalog.pg_attribute att ON att.attrelid = con.conrelid AND att.attnum = k.attnum
    ORDER BY k.ord
  ), ARRAY[]::text[]) AS columns,
  refn.nspname::text AS referenced_schema,
  ref.relname::text AS referenced_table,
  COALESCE(ARRAY(
    SELECT att.attname::text
    FROM unnest(con.confkey) WITH ORDINALITY AS k(attnum, ord)
    JOIN pg_catalog.pg_attribute att ON att.attrelid = con.confrelid AND att.attnum = k.attnum
    ORDER BY k.ord
  ), ARRAY[]::text[]) AS referenced_columns,
  con.confupdtype::text AS on_update,
  con.confdeltype::text AS on_delete
FROM pg_catalog.pg_constraint con
JOIN pg_catalog.pg_class c ON c.oid = con.conrelid
JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace
JOIN pg_catalog.pg_class ref ON ref.oid = con.confrelid
JOIN pg_catalog.pg_namespace refn ON refn.oid = ref.relnamespace
WHERE n.nspname = $1
  AND c.relkind IN ('r', 'p')
  AND con.contype = 'f'
ORDER BY c.relname, con.conname
"#;

const INDEXES_SQL: &str = r#"
SELECT
  ct.relname::text AS table_name,
  ci.relname::text AS index_name,
  i.indisprimary AS is_primary,
  i.indisunique AS is_unique,
  (i.indpred IS NOT NULL) AS is_partial,
  ARRAY(
    SELECT pg_catalog.pg_get_indexdef(i.indexrelid, k, true)
    FROM generate_series(1, i.indnkeyatts::int) AS k
    ORDER BY k
  )::text[] AS key_defs,
  pg_catalog.pg_get_expr(i.indpred, i.indrelid) AS predicate
FROM pg_catalog.pg_index i
JOIN pg_catalog.pg_class ct ON ct.oid = i.indrelid
JOIN pg_catalog.pg_namespace nt ON nt.oid = ct.relnamespace
JOIN pg_catalog.pg_class ci ON ci.oid = i.indexrelid
WHERE nt.nspname = $1
  AND ct.relkind IN ('r', 'p')
ORDER BY ct.relname, i.indisprimary DESC, i.indisunique DESC, ci.relname
"#;

const TRIGGERS_SQL: &str = r#"
SELECT
  c.relname::text AS table_name,
  t.tgname::text AS trigger_name,
  t.tgtype::int AS tgtype,
  COALESCE(ARRAY(
    SELECT a.attname::text
    FROM unnest(t.tgattr::int2[]) WITH ORDINALITY AS k(attnum, ord)
    JOIN pg_catalog.pg_attribute a ON a.attrelid = c.oid AND a.attnum = k.attnum
    ORDER BY k.ord
  ), ARRAY[]::text[]) AS columns,
  pg_catalog.pg_get_triggerdef(t.oid, true) AS definition
FROM pg_catalog.pg_trigger t
JOIN pg_catalog.pg_class c ON c.oid = t.tgrelid
JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace
WHERE n.nspname = $1
  AND c.relkind IN ('r', 'p')
  AND NOT t.tgisinternal
ORDER BY c.relname, t.tgname
"#;

const VIEWS_SQL: &str = r#"
SELECT
  v.relname::text AS view_name,
  COALESCE(deps.table_schemas, ARRAY[]::text[]) AS table_schemas,
  COALESCE(deps.table_names, ARRAY[]::text[]) AS table_names,
  pg_catalog.pg_get_viewdef(v.oid, true) AS definition
FROM pg_catalog.pg_class v
JOIN pg_catalog.pg_namespace n ON n.oid = v.relnamespace
LEFT JOIN LATERAL (
  SELECT
    array_agg(dep.nspname ORDER BY dep.nspname, dep.relname) AS table_schemas,
    array_agg(dep.relname ORDER BY dep.nspname, dep.relname) AS table_names
  FROM (
    SELECT DISTINCT tn.nspname::text AS nspname, t.relname::text AS relname
    FROM pg_catalog.pg_rewrite r
    JOIN pg_catalog.pg_depend d ON d.objid = r.oid
    JOIN pg_catalog.pg_class t ON t.oid = d.refobjid
    JOIN pg_catalog.pg_namespace tn ON tn.oid = t.relnamespace
    WHERE r.ev_class = v.oid
      AND t.oid <> v.oid
      AND t.relkind IN ('r', 'p')
  ) dep
) deps ON true
WHERE n.nspname = $1
  AND v.relkind IN ('v', 'm')
ORDER BY v.relname
"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn column(name: &str) -> Column {
        Column {
            name: name.to_string(),
            data_type: "text".to_string(),
            nullable: true,
            predicate: None,
            default_value: None,
            part_of: Vec::new(),
        }
    }

    fn defs(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn compacts_type_names() {
        assert_eq!(compact_type_name("character varying(32)"), "varchar(32)");
        assert_eq!(compact_type_name("character varying"), "varchar");
        assert_eq!(compact_type_name("character(5)"), "char(5)");
        assert_eq!(compact_type_name("real"), "float4");
        assert_eq!(compact_type_name("double precision"), "float8");
        assert_eq!(compact_type_name("timestamp with time zone"), "timestamptz");
        assert_eq!(compact_type_name("timestamp(3) with time zone"), "timestamptz(3)");
        assert_eq!(compact_type_name("time with time zone"), "timetz");
        assert_eq!(compact_type_name("timestamp without time zone"), "timestamp");
        assert_eq!(compact_type_name("integer[]"), "integer[]");
        assert_eq!(compact_type_name("character varying(10)[]"), "varchar(10)[]");
        assert_eq!(compact_type_name("numeric(12,2)"), "numeric(12,2)");
    }

    #[test]
    fn strips_constraint_predicates() {
        assert_eq!(check_predicate("CHECK ((price >= 0))"), "(price >= 0)");
        assert_eq!(check_predicate("CHECK (price >= 0::numeric)"), "price >= 0::numeric");
        assert_eq!(
            exclude_predicate("EXCLUDE USING gist (room WITH =, during WITH &&) WHERE (active)"),
            Some("active".to_string())
        );
        assert_eq!(
            exclude_predicate("EXCLUDE USING gist (room WITH =, during WITH &&)"),
            None
        );
    }

    #[test]
    fn extracts_index_key_columns() {
        let columns = vec![column("id"), column("email"), column("Username")];
        assert_eq!(index_key_columns(&defs(&["id"]), &columns), vec!["id"]);
        assert_eq!(
            index_key_columns(&defs(&["lower((email)::text)", "id", "email"]), &columns),
            vec!["email", "id"]
        );
        assert_eq!(
            index_key_columns(&defs(&["\"Username\""]), &columns),
            vec!["Username"]
        );
        assert!(index_key_columns(&defs(&["now()"]), &columns).is_empty());
    }

    #[test]
    fn index_keys_skip_functions_and_casts() {
        let columns = vec![column("email"), column("text"), column("lower"), column("date")];
        assert_eq!(
            index_key_columns(&defs(&["lower((email)::text)"]), &columns),
            vec!["email"]
        );
        assert_eq!(
            index_key_columns(&defs(&["date_trunc('day'::text, (date)::timestamp)"]), &columns),
            vec!["date"]
        );
        assert_eq!(
            index_key_columns(&defs(&["lower", "(text || email)"]), &columns),
            vec!["lower", "text", "email"]
        );
    }

    fn table(name: &str) -> Table {
        Table {
            name: name.to_string(),
            columns: vec![column("id")],
            constraints: Vec::new(),
            foreign_keys: Vec::new(),
            indexes: Vec::new(),
            triggers: Vec::new(),
        }
    }

    fn snapshot_tables(names: &[&str]) -> BTreeMap<String, Table> {
        names.iter().map(|n| (n.to_string(), table(n))).collect()
    }

    fn fk_row(table: &str, name: &str, referenced_schema: &str, referenced: &str) -> ForeignKeyRow {
        ForeignKeyRow {
            table: table.to_string(),
            referenced_schema: referenced_schema.to_string(),
            foreign_key: ForeignKey {
                name: name.to_string(),
                columns: defs(&["user_id"]),
                referenced_table: referenced.to_string(),
                referenced_columns: defs(&["id"]),
                on_update_action: ReferentialAction::NoAction,
                on_delete_action: ReferentialAction::NoAction,
            },
        }
    }

    #[test]
    fn foreign_keys_outside_the_namespace_are_dropped() {
        let mut tables = snapshot_tables(&["orders", "users"]);
        attach_foreign_keys(
            &mut tables,
            "public",
            vec![
                fk_row("orders", "orders_user_fk", "public", "users"),
                fk_row("orders", "orders_audit_user_fk", "audit", "users"),
                fk_row("orders", "orders_ignored_fk", "public", "schema_migrations"),
            ],
        );

        let names: Vec<&str> = tables["orders"]
            .foreign_keys
            .iter()
            .map(|fk| fk.name.as_str())
            .collect();
        assert_eq!(names, vec!["orders_user_fk"]);
        assert!(tables["users"].foreign_keys.is_empty());
    }

    #[test]
    fn view_tables_outside_the_namespace_are_dropped() {
        let tables = snapshot_tables(&["orders", "users"]);
        let names = view_table_names(
            &tables,
            "public",
            "v_orders",
            defs(&["audit", "public", "public", "public"]),
            defs(&["users", "orders", "schema_migrations", "users"]),
        );
        assert_eq!(names, vec!["orders", "users"]);
    }

    #[test]
    fn decodes_trigger_type() {
        // BEFORE UPDATE FOR EACH ROW
        let (timing, level, events) = decode_trigger_type(1 | 2 | 16);
        assert_eq!(timing, TriggerTiming::Before);
        assert_eq!(level, TriggerLevel::Row);
        assert_eq!(events, vec![TriggerEvent::Update]);

        // AFTER INSERT OR DELETE FOR EACH STATEMENT
        let (timing, level, events) = decode_trigger_type(4 | 8);
        assert_eq!(timing, TriggerTiming::After);
        assert_eq!(level, TriggerLevel::Statement);
        assert_eq!(events, vec![TriggerEvent::Insert, TriggerEvent::Delete]);

        // INSTEAD OF INSERT FOR EACH ROW
        let (timing, _, _) = decode_trigger_type(1 | 4 | 64);
        assert_eq!(timing, TriggerTiming::InsteadOf);
    }

    #[test]
    fn fills_part_of_from_constraints_and_indexes() {
        let mut table = Table {
            name: "all_types_demo".into(),
            columns: vec![column("id"), column("public_id"), column("bio")],
            constraints: vec![
                Constraint {
                    name: "ex".into(),
                    constraint_type: ConstraintType::Exclude,
                    columns: vec!["public_id".into()],
                    predicate: None,
                },
                Constraint {
                    name: "pk".into(),
                    constraint_type: ConstraintType::PrimaryKey,
                    columns: vec!["id".into()],
                    predicate: None,
                },
            ],
            foreign_keys: vec![],
            indexes: vec![
                Index {
                    name: "a".into(),
                    index_type: IndexType::Unique,
                    columns: vec!["id".into()],
                    predicate: None,
                    is_primary: true,
                    is_unique: true,
                    is_partial: false,
                },
                Index {
                    name: "b".into(),
                    index_type: IndexType::Unique,
                    columns: vec!["public_id".into()],
                    predicate: None,
                    is_primary: false,
                    is_unique: true,
                    is_partial: false,
                },
                Index {
                    name: "c".into(),
                    index_type: IndexType::Unique,
                    columns: vec!["public_id".into()],
                    predicate: None,
                    is_primary: false,
                    is_unique: true,
                    is_partial: false,
                },
            ],
            triggers: vec![],
        };
        fill_part_of(&mut table);
        assert_eq!(table.columns[0].part_of, vec!["PRIMARY KEY", "UNIQUE INDEX"]);
        assert_eq!(table.columns[1].part_of, vec!["EXCLUDE", "UNIQUE INDEX"]);
        assert!(table.columns[2].part_of.is_empty());
    }
}
