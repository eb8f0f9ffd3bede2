use dblint::{EntityKind, IntrospectOptions, LintConfig};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_REPORT_DIR: &str = "report";
pub const DEFAULT_REPORT_FILE: &str = "dblint-report.json";
pub const DEFAULT_SNAPSHOT: &str = ".dblint/schema.json";

#[derive(Debug, Clone)]
pub struct ProjectConfig {
    pub config_dir: PathBuf,
    pub file: ConfigFile,
}

impl ProjectConfig {
    pub fn load(config_path: &Path) -> anyhow::Result<Self> {
        let config_dir = config_dir(config_path);

        let raw = std::fs::read_to_string(config_path).map_err(|e| {
            anyhow::anyhow!(
                "failed to read config file {}: {e}",
                config_path.display()
            )
        })?;

        let file = ConfigFile::parse(&raw).map_err(|e| {
            anyhow::anyhow!(
                "failed to parse config file {}: {e:#}",
                config_path.display()
            )
        })?;

        Ok(Self { config_dir, file })
    }

    /// Like [`ProjectConfig::load`], but a missing file yields the defaults when the caller
    /// already knows where the schema comes from.
    pub fn load_or_default(config_path: &Path, has_source: bool) -> anyhow::Result<Self> {
        if !config_path.exists() && has_source {
            tracing::debug!(path = %config_path.display(), "config file not found, using defaults");
            return Ok(Self {
                config_dir: config_dir(config_path),
                file: ConfigFile::default(),
            });
        }
        Self::load(config_path)
    }

    pub fn resolve_path(&self, p: impl AsRef<Path>) -> PathBuf {
        let p = p.as_ref();
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.config_dir.join(p)
        }
    }

    /// `--database` wins over `database.url`.
    pub fn database_url(&self, cli: Option<&str>) -> anyhow::Result<String> {
        match cli.or(self.file.database.url.as_deref()) {
            Some(url) => Ok(url.to_string()),
            None => anyhow::bail!(
                "no database configured: set database.url in the config file or pass --database"
            ),
        }
    }

    pub fn introspect_options(&self) -> IntrospectOptions {
        IntrospectOptions {
            schema: self.file.database.schema.clone(),
            ignore_tables: self.file.database.ignore_tables.clone(),
        }
    }

    pub fn report_path(&self, out_dir: Option<&Path>) -> PathBuf {
        let dir = match out_dir {
            Some(dir) => dir.to_path_buf(),
            None => self.resolve_path(&self.file.report.dir),
        };
        dir.join(&self.file.report.file)
    }
}

fn config_dir(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub report: ReportConfig,

    #[serde(default)]
    pub lint: LintConfig,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            version: "1".to_string(),
            database: DatabaseConfig::default(),
            report: ReportConfig::default(),
            lint: LintConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    #[serde(default = "default_schema")]
    pub schema: String,
    #[serde(default)]
    pub ignore_tables: Vec<String>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            schema: default_schema(),
            ignore_tables: Vec::new(),
        }
    }
}

fn default_schema() -> String {
    "public".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_report_dir")]
    pub dir: String,
    #[serde(default = "default_report_file")]
    pub file: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            dir: default_report_dir(),
            file: default_report_file(),
        }
    }
}

fn default_report_dir() -> String {
    DEFAULT_REPORT_DIR.to_string()
}

fn default_report_file() -> String {
    DEFAULT_REPORT_FILE.to_string()
}

impl ConfigFile {
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let mut file: ConfigFile = toml::from_str(raw)?;
        file.expand_env()?;
        file.validate()?;
        Ok(file)
    }

    fn expand_env(&mut self) -> anyhow::Result<()> {
        if let Some(url) = &self.database.url {
            self.database.url = Some(expand_env_vars(url)?);
        }
        self.database.schema = expand_env_vars(&self.database.schema)?;
        self.report.dir = expand_env_vars(&self.report.dir)?;
        self.report.file = expand_env_vars(&self.report.file)?;
        Ok(())
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.version.trim() != "1" {
            anyhow::bail!("unsupported config version: {}", self.version);
        }

        if let Some(url) = &self.database.url {
            if url.trim().is_empty() {
                anyhow::bail!("database.url must not be empty");
            }
        }
        if self.database.schema.trim().is_empty() {
            anyhow::bail!("database.schema must not be empty");
        }
        if self.report.file.trim().is_empty() {
            anyhow::bail!("report.file must not be empty");
        }

        for kind in EntityKind::ALL {
            if self.lint.max_length(kind) == 0 {
                anyhow::bail!(
                    "lint.max_length.{} must be greater than 0",
                    kind.as_str().to_ascii_lowercase()
                );
            }
        }

        Ok(())
    }
}

fn expand_env_vars(input: &str) -> anyhow::Result<String> {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '$' && chars.peek() == Some(&'{') {
            chars.next(); // consume '{'

            let mut key = String::new();
            let mut closed = false;
            for ch in chars.by_ref() {
                if ch == '}' {
                    closed = true;
                    break;
                }
                key.push(ch);
            }

            if !closed {
                anyhow::bail!("unterminated env var reference: ${{{key}");
            }
            if key.is_empty() {
                anyhow::bail!("invalid env var reference: ${{}}");
            }

            let v = std::env::var(&key)
                .map_err(|_| anyhow::anyhow!("missing env var for config expansion: {key}"))?;
            out.push_str(&v);
            continue;
        }

        out.push(c);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dblint::CaseStyle;

    #[test]
    fn minimal_config_uses_defaults() {
        let file = ConfigFile::parse("version = \"1\"\n").unwrap();
        assert_eq!(file.database.url, None);
        assert_eq!(file.database.schema, "public");
        assert_eq!(file.report.dir, DEFAULT_REPORT_DIR);
        assert_eq!(file.report.file, DEFAULT_REPORT_FILE);
        assert_eq!(file.lint, LintConfig::default());
    }

    #[test]
    fn lint_sections_map_onto_lint_config() {
        let raw = r#"
version = "1"

[database]
url = "postgres://localhost/app"
ignore_tables = ["schema_migrations"]

[lint.case]
table = "pascal_case"
column = "camel"

[lint.max_length]
foreign_key = 30

[lint.custom_names.tables]
user_group = "groups"

[lint.custom_names.columns.user_group]
id = "group_id"

[lint.ignore.user_group]
"ERROR,TABLE,user_group" = "legacy name"
"#;
        let file = ConfigFile::parse(raw).unwrap();
        let lint = &file.lint;

        assert_eq!(lint.case_style(EntityKind::Table), CaseStyle::PascalCase);
        assert_eq!(lint.case_style(EntityKind::Column), CaseStyle::CamelCase);
        assert_eq!(lint.case_style(EntityKind::Index), CaseStyle::SnakeCase);
        assert_eq!(lint.max_length(EntityKind::ForeignKey), 30);
        assert_eq!(lint.max_length(EntityKind::Table), dblint::config::DEFAULT_MAX_LENGTH);
        assert_eq!(lint.custom_names.table("user_group"), Some("groups"));
        assert_eq!(
            lint.custom_names
                .owned(EntityKind::Column, "user_group", "id"),
            Some("group_id")
        );
        assert_eq!(
            lint.ignore.reason("user_group", "ERROR,TABLE,user_group"),
            Some("legacy name")
        );
        assert_eq!(file.database.ignore_tables, vec!["schema_migrations"]);
    }

    #[test]
    fn rejects_unknown_version() {
        let err = ConfigFile::parse("version = \"2\"\n").unwrap_err();
        assert!(err.to_string().contains("unsupported config version"));
    }

    #[test]
    fn rejects_zero_max_length() {
        let err = ConfigFile::parse("version = \"1\"\n[lint.max_length]\nview = 0\n").unwrap_err();
        assert_eq!(err.to_string(), "lint.max_length.view must be greater than 0");
    }

    #[test]
    fn expands_env_vars() {
        // SAFETY: the variable name is unique to this test.
        unsafe { std::env::set_var("DBLINT_TEST_CONFIG_HOST", "db.internal") };
        let out = expand_env_vars("postgres://${DBLINT_TEST_CONFIG_HOST}/app").unwrap();
        assert_eq!(out, "postgres://db.internal/app");
    }

    #[test]
    fn env_var_errors() {
        assert!(expand_env_vars("${DBLINT_TEST_SURELY_UNSET_VAR}").is_err());
        assert!(expand_env_vars("${UNTERMINATED").is_err());
        assert!(expand_env_vars("${}").is_err());
        assert_eq!(expand_env_vars("$HOME and $").unwrap(), "$HOME and $");
    }

    #[test]
    fn cli_database_overrides_config() {
        let project = ProjectConfig {
            config_dir: PathBuf::from("."),
            file: ConfigFile::parse("version = \"1\"\n[database]\nurl = \"postgres://a\"\n")
                .unwrap(),
        };
        assert_eq!(project.database_url(None).unwrap(), "postgres://a");
        assert_eq!(
            project.database_url(Some("postgres://b")).unwrap(),
            "postgres://b"
        );

        let empty = ProjectConfig {
            config_dir: PathBuf::from("."),
            file: ConfigFile::default(),
        };
        assert!(empty.database_url(None).is_err());
    }

    #[test]
    fn report_path_is_relative_to_config_dir() {
        let project = ProjectConfig {
            config_dir: PathBuf::from("project"),
            file: ConfigFile::default(),
        };
        assert_eq!(
            project.report_path(None),
            PathBuf::from("project/report/dblint-report.json")
        );
        assert_eq!(
            project.report_path(Some(Path::new("out"))),
            PathBuf::from("out/dblint-report.json")
        );
    }

    #[test]
    fn missing_file_is_allowed_with_a_source() {
        let path = Path::new("/nonexistent/dblint/dblint.toml");
        assert!(ProjectConfig::load_or_default(path, true).is_ok());
        assert!(ProjectConfig::load_or_default(path, false).is_err());
    }
}
