use std::path::PathBuf;

pub const DEFAULT_CONFIG: &str = "dblint.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpTopic {
    Root,
    Lint,
    Schema,
    Init,
}

#[derive(Debug, Clone)]
pub enum Command {
    Help(HelpTopic),
    Version,
    Lint(LintArgs),
    Schema(SchemaArgs),
    Init(InitArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl OutputFormat {
    fn parse(v: &str) -> anyhow::Result<Self> {
        match v {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            other => anyhow::bail!("unknown --format: {other} (expected table or json)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LintArgs {
    pub config: PathBuf,
    pub database: Option<String>,
    pub schema_file: Option<PathBuf>,
    pub out: Option<PathBuf>,
    pub format: OutputFormat,
    pub quiet: bool,
}

#[derive(Debug, Clone)]
pub struct SchemaArgs {
    pub config: PathBuf,
    pub database: Option<String>,
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct InitArgs {
    pub config: PathBuf,
}

pub fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let mut it = args.iter().skip(1).map(String::as_str);
    let Some(cmd) = it.next() else {
        return Ok(Command::Help(HelpTopic::Root));
    };

    match cmd {
        "-h" | "--help" | "help" => Ok(Command::Help(HelpTopic::Root)),
        "-V" | "--version" => Ok(Command::Version),
        "lint" => parse_lint(it),
        "schema" => parse_schema(it),
        "init" => parse_init(it),
        other => anyhow::bail!("unknown command: {other}"),
    }
}

/// Value of `--flag <v>` or `--flag=<v>`; `None` when `token` is not `flag`.
fn flag_value<'a>(
    flag: &str,
    token: &'a str,
    it: &mut impl Iterator<Item = &'a str>,
) -> anyhow::Result<Option<&'a str>> {
    if token == flag {
        let Some(v) = it.next() else {
            anyhow::bail!("{flag} requires a value");
        };
        return Ok(Some(v));
    }
    match token.strip_prefix(flag).and_then(|rest| rest.strip_prefix('=')) {
        Some(v) => Ok(Some(v)),
        None => Ok(None),
    }
}

fn parse_lint<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut config = PathBuf::from(DEFAULT_CONFIG);
    let mut database: Option<String> = None;
    let mut schema_file: Option<PathBuf> = None;
    let mut out: Option<PathBuf> = None;
    let mut format = OutputFormat::default();
    let mut quiet = false;

    while let Some(token) = it.next() {
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Lint)),
            "-q" | "--quiet" => quiet = true,
            _ => {
                if let Some(v) = flag_value("--config", token, &mut it)? {
                    config = PathBuf::from(v);
                } else if let Some(v) = flag_value("--database", token, &mut it)? {
                    database = Some(v.to_string());
                } else if let Some(v) = flag_value("--schema-file", token, &mut it)? {
                    schema_file = Some(PathBuf::from(v));
                } else if let Some(v) = flag_value("--out", token, &mut it)? {
                    out = Some(PathBuf::from(v));
                } else if let Some(v) = flag_value("--format", token, &mut it)? {
                    format = OutputFormat::parse(v)?;
                } else {
                    anyhow::bail!("unknown argument: {token}");
                }
            }
        }
    }

    if database.is_some() && schema_file.is_some() {
        anyhow::bail!("--database and --schema-file are mutually exclusive");
    }

    Ok(Command::Lint(LintArgs {
        config,
        database,
        schema_file,
        out,
        format,
        quiet,
    }))
}

fn parse_schema<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut config = PathBuf::from(DEFAULT_CONFIG);
    let mut database: Option<String> = None;
    let mut output: Option<PathBuf> = None;

    while let Some(token) = it.next() {
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Schema)),
            _ => {
                if let Some(v) = flag_value("--config", token, &mut it)? {
                    config = PathBuf::from(v);
                } else if let Some(v) = flag_value("--database", token, &mut it)? {
                    database = Some(v.to_string());
                } else if let Some(v) = flag_value("--output", token, &mut it)? {
                    output = Some(PathBuf::from(v));
                } else {
                    anyhow::bail!("unknown argument: {token}");
                }
            }
        }
    }

    Ok(Command::Schema(SchemaArgs {
        config,
        database,
        output,
    }))
}

fn parse_init<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut config = PathBuf::from(DEFAULT_CONFIG);

    while let Some(token) = it.next() {
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Init)),
            _ => {
                if let Some(v) = flag_value("--config", token, &mut it)? {
                    config = PathBuf::from(v);
                } else {
                    anyhow::bail!("unknown argument: {token}");
                }
            }
        }
    }

    Ok(Command::Init(InitArgs { config }))
}

pub fn print_help(topic: HelpTopic) {
    match topic {
        HelpTopic::Root => {
            println!(
                "\
dblint - naming-convention linter for PostgreSQL schemas

USAGE:
  dblint <COMMAND> [OPTIONS]

COMMANDS:
  lint          Suggest canonical names and report violations
  schema        Write a JSON snapshot of the database schema
  init          Create a dblint.toml template

OPTIONS:
  -h, --help            Print help
  -V, --version         Print version

Run `dblint <command> --help` for more."
            );
        }
        HelpTopic::Lint => {
            println!(
                "\
USAGE:
  dblint lint [OPTIONS]

OPTIONS:
  --config <FILE>       Config file path (default: dblint.toml)
  --database <URL>      Override database.url from config
  --schema-file <FILE>  Lint a schema snapshot instead of a live database
  --out <DIR>           Report directory (default: report.dir or report/)
  --format <FORMAT>     Console output: table | json (default: table)
  -q, --quiet           Only print the summary
  -h, --help            Print help

Exits non-zero when any error is not covered by an ignore rule."
            );
        }
        HelpTopic::Schema => {
            println!(
                "\
USAGE:
  dblint schema [OPTIONS]

OPTIONS:
  --config <FILE>       Config file path (default: dblint.toml)
  --database <URL>      Override database.url from config
  --output <FILE>       Snapshot path (default: .dblint/schema.json)
  -h, --help            Print help"
            );
        }
        HelpTopic::Init => {
            println!(
                "\
USAGE:
  dblint init [OPTIONS]

OPTIONS:
  --config <FILE>       Config file path (default: dblint.toml)
  -h, --help            Print help"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: &[&str]) -> Vec<String> {
        std::iter::once("dblint")
            .chain(v.iter().copied())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn no_arguments_prints_root_help() {
        let cmd = parse_args(&args(&[])).unwrap();
        assert!(matches!(cmd, Command::Help(HelpTopic::Root)));
    }

    #[test]
    fn parse_lint_with_all_options() {
        let cmd = parse_args(&args(&[
            "lint",
            "--config",
            "conf/dblint.toml",
            "--schema-file=.dblint/schema.json",
            "--out",
            "target/report",
            "--format=json",
            "-q",
        ]))
        .unwrap();
        let Command::Lint(lint) = cmd else {
            panic!("expected lint");
        };

        assert_eq!(lint.config, PathBuf::from("conf/dblint.toml"));
        assert_eq!(lint.schema_file, Some(PathBuf::from(".dblint/schema.json")));
        assert_eq!(lint.out, Some(PathBuf::from("target/report")));
        assert_eq!(lint.format, OutputFormat::Json);
        assert!(lint.quiet);
        assert!(lint.database.is_none());
    }

    #[test]
    fn parse_lint_defaults() {
        let Command::Lint(lint) = parse_args(&args(&["lint"])).unwrap() else {
            panic!("expected lint");
        };
        assert_eq!(lint.config, PathBuf::from(DEFAULT_CONFIG));
        assert_eq!(lint.format, OutputFormat::Table);
        assert!(!lint.quiet);
    }

    #[test]
    fn database_and_schema_file_conflict() {
        let err = parse_args(&args(&[
            "lint",
            "--database",
            "postgres://localhost/app",
            "--schema-file",
            "schema.json",
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("mutually exclusive"));
    }

    #[test]
    fn parse_schema_output() {
        let Command::Schema(schema) =
            parse_args(&args(&["schema", "--database=postgres://x", "--output", "s.json"]))
                .unwrap()
        else {
            panic!("expected schema");
        };
        assert_eq!(schema.database.as_deref(), Some("postgres://x"));
        assert_eq!(schema.output, Some(PathBuf::from("s.json")));
    }

    #[test]
    fn help_at_every_level() {
        for (input, topic) in [
            (vec!["--help"], HelpTopic::Root),
            (vec!["lint", "--help"], HelpTopic::Lint),
            (vec!["schema", "-h"], HelpTopic::Schema),
            (vec!["init", "--help"], HelpTopic::Init),
        ] {
            let cmd = parse_args(&args(&input)).unwrap();
            assert!(matches!(cmd, Command::Help(t) if t == topic), "{input:?}");
        }
    }

    #[test]
    fn missing_value_is_an_error() {
        let err = parse_args(&args(&["lint", "--out"])).unwrap_err();
        assert_eq!(err.to_string(), "--out requires a value");
    }

    #[test]
    fn unknown_arguments_are_rejected() {
        assert!(parse_args(&args(&["lint", "--bogus"])).is_err());
        assert!(parse_args(&args(&["lint", "--format", "xml"])).is_err());
        assert!(parse_args(&args(&["migrate"])).is_err());
        // A flag name that only shares a prefix is not a match.
        assert!(parse_args(&args(&["lint", "--outdir=x"])).is_err());
    }
}
