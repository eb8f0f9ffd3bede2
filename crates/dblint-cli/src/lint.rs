use crate::cli::{LintArgs, OutputFormat};
use crate::config::ProjectConfig;
use crate::reporter;
use crate::schema::connect_db;
use crate::write::write_atomic;
use dblint::{Lint, Linter, PgSchemaProvider, SchemaSnapshot};

pub async fn run(args: LintArgs) -> anyhow::Result<()> {
    let has_source = args.database.is_some() || args.schema_file.is_some();
    let project = ProjectConfig::load_or_default(&args.config, has_source)?;
    let linter = Linter::new(project.file.lint.clone());

    let lint = match &args.schema_file {
        Some(path) => {
            let snapshot = SchemaSnapshot::read(path)?;
            tracing::info!(
                path = %path.display(),
                namespace = %snapshot.namespace,
                retrieved_at = %snapshot.retrieved_at,
                "linting schema snapshot"
            );
            linter.lint(&snapshot).await?
        }
        None => {
            let database_url = project.database_url(args.database.as_deref())?;
            let client = connect_db(&database_url).await?;
            let provider = PgSchemaProvider::new(&client, project.introspect_options());
            linter.lint(&provider).await?
        }
    };

    let report_path = project.report_path(args.out.as_deref());
    let json = serde_json::to_string_pretty(&lint)?;
    write_atomic(&report_path, &json)?;

    match args.format {
        OutputFormat::Json => println!("{json}"),
        OutputFormat::Table => {
            if !args.quiet {
                reporter::print_findings(&lint);
                reporter::print_renames(&lint);
            }
            reporter::print_summary(&lint, &report_path);
        }
    }

    check_passing(&lint)
}

fn check_passing(lint: &Lint) -> anyhow::Result<()> {
    if lint.is_passing() {
        return Ok(());
    }
    let unresolved = lint.stats.error.saturating_sub(lint.stats.ignored_error);
    anyhow::bail!("lint failed: {unresolved} unresolved naming error(s)")
}

#[cfg(test)]
mod tests {
    use super::*;
    use dblint::Stats;

    #[test]
    fn passing_only_when_every_error_is_ignored() {
        let mut lint = Lint::default();
        assert!(check_passing(&lint).is_ok());

        lint.stats = Stats {
            info: 3,
            warning: 0,
            error: 2,
            ignored_error: 2,
        };
        assert!(check_passing(&lint).is_ok());

        lint.stats.ignored_error = 1;
        let err = check_passing(&lint).unwrap_err();
        assert_eq!(
            err.to_string(),
            "lint failed: 1 unresolved naming error(s)"
        );
    }
}
