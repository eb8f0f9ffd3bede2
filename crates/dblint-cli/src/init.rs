use crate::cli::InitArgs;
use crate::write::write_atomic;
use std::path::Path;

pub fn run(args: InitArgs) -> anyhow::Result<()> {
    write_template(&args.config)?;
    println!("wrote {}", args.config.display());
    Ok(())
}

const TEMPLATE: &str = r#"
version = "1"

[database]
url = "${DATABASE_URL}"
schema = "public"
# Tables left out of the lint entirely.
ignore_tables = []

[report]
dir = "report"
file = "dblint-report.json"

# snake_case | camel_case | pascal_case
[lint.case]
table = "snake_case"
column = "snake_case"
constraint = "snake_case"
index = "snake_case"
foreign_key = "snake_case"
view = "snake_case"
trigger = "snake_case"

[lint.max_length]
table = 63
column = 63
constraint = 63
index = 63
foreign_key = 63
view = 63
trigger = 63

# Explicit names bypass the generator and its validation.
#
# [lint.custom_names.tables]
# user_group = "groups"
#
# [lint.custom_names.columns.user_group]
# id = "group_id"

# Accepted findings, keyed by the owning table or view:
# "TYPE,ENTITY,IDENTIFIER" = "reason"
#
# [lint.ignore.user_group]
# "ERROR,TABLE,user_group" = "renamed in the next release"
"#;

fn write_template(path: &Path) -> anyhow::Result<()> {
    if path.exists() {
        anyhow::bail!("refusing to overwrite existing file: {}", path.display());
    }
    write_atomic(path, TEMPLATE.trim_start_matches('\n'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigFile;

    #[test]
    fn template_parses() {
        let raw = TEMPLATE.replace("${DATABASE_URL}", "postgres://localhost/app");
        let file = ConfigFile::parse(&raw).unwrap();
        assert_eq!(file.database.schema, "public");
        assert_eq!(file.lint, dblint::LintConfig::default());
    }

    #[test]
    fn refuses_to_overwrite() {
        let dir = std::env::temp_dir().join(format!("dblint-cli-init-{}", std::process::id()));
        let path = dir.join("dblint.toml");

        write_template(&path).unwrap();
        let err = write_template(&path).unwrap_err();
        assert!(err.to_string().contains("refusing to overwrite"));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
