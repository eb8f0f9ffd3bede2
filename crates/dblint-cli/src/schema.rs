use crate::cli::SchemaArgs;
use crate::config::{DEFAULT_SNAPSHOT, ProjectConfig};
use dblint::{PgSchemaProvider, SchemaProvider, SchemaSnapshot};
use tokio_postgres::NoTls;

pub async fn run(args: SchemaArgs) -> anyhow::Result<()> {
    let project = ProjectConfig::load_or_default(&args.config, args.database.is_some())?;
    let database_url = project.database_url(args.database.as_deref())?;
    let options = project.introspect_options();

    let client = connect_db(&database_url).await?;
    let namespace = options.schema.clone();
    let schema = PgSchemaProvider::new(&client, options)
        .get_schema()
        .await
        .map_err(|e| anyhow::anyhow!("failed to introspect schema {namespace}: {e}"))?;

    let output = match args.output {
        Some(p) => p,
        None => project.resolve_path(DEFAULT_SNAPSHOT),
    };

    let snapshot = SchemaSnapshot::new(namespace, schema);
    snapshot.write(&output)?;

    println!(
        "wrote {} ({} tables, {} views)",
        output.display(),
        snapshot.schema.tables.len(),
        snapshot.schema.views.len()
    );
    Ok(())
}

pub async fn connect_db(database_url: &str) -> anyhow::Result<tokio_postgres::Client> {
    let (client, connection) = tokio_postgres::connect(database_url, NoTls)
        .await
        .map_err(|e| anyhow::anyhow!("failed to connect to database: {e}"))?;
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            tracing::error!(error = %e, "postgres connection error");
        }
    });
    Ok(client)
}
