mod cli;
mod config;
mod init;
mod lint;
mod reporter;
mod schema;
mod write;

pub async fn run(args: Vec<String>) -> anyhow::Result<()> {
    let cmd = cli::parse_args(&args)?;
    match cmd {
        cli::Command::Help(topic) => {
            cli::print_help(topic);
            Ok(())
        }
        cli::Command::Version => {
            println!("dblint {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        cli::Command::Lint(args) => lint::run(args).await,
        cli::Command::Schema(args) => schema::run(args).await,
        cli::Command::Init(args) => init::run(args),
    }
}
