use anyhow::Result;
use clap::Parser;
use meetrec::{
    app,
    cli::{
        handle_start_command, handle_status_command, handle_stop_command, Cli, CliCommand,
    },
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_level = if cli.verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Some(CliCommand::Version) => {
            println!("meetrec {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Some(CliCommand::Status) => {
            handle_status_command().await?;
            return Ok(());
        }
        Some(CliCommand::Start(args)) => {
            handle_start_command(args).await?;
            return Ok(());
        }
        Some(CliCommand::Stop(args)) => {
            handle_stop_command(args).await?;
            return Ok(());
        }
        None => {}
    }

    app::run_service().await
}
