use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "meetrec", about = "Meeting recorder with transcription pipeline")]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand)]
pub enum CliCommand {
    /// Print the version
    Version,
    /// Show the running service's session status
    Status,
    /// Start a recording session on the running service
    Start(StartArgs),
    /// Stop the session and run the transcription pipeline
    Stop(StopArgs),
}

#[derive(Args)]
pub struct StartArgs {
    /// Title for the recorded meeting
    #[arg(long)]
    pub title: Option<String>,
}

#[derive(Args)]
pub struct StopArgs {
    /// Title for the recorded meeting (overrides the one given at start)
    #[arg(long)]
    pub title: Option<String>,
}
