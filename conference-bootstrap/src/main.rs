use anyhow::Result;
use clap::Parser;

use conference_bootstrap::Command;

#[derive(Parser, Debug)]
#[command(name = "conference-sync")]
#[command(about = "Fetch conference events and import them into the local store", long_about = None)]
struct Args {
    /// Path to config file
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    if let Some(config) = args.config {
        std::env::set_var("CONFERENCE_CONFIG", config);
    }

    conference_bootstrap::run(args.command.unwrap_or_default()).await
}
