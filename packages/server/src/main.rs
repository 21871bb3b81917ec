use std::time::Duration;

use anyhow::Context as _;
use api::TokenKeys;
use clap::{Parser, Subcommand};
use server::Settings;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "memo-server", about = "GraphQL memo API server")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the server (default).
    Serve,
    /// Print a bearer token for NAME signed with the configured secret.
    IssueToken {
        name: String,
        /// Lifetime in seconds; defaults to auth.token_ttl_secs.
        #[arg(long)]
        ttl_secs: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let settings = Settings::from_file(&cli.config).context("Failed to load settings")?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => server::launch(settings).await,
        Command::IssueToken { name, ttl_secs } => {
            let keys = TokenKeys::new(settings.auth.secret.as_bytes());
            let ttl = Duration::from_secs(ttl_secs.unwrap_or(settings.auth.token_ttl_secs));
            let token = keys.issue(&name, ttl)?;
            println!("{token}");
            Ok(())
        }
    }
}
