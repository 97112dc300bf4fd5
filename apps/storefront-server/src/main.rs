use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use session_token::TokenIssuer;
use storefront_security::{Identity, Role};
use storefront_server::{AppConfig, logging, server};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Storefront server with the request authorization gate.
#[derive(Parser)]
#[command(name = "storefront-server", version, about, long_about = None)]
struct Cli {
    /// Path to a YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Print a signed session token for local testing
    IssueToken {
        /// Subject identifier carried in the `id` claim
        #[arg(long)]
        subject: String,
        /// Role tag: admin or customer
        #[arg(long)]
        role: Role,
        /// Lifetime such as `15m` or `2h`; defaults to `session.token_ttl_secs`
        #[arg(long, value_parser = humantime::parse_duration)]
        ttl: Option<Duration>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            logging::init(&config.logging)?;
            tracing::info!(
                bind_addr = %config.server.bind_addr,
                login_path = %config.auth_gate.login_path,
                "Starting storefront server"
            );
            server::serve(&config).await
        }
        Command::IssueToken { subject, role, ttl } => {
            let issuer = TokenIssuer::from_config(&config.session)
                .context("invalid session configuration")?;
            let identity = Identity::new(subject, role);
            let token = match ttl {
                Some(ttl) => issuer.issue_with_ttl(&identity, ttl),
                None => issuer.issue(&identity),
            }
            .context("failed to issue session token")?;
            println!("{token}");
            Ok(())
        }
    }
}
