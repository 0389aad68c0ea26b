//! DocuSeal proxy server
//!
//! Serves the `/api/docuseal/*` routes. `--issue-session` prints a session
//! token for the given email and exits.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use docuseal_proxy::{app, auth, config::Config, AppState};

#[derive(Parser, Debug)]
#[command(name = "docuseal-proxy")]
#[command(about = "Session-gated proxy in front of the DocuSeal API")]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "3000")]
    port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Print a session token for EMAIL, signed with AUTH_SECRET, and exit
    #[arg(long, value_name = "EMAIL")]
    issue_session: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(format!("docuseal_proxy={}", level).parse()?)
                .add_directive("tower_http=debug".parse()?),
        )
        .init();

    let config = Config::from_env();

    if let Some(email) = args.issue_session {
        let secret = config
            .auth_secret
            .as_deref()
            .context("AUTH_SECRET must be set to issue session tokens")?;
        let token = auth::issue_session(&email, secret, auth::now())?;
        println!("{}", token);
        return Ok(());
    }

    if !config.has_api_key() {
        warn!("DOCUSEAL_API_KEY is not set; upstream calls will be unauthenticated");
    }
    if config.auth_secret.is_none() {
        warn!("AUTH_SECRET is not set; session-gated routes will answer 401");
    }

    info!("Forwarding to {}", config.docuseal_url);
    let state = Arc::new(AppState::new(config));

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("DocuSeal proxy listening on http://{}", addr);

    axum::serve(listener, app(state)).await?;

    Ok(())
}
