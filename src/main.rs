//! PetShelf server entry point.

use anyhow::Context;
use clap::Parser;
use petshelf::{
    api::routes::create_app,
    auth::jwt::TokenCodec,
    utils::config::{LogFormat, PetShelfConfig},
    AppState,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// PetShelf - multi-tenant pet supply listings
#[derive(Parser, Debug)]
#[command(
    name = "petshelf-server",
    version,
    about = "PetShelf - multi-tenant pet supply listings API",
    after_help = "EXAMPLES:\n    \
                  petshelf-server                        # Start with petshelf.toml (or defaults)\n    \
                  petshelf-server --config prod.toml     # Use a custom config file\n    \
                  JWT_SECRET=... petshelf-server --port 8080"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "petshelf.toml", env = "PETSHELF_CONFIG")]
    config: PathBuf,

    /// Bind address (overrides config and HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port (overrides config and PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(config: &PetShelfConfig, verbose: bool) {
    let default_level = if verbose {
        "debug"
    } else {
        config.server.log_level.as_str()
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("petshelf={0},tower_http={0}", default_level)));

    let registry = tracing_subscriber::registry().with(filter);
    match config.server.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => tracing::error!(error = %e, "failed to listen for SIGTERM"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = PetShelfConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    config.apply_env_overrides()?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    config.validate()?;

    init_tracing(&config, cli.verbose);

    let secret = config.jwt_secret()?;
    let codec = Arc::new(TokenCodec::new(
        secret.as_bytes(),
        config.auth.token_expiry_secs,
    ));

    let provider = config.database_provider();
    tracing::info!(%provider, "opening database");
    let store = Arc::new(provider.create_client().await?);

    let state = AppState::new(store, codec)?;
    let app = create_app(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    tracing::info!(%addr, "petshelf listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
