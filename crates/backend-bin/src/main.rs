use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use backend_lib::{
    config::Settings,
    repository::MemoryUserRepository,
    router,
    store::{ExpiringStore, MemoryStore, RedisStore},
    AppState,
};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Gatekeeper auth server
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// TOML config file; defaults to config.{toml,yaml,json} in the working directory
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the bind address from the config
    #[arg(long)]
    bind: Option<SocketAddr>,

    /// Keep sessions in process memory instead of Redis
    #[arg(long)]
    memory_sessions: bool,
}

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log_level.as_str()));

    if settings.log_json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    }
    .context("failed to load settings")?;
    if let Some(bind) = cli.bind {
        settings.bind_addr = bind;
    }

    init_tracing(&settings);

    let session_ttl = settings.session_ttl();
    let sessions: Arc<dyn ExpiringStore> = if cli.memory_sessions {
        warn!("sessions are kept in memory and are lost on restart");
        Arc::new(MemoryStore::new(session_ttl))
    } else {
        Arc::new(
            RedisStore::connect(&settings.redis, session_ttl)
                .await
                .context("failed to connect to redis")?,
        )
    };

    // User records live in process memory until a relational repository is wired in
    let users = Arc::new(MemoryUserRepository::new());

    let addr = settings.bind_addr;
    let state = Arc::new(AppState::new(settings, users, sessions)?);
    let app = router::create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
    }
}
