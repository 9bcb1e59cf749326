use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use rowgate::meta::MetaRefresher;
use rowgate::{router, AppConfig, AppState};

#[derive(Debug, Parser)]
#[command(name = "rowgate", version, about = "Row-isolating gateway for a multi-tenant data backend")]
struct Cli {
    /// Listening port (overrides PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Seconds between metadata refreshes (overrides META_REFRESH_SECS)
    #[arg(long)]
    refresh_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up BACKEND_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("rowgate=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::from_env().context("invalid configuration")?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(secs) = cli.refresh_secs.filter(|s| *s > 0) {
        config.meta.refresh_interval_secs = secs;
    }

    let port = config.server.port;
    let refresh_interval = config.refresh_interval();
    let state = AppState::from_config(config).context("failed to initialize gateway")?;

    // Startup load is synchronous; a failure leaves the cache empty and names pass through raw
    state.meta.load().await;
    let refresher = MetaRefresher::spawn(state.meta.clone(), refresh_interval);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("rowgate listening on http://{}", bind_addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    refresher.stop().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
