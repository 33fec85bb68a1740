use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use todo_server::{app, cors_layer, store, Config, TodoService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    todo_server::config::load_dotenv().context("failed to load .env")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();

    let store = store::connect(&config.database_url)
        .with_context(|| format!("failed to open store at {}", config.database_url))?;
    let service = TodoService::new(store);

    let origins = config
        .origin_headers()
        .context("ALLOWED_ORIGINS contains an invalid origin")?;
    let router = app(service.clone(), cors_layer(origins));

    let addr = config.listen_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, database_url = %config.database_url, "listening");

    todo_server::run_until(listener, router, shutdown_signal()).await?;

    info!("server stopped, closing store");
    if let Err(err) = service.shutdown().await {
        warn!(error = %err, "store did not close cleanly");
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
