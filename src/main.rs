use clap::Parser;
use std::sync::Arc;
use tracing::{info, warn};
use visit_counter::config::ServerConfig;
use visit_counter::http::{serve_until, HttpState};
use visit_counter::{InMemoryStore, JsonFileStore, KeyValueStore, VisitTracker};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "visit_counter=info,info".into()),
        )
        .init();

    let config = ServerConfig::parse();

    match &config.data_file {
        Some(path) => {
            let store = JsonFileStore::open(path)?;
            info!("Opened visit store at {}", store.path().display());
            run(store, &config).await
        }
        None => {
            info!("Using in-memory visit store");
            run(InMemoryStore::new(), &config).await
        }
    }
}

async fn run<S>(store: S, config: &ServerConfig) -> anyhow::Result<()>
where
    S: KeyValueStore + Clone + 'static,
{
    let tracker = VisitTracker::new(store).with_limits(config.limits());
    let state = Arc::new(HttpState::new(tracker).with_country_header(&config.country_header));
    let listener = tokio::net::TcpListener::bind(config.addr()).await?;

    serve_until(state, listener, shutdown_signal()).await?;
    info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for ctrl_c signal: {}", e);
        std::future::pending::<()>().await;
    }
}
