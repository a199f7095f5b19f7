use std::{net::SocketAddr, sync::Arc};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use weight_log::{
    AppState, Config,
    config::StoreKind,
    llm::ChatClient,
    router,
    store::{FileKv, KvStore, MemoryKv},
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env()?;

    let kv: Arc<dyn KvStore> = match config.store {
        StoreKind::File => {
            let kv = FileKv::open(&config.data_dir).await?;
            info!("storing records under {}", kv.dir().display());
            Arc::new(kv)
        }
        StoreKind::Memory => {
            warn!("using in-memory store; records are lost on exit");
            Arc::new(MemoryKv::new())
        }
    };

    let mut state = AppState::new(kv, config.target_weight);
    match &config.ai {
        Some(ai) => {
            info!(model = %ai.model, "AI analysis enabled");
            state = state.with_analyst(Arc::new(ChatClient::new(ai)?));
        }
        None => info!("AI_API_URL not set; analysis uses the rule-based summary"),
    }

    let addr = SocketAddr::new(config.bind, config.port);
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
