use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use pharmai_core::Ledger;
use pharmai_server::config::{self, Config, APP_VERSION};
use pharmai_server::state::{build_inferencer, load_store};
use pharmai_server::{api_router, AppState};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("PharmAI starting v{}", APP_VERSION);

    let config = Config::from_env().context("invalid configuration")?;

    let store = match load_store(&config) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::error!(error = %e, "Interaction dataset rejected, refusing to start");
            return Err(e).context("cannot load interaction dataset");
        }
    };

    // The blocking HTTP client must be created and finally dropped outside
    // the runtime; `inferencer` holds a handle until after shutdown.
    let inferencer = build_inferencer(&config).context("cannot build inference client")?;

    let addr = config.socket_addr();
    let state = AppState::new(config, store, Arc::new(Ledger::demo()), inferencer.clone());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("cannot start async runtime")?;
    let served = runtime.block_on(serve(state, addr));

    drop(runtime);
    drop(inferencer);
    served
}

async fn serve(state: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    let app = api_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("cannot bind {}", addr))?;
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Cannot listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
