mod analysis;
mod api;
mod bulk;
mod config;
mod error;
mod report;
mod state;
mod types;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::api::routes::{router, ApiState};
use crate::config::Config;
use crate::error::Result;
use crate::state::SessionStore;

#[tokio::main]
async fn main() {
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(cfg: Config) -> Result<()> {
    // Sessions are process-lifetime only; nothing survives a restart.
    let store = SessionStore::new();
    info!("Session store ready (in-memory)");

    let app = router(ApiState { store });
    let bind_addr = format!("0.0.0.0:{}", cfg.api_port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("HTTP API listening on {bind_addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
