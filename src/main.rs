//! Lezit Transports API server
//!
//! Usage: `lezit-server [config.yaml]`. Without an argument the path is read
//! from `LEZIT_CONFIG`; without either, defaults and `LEZIT_*` variables apply.

use anyhow::Result;
use lezit::prelude::*;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("lezit=info,tower_http=info"));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("LEZIT_CONFIG").ok())
        .map(PathBuf::from);

    let config = AppConfig::load(config_path.as_deref())?;
    init_tracing(config.logging.json);

    if config.uses_development_secret() {
        tracing::warn!("using the built-in development JWT secret; set auth.jwt_secret for production");
    }
    if let Some(path) = &config_path {
        tracing::info!(path = %path.display(), "configuration loaded");
    }

    let stores = Stores::connect(&config.database).await?;
    tracing::info!(backend = ?config.database.backend, "storage ready");

    ServerBuilder::new(config)
        .with_stores(stores)
        .register_module(TransportModule)
        .serve()
        .await
}
