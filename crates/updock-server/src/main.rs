// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of Updock.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use updock_catalog::{ArtifactStore, Catalog, EventLog, Resolver, TracingLog};
use updock_server::api::{self, AppState};
use updock_server::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("updock_server=info,updock_catalog=info")),
        )
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "updock.toml".to_owned());
    info!(path = %config_path, "Loading configuration");
    let config = ServerConfig::load(&config_path)?
        .with_catalog_override(std::env::var("UPDOCK_CATALOG").ok());

    let log: Arc<dyn EventLog> = Arc::new(TracingLog);
    let catalog = Arc::new(Catalog::load(&config.catalog_source(), log.as_ref()));

    let state = AppState {
        resolver: Resolver::new(catalog, Arc::clone(&log)),
        artifacts: ArtifactStore::new(config.catalog.artifact_root.clone(), log),
    };
    info!(root = %state.artifacts.root().display(), "Serving artifacts");

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Updock listening on {addr}");
    axum::serve(listener, api::router(state)).await?;

    Ok(())
}
