use std::env;
use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use tracing::{error, info, warn};

use org_client_bootstrap::app::{AppState, ClientRegistry, OrchestratorConfig, RegistrySettings};
use org_client_bootstrap::domain::NetworkConfig;
use org_client_bootstrap::infra::HttpOrganizationGateway;
use org_client_bootstrap::infra::observability::{init_metrics, init_tracing};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();
    init_tracing();
    match init_metrics() {
        Ok(true) => info!("metrics exporter listening"),
        Ok(false) => {}
        Err(e) => warn!(error = %e, "failed to install metrics exporter"),
    }

    let config_path =
        env::var("NETWORK_CONFIG").unwrap_or_else(|_| "network-config.json".to_string());
    let network = NetworkConfig::from_path(&config_path)?;
    let settings = RegistrySettings::from_env();
    info!(
        org_id = %settings.org_id,
        peers = network.peers.len(),
        config = %config_path,
        "loaded network configuration"
    );

    let registry = Arc::new(ClientRegistry::build(&network, &settings));
    let gateway = Arc::new(HttpOrganizationGateway::with_defaults()?);
    let state = AppState::new(registry, gateway, OrchestratorConfig::from_env()?);

    // Bring-up failure is fatal for the whole process: exiting here
    // guarantees no half-initialized client is ever served to a caller.
    if let Err(e) = state.orchestrator.initiate().await {
        error!(error = %e, "Fatal error logging into blockchain organization clients!");
        std::process::exit(1);
    }

    info!(
        workers = state.registry.len(),
        "blockchain clients ready; press ctrl-c to stop"
    );
    tokio::signal::ctrl_c().await?;
    info!("shutting down");
    Ok(())
}
