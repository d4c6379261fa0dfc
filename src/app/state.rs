//! Application state management.
//!
//! The process-wide context object: built once at startup and passed by
//! reference to whatever consumes the blockchain clients.

use std::sync::Arc;

use crate::domain::OrganizationGateway;

use super::orchestrator::{InitOrchestrator, OrchestratorConfig};
use super::registry::ClientRegistry;

/// Shared application state.
///
/// Holds the client registry, the gateway it talks through, and the
/// orchestrator wired to both. Downstream blockchain-interaction code reads
/// the handles through [`AppState::registry`]; nothing here is mutated after
/// construction.
#[derive(Clone)]
pub struct AppState {
    /// The fixed set of client handles this process manages.
    pub registry: Arc<ClientRegistry>,

    /// Transport used for logins and event-hub registration.
    pub gateway: Arc<dyn OrganizationGateway>,

    /// Orchestrator that drives bring-up.
    pub orchestrator: Arc<InitOrchestrator>,
}

impl AppState {
    /// Creates a new `AppState`, wiring the orchestrator to the provided
    /// registry and gateway.
    #[must_use]
    pub fn new(
        registry: Arc<ClientRegistry>,
        gateway: Arc<dyn OrganizationGateway>,
        config: OrchestratorConfig,
    ) -> Self {
        let orchestrator = Arc::new(InitOrchestrator::new(
            Arc::clone(&registry),
            Arc::clone(&gateway),
            config,
        ));

        Self {
            registry,
            gateway,
            orchestrator,
        }
    }
}
