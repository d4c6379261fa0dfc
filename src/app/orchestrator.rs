//! Initialization orchestrator: drives every registered client handle to a
//! fully operational state, or reports the first failure.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tracing::{debug, info, instrument};

use crate::domain::{
    AuthState, ClientHandle, ConfigError, GatewayError, InitError, OrganizationGateway,
};

use super::registry::ClientRegistry;

/// Configuration for the orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Upper bound applied to each login and event-hub call. `None` waits
    /// indefinitely, which is the default.
    pub call_timeout: Option<Duration>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self { call_timeout: None }
    }
}

impl OrchestratorConfig {
    /// Read the optional `INIT_CALL_TIMEOUT_SECS` override from the
    /// environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let call_timeout = parse_call_timeout(std::env::var("INIT_CALL_TIMEOUT_SECS").ok().as_deref())?;
        Ok(Self { call_timeout })
    }
}

fn parse_call_timeout(value: Option<&str>) -> Result<Option<Duration>, ConfigError> {
    match value {
        None => Ok(None),
        Some(raw) => {
            let secs: u64 = raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "INIT_CALL_TIMEOUT_SECS".to_string(),
                message: format!("expected a number of seconds, got '{raw}'"),
            })?;
            Ok(Some(Duration::from_secs(secs)))
        }
    }
}

/// Brings every client handle in the registry online.
///
/// Bring-up runs in three phases: sequential worker logins in configuration
/// order, concurrent event-hub registration for all workers, then the
/// dedicated event emitter (login, then subscription) once every worker is
/// done. The first failure anywhere wins; nothing is retried and nothing is
/// rolled back.
pub struct InitOrchestrator {
    registry: Arc<ClientRegistry>,
    gateway: Arc<dyn OrganizationGateway>,
    config: OrchestratorConfig,
}

impl InitOrchestrator {
    #[must_use]
    pub fn new(
        registry: Arc<ClientRegistry>,
        gateway: Arc<dyn OrganizationGateway>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            registry,
            gateway,
            config,
        }
    }

    /// Initiate all clients.
    ///
    /// On success every worker handle (and the event emitter, when present)
    /// is in the `Subscribed` state. On failure the first offending error is
    /// returned and the remaining handles are left wherever bring-up stopped;
    /// the caller decides whether that is fatal for the process.
    ///
    /// Re-invoking on handles that already started bring-up is rejected with
    /// [`InitError::AlreadyStarted`].
    #[instrument(skip(self), fields(workers = self.registry.len()))]
    pub async fn initiate(&self) -> Result<(), InitError> {
        if let Some(handle) = self
            .registry
            .all_handles()
            .find(|h| h.auth_state() != AuthState::Unauthenticated)
        {
            return Err(InitError::AlreadyStarted {
                client: handle.label(),
            });
        }

        // Phase 1: authenticate workers one at a time, in configuration
        // order. A failure here stops the batch before the next login starts.
        for handle in self.registry.workers() {
            self.login_client(handle).await?;
        }

        // Phase 2: event-hub registration for all workers at once. join_all
        // preserves input order, so the first failure reported is the first
        // failing worker, not the first to finish.
        let results = join_all(
            self.registry
                .workers()
                .iter()
                .map(|handle| self.subscribe_client(handle)),
        )
        .await;
        for result in results {
            result?;
        }

        // Phase 3: the dedicated event emitter, strictly after all workers.
        if let Some(emitter) = self.registry.event_emitter() {
            self.login_client(emitter).await?;
            self.subscribe_client(emitter).await?;
        }

        info!(workers = self.registry.len(), "organization clients connected");
        Ok(())
    }

    async fn login_client(&self, handle: &ClientHandle) -> Result<(), InitError> {
        debug!(client = %handle.label(), "logging in organization client");
        self.bounded(self.gateway.login(handle))
            .await
            .map_err(|source| {
                metrics::counter!("bootstrap_login_failures_total").increment(1);
                InitError::Authentication {
                    client: handle.label(),
                    source,
                }
            })?;
        handle.advance_to(AuthState::Authenticated);
        metrics::counter!("bootstrap_logins_total").increment(1);
        Ok(())
    }

    async fn subscribe_client(&self, handle: &ClientHandle) -> Result<(), InitError> {
        debug!(client = %handle.label(), "registering event hubs");
        self.bounded(self.gateway.init_event_hubs(handle))
            .await
            .map_err(|source| {
                metrics::counter!("bootstrap_event_hub_failures_total").increment(1);
                InitError::Subscription {
                    client: handle.label(),
                    source,
                }
            })?;
        handle.advance_to(AuthState::Subscribed);
        metrics::counter!("bootstrap_event_hubs_total").increment(1);
        Ok(())
    }

    async fn bounded<F>(&self, call: F) -> Result<(), GatewayError>
    where
        F: Future<Output = Result<(), GatewayError>>,
    {
        match self.config.call_timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(result) => result,
                Err(_) => Err(GatewayError::Timeout(format!(
                    "no response within {limit:?}"
                ))),
            },
            None => call.await,
        }
    }
}
