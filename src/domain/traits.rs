//! Domain traits defining contracts for external systems.

use async_trait::async_trait;

use super::error::GatewayError;
use super::types::ClientHandle;

/// Network transport for bringing an organization client online.
///
/// Implementations perform the actual exchanges with the CA and peer; the
/// orchestrator owns sequencing, state transitions, and failure policy.
/// Neither operation may retry internally: a bring-up failure must surface
/// to the orchestrator on the first attempt.
#[async_trait]
pub trait OrganizationGateway: Send + Sync {
    /// Authenticate the handle's admin identity against its CA and store the
    /// issued credential on the handle.
    async fn login(&self, handle: &ClientHandle) -> Result<(), GatewayError>;

    /// Establish event-hub subscriptions against the handle's peer so the
    /// process can receive ledger events for it.
    async fn init_event_hubs(&self, handle: &ClientHandle) -> Result<(), GatewayError>;
}
