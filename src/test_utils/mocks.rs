//! Mock implementations for testing.
//!
//! The mock gateway records every call in order and supports configurable
//! failure injection, so tests can assert both outcomes and sequencing
//! without a network.

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use secrecy::SecretString;

use crate::domain::{
    ClientHandle, EnrolledCredential, GatewayError, OrganizationGateway,
};

/// Which gateway operation a recorded call was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayOp {
    Login,
    InitEventHubs,
}

/// One recorded gateway call, in invocation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayCall {
    pub op: GatewayOp,
    pub client: String,
}

/// Mock organization gateway.
///
/// Succeeds by default. Failures can be injected per enrollment id
/// (`fail_login_for` / `fail_event_hubs_for`) or from the n-th call onward
/// (`fail_logins_from` / `fail_event_hubs_from`), which distinguishes the
/// event emitter from the worker it was cloned from.
///
/// # Example
///
/// ```
/// use org_client_bootstrap::test_utils::MockOrganizationGateway;
///
/// let gateway = MockOrganizationGateway::new();
/// gateway.fail_login_for("admin1");
/// ```
pub struct MockOrganizationGateway {
    calls: Mutex<Vec<GatewayCall>>,
    fail_logins: Mutex<HashSet<String>>,
    fail_event_hubs: Mutex<HashSet<String>>,
    login_fail_from: AtomicU64,
    event_hub_fail_from: AtomicU64,
    login_count: AtomicU64,
    event_hub_count: AtomicU64,
    latency: Option<Duration>,
}

impl MockOrganizationGateway {
    /// Creates a mock where every operation succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_logins: Mutex::new(HashSet::new()),
            fail_event_hubs: Mutex::new(HashSet::new()),
            login_fail_from: AtomicU64::new(u64::MAX),
            event_hub_fail_from: AtomicU64::new(u64::MAX),
            login_count: AtomicU64::new(0),
            event_hub_count: AtomicU64::new(0),
            latency: None,
        }
    }

    /// Adds simulated latency to every operation.
    #[must_use]
    pub fn with_latency(mut self, ms: u64) -> Self {
        self.latency = Some(Duration::from_millis(ms));
        self
    }

    /// Fail every login for the given enrollment id.
    pub fn fail_login_for(&self, enrollment_id: impl Into<String>) {
        self.fail_logins.lock().unwrap().insert(enrollment_id.into());
    }

    /// Fail every event-hub registration for the given enrollment id.
    pub fn fail_event_hubs_for(&self, enrollment_id: impl Into<String>) {
        self.fail_event_hubs
            .lock()
            .unwrap()
            .insert(enrollment_id.into());
    }

    /// Fail the n-th login call (1-indexed) and every one after it.
    pub fn fail_logins_from(&self, call_number: u64) {
        self.login_fail_from.store(call_number, Ordering::SeqCst);
    }

    /// Fail the n-th event-hub call (1-indexed) and every one after it.
    pub fn fail_event_hubs_from(&self, call_number: u64) {
        self.event_hub_fail_from
            .store(call_number, Ordering::SeqCst);
    }

    /// All recorded calls, in invocation order.
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of login calls received.
    pub fn login_count(&self) -> u64 {
        self.login_count.load(Ordering::SeqCst)
    }

    /// Number of event-hub calls received.
    pub fn event_hub_count(&self) -> u64 {
        self.event_hub_count.load(Ordering::SeqCst)
    }

    fn record(&self, op: GatewayOp, handle: &ClientHandle) {
        self.calls.lock().unwrap().push(GatewayCall {
            op,
            client: handle.label(),
        });
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

impl Default for MockOrganizationGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrganizationGateway for MockOrganizationGateway {
    async fn login(&self, handle: &ClientHandle) -> Result<(), GatewayError> {
        let call_number = self.login_count.fetch_add(1, Ordering::SeqCst) + 1;
        self.record(GatewayOp::Login, handle);
        self.simulate_latency().await;

        if call_number >= self.login_fail_from.load(Ordering::SeqCst) {
            return Err(GatewayError::Authentication(format!(
                "mock login failure at call {call_number}"
            )));
        }
        if self
            .fail_logins
            .lock()
            .unwrap()
            .contains(&handle.admin().enrollment_id)
        {
            return Err(GatewayError::Authentication(format!(
                "mock login failure for {}",
                handle.admin().enrollment_id
            )));
        }

        handle.store_credential(EnrolledCredential::new(
            "-----BEGIN CERTIFICATE-----\nmock\n-----END CERTIFICATE-----".to_string(),
            SecretString::from(bs58::encode([7u8; 32]).into_string()),
            Utc::now(),
        ));
        Ok(())
    }

    async fn init_event_hubs(&self, handle: &ClientHandle) -> Result<(), GatewayError> {
        let call_number = self.event_hub_count.fetch_add(1, Ordering::SeqCst) + 1;
        self.record(GatewayOp::InitEventHubs, handle);
        self.simulate_latency().await;

        if call_number >= self.event_hub_fail_from.load(Ordering::SeqCst) {
            return Err(GatewayError::EventHub(format!(
                "mock event hub failure at call {call_number}"
            )));
        }
        if self
            .fail_event_hubs
            .lock()
            .unwrap()
            .contains(&handle.admin().enrollment_id)
        {
            return Err(GatewayError::EventHub(format!(
                "mock event hub failure for {}",
                handle.admin().enrollment_id
            )));
        }

        Ok(())
    }
}
