//! Core domain types: peer configuration entries and the client handles
//! built from them.

use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU8, Ordering};

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::Deserialize;
use validator::Validate;

use super::error::ConfigError;

/// Identifies an administrative scope in the blockchain network.
pub type OrgId = String;

/// Connection details for an ordering node.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct OrdererConfig {
    #[validate(length(min = 1))]
    pub url: String,
}

/// Connection details for a peer node, including its event-hub endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct PeerConfig {
    #[validate(length(min = 1))]
    pub url: String,
    #[serde(rename = "eventUrl")]
    #[validate(length(min = 1))]
    pub event_url: String,
    #[validate(length(min = 1))]
    pub org: OrgId,
}

/// Connection details for a certificate authority.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct CaConfig {
    #[validate(length(min = 1))]
    pub url: String,
    #[validate(length(min = 1))]
    pub name: String,
}

/// Administrative identity used to enroll with the CA.
///
/// The enrollment secret is wrapped in [`SecretString`] so it is redacted
/// from `Debug` output and never serialized back out.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminIdentity {
    #[serde(rename = "enrollmentId")]
    pub enrollment_id: String,
    #[serde(rename = "enrollmentSecret")]
    pub enrollment_secret: SecretString,
}

/// One statically configured peer, scoped to a single organization.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PeerEntry {
    #[serde(rename = "channelName")]
    #[validate(length(min = 1))]
    pub channel_name: String,
    #[validate(nested)]
    pub orderer: OrdererConfig,
    #[validate(nested)]
    pub peer: PeerConfig,
    #[validate(nested)]
    pub ca: CaConfig,
    pub admin: AdminIdentity,
}

/// The full static network configuration: an ordered list of peer entries
/// across all organizations.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NetworkConfig {
    #[validate(nested)]
    pub peers: Vec<PeerEntry>,
}

impl NetworkConfig {
    /// Parse and validate a configuration from a JSON string.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config
            .validate()
            .map_err(|e| ConfigError::Validation(e.to_string()))?;
        Ok(config)
    }

    /// Read, parse, and validate a configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&raw)
    }
}

/// Bring-up state of a client handle.
///
/// States only ever advance: `Unauthenticated → Authenticated → Subscribed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    Authenticated,
    Subscribed,
}

impl AuthState {
    fn as_u8(self) -> u8 {
        match self {
            AuthState::Unauthenticated => 0,
            AuthState::Authenticated => 1,
            AuthState::Subscribed => 2,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => AuthState::Unauthenticated,
            1 => AuthState::Authenticated,
            _ => AuthState::Subscribed,
        }
    }
}

/// Credential issued by the CA on successful enrollment.
#[derive(Debug, Clone)]
pub struct EnrolledCredential {
    certificate: String,
    private_key: SecretString,
    issued_at: DateTime<Utc>,
}

impl EnrolledCredential {
    #[must_use]
    pub fn new(certificate: String, private_key: SecretString, issued_at: DateTime<Utc>) -> Self {
        Self {
            certificate,
            private_key,
            issued_at,
        }
    }

    #[must_use]
    pub fn certificate(&self) -> &str {
        &self.certificate
    }

    /// Base58-encoded private key seed. Expose only at the signing call site.
    #[must_use]
    pub fn private_key(&self) -> &SecretString {
        &self.private_key
    }

    #[must_use]
    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }
}

/// One authenticated connection to the network for a single
/// organization identity.
///
/// Connection parameters are immutable after construction. The bring-up
/// state lives in an atomic cell and the enrolled credential in a mutex so
/// concurrently-subscribing tasks can each drive their own handle; no handle
/// is ever shared between two in-flight operations.
#[derive(Debug)]
pub struct ClientHandle {
    channel_name: String,
    orderer: OrdererConfig,
    peer: PeerConfig,
    ca: CaConfig,
    admin: AdminIdentity,
    state: AtomicU8,
    credential: Mutex<Option<EnrolledCredential>>,
}

impl ClientHandle {
    /// Build an unauthenticated handle from a configuration entry.
    #[must_use]
    pub fn from_entry(entry: &PeerEntry) -> Self {
        Self {
            channel_name: entry.channel_name.clone(),
            orderer: entry.orderer.clone(),
            peer: entry.peer.clone(),
            ca: entry.ca.clone(),
            admin: entry.admin.clone(),
            state: AtomicU8::new(AuthState::Unauthenticated.as_u8()),
            credential: Mutex::new(None),
        }
    }

    /// Copy this handle's connection parameters into a fresh,
    /// unauthenticated handle. This is how the dedicated event-emitter
    /// client is derived from the first worker.
    #[must_use]
    pub fn cloned_config(&self) -> Self {
        Self {
            channel_name: self.channel_name.clone(),
            orderer: self.orderer.clone(),
            peer: self.peer.clone(),
            ca: self.ca.clone(),
            admin: self.admin.clone(),
            state: AtomicU8::new(AuthState::Unauthenticated.as_u8()),
            credential: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn channel_name(&self) -> &str {
        &self.channel_name
    }

    #[must_use]
    pub fn orderer(&self) -> &OrdererConfig {
        &self.orderer
    }

    #[must_use]
    pub fn peer(&self) -> &PeerConfig {
        &self.peer
    }

    #[must_use]
    pub fn ca(&self) -> &CaConfig {
        &self.ca
    }

    #[must_use]
    pub fn admin(&self) -> &AdminIdentity {
        &self.admin
    }

    /// Short identifier for logs and error messages.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}@{}", self.admin.enrollment_id, self.peer.url)
    }

    #[must_use]
    pub fn auth_state(&self) -> AuthState {
        AuthState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Record a completed bring-up phase. Driven by the orchestrator.
    pub fn advance_to(&self, state: AuthState) {
        self.state.store(state.as_u8(), Ordering::Release);
    }

    /// Store the credential issued on enrollment.
    pub fn store_credential(&self, credential: EnrolledCredential) {
        *self.credential.lock().expect("credential lock poisoned") = Some(credential);
    }

    /// The enrolled credential, if the handle has authenticated.
    #[must_use]
    pub fn credential(&self) -> Option<EnrolledCredential> {
        self.credential
            .lock()
            .expect("credential lock poisoned")
            .clone()
    }

    /// Whether two handles target the same channel, orderer, peer, CA,
    /// and admin identity.
    #[must_use]
    pub fn shares_connection_with(&self, other: &ClientHandle) -> bool {
        self.channel_name == other.channel_name
            && self.orderer == other.orderer
            && self.peer == other.peer
            && self.ca == other.ca
            && self.admin.enrollment_id == other.admin.enrollment_id
    }
}
