//! HTTP gateway implementation for CA enrollment and peer event-hub
//! registration.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use ed25519_dalek::{Signer, SigningKey};
use rand::rngs::OsRng;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;
use uuid::Uuid;

use crate::domain::{ClientHandle, EnrolledCredential, GatewayError, OrganizationGateway};

/// Configuration for the HTTP gateway.
#[derive(Debug, Clone)]
pub struct HttpGatewayConfig {
    /// Per-request timeout. `None` waits indefinitely, matching the
    /// orchestrator's default.
    pub request_timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for HttpGatewayConfig {
    fn default() -> Self {
        Self {
            request_timeout: None,
            user_agent: concat!("org-client-bootstrap/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Production [`OrganizationGateway`] over HTTPS.
///
/// `login` enrolls the admin identity with the CA using a freshly generated
/// ed25519 keypair and stores the issued credential on the handle;
/// `init_event_hubs` signs a block-event registration with that credential
/// and posts it to the peer's event endpoint. Neither operation retries:
/// bring-up failures must surface on the first attempt.
pub struct HttpOrganizationGateway {
    http: Client,
    config: HttpGatewayConfig,
}

#[derive(Debug, Serialize)]
struct EnrollmentRequest<'a> {
    #[serde(rename = "enrollmentId")]
    enrollment_id: &'a str,
    #[serde(rename = "publicKey")]
    public_key: String,
    #[serde(rename = "caName")]
    ca_name: &'a str,
    #[serde(rename = "requestId")]
    request_id: String,
}

#[derive(Debug, Deserialize)]
struct CaEnvelope<T> {
    success: bool,
    result: Option<T>,
    #[serde(default)]
    errors: Vec<CaMessage>,
}

#[derive(Debug, Deserialize)]
struct CaMessage {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct EnrollmentResult {
    certificate: String,
}

#[derive(Debug, Serialize)]
struct EventHubRegistration<'a> {
    channel: &'a str,
    events: Vec<&'static str>,
    certificate: &'a str,
    signature: String,
    #[serde(rename = "requestId")]
    request_id: String,
}

#[derive(Debug, Deserialize)]
struct RegistrationAck {
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

impl HttpOrganizationGateway {
    /// Create a new gateway with custom configuration.
    pub fn new(config: HttpGatewayConfig) -> Result<Self, GatewayError> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| GatewayError::Connection(e.to_string()))?;
        Ok(Self { http, config })
    }

    /// Create a new gateway with default configuration.
    pub fn with_defaults() -> Result<Self, GatewayError> {
        Self::new(HttpGatewayConfig::default())
    }

    #[must_use]
    pub fn config(&self) -> &HttpGatewayConfig {
        &self.config
    }
}

#[async_trait]
impl OrganizationGateway for HttpOrganizationGateway {
    async fn login(&self, handle: &ClientHandle) -> Result<(), GatewayError> {
        let signing_key = SigningKey::generate(&mut OsRng);
        let public_key = bs58::encode(signing_key.verifying_key().as_bytes()).into_string();

        let request = EnrollmentRequest {
            enrollment_id: &handle.admin().enrollment_id,
            public_key,
            ca_name: &handle.ca().name,
            request_id: Uuid::new_v4().to_string(),
        };
        let url = endpoint(&handle.ca().url, "api/v1/enroll");

        let response = self
            .http
            .post(&url)
            .basic_auth(
                &handle.admin().enrollment_id,
                Some(handle.admin().enrollment_secret.expose_secret()),
            )
            .json(&request)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(GatewayError::Authentication(format!("CA returned {status}")));
        }
        if !status.is_success() {
            return Err(GatewayError::Protocol(format!("CA returned {status}")));
        }

        let envelope: CaEnvelope<EnrollmentResult> = response
            .json()
            .await
            .map_err(|e| GatewayError::Protocol(e.to_string()))?;
        if !envelope.success {
            let reason = envelope
                .errors
                .first()
                .map(|e| format!("{}: {}", e.code, e.message))
                .unwrap_or_else(|| "enrollment rejected".to_string());
            return Err(GatewayError::Authentication(reason));
        }
        let result = envelope.result.ok_or_else(|| {
            GatewayError::Protocol("enrollment envelope missing result".to_string())
        })?;

        handle.store_credential(EnrolledCredential::new(
            result.certificate,
            SecretString::from(bs58::encode(signing_key.to_bytes()).into_string()),
            Utc::now(),
        ));
        debug!(client = %handle.label(), ca = %handle.ca().url, "enrolled organization identity");
        Ok(())
    }

    async fn init_event_hubs(&self, handle: &ClientHandle) -> Result<(), GatewayError> {
        let credential = handle.credential().ok_or_else(|| {
            GatewayError::EventHub("client has no enrolled credential".to_string())
        })?;
        let signing_key = signing_key_from_base58(credential.private_key())?;

        let request_id = Uuid::new_v4().to_string();
        let unsigned = serde_json::json!({
            "channel": handle.channel_name(),
            "events": ["block"],
            "requestId": request_id,
        });
        let payload =
            serde_json::to_vec(&unsigned).map_err(|e| GatewayError::Protocol(e.to_string()))?;
        let digest = Sha256::digest(&payload);
        let signature = bs58::encode(signing_key.sign(digest.as_slice()).to_bytes()).into_string();

        let registration = EventHubRegistration {
            channel: handle.channel_name(),
            events: vec!["block"],
            certificate: credential.certificate(),
            signature,
            request_id,
        };
        let url = endpoint(&handle.peer().event_url, "v1/events/register");

        let response = self
            .http
            .post(&url)
            .json(&registration)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::EventHub(format!("peer returned {status}")));
        }
        let ack: RegistrationAck = response
            .json()
            .await
            .map_err(|e| GatewayError::Protocol(e.to_string()))?;
        if !ack.success {
            return Err(GatewayError::EventHub(
                ack.message
                    .unwrap_or_else(|| "registration rejected".to_string()),
            ));
        }

        debug!(client = %handle.label(), peer = %handle.peer().event_url, "event hubs registered");
        Ok(())
    }
}

fn classify(error: reqwest::Error) -> GatewayError {
    if error.is_timeout() {
        GatewayError::Timeout(error.to_string())
    } else if error.is_connect() {
        GatewayError::Connection(error.to_string())
    } else {
        GatewayError::Protocol(error.to_string())
    }
}

fn endpoint(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Parse a base58-encoded private key (32-byte seed or 64-byte keypair)
/// into a signing key.
fn signing_key_from_base58(secret: &SecretString) -> Result<SigningKey, GatewayError> {
    let key_bytes = bs58::decode(secret.expose_secret())
        .into_vec()
        .map_err(|e| GatewayError::Protocol(format!("invalid credential key: {e}")))?;

    let key_array: [u8; 32] = if key_bytes.len() == 64 {
        key_bytes[..32]
            .try_into()
            .map_err(|_| GatewayError::Protocol("invalid keypair format".to_string()))?
    } else if key_bytes.len() == 32 {
        key_bytes.try_into().map_err(|v: Vec<u8>| {
            GatewayError::Protocol(format!("key must be 32 bytes, got {}", v.len()))
        })?
    } else {
        return Err(GatewayError::Protocol(format!(
            "key must be 32 or 64 bytes, got {}",
            key_bytes.len()
        )));
    };

    Ok(SigningKey::from_bytes(&key_array))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AdminIdentity, CaConfig, OrdererConfig, PeerConfig, PeerEntry};

    fn handle() -> ClientHandle {
        ClientHandle::from_entry(&PeerEntry {
            channel_name: "default".to_string(),
            orderer: OrdererConfig {
                url: "grpcs://orderer:7050".to_string(),
            },
            peer: PeerConfig {
                url: "https://peer0:7051".to_string(),
                event_url: "https://peer0:7053".to_string(),
                org: "org.one".to_string(),
            },
            ca: CaConfig {
                url: "https://ca0:7054/".to_string(),
                name: "ca-one".to_string(),
            },
            admin: AdminIdentity {
                enrollment_id: "admin".to_string(),
                enrollment_secret: SecretString::from("adminpw"),
            },
        })
    }

    #[test]
    fn test_config_default_has_no_timeout() {
        let config = HttpGatewayConfig::default();
        assert!(config.request_timeout.is_none());
        assert!(config.user_agent.starts_with("org-client-bootstrap/"));
    }

    #[test]
    fn test_gateway_accepts_custom_timeout() {
        let gateway = HttpOrganizationGateway::new(HttpGatewayConfig {
            request_timeout: Some(Duration::from_secs(10)),
            user_agent: "test-agent".to_string(),
        })
        .unwrap();
        assert_eq!(
            gateway.config().request_timeout,
            Some(Duration::from_secs(10))
        );
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        assert_eq!(
            endpoint("https://ca0:7054/", "api/v1/enroll"),
            "https://ca0:7054/api/v1/enroll"
        );
        assert_eq!(
            endpoint("https://ca0:7054", "/api/v1/enroll"),
            "https://ca0:7054/api/v1/enroll"
        );
    }

    #[test]
    fn test_signing_key_from_base58_valid_32_bytes() {
        let original = SigningKey::generate(&mut OsRng);
        let encoded = bs58::encode(original.to_bytes()).into_string();
        let secret = SecretString::from(encoded);
        assert!(signing_key_from_base58(&secret).is_ok());
    }

    #[test]
    fn test_signing_key_from_base58_valid_64_bytes() {
        let original = SigningKey::generate(&mut OsRng);
        let mut keypair = original.to_bytes().to_vec();
        keypair.extend_from_slice(original.verifying_key().as_bytes());
        let encoded = bs58::encode(&keypair).into_string();
        let secret = SecretString::from(encoded);
        assert!(signing_key_from_base58(&secret).is_ok());
    }

    #[test]
    fn test_signing_key_from_base58_invalid() {
        let secret = SecretString::from("invalid-base58!!!");
        assert!(signing_key_from_base58(&secret).is_err());
    }

    #[test]
    fn test_signing_key_from_base58_wrong_length() {
        let short = bs58::encode(vec![0u8; 16]).into_string();
        assert!(signing_key_from_base58(&SecretString::from(short)).is_err());

        let wrong = bs58::encode(vec![0u8; 48]).into_string();
        assert!(signing_key_from_base58(&SecretString::from(wrong)).is_err());
    }

    #[tokio::test]
    async fn test_event_hubs_require_enrollment() {
        let gateway = HttpOrganizationGateway::with_defaults().unwrap();
        let handle = handle();

        // No login happened, so no credential is stored; the call must fail
        // before touching the network.
        let err = gateway.init_event_hubs(&handle).await.unwrap_err();
        assert!(matches!(err, GatewayError::EventHub(_)));
    }
}
