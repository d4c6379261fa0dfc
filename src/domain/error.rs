//! Application error types with proper error chaining.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
    #[error("Failed to read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid network configuration: {0}")]
    Validation(String),
}

/// Transport-level failures reported by an [`OrganizationGateway`]
/// implementation.
///
/// [`OrganizationGateway`]: super::traits::OrganizationGateway
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection failed: {0}")]
    Connection(String),
    #[error("Authentication rejected: {0}")]
    Authentication(String),
    #[error("Event hub registration failed: {0}")]
    EventHub(String),
    #[error("Protocol error: {0}")]
    Protocol(String),
    #[error("Timed out: {0}")]
    Timeout(String),
}

/// Failures during client bring-up, attributed to the offending client.
///
/// Initialization returns this instead of terminating the process; the
/// decision to exit belongs to the top-level caller.
#[derive(Error, Debug)]
pub enum InitError {
    #[error("login failed for client '{client}': {source}")]
    Authentication {
        client: String,
        #[source]
        source: GatewayError,
    },
    #[error("event hub setup failed for client '{client}': {source}")]
    Subscription {
        client: String,
        #[source]
        source: GatewayError,
    },
    #[error("clients already initialized: '{client}' is not in the unauthenticated state")]
    AlreadyStarted { client: String },
}

impl InitError {
    /// The label of the client the failure is attributed to.
    #[must_use]
    pub fn client(&self) -> &str {
        match self {
            InitError::Authentication { client, .. }
            | InitError::Subscription { client, .. }
            | InitError::AlreadyStarted { client } => client,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidValue {
            key: "INIT_CALL_TIMEOUT_SECS".to_string(),
            message: "not a number".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid value for 'INIT_CALL_TIMEOUT_SECS': not a number"
        );

        let err = ConfigError::Parse("unexpected token".to_string());
        assert_eq!(err.to_string(), "Parse error: unexpected token");

        let err = ConfigError::Validation("peers[0].orderer.url: length".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid network configuration: peers[0].orderer.url: length"
        );
    }

    #[test]
    fn test_config_error_read_preserves_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = ConfigError::Read {
            path: "network-config.json".to_string(),
            source: io,
        };
        assert!(err.to_string().contains("network-config.json"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_gateway_error_display() {
        let err = GatewayError::Connection("refused".to_string());
        assert_eq!(err.to_string(), "Connection failed: refused");

        let err = GatewayError::Authentication("bad secret".to_string());
        assert_eq!(err.to_string(), "Authentication rejected: bad secret");

        let err = GatewayError::EventHub("peer returned 503".to_string());
        assert_eq!(
            err.to_string(),
            "Event hub registration failed: peer returned 503"
        );

        let err = GatewayError::Timeout("no response within 30s".to_string());
        assert_eq!(err.to_string(), "Timed out: no response within 30s");
    }

    #[test]
    fn test_init_error_carries_client_and_source() {
        let err = InitError::Authentication {
            client: "admin@grpcs://peer0:7051".to_string(),
            source: GatewayError::Authentication("bad secret".to_string()),
        };
        assert_eq!(err.client(), "admin@grpcs://peer0:7051");
        assert!(err.to_string().contains("login failed"));
        assert!(err.to_string().contains("bad secret"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_init_error_subscription_display() {
        let err = InitError::Subscription {
            client: "admin@grpcs://peer1:7051".to_string(),
            source: GatewayError::EventHub("registration rejected".to_string()),
        };
        assert!(err.to_string().contains("event hub setup failed"));
        assert!(err.to_string().contains("peer1"));
    }

    #[test]
    fn test_init_error_already_started_display() {
        let err = InitError::AlreadyStarted {
            client: "admin@grpcs://peer0:7051".to_string(),
        };
        assert!(err.to_string().contains("already initialized"));
        assert_eq!(err.client(), "admin@grpcs://peer0:7051");
    }
}
