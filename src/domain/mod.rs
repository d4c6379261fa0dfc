//! Domain layer containing core business types, traits, and error definitions.

pub mod error;
pub mod traits;
pub mod types;

pub use error::{ConfigError, GatewayError, InitError};
pub use traits::OrganizationGateway;
pub use types::{
    AdminIdentity, AuthState, CaConfig, ClientHandle, EnrolledCredential, NetworkConfig, OrdererConfig,
    OrgId, PeerConfig, PeerEntry,
};
