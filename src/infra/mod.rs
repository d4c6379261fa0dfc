//! Infrastructure layer implementations.

pub mod gateway;
pub mod observability;

pub use gateway::{HttpGatewayConfig, HttpOrganizationGateway};
