//! Gateway implementations for the organization network.

pub mod http;

pub use http::{HttpGatewayConfig, HttpOrganizationGateway};
