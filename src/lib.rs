//! Org Client Bootstrap
//!
//! Startup orchestration for blockchain organization clients: builds the set
//! of client handles one process is responsible for, authenticates each
//! against its certificate authority, brings up event-hub subscriptions, and
//! treats any partial failure as fatal for the whole batch.
//!
//! # Architecture Overview
//!
//! This crate is organized into three main layers:
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              Application Layer               │
//! │   Client registry, bring-up orchestration    │
//! ├─────────────────────────────────────────────┤
//! │                 Domain Layer                 │
//! │   Traits, types, errors (no dependencies)    │
//! ├─────────────────────────────────────────────┤
//! │             Infrastructure Layer             │
//! │   HTTP gateway (CA + peers), observability   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Key Features
//!
//! - **Trait-based abstraction**: the network transport sits behind the
//!   `OrganizationGateway` trait
//! - **Dependency injection**: the orchestrator receives its registry and
//!   gateway through its constructor
//! - **Testability**: a mock gateway enables fast, isolated bring-up tests
//! - **Typed failures**: initialization returns a typed error instead of
//!   terminating the process; the binary decides what is fatal
//! - **Logging**: structured logging with `tracing`
//! - **Security**: enrollment secrets managed with the `secrecy` crate
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use org_client_bootstrap::app::{AppState, ClientRegistry, OrchestratorConfig, RegistrySettings};
//! use org_client_bootstrap::domain::NetworkConfig;
//! use org_client_bootstrap::infra::HttpOrganizationGateway;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let network = NetworkConfig::from_path("network-config.json")?;
//!     let registry = Arc::new(ClientRegistry::build(&network, &RegistrySettings::from_env()));
//!     let gateway = Arc::new(HttpOrganizationGateway::with_defaults()?);
//!
//!     let state = AppState::new(registry, gateway, OrchestratorConfig::default());
//!     state.orchestrator.initiate().await?;
//!
//!     // The clients in state.registry are now ready for use.
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod domain;
pub mod infra;

// Test utilities are available in tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
