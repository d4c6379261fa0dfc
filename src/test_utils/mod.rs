//! Test utilities and mock implementations.
//!
//! This module provides a reusable mock gateway for use in unit and
//! integration tests.

pub mod mocks;

pub use mocks::{GatewayCall, GatewayOp, MockOrganizationGateway};
