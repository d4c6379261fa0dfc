//! Application layer containing bring-up logic and shared state.

pub mod orchestrator;
pub mod registry;
pub mod state;

pub use orchestrator::{InitOrchestrator, OrchestratorConfig};
pub use registry::{ClientRegistry, DEFAULT_ORG_ID, RegistrySettings};
pub use state::AppState;
