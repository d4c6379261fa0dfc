//! Client registry: selects and constructs the client handles this process
//! is responsible for.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::{ClientHandle, NetworkConfig, OrgId};

/// Organization identifier used when `ORGID` is unset.
pub const DEFAULT_ORG_ID: &str = "org.primary";

/// Runtime parameters resolved from the process environment.
#[derive(Debug, Clone)]
pub struct RegistrySettings {
    /// The organization this process acts for.
    pub org_id: OrgId,
    /// Whether to build a dedicated event-emitter client alongside the
    /// workers.
    pub dedicated_event_client: bool,
}

impl RegistrySettings {
    /// Resolve settings from the environment: `ORGID` overrides the
    /// organization id, and `EVENTEMITTER` enables the dedicated event
    /// client only when set to the exact string `"true"`.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            org_id: resolve_org_id(std::env::var("ORGID").ok()),
            dedicated_event_client: event_flag_enabled(std::env::var("EVENTEMITTER").ok().as_deref()),
        }
    }
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            org_id: DEFAULT_ORG_ID.to_string(),
            dedicated_event_client: false,
        }
    }
}

fn resolve_org_id(value: Option<String>) -> OrgId {
    value.unwrap_or_else(|| DEFAULT_ORG_ID.to_string())
}

fn event_flag_enabled(value: Option<&str>) -> bool {
    matches!(value, Some("true"))
}

/// The fixed set of client handles this process manages: an ordered list of
/// workers plus, optionally, one dedicated event-emitter client.
///
/// Built once at startup and never mutated afterwards; only the bring-up
/// state inside each handle changes, and only the orchestrator drives it.
pub struct ClientRegistry {
    workers: Vec<Arc<ClientHandle>>,
    event_emitter: Option<Arc<ClientHandle>>,
}

impl ClientRegistry {
    /// Build the registry from the static network configuration and the
    /// resolved runtime settings.
    ///
    /// Entries whose peer organization matches `settings.org_id` become
    /// workers, in configuration order. When the event flag is set, the
    /// emitter copies the first worker's connection parameters.
    ///
    /// An empty result is not an error: orchestration over an empty registry
    /// is a trivial no-op, so the mismatch is only flagged here.
    #[must_use]
    pub fn build(config: &NetworkConfig, settings: &RegistrySettings) -> Self {
        let workers: Vec<Arc<ClientHandle>> = config
            .peers
            .iter()
            .filter(|entry| entry.peer.org == settings.org_id)
            .map(|entry| Arc::new(ClientHandle::from_entry(entry)))
            .collect();

        if workers.is_empty() {
            warn!(
                org_id = %settings.org_id,
                "no peer configuration entries match this organization; registry is empty"
            );
        }

        let event_emitter = if settings.dedicated_event_client {
            match workers.first() {
                Some(first) => Some(Arc::new(first.cloned_config())),
                None => {
                    warn!(
                        org_id = %settings.org_id,
                        "event emitter requested but there is no worker to derive it from; skipping"
                    );
                    None
                }
            }
        } else {
            None
        };

        debug!(
            org_id = %settings.org_id,
            workers = workers.len(),
            event_emitter = event_emitter.is_some(),
            "built client registry"
        );

        Self {
            workers,
            event_emitter,
        }
    }

    /// Worker handles in configuration order.
    #[must_use]
    pub fn workers(&self) -> &[Arc<ClientHandle>] {
        &self.workers
    }

    /// The dedicated event-emitter handle, when enabled.
    #[must_use]
    pub fn event_emitter(&self) -> Option<&Arc<ClientHandle>> {
        self.event_emitter.as_ref()
    }

    /// Every handle the registry manages, workers first.
    pub fn all_handles(&self) -> impl Iterator<Item = &Arc<ClientHandle>> {
        self.workers.iter().chain(self.event_emitter.iter())
    }

    /// Number of worker handles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.workers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AdminIdentity, CaConfig, OrdererConfig, PeerConfig, PeerEntry};
    use secrecy::SecretString;

    fn entry(org: &str, index: usize) -> PeerEntry {
        PeerEntry {
            channel_name: "default".to_string(),
            orderer: OrdererConfig {
                url: "grpcs://orderer:7050".to_string(),
            },
            peer: PeerConfig {
                url: format!("grpcs://peer{index}.{org}:7051"),
                event_url: format!("grpcs://peer{index}.{org}:7053"),
                org: org.to_string(),
            },
            ca: CaConfig {
                url: format!("https://ca.{org}:7054"),
                name: format!("ca-{org}"),
            },
            admin: AdminIdentity {
                enrollment_id: format!("admin{index}"),
                enrollment_secret: SecretString::from("adminpw"),
            },
        }
    }

    fn config(orgs: &[&str]) -> NetworkConfig {
        NetworkConfig {
            peers: orgs
                .iter()
                .enumerate()
                .map(|(i, org)| entry(org, i))
                .collect(),
        }
    }

    fn settings(org: &str, event: bool) -> RegistrySettings {
        RegistrySettings {
            org_id: org.to_string(),
            dedicated_event_client: event,
        }
    }

    #[test]
    fn test_filters_by_org_preserving_order() {
        let config = config(&["org.one", "org.two", "org.one", "org.three", "org.one"]);
        let registry = ClientRegistry::build(&config, &settings("org.one", false));

        assert_eq!(registry.len(), 3);
        let urls: Vec<&str> = registry
            .workers()
            .iter()
            .map(|w| w.peer().url.as_str())
            .collect();
        assert_eq!(
            urls,
            vec![
                "grpcs://peer0.org.one:7051",
                "grpcs://peer2.org.one:7051",
                "grpcs://peer4.org.one:7051"
            ]
        );
    }

    #[test]
    fn test_no_match_builds_empty_registry() {
        let config = config(&["org.one", "org.two"]);
        let registry = ClientRegistry::build(&config, &settings("org.absent", false));

        assert!(registry.is_empty());
        assert!(registry.event_emitter().is_none());
    }

    #[test]
    fn test_event_emitter_copies_first_worker() {
        let config = config(&["org.one", "org.one"]);
        let registry = ClientRegistry::build(&config, &settings("org.one", true));

        let emitter = registry.event_emitter().expect("emitter should exist");
        assert!(emitter.shares_connection_with(&registry.workers()[0]));
        assert!(!emitter.shares_connection_with(&registry.workers()[1]));
    }

    #[test]
    fn test_event_emitter_absent_when_disabled() {
        let config = config(&["org.one"]);
        let registry = ClientRegistry::build(&config, &settings("org.one", false));
        assert!(registry.event_emitter().is_none());
    }

    #[test]
    fn test_event_emitter_skipped_without_workers() {
        let config = config(&["org.two"]);
        let registry = ClientRegistry::build(&config, &settings("org.one", true));
        assert!(registry.is_empty());
        assert!(registry.event_emitter().is_none());
    }

    #[test]
    fn test_all_handles_includes_emitter_last() {
        let config = config(&["org.one", "org.one"]);
        let registry = ClientRegistry::build(&config, &settings("org.one", true));
        assert_eq!(registry.all_handles().count(), 3);
    }

    #[test]
    fn test_resolve_org_id_default_and_override() {
        assert_eq!(resolve_org_id(None), DEFAULT_ORG_ID);
        assert_eq!(resolve_org_id(Some("org.custom".to_string())), "org.custom");
    }

    #[test]
    fn test_event_flag_requires_exact_literal() {
        assert!(event_flag_enabled(Some("true")));
        assert!(!event_flag_enabled(Some("TRUE")));
        assert!(!event_flag_enabled(Some("1")));
        assert!(!event_flag_enabled(Some("yes")));
        assert!(!event_flag_enabled(Some("")));
        assert!(!event_flag_enabled(None));
    }

    #[test]
    fn test_default_settings() {
        let settings = RegistrySettings::default();
        assert_eq!(settings.org_id, DEFAULT_ORG_ID);
        assert!(!settings.dedicated_event_client);
    }
}
