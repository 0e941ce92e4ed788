//! Demo Auto-Seed
//!
//! On loopback hosts the backend is seeded with demo data once per
//! browser. The "already seeded" marker lives in localStorage; the decision
//! is made once per page load and cached process-wide.

use std::sync::OnceLock;

use leptos::task::spawn_local;

use crate::api;
use crate::browser;
use crate::config::AppConfig;

/// localStorage key of the seeded marker
pub const SEEDED_FLAG: &str = "demoSeeded";

const LOOPBACK_HOSTS: &[&str] = &["localhost", "127.0.0.1", "::1", "[::1]"];

/// Persistent yes/no markers
pub trait FlagStore {
    fn is_set(&self, key: &str) -> bool;
    fn set(&self, key: &str);
    fn clear(&self, key: &str);
}

/// Markers in `window.localStorage`; a missing storage reads as unset
pub struct LocalStorageFlags;

impl FlagStore for LocalStorageFlags {
    fn is_set(&self, key: &str) -> bool {
        browser::local_storage()
            .and_then(|s| s.get_item(key).ok().flatten())
            .is_some()
    }

    fn set(&self, key: &str) {
        if let Some(storage) = browser::local_storage() {
            if storage.set_item(key, "1").is_err() {
                tracing::warn!(key, "could not persist flag");
            }
        }
    }

    fn clear(&self, key: &str) {
        if let Some(storage) = browser::local_storage() {
            if storage.remove_item(key).is_err() {
                tracing::warn!(key, "could not clear flag");
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedDecision {
    Seed,
    AlreadySeeded,
    NotLoopback,
}

pub fn is_loopback(host: &str) -> bool {
    LOOPBACK_HOSTS.contains(&host)
}

pub fn decide(host: &str, flags: &impl FlagStore) -> SeedDecision {
    if !is_loopback(host) {
        SeedDecision::NotLoopback
    } else if flags.is_set(SEEDED_FLAG) {
        SeedDecision::AlreadySeeded
    } else {
        SeedDecision::Seed
    }
}

static SEED_DECISION: OnceLock<SeedDecision> = OnceLock::new();

/// The startup decision, computed on first call
pub fn startup_decision(host: &str, flags: &impl FlagStore) -> SeedDecision {
    *SEED_DECISION.get_or_init(|| decide(host, flags))
}

/// Forget the marker so the next page load seeds again
pub fn clear_seeded_flag(flags: &impl FlagStore) {
    flags.clear(SEEDED_FLAG);
}

/// Startup decision, honouring a requested reseed first
pub fn check_at_startup(config: &AppConfig, host: &str, flags: &impl FlagStore) -> SeedDecision {
    if config.reseed {
        tracing::info!("reseed requested, clearing seeded marker");
        clear_seeded_flag(flags);
    }
    startup_decision(host, flags)
}

/// Fire-and-forget seed request; failures are only logged
pub fn auto_seed(config: &AppConfig) {
    let host = browser::hostname().unwrap_or_default();
    let decision = check_at_startup(config, &host, &LocalStorageFlags);
    tracing::debug!(?decision, %host, "demo seed check");
    if decision != SeedDecision::Seed {
        return;
    }

    let client = api::client(config);
    spawn_local(async move {
        match client.seed_demo().await {
            Ok(_) => {
                LocalStorageFlags.set(SEEDED_FLAG);
                tracing::info!("demo data seeded");
            }
            Err(e) => tracing::warn!(error = %e, "demo seed failed"),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashSet;

    #[derive(Default)]
    struct MemoryFlags(RefCell<HashSet<String>>);

    impl FlagStore for MemoryFlags {
        fn is_set(&self, key: &str) -> bool {
            self.0.borrow().contains(key)
        }
        fn set(&self, key: &str) {
            self.0.borrow_mut().insert(key.to_string());
        }
        fn clear(&self, key: &str) {
            self.0.borrow_mut().remove(key);
        }
    }

    #[test]
    fn test_only_loopback_hosts_seed() {
        let flags = MemoryFlags::default();
        assert_eq!(decide("localhost", &flags), SeedDecision::Seed);
        assert_eq!(decide("127.0.0.1", &flags), SeedDecision::Seed);
        assert_eq!(decide("planner.example.com", &flags), SeedDecision::NotLoopback);
    }

    #[test]
    fn test_flag_suppresses_and_clear_restores() {
        let flags = MemoryFlags::default();
        flags.set(SEEDED_FLAG);
        assert_eq!(decide("localhost", &flags), SeedDecision::AlreadySeeded);
        clear_seeded_flag(&flags);
        assert_eq!(decide("localhost", &flags), SeedDecision::Seed);
    }

    #[test]
    fn test_marker_survives_unless_reseed_is_requested() {
        let flags = MemoryFlags::default();
        flags.set(SEEDED_FLAG);
        let mut config = AppConfig::with_origin("http://localhost:3000");
        check_at_startup(&config, "localhost", &flags);
        assert!(flags.is_set(SEEDED_FLAG));

        config.reseed = true;
        check_at_startup(&config, "localhost", &flags);
        assert!(!flags.is_set(SEEDED_FLAG));
    }

    #[test]
    fn test_startup_decision_is_computed_once() {
        let flags = MemoryFlags::default();
        let first = startup_decision("localhost", &flags);
        flags.set(SEEDED_FLAG);
        assert_eq!(startup_decision("example.com", &flags), first);
    }
}
