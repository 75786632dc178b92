//! Thread-safe configuration storage.
//!
//! Holds the currently published snapshot. Readers get a shared handle to
//! an immutable [`Configuration`]; a reload swaps in a new one wholesale.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::types::Configuration;

/// Thread-safe holder of the published configuration snapshot.
///
/// The lock guards only the handle, so a read never waits on a reload's
/// computation and a reader holding an older snapshot keeps it valid.
#[derive(Clone, Default)]
pub struct ConfigStore {
    inner: Arc<RwLock<Arc<Configuration>>>,
}

impl ConfigStore {
    /// Create a store publishing `config`.
    pub fn new(config: Configuration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(config))),
        }
    }

    /// Get the current snapshot.
    ///
    /// Multiple readers can call this concurrently.
    pub fn get(&self) -> Arc<Configuration> {
        Arc::clone(&*self.inner.read())
    }

    /// Publish `config`, replacing the current snapshot.
    pub fn replace(&self, config: Configuration) -> Arc<Configuration> {
        let snapshot = Arc::new(config);
        *self.inner.write() = Arc::clone(&snapshot);
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_store_get() {
        let store = ConfigStore::new(Configuration {
            language: "fr".to_string(),
            ..Default::default()
        });
        assert_eq!(store.get().language, "fr");
    }

    #[test]
    fn test_old_snapshot_survives_replace() {
        let store = ConfigStore::default();
        let before = store.get();

        let published = store.replace(Configuration {
            proxy_port: 8080,
            ..Default::default()
        });

        assert_eq!(before.proxy_port, 0);
        assert_eq!(store.get().proxy_port, 8080);
        assert!(Arc::ptr_eq(&published, &store.get()));
    }

    #[test]
    fn test_clones_share_snapshot() {
        let store = ConfigStore::default();
        let other = store.clone();
        store.replace(Configuration {
            listen_port_min: 6881,
            ..Default::default()
        });
        assert_eq!(other.get().listen_port_min, 6881);
    }
}
