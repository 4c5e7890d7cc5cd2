//! In-memory state store for tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::MetricKey;
use crate::error::StoreError;
use crate::store::{AlertEntry, AlertState, StateStore};

/// [`StateStore`] backed by a shared map, with save accounting and
/// scriptable failures. Clones share the same underlying storage, so a
/// test can keep a handle while the orchestrator owns another.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<MetricKey, AlertEntry>>>,
    saves: Arc<Mutex<usize>>,
    fail_load: bool,
    fail_save: bool,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-loaded with entries, as if a prior run had saved them.
    #[must_use]
    pub fn seeded(entries: HashMap<MetricKey, AlertEntry>) -> Self {
        Self {
            entries: Arc::new(Mutex::new(entries)),
            ..Self::default()
        }
    }

    /// Store whose `load` always fails.
    #[must_use]
    pub fn failing_load() -> Self {
        Self {
            fail_load: true,
            ..Self::default()
        }
    }

    /// Store whose `save` always fails.
    #[must_use]
    pub fn failing_save() -> Self {
        Self {
            fail_save: true,
            ..Self::default()
        }
    }

    /// Number of successful saves.
    pub fn saves(&self) -> usize {
        *self.saves.lock().expect("lock save counter")
    }

    /// Current persisted entries.
    pub fn snapshot(&self) -> HashMap<MetricKey, AlertEntry> {
        self.entries.lock().expect("lock store entries").clone()
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn load(&self) -> Result<AlertState, StoreError> {
        if self.fail_load {
            return Err(StoreError::Response("scripted load failure".into()));
        }
        let entries = self.entries.lock().expect("lock store entries").clone();
        Ok(AlertState::from_entries(entries))
    }

    async fn save(&self, state: &AlertState) -> Result<(), StoreError> {
        if self.fail_save {
            return Err(StoreError::Response("scripted save failure".into()));
        }
        // Round-trip through the wire format, like a real backend.
        let json = serde_json::to_string(state)?;
        let entries: HashMap<MetricKey, AlertEntry> = serde_json::from_str(&json)?;
        *self.entries.lock().expect("lock store entries") = entries;
        *self.saves.lock().expect("lock save counter") += 1;
        Ok(())
    }
}
