//! Adherence store: the `medicineLog` slot and the toggle mutation.

use crate::model::adherence::{AdherenceLog, LogKey};
use crate::service::persist::{load_slot, save_slot};
use crate::service::tracker_service::TrackerError;
use crate::storage::kv_store::KeyValueStore;
use crate::storage::LOG_SLOT;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdherenceStore {
    log: AdherenceLog,
}

impl AdherenceStore {
    /// Loads the log slot, or starts from an empty log.
    pub fn load<S: KeyValueStore + ?Sized>(storage: &S) -> Self {
        let log = load_slot(storage, LOG_SLOT, AdherenceLog::from_json).unwrap_or_default();
        Self { log }
    }

    /// Current in-memory log.
    pub fn log(&self) -> &AdherenceLog {
        &self.log
    }

    /// Flips one medicine at `key`; returns whether it is now taken.
    pub fn toggle(&mut self, key: LogKey, medicine: &str) -> bool {
        self.log.toggle(key, medicine)
    }

    /// Writes the full log snapshot to its slot.
    pub fn save<S: KeyValueStore + ?Sized>(&self, storage: &S) -> Result<(), TrackerError> {
        save_slot(storage, LOG_SLOT, self.log.to_json())
    }
}
