//! Roster store: the `medicineData` slot and its mutations.
//!
//! # Invariants
//! - The held roster is never empty.
//! - Loading never fails; unusable payloads fall back to the seeded roster,
//!   which is not written back until the first mutation.

use crate::model::roster::{Member, Roster};
use crate::service::persist::{load_slot, save_slot};
use crate::service::tracker_service::TrackerError;
use crate::storage::kv_store::KeyValueStore;
use crate::storage::ROSTER_SLOT;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterStore {
    roster: Roster,
}

impl RosterStore {
    /// Loads the roster slot, or seeds the default roster.
    pub fn load<S: KeyValueStore + ?Sized>(storage: &S) -> Self {
        let roster = load_slot(storage, ROSTER_SLOT, Roster::from_json).unwrap_or_default();
        Self { roster }
    }

    /// Current in-memory roster.
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Appends a new member with a generated id and returns its index.
    pub fn add_member(&mut self, name: impl Into<String>) -> usize {
        self.roster.push_member(Member::new(name))
    }

    /// Appends a medicine to the member at `index`.
    ///
    /// # Errors
    /// - `TrackerError::MemberOutOfRange` when `index` is not in the roster.
    pub fn add_medicine(
        &mut self,
        index: usize,
        name: impl Into<String>,
    ) -> Result<(), TrackerError> {
        if self.roster.push_medicine(index, name) {
            Ok(())
        } else {
            Err(TrackerError::MemberOutOfRange {
                index,
                len: self.roster.len(),
            })
        }
    }

    /// Writes the full roster snapshot to its slot.
    pub fn save<S: KeyValueStore + ?Sized>(&self, storage: &S) -> Result<(), TrackerError> {
        save_slot(storage, ROSTER_SLOT, self.roster.to_json())
    }
}
