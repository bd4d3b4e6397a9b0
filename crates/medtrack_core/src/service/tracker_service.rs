//! Tracker session service.
//!
//! # Responsibility
//! - Own the roster store, the adherence store and the member selection for
//!   one session over an injected key-value backend.
//! - Expose the add-member, add-medicine, toggle, read and export use-cases.
//!
//! # Invariants
//! - Every applied mutation issues exactly one save of the mutated slot.
//! - Cancelled or empty name input changes nothing and saves nothing.
//! - A failed save never rolls back the in-memory mutation.
//! - Out-of-range member indexes read as "no member" and reject mutation.

use crate::model::adherence::{AdherenceLog, LogKey};
use crate::model::codec::CodecError;
use crate::model::roster::{Member, Roster};
use crate::service::adherence_store::AdherenceStore;
use crate::service::export::LogExport;
use crate::service::prompt::{
    ask_non_empty, NamePrompt, MEDICINE_NAME_PROMPT, MEMBER_NAME_PROMPT,
};
use crate::service::roster_store::RosterStore;
use crate::storage::kv_store::{KeyValueStore, StoreError};
use chrono::NaiveDate;
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for tracker use-cases.
#[derive(Debug)]
pub enum TrackerError {
    /// `index` does not address a roster member.
    MemberOutOfRange { index: usize, len: usize },
    /// Snapshot could not be serialized; the in-memory mutation stands.
    Encode(CodecError),
    /// Snapshot could not be written; the in-memory mutation stands.
    NotDurable {
        slot: &'static str,
        source: StoreError,
    },
}

impl TrackerError {
    /// Whether the in-memory state already reflects the requested mutation.
    pub fn mutation_applied(&self) -> bool {
        matches!(self, Self::Encode(_) | Self::NotDurable { .. })
    }
}

impl Display for TrackerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MemberOutOfRange { index, len } => {
                write!(f, "member index {index} is out of range (roster has {len})")
            }
            Self::Encode(err) => write!(f, "failed to encode snapshot: {err}"),
            Self::NotDurable { slot, source } => {
                write!(f, "change kept in memory but not saved to `{slot}`: {source}")
            }
        }
    }
}

impl Error for TrackerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::MemberOutOfRange { .. } => None,
            Self::Encode(err) => Some(err),
            Self::NotDurable { source, .. } => Some(source),
        }
    }
}

/// One tracker session over a key-value backend.
pub struct TrackerService<S: KeyValueStore> {
    storage: S,
    roster: RosterStore,
    adherence: AdherenceStore,
    selected: usize,
}

impl<S: KeyValueStore> TrackerService<S> {
    /// Loads both slots from `storage`, falling back to defaults.
    ///
    /// Never fails and writes nothing. Selection starts at member 0.
    pub fn initialize(storage: S) -> Self {
        let roster = RosterStore::load(&storage);
        let adherence = AdherenceStore::load(&storage);
        info!(
            "event=session_start module=service status=ok members={} log_entries={} opaque_log_entries={}",
            roster.roster().len(),
            adherence.log().len(),
            adherence.log().opaque_len()
        );
        Self {
            storage,
            roster,
            adherence,
            selected: 0,
        }
    }

    /// Backend this session reads and writes.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Ends the session and hands the backend back.
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Current roster.
    pub fn roster(&self) -> &Roster {
        self.roster.roster()
    }

    /// Current adherence log.
    pub fn log(&self) -> &AdherenceLog {
        self.adherence.log()
    }

    /// Index of the selected member.
    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// Selected member, if the index still addresses one.
    pub fn selected_member(&self) -> Option<&Member> {
        self.roster().member(self.selected)
    }

    /// Moves the selection; an out-of-range index leaves it unchanged.
    pub fn select_member(&mut self, index: usize) -> Result<&Member, TrackerError> {
        self.member_at(index)?;
        self.selected = index;
        self.member_at(index)
    }

    /// Asks `prompt` for a name and appends a new member.
    ///
    /// Returns the new member index, or `None` when the input was cancelled
    /// or empty.
    pub fn add_member(
        &mut self,
        prompt: &mut (impl NamePrompt + ?Sized),
    ) -> Result<Option<usize>, TrackerError> {
        let Some(name) = ask_non_empty(prompt, MEMBER_NAME_PROMPT) else {
            debug!("event=member_add module=service status=cancelled");
            return Ok(None);
        };

        let index = self.roster.add_member(name);
        info!("event=member_add module=service status=ok index={index}");
        self.roster.save(&self.storage)?;
        Ok(Some(index))
    }

    /// Asks `prompt` for a name and appends it to member `index`'s medicines.
    ///
    /// The index is checked before prompting. Returns `false` when the input
    /// was cancelled or empty.
    pub fn add_medicine(
        &mut self,
        index: usize,
        prompt: &mut (impl NamePrompt + ?Sized),
    ) -> Result<bool, TrackerError> {
        self.member_at(index)?;
        let Some(name) = ask_non_empty(prompt, MEDICINE_NAME_PROMPT) else {
            debug!("event=medicine_add module=service status=cancelled index={index}");
            return Ok(false);
        };

        self.roster.add_medicine(index, name)?;
        info!("event=medicine_add module=service status=ok index={index}");
        self.roster.save(&self.storage)?;
        Ok(true)
    }

    /// Flips `medicine` for member `index` on `date`; returns whether it is
    /// now marked taken.
    pub fn toggle(
        &mut self,
        index: usize,
        date: NaiveDate,
        medicine: &str,
    ) -> Result<bool, TrackerError> {
        let key = self.log_key(index, date)?;
        let taken = self.adherence.toggle(key, medicine);
        info!("event=medicine_toggle module=service status=ok index={index} taken={taken}");
        self.adherence.save(&self.storage)?;
        Ok(taken)
    }

    /// Whether `medicine` is marked taken; `false` for unknown members.
    pub fn is_taken(&self, index: usize, date: NaiveDate, medicine: &str) -> bool {
        self.log_key(index, date)
            .map(|key| self.log().is_taken(&key, medicine))
            .unwrap_or(false)
    }

    /// Medicines marked taken for member `index` on `date`.
    pub fn taken_on(&self, index: usize, date: NaiveDate) -> &[String] {
        match self.log_key(index, date) {
            Ok(key) => self.log().taken(&key),
            Err(_) => &[],
        }
    }

    /// Builds the `medicine-log.json` artifact from the full log.
    pub fn export_log(&self) -> Result<LogExport, TrackerError> {
        let export = LogExport::from_log(self.log()).map_err(TrackerError::Encode)?;
        info!(
            "event=log_export module=service status=ok entries={} bytes={}",
            self.log().len(),
            export.body.len()
        );
        Ok(export)
    }

    fn member_at(&self, index: usize) -> Result<&Member, TrackerError> {
        self.roster()
            .member(index)
            .ok_or(TrackerError::MemberOutOfRange {
                index,
                len: self.roster().len(),
            })
    }

    fn log_key(&self, index: usize, date: NaiveDate) -> Result<LogKey, TrackerError> {
        let member = self.member_at(index)?;
        Ok(LogKey::new(member.id.clone(), date))
    }
}
