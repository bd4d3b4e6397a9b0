//! Core domain logic for the family medicine tracker.
//! This crate is the single source of truth for roster and log invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod service;
pub mod storage;

pub use chrono::NaiveDate;
pub use logging::{default_log_level, init_logging, logging_status, LogLevel};
pub use model::adherence::{AdherenceLog, LogKey};
pub use model::calendar::{format_date, parse_date, today};
pub use model::codec::{CodecError, CodecResult};
pub use model::roster::{Member, MemberId, Roster, DEFAULT_MEDICINES, DEFAULT_MEMBER_NAME};
pub use service::adherence_store::AdherenceStore;
pub use service::export::{LogExport, EXPORT_CONTENT_TYPE, EXPORT_FILE_NAME};
pub use service::prompt::{NamePrompt, MEDICINE_NAME_PROMPT, MEMBER_NAME_PROMPT};
pub use service::roster_store::RosterStore;
pub use service::tracker_service::{TrackerError, TrackerService};
pub use storage::kv_store::{
    KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StoreError, StoreResult,
};
pub use storage::{LOG_SLOT, ROSTER_SLOT};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
