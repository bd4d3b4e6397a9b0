//! Key-value storage slots behind the roster and adherence log.
//!
//! # Responsibility
//! - Define the string-valued slot contract both stores persist through.
//! - Provide SQLite-backed and in-memory implementations.
//!
//! # Invariants
//! - `set` replaces the whole value stored under a key.
//! - Implementations never interpret stored values.

pub mod kv_store;

/// Slot holding the serialized family roster.
pub const ROSTER_SLOT: &str = "medicineData";

/// Slot holding the serialized adherence log.
pub const LOG_SLOT: &str = "medicineLog";
