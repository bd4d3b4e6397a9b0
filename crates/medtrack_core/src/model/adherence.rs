//! Daily adherence log model.
//!
//! # Responsibility
//! - Track, per member and calendar date, which medicines were marked taken.
//! - Convert to and from the `medicineLog` JSON payload, whose keys are
//!   `"<memberId>-<YYYY-MM-DD>"` and whose values are name arrays.
//!
//! # Invariants
//! - An absent key reads as the empty set.
//! - Entries are never removed, even when toggled back to empty.
//! - Entries whose key does not decode are carried through untouched, so a
//!   save never loses stored history.
//! - Name membership is exact string equality.

use crate::model::calendar::{format_date, parse_date};
use crate::model::codec::CodecResult;
use crate::model::roster::MemberId;
use chrono::NaiveDate;
use log::warn;
use std::collections::BTreeMap;

// "-YYYY-MM-DD"
const DATE_SUFFIX_LEN: usize = 11;

/// Address of one day's record for one member.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LogKey {
    pub member_id: MemberId,
    pub date: NaiveDate,
}

impl LogKey {
    /// Addresses `member_id`'s record on `date`.
    pub fn new(member_id: impl Into<MemberId>, date: NaiveDate) -> Self {
        Self {
            member_id: member_id.into(),
            date,
        }
    }

    /// Encodes the key as `"<memberId>-<YYYY-MM-DD>"`.
    pub fn encode(&self) -> String {
        format!("{}-{}", self.member_id, format_date(self.date))
    }

    /// Decodes a persisted key; the date is always the trailing ten chars.
    ///
    /// Returns `None` when the member part is empty or the date is invalid.
    pub fn decode(raw: &str) -> Option<Self> {
        let split = raw.len().checked_sub(DATE_SUFFIX_LEN)?;
        if split == 0 || !raw.is_char_boundary(split) {
            return None;
        }
        let (member_id, suffix) = raw.split_at(split);
        let date = parse_date(suffix.strip_prefix('-')?).ok()?;
        Some(Self::new(member_id, date))
    }
}

/// Medicines marked taken, keyed by member and date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdherenceLog {
    entries: BTreeMap<LogKey, Vec<String>>,
    // Raw wire key -> names, for keys that are not `<memberId>-<YYYY-MM-DD>`.
    opaque: BTreeMap<String, Vec<String>>,
}

impl AdherenceLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a `medicineLog` payload.
    ///
    /// Entries whose key does not decode are kept verbatim (with a warning)
    /// and written back unchanged; no member or date ever resolves to them.
    pub fn from_json(payload: &str) -> CodecResult<Self> {
        let raw: BTreeMap<String, Vec<String>> = serde_json::from_str(payload)?;
        let mut entries = BTreeMap::new();
        let mut opaque = BTreeMap::new();
        for (raw_key, taken) in raw {
            match LogKey::decode(&raw_key) {
                Some(key) => {
                    entries.insert(key, taken);
                }
                None => {
                    opaque.insert(raw_key, taken);
                }
            }
        }
        if !opaque.is_empty() {
            warn!(
                "event=log_decode module=model status=partial opaque_entries={} decoded_entries={}",
                opaque.len(),
                entries.len()
            );
        }
        Ok(Self { entries, opaque })
    }

    /// Serializes to the compact `medicineLog` payload.
    pub fn to_json(&self) -> CodecResult<String> {
        Ok(serde_json::to_string(&self.wire_entries())?)
    }

    /// Serializes with two-space indentation, as offered for export.
    pub fn to_pretty_json(&self) -> CodecResult<String> {
        Ok(serde_json::to_string_pretty(&self.wire_entries())?)
    }

    /// Flips `medicine` at `key` and returns whether it is now taken.
    ///
    /// A missing entry is created on first toggle.
    pub fn toggle(&mut self, key: LogKey, medicine: &str) -> bool {
        let taken = self.entries.entry(key).or_default();
        if taken.iter().any(|name| name == medicine) {
            taken.retain(|name| name != medicine);
            false
        } else {
            taken.push(medicine.to_string());
            true
        }
    }

    /// Whether `medicine` is marked taken at `key`.
    pub fn is_taken(&self, key: &LogKey, medicine: &str) -> bool {
        self.taken(key).iter().any(|name| name == medicine)
    }

    /// Returns the names marked taken at `key` in first-marked order.
    pub fn taken(&self, key: &LogKey) -> &[String] {
        self.entries.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of stored entries, including empty and undecodable ones.
    pub fn len(&self) -> usize {
        self.entries.len() + self.opaque.len()
    }

    /// Whether nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.opaque.is_empty()
    }

    /// Number of stored entries whose key names no member/date.
    pub fn opaque_len(&self) -> usize {
        self.opaque.len()
    }

    // Decoded keys always parse and opaque keys never do, so the two key
    // sets cannot collide.
    fn wire_entries(&self) -> BTreeMap<String, &[String]> {
        self.entries
            .iter()
            .map(|(key, taken)| (key.encode(), taken.as_slice()))
            .chain(
                self.opaque
                    .iter()
                    .map(|(key, taken)| (key.clone(), taken.as_slice())),
            )
            .collect()
    }
}
