//! Family roster model.
//!
//! # Responsibility
//! - Hold the ordered family members and their prescribed medicines.
//! - Seed the default roster used when nothing is persisted yet.
//! - Convert to and from the `medicineData` JSON payload.
//!
//! # Invariants
//! - `family` is never empty.
//! - Member order and medicine order are insertion order; nothing is removed.
//! - A member's `id` never changes once assigned.
//! - A parseable payload is taken as stored: missing names read as empty and
//!   unknown fields are written back unchanged.

use crate::model::codec::{CodecError, CodecResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Stable member identifier used to key adherence log entries.
///
/// Legacy and seeded members carry their positional index as id; members
/// added later carry a generated UUID (simple form).
pub type MemberId = String;

/// Name given to the seeded member.
pub const DEFAULT_MEMBER_NAME: &str = "Member 1";

/// Medicines prescribed to the seeded member.
pub const DEFAULT_MEDICINES: [&str; 7] = [
    "Pan 40",
    "Sitaxa DM",
    "Ramistar",
    "Deplatt",
    "Ecosprin",
    "Tonact",
    "Ezedoc",
];

/// One family member and their medicine list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    /// Free-form labels; duplicates are kept.
    pub medicines: Vec<String>,
    /// Stored fields this model does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Member {
    /// Creates a member with a freshly generated stable id and no medicines.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4().simple().to_string(), name, Vec::new())
    }

    /// Creates a member with a caller-provided id.
    ///
    /// Used by load paths where identity already exists in storage.
    pub fn with_id(
        id: impl Into<MemberId>,
        name: impl Into<String>,
        medicines: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            medicines,
            extra: Map::new(),
        }
    }
}

/// Ordered list of family members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Roster {
    family: Vec<Member>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

// Persisted shape; `id` is absent in rosters written before ids existed.
#[derive(Deserialize)]
struct StoredRoster {
    family: Vec<StoredMember>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Deserialize)]
struct StoredMember {
    #[serde(default)]
    id: Option<MemberId>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    medicines: Vec<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Default for Roster {
    fn default() -> Self {
        Self::seeded()
    }
}

impl Roster {
    /// Returns the built-in roster: one member with the default medicines.
    ///
    /// The seeded member uses id `"0"` so that log entries recorded before the
    /// roster is ever saved still resolve in later sessions.
    pub fn seeded() -> Self {
        let medicines = DEFAULT_MEDICINES.iter().map(|m| m.to_string()).collect();
        Self {
            family: vec![Member::with_id("0", DEFAULT_MEMBER_NAME, medicines)],
            extra: Map::new(),
        }
    }

    /// Builds a roster from existing members.
    ///
    /// # Errors
    /// - `CodecError::EmptyRoster` when `family` is empty.
    pub fn from_members(family: Vec<Member>) -> CodecResult<Self> {
        if family.is_empty() {
            return Err(CodecError::EmptyRoster);
        }
        Ok(Self {
            family,
            extra: Map::new(),
        })
    }

    /// Parses a `medicineData` payload.
    ///
    /// Members without an `id` get their positional index as id.
    ///
    /// # Errors
    /// - `CodecError::Json` when the payload has no `family` array.
    /// - `CodecError::EmptyRoster` when `family` is empty.
    pub fn from_json(payload: &str) -> CodecResult<Self> {
        let stored: StoredRoster = serde_json::from_str(payload)?;
        let family = stored
            .family
            .into_iter()
            .enumerate()
            .map(|(index, member)| Member {
                id: member.id.unwrap_or_else(|| index.to_string()),
                name: member.name,
                medicines: member.medicines,
                extra: member.extra,
            })
            .collect();
        let mut roster = Self::from_members(family)?;
        roster.extra = stored.extra;
        Ok(roster)
    }

    /// Serializes to the compact `medicineData` payload.
    pub fn to_json(&self) -> CodecResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Members in insertion order.
    pub fn members(&self) -> &[Member] {
        &self.family
    }

    /// Number of members; at least one.
    pub fn len(&self) -> usize {
        self.family.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.family.is_empty()
    }

    /// Returns the member at `index`, or `None` when out of range.
    pub fn member(&self, index: usize) -> Option<&Member> {
        self.family.get(index)
    }

    /// Appends a member and returns its index.
    pub fn push_member(&mut self, member: Member) -> usize {
        self.family.push(member);
        self.family.len() - 1
    }

    /// Appends a medicine to the member at `index`.
    ///
    /// Returns `false` without mutating when `index` is out of range.
    pub fn push_medicine(&mut self, index: usize, medicine: impl Into<String>) -> bool {
        match self.family.get_mut(index) {
            Some(member) => {
                member.medicines.push(medicine.into());
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Member, Roster, DEFAULT_MEDICINES, DEFAULT_MEMBER_NAME};
    use crate::model::codec::CodecError;

    #[test]
    fn seeded_roster_has_one_member_with_default_medicines() {
        let roster = Roster::seeded();
        assert_eq!(roster.len(), 1);
        let member = roster.member(0).unwrap();
        assert_eq!(member.id, "0");
        assert_eq!(member.name, DEFAULT_MEMBER_NAME);
        assert_eq!(member.medicines, DEFAULT_MEDICINES.to_vec());
    }

    #[test]
    fn legacy_payload_without_ids_gets_index_ids() {
        let payload = r#"{"family":[{"name":"Asha","medicines":["A"]},{"name":"Ravi","medicines":[]}]}"#;
        let roster = Roster::from_json(payload).unwrap();
        let ids: Vec<&str> = roster.members().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["0", "1"]);
    }

    #[test]
    fn stored_ids_are_kept_verbatim() {
        let payload = r#"{"family":[{"id":"abc","name":"Asha","medicines":[]}]}"#;
        let roster = Roster::from_json(payload).unwrap();
        assert_eq!(roster.member(0).unwrap().id, "abc");
    }

    #[test]
    fn missing_names_and_unknown_fields_survive_a_save() {
        let payload = r#"{"family":[{"medicines":["X"],"dob":"1950-02-01"}],"v":2}"#;
        let mut roster = Roster::from_json(payload).unwrap();
        let member = roster.member(0).unwrap();
        assert_eq!(member.name, "");
        assert_eq!(member.medicines, vec!["X"]);
        assert_eq!(member.extra.get("dob"), Some(&serde_json::json!("1950-02-01")));

        roster.push_medicine(0, "Y");
        let saved: serde_json::Value = serde_json::from_str(&roster.to_json().unwrap()).unwrap();
        assert_eq!(
            saved,
            serde_json::json!({
                "family": [{"id": "0", "name": "", "medicines": ["X", "Y"], "dob": "1950-02-01"}],
                "v": 2
            })
        );
    }

    #[test]
    fn empty_family_is_rejected() {
        let err = Roster::from_json(r#"{"family":[]}"#).unwrap_err();
        assert!(matches!(err, CodecError::EmptyRoster));
    }

    #[test]
    fn malformed_payload_is_a_json_error() {
        let err = Roster::from_json("{not json").unwrap_err();
        assert!(matches!(err, CodecError::Json(_)));
    }

    #[test]
    fn new_members_get_distinct_generated_ids() {
        let first = Member::new("A");
        let second = Member::new("A");
        assert_ne!(first.id, second.id);
        assert_eq!(first.id.len(), 32);
    }

    #[test]
    fn push_medicine_out_of_range_is_rejected() {
        let mut roster = Roster::seeded();
        assert!(!roster.push_medicine(3, "X"));
        assert_eq!(roster, Roster::seeded());
    }

    #[test]
    fn json_round_trip_preserves_roster() {
        let mut roster = Roster::seeded();
        roster.push_member(Member::new("Ravi"));
        roster.push_medicine(1, "Vitamin D");
        let reloaded = Roster::from_json(&roster.to_json().unwrap()).unwrap();
        assert_eq!(reloaded, roster);
    }
}
