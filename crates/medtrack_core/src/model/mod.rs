//! Domain model for the family roster and the daily adherence log.
//!
//! # Responsibility
//! - Define the canonical in-memory shapes of both persisted slots.
//! - Own the JSON boundary (`from_json` / `to_json`) for each shape.
//!
//! # Invariants
//! - A `Roster` always holds at least one member.
//! - Log entries address members by stable `MemberId`, never by position.

pub mod adherence;
pub mod calendar;
pub mod codec;
pub mod roster;
