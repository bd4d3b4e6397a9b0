//! Tracker use-case services.
//!
//! # Responsibility
//! - Own the roster and adherence stores for one session.
//! - Turn each mutation into an in-memory update followed by one slot save.
//! - Keep front ends (CLI/FFI) decoupled from storage details.

pub mod adherence_store;
pub mod export;
mod persist;
pub mod prompt;
pub mod roster_store;
pub mod tracker_service;
