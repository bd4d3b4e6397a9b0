//! Flutter-facing bindings for the medicine tracker core.

pub mod api;
