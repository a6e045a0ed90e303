//! Flutter-facing bindings for the family board core.

pub mod api;
