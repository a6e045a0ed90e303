//! Use-case services the UI layer calls.
//!
//! # Responsibility
//! - Wrap load-mutate-save sequences over the persistence store.
//! - Apply the read fallback policy so screens always get a list to render.
//!
//! # Invariants
//! - Read paths never fail; they log and return an empty or seeded default.
//! - Write paths never replace unreadable data with a fallback value.

pub mod roster_service;
pub mod task_service;
