//! In-memory note collection with host-backed persistence.
//!
//! # Responsibility
//! - Own the note collection and loading flag for one app session.
//! - Apply mutations optimistically, then persist the full collection.
//!
//! # Invariants
//! - Every persisted write contains the whole collection.
//! - A failed save never rolls back the in-memory change.

pub mod clock;
pub mod note_store;
