//! Note domain model.
//!
//! # Responsibility
//! - Define the persisted note record and its derived projections.
//! - Own the lifecycle helpers that keep note invariants in one place.
//!
//! # Invariants
//! - `id` and `created_at` never change after creation.
//! - `updated_at` never moves backwards.
//! - `title` and `text` are stored trimmed.

pub mod note;
