//! Flashcard library domain model.
//!
//! # Responsibility
//! - Define the card, path and statistics records shared by storage and the
//!   library layer.
//!
//! # Invariants
//! - Cards are identified by content; the same card may appear in many files.
//! - Statistics are keyed by answer word.

pub mod card;
pub mod entry;
pub mod path;
pub mod stats;
