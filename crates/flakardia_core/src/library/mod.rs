//! Library use cases built on the exported storage package.
//!
//! # Responsibility
//! - Orchestrate storage calls into listing, reading and saving use cases.
//! - Keep callers decoupled from filesystem details.

pub mod card_library;
pub mod duplicates;
pub mod manager;
