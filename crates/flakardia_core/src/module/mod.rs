//! Application module boundary.
//!
//! This module declares the application module descriptor (name, required
//! modules, exported packages) and the startup resolver that turns a missing
//! requirement into a fatal launch error.

pub mod dependency;
pub mod descriptor;
pub mod resolver;
