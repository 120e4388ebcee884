//! Core of the Flakardia flashcard application.
//!
//! The crate declares the application module boundary and implements the
//! `storage` package it exports, plus the library layer that consumes it.

pub mod config;
pub mod library;
pub mod logging;
pub mod model;
pub mod module;
pub mod storage;

pub use config::{AppConfig, ConfigError, ConfigStore, DebugMode};
pub use library::card_library::{CardSetView, Library, DUPLICATES_WARNING_HEADER};
pub use library::duplicates::{DraftId, Duplicate, DuplicateDetector, FlashcardDraft};
pub use library::manager::{CardManager, ManagerError, ManagerResult};
pub use logging::{init_logging, logging_status, parse_log_level, LogLevel, LoggingError};
pub use model::card::{Flashcard, FlashcardData, Word};
pub use model::entry::FlashcardSetListEntry;
pub use model::path::{FullPath, RelativePath};
pub use model::stats::{LibraryStats, WordStats};
pub use module::dependency::{parse_module_dependency, DependencyParseError, ModuleDependency};
pub use module::descriptor::{
    flakardia_descriptor, parse_descriptor_revision, DescriptorDiff, DescriptorRevision,
    DescriptorValidationError, ModuleDescriptor, FLAKARDIA_MODULE_NAME, STORAGE_PACKAGE,
};
pub use module::resolver::{ModuleResolver, ModuleSource, ResolutionError, ResolvedModule};
pub use storage::{
    FlashcardStorage, FsFlashcardStorage, NoRecovery, StatsFileRecovery, StorageError,
    StorageResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Resolves the latest application descriptor against the known dependencies.
///
/// This is the startup check: a missing requirement aborts launch.
pub fn resolve_application_module() -> Result<ModuleResolver, ResolutionError> {
    let mut resolver = ModuleResolver::with_known_dependencies();
    resolver.resolve(&flakardia_descriptor(DescriptorRevision::latest()))?;
    Ok(resolver)
}

#[cfg(test)]
mod tests {
    use super::{core_version, resolve_application_module, STORAGE_PACKAGE};

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn application_module_resolves_at_startup() {
        let resolver = resolve_application_module().expect("startup resolution");
        assert_eq!(resolver.exporter_of(STORAGE_PACKAGE), Some("flakardia"));
    }
}
