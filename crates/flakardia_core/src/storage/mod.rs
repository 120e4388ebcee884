//! Flashcard library storage: the package exported by the application module.
//!
//! # Responsibility
//! - List card-set files and directories of a library.
//! - Read and write card-set files.
//! - Read and write library statistics under `.flakardia/stats.json`.
//!
//! # Invariants
//! - Hidden entries (names starting with `.`) are never listed.
//! - Writes are atomic: content goes to a temp file that is renamed over the
//!   target, and the temp file is removed on failure.
//! - A missing stats file is empty stats, never an error.

mod error;
mod fs;
mod parse;
mod recovery;

use crate::model::card::{Flashcard, FlashcardData};
use crate::model::entry::FlashcardSetListEntry;
use crate::model::path::RelativePath;
use crate::model::stats::LibraryStats;
use std::path::Path;

pub use error::{StorageError, StorageResult};
pub use fs::FsFlashcardStorage;
pub use parse::{format_flashcards, parse_flashcards};
pub use recovery::{NoRecovery, StatsFileRecovery};

/// Name of the hidden per-library metadata directory.
pub const FLAKARDIA_DIR: &str = ".flakardia";
/// Name of the stats file inside [`FLAKARDIA_DIR`].
pub const STATS_FILE: &str = "stats.json";

/// Storage contract used by the library layer.
pub trait FlashcardStorage {
    /// Filesystem root of the library.
    fn root(&self) -> &Path;

    /// Display name of the library: the last component of its root.
    fn name(&self) -> String {
        self.root()
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.root().display().to_string())
    }

    fn read_entries(&self, dir: &RelativePath) -> StorageResult<Vec<FlashcardSetListEntry>>;
    fn read_flashcards(&self, file: &RelativePath) -> StorageResult<Vec<FlashcardData>>;
    fn read_library_stats(&self) -> StorageResult<LibraryStats>;
    fn save_library_stats(&self, stats: &LibraryStats) -> StorageResult<()>;
    fn save_flashcard_set_file(&self, file: &RelativePath, cards: &[Flashcard])
        -> StorageResult<()>;
    fn create_dir(&self, dir: &RelativePath) -> StorageResult<()>;
    fn create_file(&self, file: &RelativePath) -> StorageResult<()>;
}
