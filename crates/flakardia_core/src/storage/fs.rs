//! Filesystem-backed flashcard storage.

use crate::model::card::{Flashcard, FlashcardData};
use crate::model::entry::FlashcardSetListEntry;
use crate::model::path::RelativePath;
use crate::model::stats::LibraryStats;
use crate::storage::error::{StorageError, StorageResult};
use crate::storage::parse::{format_flashcards, parse_flashcards};
use crate::storage::recovery::{
    find_candidates, multiple_candidates_message, single_candidate_message, StatsFileRecovery,
};
use crate::storage::{FlashcardStorage, FLAKARDIA_DIR, STATS_FILE};
use log::{debug, error, info, warn};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Storage rooted at a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct FsFlashcardStorage<R> {
    root: PathBuf,
    flakardia_dir: PathBuf,
    stats_file: PathBuf,
    recovery: R,
}

impl<R: StatsFileRecovery> FsFlashcardStorage<R> {
    pub fn new(root: impl Into<PathBuf>, recovery: R) -> Self {
        let root = root.into();
        let flakardia_dir = root.join(FLAKARDIA_DIR);
        let stats_file = flakardia_dir.join(STATS_FILE);
        Self {
            root,
            flakardia_dir,
            stats_file,
            recovery,
        }
    }

    pub fn stats_file(&self) -> &Path {
        &self.stats_file
    }

    fn to_fs_path(&self, path: &RelativePath) -> PathBuf {
        path.elements()
            .iter()
            .fold(self.root.clone(), |acc, element| acc.join(element))
    }

    fn ensure_flakardia_dir(&self) -> StorageResult<()> {
        fs::create_dir_all(&self.flakardia_dir)
            .map_err(|err| StorageError::io(self.flakardia_dir.display().to_string(), err))
    }

    /// Tries to bring a renamed stats file back. Returns whether `stats.json`
    /// exists afterwards.
    fn recover_stats_file(&self) -> StorageResult<bool> {
        let candidates = find_candidates(&self.flakardia_dir)
            .map_err(|err| StorageError::io(self.flakardia_dir.display().to_string(), err))?;
        let names: Vec<String> = candidates
            .iter()
            .map(|path| display_name(path))
            .collect();

        match candidates.as_slice() {
            [] => Ok(false),
            [candidate] => {
                let name = &names[0];
                if !self.recovery.request_recovery(&single_candidate_message(name)) {
                    info!(
                        "event=stats_recovery module=storage status=declined candidate={name}"
                    );
                    return Ok(false);
                }
                fs::rename(candidate, &self.stats_file)
                    .map_err(|err| StorageError::io(name.clone(), err))?;
                info!("event=stats_recovery module=storage status=ok candidate={name}");
                Ok(true)
            }
            _ => {
                self.recovery
                    .notify_recovery_impossible(&multiple_candidates_message(&names));
                warn!(
                    "event=stats_recovery module=storage status=ambiguous candidates={}",
                    names.len()
                );
                Ok(false)
            }
        }
    }

    fn read_stats_inner(&self) -> StorageResult<LibraryStats> {
        self.ensure_flakardia_dir()?;
        if !self.stats_file.exists() && !self.recover_stats_file()? {
            return Ok(LibraryStats::default());
        }
        let context = self.stats_file.display().to_string();
        let json =
            fs::read_to_string(&self.stats_file).map_err(|err| StorageError::io(&context, err))?;
        serde_json::from_str(&json).map_err(|err| StorageError::json(context, err))
    }

    /// Writes `content` to `target` through a temp file in the same directory.
    fn save_text_file(
        &self,
        target: &Path,
        prefix: &str,
        suffix: &str,
        content: &str,
    ) -> StorageResult<()> {
        let context = target.display().to_string();
        self.ensure_flakardia_dir()?;
        let parent = target
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.root.clone());
        fs::create_dir_all(&parent).map_err(|err| StorageError::io(&context, err))?;

        let mut temp = tempfile::Builder::new()
            .prefix(prefix)
            .suffix(suffix)
            .tempfile_in(&parent)
            .map_err(|err| StorageError::io(&context, err))?;
        temp.write_all(content.as_bytes())
            .and_then(|()| temp.as_file().sync_all())
            .map_err(|err| StorageError::io(&context, err))?;
        // On failure the returned NamedTempFile is dropped, which deletes it.
        temp.persist(target)
            .map_err(|err| StorageError::io(&context, err.error))?;
        Ok(())
    }
}

impl<R: StatsFileRecovery> FlashcardStorage for FsFlashcardStorage<R> {
    fn root(&self) -> &Path {
        &self.root
    }

    fn read_entries(&self, dir: &RelativePath) -> StorageResult<Vec<FlashcardSetListEntry>> {
        let fs_dir = self.to_fs_path(dir);
        let context = fs_dir.display().to_string();
        let mut entries = Vec::new();
        for item in fs::read_dir(&fs_dir).map_err(|err| StorageError::io(&context, err))? {
            let item = item.map_err(|err| StorageError::io(&context, err))?;
            let name = item.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }
            let path = dir.join(&name);
            let item_path = item.path();
            if item_path.is_file() && is_readable(&item_path) {
                entries.push(FlashcardSetListEntry::File(path));
            } else if item_path.is_dir() {
                entries.push(FlashcardSetListEntry::Dir(path));
            }
        }
        debug!(
            "event=storage_read module=storage status=ok kind=entries dir={} count={}",
            dir,
            entries.len()
        );
        Ok(entries)
    }

    fn read_flashcards(&self, file: &RelativePath) -> StorageResult<Vec<FlashcardData>> {
        let started_at = Instant::now();
        let content = match fs::read_to_string(self.to_fs_path(file)) {
            Ok(content) => content,
            Err(err) => {
                error!(
                    "event=storage_read module=storage status=error kind=cards error_code=io error={}",
                    err
                );
                return Err(StorageError::io(file.file_name(), err));
            }
        };
        let cards = parse_flashcards(file, &content)?;
        debug!(
            "event=storage_read module=storage status=ok kind=cards count={} duration_ms={}",
            cards.len(),
            started_at.elapsed().as_millis()
        );
        Ok(cards)
    }

    fn read_library_stats(&self) -> StorageResult<LibraryStats> {
        match self.read_stats_inner() {
            Ok(stats) => {
                debug!(
                    "event=stats_read module=storage status=ok words={}",
                    stats.word_stats.len()
                );
                Ok(stats)
            }
            Err(err) => {
                error!(
                    "event=stats_read module=storage status=error error_code={} error={}",
                    err.code(),
                    err
                );
                Err(err)
            }
        }
    }

    fn save_library_stats(&self, stats: &LibraryStats) -> StorageResult<()> {
        let json = serde_json::to_string_pretty(stats)
            .map_err(|err| StorageError::json(self.stats_file.display().to_string(), err))?;
        let result = self.save_text_file(&self.stats_file, "stats", ".json", &json);
        match &result {
            Ok(()) => info!(
                "event=stats_save module=storage status=ok words={}",
                stats.word_stats.len()
            ),
            Err(err) => error!(
                "event=stats_save module=storage status=error error_code={} error={}",
                err.code(),
                err
            ),
        }
        result
    }

    fn save_flashcard_set_file(
        &self,
        file: &RelativePath,
        cards: &[Flashcard],
    ) -> StorageResult<()> {
        let target = self.to_fs_path(file);
        let result = self.save_text_file(&target, "cards", ".txt", &format_flashcards(cards));
        match &result {
            Ok(()) => info!(
                "event=cards_save module=storage status=ok count={}",
                cards.len()
            ),
            Err(err) => error!(
                "event=cards_save module=storage status=error error_code={} error={}",
                err.code(),
                err
            ),
        }
        result
    }

    fn create_dir(&self, dir: &RelativePath) -> StorageResult<()> {
        let target = self.to_fs_path(dir);
        fs::create_dir_all(&target)
            .map_err(|err| StorageError::io(target.display().to_string(), err))
    }

    fn create_file(&self, file: &RelativePath) -> StorageResult<()> {
        let target = self.to_fs_path(file);
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
            .map(drop)
            .map_err(|err| StorageError::io(target.display().to_string(), err))
    }
}

fn is_readable(path: &Path) -> bool {
    File::open(path).is_ok()
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
