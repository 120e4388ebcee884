//! Library use-case layer over a [`FlashcardStorage`].
//!
//! # Responsibility
//! - Present sorted directory listings with a parent link.
//! - Collect cards of a file or of a whole directory tree.
//! - Merge updated stats into the persisted ones.
//!
//! # Invariants
//! - Directory reads stop at the first failing file.
//! - Listings put directories before files, each group sorted by name.

use crate::model::card::{Flashcard, FlashcardData, Word};
use crate::model::entry::FlashcardSetListEntry;
use crate::model::path::{FullPath, RelativePath};
use crate::model::stats::LibraryStats;
use crate::storage::{FlashcardStorage, StorageResult};
use log::warn;
use std::collections::HashMap;

/// Header line of the duplicate-card warning.
pub const DUPLICATES_WARNING_HEADER: &str = "The following duplicate words were detected";

/// All cards of one list entry with the stats that belong to them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardSetView {
    pub name: String,
    pub flashcards: Vec<FlashcardData>,
    pub stats: LibraryStats,
    /// Human-readable warnings; empty when the set is clean.
    pub warnings: Vec<String>,
}

impl CardSetView {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// One flashcard library.
#[derive(Debug, Clone)]
pub struct Library<S> {
    storage: S,
}

impl<S: FlashcardStorage> Library<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn name(&self) -> String {
        self.storage.name()
    }

    /// Whether both libraries point to the same root directory.
    pub fn is_same_library(&self, other: &Library<S>) -> bool {
        self.storage.root() == other.storage.root()
    }

    pub fn list_entries(&self, dir: &RelativePath) -> StorageResult<Vec<FlashcardSetListEntry>> {
        let mut entries = Vec::new();
        if let Some(parent) = dir.parent() {
            entries.push(FlashcardSetListEntry::Up(parent));
        }
        entries.extend(self.storage.read_entries(dir)?);
        entries.sort_by(|a, b| {
            a.is_file()
                .cmp(&b.is_file())
                .then_with(|| a.name().cmp(b.name()))
        });
        Ok(entries)
    }

    pub fn read_flashcards(&self, entry: &FlashcardSetListEntry) -> StorageResult<Vec<FlashcardData>> {
        match entry {
            FlashcardSetListEntry::File(path) => self.storage.read_flashcards(path),
            FlashcardSetListEntry::Dir(path) => {
                let mut cards = Vec::new();
                for sub_entry in self.list_entries(path)? {
                    cards.extend(self.read_flashcards(&sub_entry)?);
                }
                Ok(cards)
            }
            FlashcardSetListEntry::Up(_) => Ok(Vec::new()),
        }
    }

    /// Reads every card of `entry` with its stats and duplicate warnings.
    pub fn card_set_view(&self, entry: &FlashcardSetListEntry) -> StorageResult<CardSetView> {
        let flashcards = self.read_flashcards(entry)?;
        let stats = self.storage.read_library_stats()?.filter(&flashcards);
        let warnings = duplicate_warnings(&flashcards);
        let view = CardSetView {
            name: entry.name().to_string(),
            flashcards,
            stats,
            warnings,
        };
        if view.has_warnings() {
            warn!(
                "event=duplicates_detected module=library status=ok count={}",
                view.warnings.len() - 1
            );
        }
        Ok(view)
    }

    /// Merges `stats` into the persisted stats and saves the result.
    pub fn save_updated_stats(&self, stats: &LibraryStats) -> StorageResult<()> {
        let current = self.storage.read_library_stats()?;
        self.storage.save_library_stats(&current.update(stats))
    }

    pub fn save_flashcard_set_file(
        &self,
        file: &RelativePath,
        cards: &[Flashcard],
    ) -> StorageResult<()> {
        self.storage.save_flashcard_set_file(file, cards)
    }

    pub fn create_dir(&self, dir: &RelativePath) -> StorageResult<()> {
        self.storage.create_dir(dir)
    }

    pub fn create_file(&self, file: &RelativePath) -> StorageResult<()> {
        self.storage.create_file(file)
    }

    pub fn full_path(&self, path: RelativePath) -> FullPath {
        FullPath::new(self.name(), path)
    }
}

/// Lists every card sharing its question or answer with another card.
///
/// Returns an empty list when there are no duplicates; otherwise the header
/// followed by one `path:question:answer` line per card, in card order.
fn duplicate_warnings(cards: &[FlashcardData]) -> Vec<String> {
    let mut by_question: HashMap<&Word, usize> = HashMap::new();
    let mut by_answer: HashMap<&Word, usize> = HashMap::new();
    for card in cards {
        *by_question.entry(&card.flashcard.question).or_default() += 1;
        *by_answer.entry(&card.flashcard.answer).or_default() += 1;
    }

    let mut seen = std::collections::HashSet::new();
    let duplicates: Vec<String> = cards
        .iter()
        .filter(|card| {
            by_question[&card.flashcard.question] > 1 || by_answer[&card.flashcard.answer] > 1
        })
        .filter(|card| seen.insert(*card))
        .map(ToString::to_string)
        .collect();

    if duplicates.is_empty() {
        return duplicates;
    }
    std::iter::once(DUPLICATES_WARNING_HEADER.to_string())
        .chain(duplicates)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{duplicate_warnings, DUPLICATES_WARNING_HEADER};
    use crate::model::card::{Flashcard, FlashcardData};
    use crate::model::path::RelativePath;

    fn cards(pairs: &[(&str, &str)]) -> Vec<FlashcardData> {
        pairs
            .iter()
            .map(|(q, a)| FlashcardData::new(RelativePath::parse("set.txt"), Flashcard::new(*q, *a)))
            .collect()
    }

    fn assert_warns(pairs: &[(&str, &str)], expected: &[&str]) {
        let warnings = duplicate_warnings(&cards(pairs));
        if expected.is_empty() {
            assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
            return;
        }
        assert_eq!(warnings[0], DUPLICATES_WARNING_HEADER);
        for word in expected {
            assert!(
                warnings.iter().skip(1).any(|line| line.contains(word)),
                "must contain {word}: {warnings:?}"
            );
        }
    }

    #[test]
    fn no_duplicates() {
        assert_warns(
            &[("front a", "back a"), ("front b", "back b"), ("front c", "back c")],
            &[],
        );
    }

    #[test]
    fn duplicate_question() {
        assert_warns(
            &[("front a", "back a"), ("front a", "back b"), ("front c", "back c")],
            &["front a"],
        );
    }

    #[test]
    fn duplicate_answer() {
        assert_warns(
            &[("front a", "back a"), ("front b", "back a"), ("front c", "back c")],
            &["back a"],
        );
    }

    #[test]
    fn duplicate_both() {
        assert_warns(
            &[("front a", "back a"), ("front b", "back a"), ("front b", "back c")],
            &["back a", "front b"],
        );
    }

    #[test]
    fn identical_cards_are_listed_once() {
        let warnings = duplicate_warnings(&cards(&[("q", "a"), ("q", "a")]));
        assert_eq!(warnings, vec![DUPLICATES_WARNING_HEADER.to_string(), "set.txt:q:a".to_string()]);
    }
}
