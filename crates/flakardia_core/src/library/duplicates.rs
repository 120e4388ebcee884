//! Duplicate lookup while editing one card-set file.
//!
//! # Invariants
//! - Cards of the edited file come only from drafts, never from disk.
//! - Blank questions and answers are never indexed.
//! - A draft is never reported as a duplicate of itself.

use crate::library::card_library::Library;
use crate::model::card::{FlashcardData, Word};
use crate::model::entry::FlashcardSetListEntry;
use crate::model::path::RelativePath;
use crate::storage::FlashcardStorage;
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identity of a card being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DraftId(Uuid);

impl DraftId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DraftId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for DraftId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A card in the editor, possibly not saved yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashcardDraft {
    pub id: DraftId,
    pub path: RelativePath,
    pub question: String,
    pub answer: String,
}

impl FlashcardDraft {
    pub fn new(path: RelativePath, question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            id: DraftId::new(),
            path,
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// A card found with the same question or answer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Duplicate {
    /// `None` for cards read from other files.
    pub id: Option<DraftId>,
    pub path: RelativePath,
    pub question: Word,
    pub answer: Word,
}

impl From<&FlashcardDraft> for Duplicate {
    fn from(card: &FlashcardDraft) -> Self {
        Self {
            id: Some(card.id),
            path: card.path.clone(),
            question: Word::new(card.question.as_str()),
            answer: Word::new(card.answer.as_str()),
        }
    }
}

impl From<&FlashcardData> for Duplicate {
    fn from(card: &FlashcardData) -> Self {
        Self {
            id: None,
            path: card.path.clone(),
            question: card.flashcard.question.clone(),
            answer: card.flashcard.answer.clone(),
        }
    }
}

/// Index of questions and answers for duplicate warnings in the editor.
pub struct DuplicateDetector<'a, S> {
    library: &'a Library<S>,
    draft_file: RelativePath,
    area: Option<RelativePath>,
    by_question: HashMap<Word, HashSet<Duplicate>>,
    by_answer: HashMap<Word, HashSet<Duplicate>>,
}

impl<'a, S: FlashcardStorage> DuplicateDetector<'a, S> {
    pub fn new(library: &'a Library<S>, draft_file: RelativePath) -> Self {
        Self {
            library,
            draft_file,
            area: None,
            by_question: HashMap::new(),
            by_answer: HashMap::new(),
        }
    }

    pub fn area(&self) -> Option<&RelativePath> {
        self.area.as_ref()
    }

    /// Sets the directory whose other files are searched for duplicates.
    ///
    /// Cards from the previous area are dropped. A directory that cannot be
    /// read contributes nothing.
    pub fn set_area(&mut self, area: Option<RelativePath>) {
        for duplicates in self
            .by_question
            .values_mut()
            .chain(self.by_answer.values_mut())
        {
            duplicates.retain(|card| card.id.is_some());
        }

        if let Some(dir) = &area {
            match self
                .library
                .read_flashcards(&FlashcardSetListEntry::Dir(dir.clone()))
            {
                Ok(cards) => {
                    let draft_file = self.draft_file.clone();
                    for card in cards.iter().filter(|card| card.path != draft_file) {
                        self.index(Duplicate::from(card));
                    }
                }
                Err(err) => warn!(
                    "event=duplicates_area module=library status=error error_code={} error={}",
                    err.code(),
                    err
                ),
            }
        }
        self.area = area;
    }

    pub fn add_card(&mut self, card: &FlashcardDraft) {
        self.index(Duplicate::from(card));
    }

    /// Removes `card` as it was last added.
    pub fn remove_card(&mut self, card: &FlashcardDraft) {
        let duplicate = Duplicate::from(card);
        if let Some(set) = self.by_question.get_mut(&duplicate.question) {
            set.remove(&duplicate);
        }
        if let Some(set) = self.by_answer.get_mut(&duplicate.answer) {
            set.remove(&duplicate);
        }
    }

    pub fn question_duplicates(&self, card: &FlashcardDraft) -> Vec<Duplicate> {
        others(self.by_question.get(&Word::new(card.question.as_str())), card.id)
    }

    pub fn answer_duplicates(&self, card: &FlashcardDraft) -> Vec<Duplicate> {
        others(self.by_answer.get(&Word::new(card.answer.as_str())), card.id)
    }

    fn index(&mut self, card: Duplicate) {
        if !card.question.is_blank() {
            self.by_question
                .entry(card.question.clone())
                .or_default()
                .insert(card.clone());
        }
        if !card.answer.is_blank() {
            self.by_answer
                .entry(card.answer.clone())
                .or_default()
                .insert(card);
        }
    }
}

fn others(set: Option<&HashSet<Duplicate>>, id: DraftId) -> Vec<Duplicate> {
    let mut result: Vec<Duplicate> = set
        .into_iter()
        .flatten()
        .filter(|card| card.id != Some(id))
        .cloned()
        .collect();
    result.sort_by(|a, b| a.path.cmp(&b.path).then_with(|| a.question.cmp(&b.question)));
    result
}
