//! Flashcard domain model.

use crate::model::path::RelativePath;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt::{Display, Formatter};

/// One side of a flashcard.
///
/// Words are compared by their exact text. Serialized words are trimmed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(transparent)]
pub struct Word(String);

impl Word {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Serialize for Word {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0.trim())
    }
}

impl Display for Word {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Word {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Question/answer pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Flashcard {
    pub question: Word,
    pub answer: Word,
}

impl Flashcard {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: Word::new(question),
            answer: Word::new(answer),
        }
    }
}

/// A flashcard together with the card-set file it was read from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FlashcardData {
    pub path: RelativePath,
    pub flashcard: Flashcard,
}

impl FlashcardData {
    pub fn new(path: RelativePath, flashcard: Flashcard) -> Self {
        Self { path, flashcard }
    }
}

impl Display for FlashcardData {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.path, self.flashcard.question, self.flashcard.answer
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{Flashcard, FlashcardData, Word};
    use crate::model::path::RelativePath;

    #[test]
    fn word_serializes_trimmed() {
        let json = serde_json::to_string(&Word::new("  hello ")).expect("serialize word");
        assert_eq!(json, "\"hello\"");
    }

    #[test]
    fn word_deserializes_verbatim() {
        let word: Word = serde_json::from_str("\"hello\"").expect("deserialize word");
        assert_eq!(word, Word::new("hello"));
    }

    #[test]
    fn blank_word_detection() {
        assert!(Word::new(" \t").is_blank());
        assert!(!Word::new(" a ").is_blank());
    }

    #[test]
    fn card_data_displays_path_question_answer() {
        let data = FlashcardData::new(RelativePath::parse("dir/set.txt"), Flashcard::new("q", "a"));
        assert_eq!(data.to_string(), "dir/set.txt:q:a");
    }
}
