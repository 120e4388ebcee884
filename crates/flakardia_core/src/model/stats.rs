//! Per-word learning statistics persisted by the storage layer.
//!
//! # Invariants
//! - Stats are keyed by the answer word of a card.
//! - Intervals are stored as fractional days and read back with whole-second
//!   precision. Negative intervals, written when synced machines disagree
//!   about the clock, read back as zero.

use crate::model::card::{FlashcardData, Word};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

/// Learning history of one word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordStats {
    pub last_learned: DateTime<Utc>,
    #[serde(with = "duration_days")]
    pub interval_before_last_learned: Duration,
    pub mistakes: u32,
}

/// Statistics of a whole library.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryStats {
    pub word_stats: BTreeMap<Word, WordStats>,
}

impl LibraryStats {
    pub fn new(word_stats: BTreeMap<Word, WordStats>) -> Self {
        Self { word_stats }
    }

    pub fn is_empty(&self) -> bool {
        self.word_stats.is_empty()
    }

    pub fn get(&self, word: &Word) -> Option<&WordStats> {
        self.word_stats.get(word)
    }

    /// Returns these stats overridden by the entries of `newer`.
    pub fn update(&self, newer: &LibraryStats) -> LibraryStats {
        let mut word_stats = self.word_stats.clone();
        word_stats.extend(
            newer
                .word_stats
                .iter()
                .map(|(word, stats)| (word.clone(), stats.clone())),
        );
        LibraryStats { word_stats }
    }

    /// Keeps only the stats of the answers of `cards`.
    pub fn filter(&self, cards: &[FlashcardData]) -> LibraryStats {
        let answers: BTreeSet<&Word> = cards.iter().map(|card| &card.flashcard.answer).collect();
        LibraryStats {
            word_stats: self
                .word_stats
                .iter()
                .filter(|(word, _)| answers.contains(word))
                .map(|(word, stats)| (word.clone(), stats.clone()))
                .collect(),
        }
    }
}

mod duration_days {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    const SECONDS_PER_DAY: f64 = 86_400.0;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs() as f64 / SECONDS_PER_DAY)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let days = f64::deserialize(deserializer)?;
        if !days.is_finite() {
            return Err(D::Error::custom(format!(
                "interval must be a finite number of days, got {days}"
            )));
        }
        let seconds = (days * SECONDS_PER_DAY).round();
        if seconds <= 0.0 {
            return Ok(Duration::ZERO);
        }
        Ok(Duration::from_secs(seconds as u64))
    }
}
