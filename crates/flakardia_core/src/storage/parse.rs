//! Card-set file parsing.
//!
//! Two layouts are accepted:
//! - blank-line delimited: each group of exactly two non-blank lines is one
//!   card (question line, then answer line);
//! - one card per line, split at a delimiter character that occurs exactly
//!   once in every non-blank line.

use crate::model::card::{Flashcard, FlashcardData, Word};
use crate::model::path::RelativePath;
use crate::storage::error::{StorageError, StorageResult};
use std::collections::{BTreeSet, HashMap};

const BOM: char = '\u{FEFF}';

/// Parses the text of one card-set file read from `path`.
pub fn parse_flashcards(path: &RelativePath, content: &str) -> StorageResult<Vec<FlashcardData>> {
    let lines: Vec<&str> = content.lines().collect();
    let cards = if is_empty_line_delimited(&lines) {
        parse_using_empty_lines(&lines)
    } else {
        let delimiter = guess_delimiter(&lines).ok_or_else(|| StorageError::Parse {
            path: path.to_string(),
            message: "Could not determine the delimiter character.\n\
                It must appear once and only once in every non-blank line, \
                but there was no such character"
                .to_string(),
        })?;
        parse_using_delimiter(&lines, delimiter)
    };

    Ok(cards
        .into_iter()
        .map(|card| FlashcardData::new(path.clone(), card))
        .collect())
}

/// Serializes cards in the blank-line delimited layout.
pub fn format_flashcards(cards: &[Flashcard]) -> String {
    cards
        .iter()
        .map(|card| format!("{}\n{}\n", card.question, card.answer))
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn is_empty_line_delimited(lines: &[&str]) -> bool {
    let mut run = 0;
    for line in lines.iter().copied().chain(std::iter::once("")) {
        if is_blank(line) {
            if run != 0 && run != 2 {
                return false;
            }
            run = 0;
        } else {
            run += 1;
        }
    }
    true
}

fn parse_using_empty_lines(lines: &[&str]) -> Vec<Flashcard> {
    let mut cards = Vec::new();
    let mut words: Vec<Word> = Vec::with_capacity(2);
    for line in lines.iter().copied().chain(std::iter::once("")) {
        if is_blank(line) {
            if let [question, answer] = words.as_slice() {
                cards.push(Flashcard {
                    question: question.clone(),
                    answer: answer.clone(),
                });
            }
            words.clear();
        } else {
            words.push(parse_word(line));
        }
    }
    cards
}

/// Smallest character that occurs exactly once in every non-blank line.
fn guess_delimiter(lines: &[&str]) -> Option<char> {
    let mut candidates: Option<BTreeSet<char>> = None;
    for line in lines.iter().copied().filter(|line| !is_blank(line)) {
        let mut counts: HashMap<char, usize> = HashMap::new();
        for c in line.chars() {
            *counts.entry(c).or_default() += 1;
        }
        let once: BTreeSet<char> = counts
            .into_iter()
            .filter(|(_, count)| *count == 1)
            .map(|(c, _)| c)
            .collect();
        let remaining = match candidates {
            None => once,
            Some(previous) => previous.intersection(&once).copied().collect(),
        };
        if remaining.is_empty() {
            return None;
        }
        candidates = Some(remaining);
    }
    candidates?.into_iter().next()
}

fn parse_using_delimiter(lines: &[&str], delimiter: char) -> Vec<Flashcard> {
    lines
        .iter()
        .copied()
        .filter(|line| !is_blank(line))
        .filter_map(|line| line.split_once(delimiter))
        .map(|(question, answer)| Flashcard {
            question: parse_word(question),
            answer: parse_word(answer),
        })
        .collect()
}

fn parse_word(value: &str) -> Word {
    Word::new(value.trim_matches(|c: char| c.is_whitespace() || c == '"' || c == BOM))
}

#[cfg(test)]
mod tests {
    use super::{format_flashcards, guess_delimiter, parse_flashcards};
    use crate::model::card::{Flashcard, FlashcardData};
    use crate::model::path::RelativePath;
    use crate::storage::error::StorageError;

    fn path() -> RelativePath {
        RelativePath::parse("test.cards")
    }

    fn expect(input: &str, pairs: &[(&str, &str)]) {
        let expected: Vec<FlashcardData> = pairs
            .iter()
            .map(|(q, a)| FlashcardData::new(path(), Flashcard::new(*q, *a)))
            .collect();
        let actual = parse_flashcards(&path(), input).expect("input should parse");
        assert_eq!(actual, expected, "input: {input:?}");
    }

    #[test]
    fn empty_line_layout() {
        expect("a\nb\n\nc\nd\n", &[("a", "b"), ("c", "d")]);
    }

    #[test]
    fn empty_line_layout_with_bom() {
        expect("\u{FEFF}a\nb\n\nc\nd\n", &[("a", "b"), ("c", "d")]);
    }

    #[test]
    fn empty_line_layout_without_trailing_newline() {
        expect("a\nb\n\nc\nd", &[("a", "b"), ("c", "d")]);
    }

    #[test]
    fn empty_line_layout_with_extra_blank_lines() {
        expect("a\nb\n\n\n\nc\nd\n\n\n", &[("a", "b"), ("c", "d")]);
    }

    #[test]
    fn empty_line_layout_with_crlf() {
        expect("a\r\nb\r\n\r\nc\r\nd\r\n", &[("a", "b"), ("c", "d")]);
    }

    #[test]
    fn delimiter_layout() {
        expect("a:b\nc:d\ne:f\n", &[("a", "b"), ("c", "d"), ("e", "f")]);
    }

    #[test]
    fn delimiter_layout_with_bom() {
        expect("\u{FEFF}a:b\nc:d\ne:f\n", &[("a", "b"), ("c", "d"), ("e", "f")]);
    }

    #[test]
    fn delimiter_layout_without_trailing_newline() {
        expect("a:b\nc:d\ne:f", &[("a", "b"), ("c", "d"), ("e", "f")]);
    }

    #[test]
    fn delimiter_layout_with_blank_lines() {
        expect("a:b\n\n\nc:d\n", &[("a", "b"), ("c", "d")]);
    }

    #[test]
    fn words_are_trimmed_of_quotes_and_whitespace() {
        expect(
            "\"der Hund\" ; \"dog\"\n cat;Katze \n\"ja\";\"yes\"\n",
            &[("der Hund", "dog"), ("cat", "Katze"), ("ja", "yes")],
        );
    }

    #[test]
    fn mixed_delimiters_are_rejected() {
        let err = parse_flashcards(&path(), "a:b\n\n\nc,d\n").expect_err("no common delimiter");
        assert!(matches!(err, StorageError::Parse { .. }));
        assert!(err.to_string().to_lowercase().contains("delimiter"));
        assert!(err.to_string().starts_with("test.cards: "));
    }

    #[test]
    fn empty_file_has_no_cards() {
        expect("", &[]);
        expect("\n  \n", &[]);
    }

    #[test]
    fn delimiter_guess_picks_smallest_code_point() {
        assert_eq!(guess_delimiter(&["a=b;c", "d;e=f"]), Some(';'));
        assert_eq!(guess_delimiter(&["a::b"]), Some('a'));
    }

    #[test]
    fn format_uses_blank_line_layout() {
        let text = format_flashcards(&[Flashcard::new("a", "b"), Flashcard::new("c", "d")]);
        assert_eq!(text, "a\nb\n\nc\nd\n");
        expect(&text, &[("a", "b"), ("c", "d")]);
    }
}
