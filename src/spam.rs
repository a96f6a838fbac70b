//! Phrase-score spam detection on top of [`ChainedHashMap`]
//!
//! A phrase list maps phrases to point values, one `phrase,score` record per line.
//! A message scores the sum, over all phrases, of `occurrences * score`, where
//! occurrences are counted case-insensitively and without overlap. The message is
//! spam when its score reaches the threshold.

use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
};

use log::{debug, info, warn};
use thiserror::Error;

use crate::ChainedHashMap;

/// Printed when the message reaches the threshold
pub const SPAM_MESSAGE: &str = "SPAM";
/// Printed when the message stays below the threshold
pub const NOT_SPAM_MESSAGE: &str = "NOT_SPAM";
/// Printed to stderr for any invalid argument or input file
pub const INVALID_INPUT: &str = "Invalid input";
/// Printed to stderr when the argument count is wrong
pub const USAGE: &str = "Usage: SpamDetector <database path> <message path> <threshold>";

/// Field separator of a phrase record
const SEPARATOR: char = ',';
/// Quotes a field so it may contain separators
const QUOTE: char = '"';
/// Escapes the next character of a field
const ESCAPE: char = '\\';

/// Everything that makes the detector's input invalid
#[derive(Error, Debug)]
pub enum SpamError {
    /// The threshold is not a positive integer
    #[error("threshold must be a positive integer, got {0:?}")]
    InvalidThreshold(String),
    /// An input file could not be read
    #[error("failed to read {}", .path.display())]
    Io {
        /// The file that failed
        path: PathBuf,
        /// The underlying I/O failure
        #[source]
        source: io::Error,
    },
    /// The phrase list starts with an empty line
    #[error("the first line of the phrase list is empty")]
    EmptyFirstLine,
    /// A phrase record does not have the `phrase,score` shape
    #[error("line {line} of the phrase list is malformed: {reason}")]
    MalformedRecord {
        /// One-based line number
        line: usize,
        /// What is wrong with the record
        reason: &'static str,
    },
    /// A score does not fit the score range
    #[error("score {0:?} is out of range")]
    InvalidScore(String),
}

/// Outcome of classifying a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The score reached the threshold
    Spam,
    /// The score stayed below the threshold
    NotSpam,
}

impl Verdict {
    /// Compares a message score against a threshold
    #[must_use]
    pub fn from_score(score: u64, threshold: u64) -> Self {
        if score >= threshold { Self::Spam } else { Self::NotSpam }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spam => f.write_str(SPAM_MESSAGE),
            Self::NotSpam => f.write_str(NOT_SPAM_MESSAGE),
        }
    }
}

/// Returns true for a non-empty string of ASCII digits
fn is_number(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

/// Parses a threshold argument, which must be a positive integer.
///
/// # Errors
///
/// Returns [`SpamError::InvalidThreshold`] for anything but digits, zero, or overflow.
pub fn parse_threshold(text: &str) -> Result<u64, SpamError> {
    if !is_number(text) {
        return Err(SpamError::InvalidThreshold(text.to_owned()));
    }
    match text.parse::<u64>() {
        Ok(threshold) if threshold > 0 => Ok(threshold),
        _ => Err(SpamError::InvalidThreshold(text.to_owned())),
    }
}

/// Splits one record into fields.
///
/// Fields are separated by commas; a double quote toggles quoting, in which commas are
/// literal; a backslash escapes only a quote, another backslash, or `n` (newline).
fn split_record(record: &str, line: usize) -> Result<Vec<String>, SpamError> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut quoted = false;
    let mut chars = record.chars();

    while let Some(c) = chars.next() {
        match c {
            ESCAPE => match chars.next() {
                Some(escaped @ (QUOTE | ESCAPE)) => field.push(escaped),
                Some('n') => field.push('\n'),
                _ => return Err(SpamError::MalformedRecord { line, reason: "invalid escape" }),
            },
            QUOTE => quoted = !quoted,
            SEPARATOR if !quoted => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }
    fields.push(field);
    Ok(fields)
}

/// Phrases and their scores, kept as text the way they appear in the list
#[derive(Debug, Default)]
pub struct PhraseList {
    /// Phrase to score text
    scores: ChainedHashMap<String, String>,
}

impl PhraseList {
    /// Parses a phrase list.
    ///
    /// The first line must not be empty; later empty lines are skipped. A phrase that
    /// appears twice keeps its first score. An empty text yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`SpamError::EmptyFirstLine`], [`SpamError::MalformedRecord`] or
    /// [`SpamError::InvalidScore`] for the first invalid line.
    pub fn parse(text: &str) -> Result<Self, SpamError> {
        let mut scores = ChainedHashMap::new();

        for (index, record) in text.lines().enumerate() {
            let line = index.saturating_add(1);
            if record.is_empty() {
                if line == 1 {
                    return Err(SpamError::EmptyFirstLine);
                }
                continue;
            }

            let fields: [String; 2] = split_record(record, line)?
                .try_into()
                .map_err(|_| SpamError::MalformedRecord { line, reason: "expected two fields" })?;
            let [phrase, score] = fields;
            if phrase.is_empty() {
                return Err(SpamError::MalformedRecord { line, reason: "empty phrase" });
            }
            if score.is_empty() {
                return Err(SpamError::MalformedRecord { line, reason: "empty score" });
            }
            if !is_number(&score) {
                return Err(SpamError::MalformedRecord { line, reason: "score is not a number" });
            }
            if score.parse::<u64>().is_err() {
                return Err(SpamError::InvalidScore(score));
            }

            if scores.contains_key(&phrase) {
                warn!("Phrase {phrase:?} repeated on line {line}, keeping its first score");
                continue;
            }
            scores.insert(phrase, score);
        }

        Ok(Self { scores })
    }

    /// Returns the number of distinct phrases
    #[must_use]
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Returns true if the list holds no phrases
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Returns the score text of a phrase, matched exactly
    #[must_use]
    pub fn score_of(&self, phrase: &str) -> Option<&str> {
        self.scores.get(phrase).map(String::as_str)
    }

    /// Sums `occurrences * score` over every phrase, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`SpamError::InvalidScore`] if a stored score is not a valid number.
    pub fn score(&self, message: &str) -> Result<u64, SpamError> {
        let message = message.to_lowercase();
        let mut total: u64 = 0;

        for (phrase, score) in &self.scores {
            let points: u64 =
                score.parse().map_err(|_| SpamError::InvalidScore(score.clone()))?;
            let hits = count_occurrences(&message, &phrase.to_lowercase());
            if hits > 0 {
                debug!("Phrase {phrase:?} found {hits} times, {points} points each");
            }
            total = total.saturating_add(points.saturating_mul(hits));
        }

        Ok(total)
    }
}

/// Counts non-overlapping occurrences of `needle`; the search resumes after each match
fn count_occurrences(haystack: &str, needle: &str) -> u64 {
    if needle.is_empty() {
        return 0;
    }
    u64::try_from(haystack.matches(needle).count()).unwrap_or(u64::MAX)
}

/// A phrase list paired with the score at which a message counts as spam
#[derive(Debug)]
pub struct SpamDetector {
    /// Phrases and their scores
    phrases: PhraseList,
    /// Minimum score of a spam message
    threshold: u64,
}

impl SpamDetector {
    /// Creates a detector
    #[must_use]
    pub fn new(phrases: PhraseList, threshold: u64) -> Self {
        Self { phrases, threshold }
    }

    /// Classifies a message.
    ///
    /// # Errors
    ///
    /// Propagates [`PhraseList::score`] failures.
    pub fn detect(&self, message: &str) -> Result<Verdict, SpamError> {
        let score = self.phrases.score(message)?;
        info!("Message scored {score} against a threshold of {}", self.threshold);
        Ok(Verdict::from_score(score, self.threshold))
    }
}

/// Reads a whole input file
fn read_input(path: &Path) -> Result<Vec<u8>, SpamError> {
    fs::read(path).map_err(|source| SpamError::Io { path: path.to_owned(), source })
}

/// Builds the text that gets scored: a leading space, then every line followed by a
/// newline, so a phrase starting with a space also matches at the start of the message.
///
/// Bytes that are not UTF-8 become replacement characters instead of failing the read.
fn frame_message(raw: &[u8]) -> String {
    let text = String::from_utf8_lossy(raw);
    let mut message = String::with_capacity(text.len().saturating_add(2));
    message.push(' ');
    for line in text.split('\n') {
        message.push_str(line);
        message.push('\n');
    }
    message
}

/// Classifies the message file against the phrase list file.
///
/// The threshold is validated first. An empty message file, and then an empty phrase
/// list file, short-circuit to [`Verdict::NotSpam`] before anything else is parsed.
///
/// # Errors
///
/// Returns a [`SpamError`] for an invalid threshold, an unreadable file, or a malformed
/// phrase list.
pub fn run(database: &Path, message: &Path, threshold: &str) -> Result<Verdict, SpamError> {
    let threshold = parse_threshold(threshold)?;

    let message = read_input(message)?;
    if message.is_empty() {
        info!("Message is empty");
        return Ok(Verdict::NotSpam);
    }

    let database = read_input(database)?;
    if database.is_empty() {
        info!("Phrase list is empty");
        return Ok(Verdict::NotSpam);
    }

    let phrases = PhraseList::parse(&String::from_utf8_lossy(&database))?;
    info!("Loaded {} phrases", phrases.len());
    SpamDetector::new(phrases, threshold).detect(&frame_message(&message))
}
