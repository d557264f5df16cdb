//! Validated guess / secret words.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Reasons a candidate word is rejected
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GuessError {
    #[error("Word is empty")]
    Empty,

    #[error("Invalid character {0:?}: only ASCII letters are allowed")]
    InvalidCharacter(char),

    #[error("Invalid length: expected {expected} letters, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Guess has {guess} letters but the secret has {secret}")]
    LengthMismatch { guess: usize, secret: usize },
}

/// An upper-case ASCII word
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Word(String);

impl Word {
    /// Parse any non-empty alphabetic word, normalizing to upper case.
    /// Surrounding whitespace is ignored.
    pub fn parse(raw: &str) -> Result<Self, GuessError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(GuessError::Empty);
        }
        if let Some(bad) = trimmed.chars().find(|c| !c.is_ascii_alphabetic()) {
            return Err(GuessError::InvalidCharacter(bad));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// Parse a word that must have exactly `length` letters
    pub fn parse_with_length(raw: &str, length: usize) -> Result<Self, GuessError> {
        let word = Self::parse(raw)?;
        if word.len() != length {
            return Err(GuessError::InvalidLength {
                expected: length,
                actual: word.len(),
            });
        }
        Ok(word)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Number of letters (always equal to the byte length)
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromStr for Word {
    type Err = GuessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Word {
    type Error = GuessError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Word> for String {
    fn from(word: Word) -> Self {
        word.0
    }
}

impl fmt::Debug for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Word({})", self.0)
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
