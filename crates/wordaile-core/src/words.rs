//! Secret word list.

use crate::game::{GuessError, Word};
use rand::seq::SliceRandom;
use thiserror::Error;

/// Built-in five-letter secret words
const STANDARD_WORDS: &[&str] = &[
    "ABOUT", "ABOVE", "ACTOR", "ADOPT", "AFTER", "AGAIN", "ALERT", "ALIVE", "ALONE", "AMBER",
    "ANGEL", "ANGER", "APPLE", "ARENA", "ARGUE", "ARISE", "AUDIO", "AWARD", "BACON", "BADGE",
    "BAKER", "BEACH", "BEGIN", "BENCH", "BERRY", "BIRTH", "BLACK", "BLADE", "BLAME", "BLANK",
    "BLAST", "BLEND", "BLOOM", "BOARD", "BRAIN", "BRAND", "BRAVE", "BREAD", "BRICK", "BRIEF",
    "BRING", "BROWN", "BUILD", "CABIN", "CANDY", "CARGO", "CHAIN", "CHAIR", "CHALK", "CHARM",
    "CHART", "CHASE", "CHEAP", "CHESS", "CHIEF", "CLAIM", "CLEAN", "CLEAR", "CLIMB", "CLOCK",
    "CLOUD", "COAST", "CORAL", "COUNT", "CRANE", "CRASH", "CREAM", "CRISP", "CROWN", "DANCE",
    "DEPTH", "DREAM", "DRINK", "EAGLE", "EARTH", "ENJOY", "EQUAL", "EVENT", "FAITH", "FEAST",
    "FIELD", "FLAME", "FLASH", "FLOOR", "FOCUS", "FORCE", "FRAME", "FRESH", "FRUIT", "GHOST",
    "GIANT", "GLASS", "GLOBE", "GRACE", "GRAIN", "GRAPE", "GRASS", "GREEN", "GUARD", "GUIDE",
    "HAPPY", "HEART", "HONEY", "HORSE", "HOTEL", "HOUSE", "IMAGE", "JUICE", "KNIFE", "LASER",
    "LEMON", "LIGHT", "LUCKY", "MAGIC", "MAPLE", "MARCH", "MEDAL", "METAL", "MIGHT", "MONEY",
    "MOUSE", "MUSIC", "NIGHT", "NOBLE", "NOVEL", "OCEAN", "OLIVE", "ORBIT", "PAINT", "PANEL",
    "PAPER", "PEACH", "PEARL", "PHONE", "PIANO", "PILOT", "PLANT", "PLATE", "POINT", "POWER",
    "PRIDE", "PRIZE", "QUEEN", "QUIET", "RADIO", "RAVEN", "REACH", "RIVER", "ROBOT", "ROUND",
    "SCALE", "SCORE", "SHADE", "SHARP", "SHELF", "SHINE", "SKILL", "SLATE", "SMILE", "SNAKE",
    "SOLAR", "SPACE", "SPARK", "SPICE", "STAGE", "STONE", "STORM", "SUGAR", "SWEET", "TABLE",
    "TIGER", "TOAST", "TOKEN", "TORCH", "TOWER", "TRAIN", "TRUST", "UNITY", "VALUE", "VIVID",
    "VOICE", "WATER", "WHALE", "WHEAT", "WORLD", "YOUTH", "ZEBRA",
];

/// Errors from building a word list
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum WordListError {
    #[error("Word list is empty")]
    Empty,

    #[error("Invalid word {word:?}: {source}")]
    InvalidWord { word: String, source: GuessError },

    #[error("Word {word:?} does not have {expected} letters")]
    WrongLength { word: String, expected: usize },
}

/// A non-empty list of equal-length secret words
#[derive(Clone, Debug)]
pub struct WordList {
    words: Vec<Word>,
}

impl WordList {
    /// The built-in five-letter list
    pub fn standard() -> Self {
        Self {
            words: STANDARD_WORDS
                .iter()
                .filter_map(|w| Word::parse(w).ok())
                .collect(),
        }
    }

    /// Build a list from raw words, each of which must have `length` letters
    pub fn from_words<'a, I>(raw: I, length: usize) -> Result<Self, WordListError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let words = raw
            .into_iter()
            .map(|w| {
                Word::parse_with_length(w, length).map_err(|source| WordListError::InvalidWord {
                    word: w.to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if words.is_empty() {
            return Err(WordListError::Empty);
        }
        Ok(Self { words })
    }

    /// Uniform random choice; repeats across rounds are allowed
    pub fn choose(&self) -> Word {
        self.words
            .choose(&mut rand::thread_rng())
            .cloned()
            .unwrap_or_else(|| self.words[0].clone())
    }

    /// Every word must have exactly `length` letters
    pub fn check_length(&self, length: usize) -> Result<(), WordListError> {
        match self.words.iter().find(|w| w.len() != length) {
            Some(word) => Err(WordListError::WrongLength {
                word: word.to_string(),
                expected: length,
            }),
            None => Ok(()),
        }
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn contains(&self, word: &Word) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for WordList {
    fn default() -> Self {
        Self::standard()
    }
}
