//! Word rules: validation, scoring and board bookkeeping.

mod board;
mod evaluator;
mod word;

pub use board::{BoardError, BoardState, BoardStateStore, RecordOutcome};
pub use evaluator::{score, Feedback, LetterScore};
pub use word::{GuessError, Word};
