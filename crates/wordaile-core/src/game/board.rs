//! Per-participant board state for the current round.

use super::evaluator::Feedback;
use super::word::Word;
use crate::protocol::ParticipantId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors from recording a guess
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("Board is already complete")]
    AlreadyComplete,
}

/// What a recorded guess did to the board
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordOutcome {
    /// All letters exact; the board is now complete
    Won,
    /// Last allowed guess without a win; the board is now complete
    Exhausted,
    /// The participant can keep guessing
    Continuing,
}

/// A participant's guesses and feedback for one round.
///
/// `guess_count == guesses.len() == feedback.len() <= max_guesses`, and
/// `won_round` implies `complete`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardState {
    guesses: Vec<Word>,
    feedback: Vec<Feedback>,
    guess_count: usize,
    #[serde(rename = "isComplete")]
    complete: bool,
    won_round: bool,
}

impl BoardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn guesses(&self) -> &[Word] {
        &self.guesses
    }

    pub fn feedback(&self) -> &[Feedback] {
        &self.feedback
    }

    pub fn guess_count(&self) -> usize {
        self.guess_count
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn won_round(&self) -> bool {
        self.won_round
    }

    /// Append a scored guess
    pub fn record(
        &mut self,
        guess: Word,
        feedback: Feedback,
        max_guesses: usize,
    ) -> Result<RecordOutcome, BoardError> {
        if self.complete || self.guess_count >= max_guesses {
            return Err(BoardError::AlreadyComplete);
        }

        let won = feedback.is_win();
        self.guesses.push(guess);
        self.feedback.push(feedback);
        self.guess_count += 1;

        if won {
            self.won_round = true;
            self.complete = true;
            Ok(RecordOutcome::Won)
        } else if self.guess_count >= max_guesses {
            self.complete = true;
            Ok(RecordOutcome::Exhausted)
        } else {
            Ok(RecordOutcome::Continuing)
        }
    }
}

/// Board states of every participant seen this round
#[derive(Clone, Debug)]
pub struct BoardStateStore {
    boards: BTreeMap<ParticipantId, BoardState>,
    max_guesses: usize,
}

impl BoardStateStore {
    pub fn new(max_guesses: usize) -> Self {
        Self {
            boards: BTreeMap::new(),
            max_guesses,
        }
    }

    pub fn max_guesses(&self) -> usize {
        self.max_guesses
    }

    /// Get a participant's board, creating an empty one on first access
    pub fn get(&mut self, participant: &ParticipantId) -> &BoardState {
        self.boards.entry(participant.clone()).or_default()
    }

    /// Look at a board without creating it
    pub fn peek(&self, participant: &ParticipantId) -> Option<&BoardState> {
        self.boards.get(participant)
    }

    /// A copy of the participant's board, or an empty one if unseen.
    /// Never creates an entry.
    pub fn snapshot_of(&self, participant: &ParticipantId) -> BoardState {
        self.peek(participant).cloned().unwrap_or_default()
    }

    /// Record a scored guess, creating the board lazily
    pub fn record(
        &mut self,
        participant: &ParticipantId,
        guess: Word,
        feedback: Feedback,
    ) -> Result<RecordOutcome, BoardError> {
        let max_guesses = self.max_guesses;
        self.boards
            .entry(participant.clone())
            .or_default()
            .record(guess, feedback, max_guesses)
    }

    /// Replace every board with a fresh empty one, keeping the participants
    pub fn reset_all(&mut self) {
        for board in self.boards.values_mut() {
            *board = BoardState::new();
        }
    }

    /// True when every stored board is complete (won, or out of guesses).
    /// An empty store is never all-complete.
    pub fn all_complete(&self) -> bool {
        !self.boards.is_empty()
            && self
                .boards
                .values()
                .all(|b| b.complete || b.guess_count >= self.max_guesses)
    }

    pub fn len(&self) -> usize {
        self.boards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ParticipantId, &BoardState)> {
        self.boards.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::score;

    fn w(s: &str) -> Word {
        Word::parse(s).unwrap()
    }

    fn play(store: &mut BoardStateStore, who: &ParticipantId, guess: &str, secret: &str) -> Result<RecordOutcome, BoardError> {
        let feedback = score(&w(guess), &w(secret)).unwrap();
        store.record(who, w(guess), feedback)
    }

    #[test]
    fn test_get_twice_returns_same_empty_board() {
        let mut store = BoardStateStore::new(5);
        let alice = ParticipantId::from("alice");

        let first = store.get(&alice).clone();
        let second = store.get(&alice).clone();

        assert_eq!(first, second);
        assert_eq!(first, BoardState::new());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_crane_sequence_wins_on_third_guess() {
        let mut store = BoardStateStore::new(5);
        let alice = ParticipantId::from("alice");

        assert_eq!(play(&mut store, &alice, "SLATE", "CRANE"), Ok(RecordOutcome::Continuing));
        assert_eq!(play(&mut store, &alice, "CRATE", "CRANE"), Ok(RecordOutcome::Continuing));
        assert_eq!(play(&mut store, &alice, "CRANE", "CRANE"), Ok(RecordOutcome::Won));

        let board = store.peek(&alice).unwrap();
        assert!(board.won_round());
        assert!(board.is_complete());
        assert_eq!(board.guess_count(), 3);
        let feedback: Vec<String> = board.feedback().iter().map(|f| f.to_string()).collect();
        assert_eq!(feedback, vec!["⬜⬜🟩⬜🟩", "🟩🟩🟩⬜🟩", "🟩🟩🟩🟩🟩"]);
    }

    #[test]
    fn test_five_misses_exhaust_board() {
        let mut store = BoardStateStore::new(5);
        let bob = ParticipantId::from("bob");

        for guess in ["SLATE", "CRATE", "TRACE", "GRACE", "BRACE"] {
            play(&mut store, &bob, guess, "CRANE").unwrap();
        }

        let board = store.peek(&bob).unwrap();
        assert!(board.is_complete());
        assert!(!board.won_round());
        assert_eq!(board.guess_count(), 5);

        // No sixth guess, and the board stays complete
        assert_eq!(
            play(&mut store, &bob, "CRANE", "CRANE"),
            Err(BoardError::AlreadyComplete)
        );
        let board = store.peek(&bob).unwrap();
        assert_eq!(board.guess_count(), 5);
        assert!(board.is_complete());
        assert!(!board.won_round());
    }

    #[test]
    fn test_invariants_hold_after_every_guess() {
        let mut store = BoardStateStore::new(3);
        let carol = ParticipantId::from("carol");

        for guess in ["SLATE", "CRATE", "TRACE", "CRANE"] {
            let _ = play(&mut store, &carol, guess, "CRANE");
            let board = store.peek(&carol).unwrap();
            assert_eq!(board.guess_count(), board.guesses().len());
            assert_eq!(board.guess_count(), board.feedback().len());
            assert!(board.guess_count() <= 3);
            assert!(!board.won_round() || board.is_complete());
        }
    }

    #[test]
    fn test_all_complete() {
        let mut store = BoardStateStore::new(5);
        assert!(!store.all_complete(), "empty store is never all-complete");

        let alice = ParticipantId::from("alice");
        let bob = ParticipantId::from("bob");

        play(&mut store, &alice, "CRANE", "CRANE").unwrap();
        assert!(store.all_complete());

        play(&mut store, &bob, "SLATE", "CRANE").unwrap();
        assert!(!store.all_complete());

        play(&mut store, &bob, "CRANE", "CRANE").unwrap();
        assert!(store.all_complete());
    }

    #[test]
    fn test_reset_all_keeps_participants() {
        let mut store = BoardStateStore::new(5);
        let alice = ParticipantId::from("alice");
        play(&mut store, &alice, "CRANE", "CRANE").unwrap();

        store.reset_all();

        assert_eq!(store.len(), 1);
        assert_eq!(store.peek(&alice), Some(&BoardState::new()));
        assert!(!store.all_complete());
    }

    #[test]
    fn test_snapshot_of_does_not_create() {
        let store = BoardStateStore::new(5);
        let ghost = ParticipantId::from("ghost");

        assert_eq!(store.snapshot_of(&ghost), BoardState::new());
        assert!(store.is_empty());
    }

    #[test]
    fn test_board_wire_format() {
        let mut board = BoardState::new();
        let feedback = score(&w("CRATE"), &w("CRANE")).unwrap();
        board.record(w("crate"), feedback, 5).unwrap();

        let json = serde_json::to_value(&board).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "guesses": ["CRATE"],
                "feedback": ["🟩🟩🟩⬜🟩"],
                "guessCount": 1,
                "isComplete": false,
                "wonRound": false
            })
        );

        let back: BoardState = serde_json::from_value(json).unwrap();
        assert_eq!(back, board);
    }
}
