//! Series state and its spectator snapshot.

use crate::game::{score, BoardError, BoardState, BoardStateStore, GuessError, RecordOutcome, Word};
use crate::protocol::{ParticipantId, SeriesId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Why a participant's guess was not recorded
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GuessRejected {
    #[error(transparent)]
    Invalid(#[from] GuessError),

    #[error(transparent)]
    Board(#[from] BoardError),
}

/// Everything one series needs, owned by the controller.
///
/// `round_winners` only ever holds participants whose board has `won_round`
/// set, and `win_counts` never decreases until the next series replaces
/// the whole value.
#[derive(Clone, Debug)]
pub struct SeriesState {
    series_id: SeriesId,
    current_word: Word,
    last_word: Option<Word>,
    round_started_at: DateTime<Utc>,
    boards: BoardStateStore,
    win_counts: BTreeMap<ParticipantId, u32>,
    round_winners: BTreeSet<ParticipantId>,
    round_number: u32,
    active: bool,
}

impl SeriesState {
    /// A fresh series at round 1
    pub fn new(secret: Word, max_guesses: usize) -> Self {
        Self {
            series_id: SeriesId::new(),
            current_word: secret,
            last_word: None,
            round_started_at: Utc::now(),
            boards: BoardStateStore::new(max_guesses),
            win_counts: BTreeMap::new(),
            round_winners: BTreeSet::new(),
            round_number: 1,
            active: true,
        }
    }

    /// The series that follows this one. Only the last word carries over.
    pub fn next_series(&self, secret: Word) -> Self {
        let mut next = Self::new(secret, self.boards.max_guesses());
        next.last_word = self.last_word.clone();
        next
    }

    pub fn series_id(&self) -> SeriesId {
        self.series_id
    }

    pub fn current_word(&self) -> &Word {
        &self.current_word
    }

    pub fn last_word(&self) -> Option<&Word> {
        self.last_word.as_ref()
    }

    pub fn round_started_at(&self) -> DateTime<Utc> {
        self.round_started_at
    }

    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    pub fn boards(&self) -> &BoardStateStore {
        &self.boards
    }

    pub fn win_counts(&self) -> &BTreeMap<ParticipantId, u32> {
        &self.win_counts
    }

    pub fn round_winners(&self) -> &BTreeSet<ParticipantId> {
        &self.round_winners
    }

    /// False between a round closing and the next one starting
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Validate, score and record a raw guess from `participant`
    pub fn apply_guess(
        &mut self,
        participant: &ParticipantId,
        raw: &str,
    ) -> Result<RecordOutcome, GuessRejected> {
        let guess = Word::parse_with_length(raw, self.current_word.len())?;

        if self
            .boards
            .peek(participant)
            .is_some_and(|b| b.is_complete())
        {
            return Err(BoardError::AlreadyComplete.into());
        }

        let feedback = score(&guess, &self.current_word)?;
        let outcome = self.boards.record(participant, guess, feedback)?;
        if outcome == RecordOutcome::Won {
            self.round_winners.insert(participant.clone());
        }
        Ok(outcome)
    }

    /// Fold this round's winners into the win counts and reveal the word.
    /// Returns the round's winners.
    pub fn close_round(&mut self) -> Vec<ParticipantId> {
        let winners: Vec<ParticipantId> = std::mem::take(&mut self.round_winners)
            .into_iter()
            .collect();
        for winner in &winners {
            *self.win_counts.entry(winner.clone()).or_insert(0) += 1;
        }
        self.last_word = Some(self.current_word.clone());
        self.active = false;
        winners
    }

    /// Start the next round of this series with a new secret
    pub fn begin_round(&mut self, secret: Word) {
        self.current_word = secret;
        self.round_number += 1;
        self.round_started_at = Utc::now();
        self.boards.reset_all();
        self.round_winners.clear();
        self.active = true;
    }

    /// Per-round results so far: `wins` trues followed by losses
    pub fn player_history(&self, participant: &ParticipantId) -> Vec<bool> {
        let wins = self.win_counts.get(participant).copied().unwrap_or(0);
        let played = self.round_number.saturating_sub(1);
        let losses = played.saturating_sub(wins);

        std::iter::repeat(true)
            .take(wins as usize)
            .chain(std::iter::repeat(false).take(losses as usize))
            .collect()
    }

    /// Read-only view for spectators. Never includes the current word.
    pub fn snapshot(
        &self,
        round_duration_secs: u64,
        last_winner: Option<ParticipantId>,
        player_count: usize,
    ) -> SeriesSnapshot {
        let known: BTreeSet<&ParticipantId> = self
            .boards
            .iter()
            .map(|(id, _)| id)
            .chain(self.win_counts.keys())
            .collect();

        let players = known
            .into_iter()
            .map(|id| PlayerSummary {
                id: id.clone(),
                short_id: id.abbreviated(),
                wins: self.win_counts.get(id).copied().unwrap_or(0),
                history: self.player_history(id),
            })
            .collect();

        SeriesSnapshot {
            series_id: self.series_id,
            round_number: self.round_number,
            round_started_at: self.round_started_at,
            round_duration_secs,
            round_active: self.active,
            last_word: self.last_word.clone(),
            last_winner,
            player_count,
            boards: self
                .boards
                .iter()
                .map(|(id, board)| (id.clone(), board.clone()))
                .collect(),
            win_counts: self.win_counts.clone(),
            players,
        }
    }
}

/// One participant's standing in the series
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSummary {
    pub id: ParticipantId,
    pub short_id: String,
    pub wins: u32,
    pub history: Vec<bool>,
}

/// What spectators see after every transition
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesSnapshot {
    pub series_id: SeriesId,
    pub round_number: u32,
    pub round_started_at: DateTime<Utc>,
    pub round_duration_secs: u64,
    pub round_active: bool,
    pub last_word: Option<Word>,
    pub last_winner: Option<ParticipantId>,
    /// Roster size seen by the latest guess cycle
    pub player_count: usize,
    pub boards: BTreeMap<ParticipantId, BoardState>,
    pub win_counts: BTreeMap<ParticipantId, u32>,
    pub players: Vec<PlayerSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn w(s: &str) -> Word {
        Word::parse(s).unwrap()
    }

    fn alice() -> ParticipantId {
        ParticipantId::from("alice")
    }

    #[test]
    fn test_new_series_starts_at_round_one() {
        let state = SeriesState::new(w("CRANE"), 5);
        assert_eq!(state.round_number(), 1);
        assert!(state.is_active());
        assert!(state.boards().is_empty());
        assert!(state.win_counts().is_empty());
        assert!(state.last_word().is_none());
    }

    #[test]
    fn test_winning_guess_joins_round_winners() {
        let mut state = SeriesState::new(w("CRANE"), 5);

        assert_eq!(
            state.apply_guess(&alice(), "slate"),
            Ok(RecordOutcome::Continuing)
        );
        assert!(state.round_winners().is_empty());

        assert_eq!(state.apply_guess(&alice(), " crane "), Ok(RecordOutcome::Won));
        assert!(state.round_winners().contains(&alice()));
    }

    #[test]
    fn test_invalid_guesses_are_rejected_without_recording() {
        let mut state = SeriesState::new(w("CRANE"), 5);

        assert!(matches!(
            state.apply_guess(&alice(), "CRANES"),
            Err(GuessRejected::Invalid(GuessError::InvalidLength { .. }))
        ));
        assert!(matches!(
            state.apply_guess(&alice(), "CR4NE"),
            Err(GuessRejected::Invalid(GuessError::InvalidCharacter('4')))
        ));
        assert!(state.boards().is_empty(), "no board for rejected guesses");
    }

    #[test]
    fn test_guess_after_win_is_rejected() {
        let mut state = SeriesState::new(w("CRANE"), 5);
        state.apply_guess(&alice(), "CRANE").unwrap();

        assert_eq!(
            state.apply_guess(&alice(), "SLATE"),
            Err(GuessRejected::Board(BoardError::AlreadyComplete))
        );
        assert_eq!(state.boards().peek(&alice()).unwrap().guess_count(), 1);
    }

    #[test]
    fn test_five_misses_do_not_win() {
        let mut state = SeriesState::new(w("CRANE"), 5);
        let bob = ParticipantId::from("bob");

        for guess in ["SLATE", "CRATE", "TRACE", "GRACE", "BRACE"] {
            state.apply_guess(&bob, guess).unwrap();
        }

        let board = state.boards().peek(&bob).unwrap();
        assert!(board.is_complete());
        assert!(!board.won_round());
        assert!(state.round_winners().is_empty());
    }

    #[test]
    fn test_close_round_folds_winners() {
        let mut state = SeriesState::new(w("CRANE"), 5);
        state.apply_guess(&alice(), "CRANE").unwrap();

        let winners = state.close_round();
        assert_eq!(winners, vec![alice()]);
        assert_eq!(state.win_counts().get(&alice()), Some(&1));
        assert!(state.round_winners().is_empty());
        assert_eq!(state.last_word(), Some(&w("CRANE")));
        assert!(!state.is_active());
    }

    #[test]
    fn test_begin_round_resets_boards_and_keeps_counts() {
        let mut state = SeriesState::new(w("CRANE"), 5);
        state.apply_guess(&alice(), "CRANE").unwrap();
        state.close_round();

        state.begin_round(w("SLATE"));

        assert_eq!(state.round_number(), 2);
        assert_eq!(state.current_word(), &w("SLATE"));
        assert_eq!(state.boards().peek(&alice()), Some(&BoardState::new()));
        assert_eq!(state.win_counts().get(&alice()), Some(&1));
        assert!(state.is_active());
    }

    #[test]
    fn test_next_series_resets_everything_but_last_word() {
        let mut state = SeriesState::new(w("CRANE"), 5);
        state.apply_guess(&alice(), "CRANE").unwrap();
        state.close_round();
        state.begin_round(w("SLATE"));

        let next = state.next_series(w("BRAVE"));

        assert_ne!(next.series_id(), state.series_id());
        assert_eq!(next.round_number(), 1);
        assert!(next.win_counts().is_empty());
        assert!(next.boards().is_empty());
        assert_eq!(next.last_word(), Some(&w("CRANE")));
        assert_eq!(next.boards().max_guesses(), 5);
    }

    #[test]
    fn test_player_history() {
        let mut state = SeriesState::new(w("CRANE"), 5);
        let bob = ParticipantId::from("bob");

        state.apply_guess(&alice(), "CRANE").unwrap();
        state.apply_guess(&bob, "SLATE").unwrap();
        state.close_round();
        state.begin_round(w("SLATE"));
        state.apply_guess(&bob, "SLATE").unwrap();
        state.close_round();
        state.begin_round(w("BRAVE"));
        state.close_round();
        state.begin_round(w("CRANE"));

        assert_eq!(state.round_number(), 4);
        assert_eq!(state.player_history(&alice()), vec![true, false, false]);
        assert_eq!(state.player_history(&bob), vec![true, false, false]);
        assert_eq!(
            state.player_history(&ParticipantId::from("nobody")),
            vec![false, false, false]
        );
    }

    #[test]
    fn test_snapshot_hides_current_word() {
        let mut state = SeriesState::new(w("CRANE"), 5);
        state.apply_guess(&alice(), "SLATE").unwrap();

        let snapshot = state.snapshot(60, None, 1);
        let json = serde_json::to_string(&snapshot).unwrap();

        assert!(!json.contains("CRANE"));
        assert_eq!(snapshot.player_count, 1);
        assert_eq!(snapshot.boards.len(), 1);
        assert_eq!(snapshot.players[0].short_id, "alice");
        assert!(snapshot.last_word.is_none());

        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["roundDurationSecs"], 60);
        assert_eq!(value["boards"]["alice"]["guessCount"], 1);
    }
}
