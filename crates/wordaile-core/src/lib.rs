//! Wordaile Core Library
//!
//! This crate provides the scoring rules, board bookkeeping, signed wire
//! protocol and the round/series state machines for the multiplayer
//! word-guessing host.

pub mod config;
pub mod crypto;
pub mod directory;
pub mod game;
pub mod ledger;
pub mod protocol;
pub mod reward;
pub mod series;
pub mod transport;
pub mod words;

pub use config::GameConfig;
pub use crypto::{authenticate, EnvelopeError, MessageSigner, SignedEnvelope, Verification};
pub use directory::{DirectoryError, HttpDirectory, ParticipantDirectory, StaticDirectory};
pub use game::{score, BoardState, BoardStateStore, Feedback, GuessError, LetterScore, Word};
pub use ledger::{JsonFileLedger, LedgerError, MemoryLedger, WinnerLedger};
pub use protocol::{
    BoardBroadcast, GuessReply, Participant, ParticipantId, SeriesId, SubscriptionStatus,
    WinnerHistory, WinnerRecord,
};
pub use reward::{MockRewardDistributor, RewardDistributor, RewardError, TransferReceipt};
pub use series::{
    decide_series, CycleReport, RoundEndReason, RoundSummary, SeriesController, SeriesDecision,
    SeriesDeps, SeriesSnapshot, SeriesState, StepOutcome,
};
pub use transport::{HttpParticipantClient, ParticipantClient, ParticipantError};
pub use words::{WordList, WordListError};
