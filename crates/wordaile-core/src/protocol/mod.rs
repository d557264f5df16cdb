//! Protocol types and messages.

mod messages;
mod types;

pub use messages::{BoardBroadcast, GuessReply, WinnerHistory, WinnerRecord};
pub use types::{Participant, ParticipantId, SeriesId, SubscriptionStatus};
