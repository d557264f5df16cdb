//! Protocol messages.

use crate::game::BoardState;
use crate::protocol::ParticipantId;
use crate::reward::TransferReceipt;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Host -> participant: the participant's board and the current round
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardBroadcast {
    pub board_state: BoardState,
    pub round_number: u32,
}

/// Participant -> host: the next guess
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GuessReply {
    pub guess: String,
}

/// One series winner, appended once per completed series
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WinnerRecord {
    pub participant_id: ParticipantId,
    pub series_win_count: u32,
    pub timestamp: DateTime<Utc>,
    /// Absent when the reward transfer failed
    #[serde(default)]
    pub transfer_receipt: Option<TransferReceipt>,
}

/// Persisted winner history
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinnerHistory {
    pub winners: Vec<WinnerRecord>,
}
