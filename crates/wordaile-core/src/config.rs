//! Game timing and scoring constants.

use std::time::Duration;

/// Length of a round before it is force-ended
pub const ROUND_DURATION: Duration = Duration::from_secs(60);
/// Pause between guess cycles
pub const GUESS_INTERVAL: Duration = Duration::from_secs(10);
/// Guesses a participant gets per round
pub const MAX_GUESSES: usize = 5;
/// Round wins needed to take a series
pub const WINS_NEEDED: u32 = 3;
/// Letters per word
pub const WORD_LENGTH: usize = 5;
/// Tokens paid to a series winner
pub const REWARD_AMOUNT: u64 = 20;
/// Upper bound on one participant round-trip
pub const RESPONSE_TIMEOUT: Duration = Duration::from_secs(8);
/// Upper bound on the reward transfer at series end
pub const TRANSFER_TIMEOUT: Duration = Duration::from_secs(30);

/// Tunables for a running game
#[derive(Clone, Debug)]
pub struct GameConfig {
    pub round_duration: Duration,
    pub guess_interval: Duration,
    pub max_guesses: usize,
    pub wins_needed: u32,
    pub word_length: usize,
    pub reward_amount: u64,
    pub response_timeout: Duration,
    pub transfer_timeout: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            round_duration: ROUND_DURATION,
            guess_interval: GUESS_INTERVAL,
            max_guesses: MAX_GUESSES,
            wins_needed: WINS_NEEDED,
            word_length: WORD_LENGTH,
            reward_amount: REWARD_AMOUNT,
            response_timeout: RESPONSE_TIMEOUT,
            transfer_timeout: TRANSFER_TIMEOUT,
        }
    }
}
