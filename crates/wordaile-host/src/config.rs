//! Host configuration from environment variables.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use wordaile_core::GameConfig;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_WINNERS_FILE: &str = "game-winners.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },

    #[error("{name} must be set when {required_by} is set")]
    Missing {
        name: &'static str,
        required_by: &'static str,
    },
}

/// Where the roster comes from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RosterSource {
    /// Fetched each cycle from a directory service
    Directory(String),
    /// Fixed `id=endpoint,...` list
    Static(String),
}

/// JSON-RPC payout node and the token it pays out
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RewardRpcConfig {
    pub url: String,
    pub token: String,
}

#[derive(Clone, Debug)]
pub struct HostConfig {
    pub port: u16,
    pub roster: RosterSource,
    /// Mock payouts when unset
    pub reward_rpc: Option<RewardRpcConfig>,
    pub winners_file: PathBuf,
    /// Hex secret key; a random key is generated when unset
    pub host_secret_key: Option<String>,
    /// One word per line; the built-in list is used when unset
    pub words_file: Option<PathBuf>,
    pub game: GameConfig,
}

impl HostConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable lookup; unset or empty variables use defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let roster = match (var("DIRECTORY_URL"), var("PARTICIPANTS")) {
            (Some(url), _) => RosterSource::Directory(url),
            (None, Some(list)) => RosterSource::Static(list),
            (None, None) => RosterSource::Static(String::new()),
        };

        let reward_rpc = match (var("REWARD_RPC_URL"), var("REWARD_TOKEN")) {
            (Some(url), Some(token)) => Some(RewardRpcConfig { url, token }),
            (Some(_), None) => {
                return Err(ConfigError::Missing {
                    name: "REWARD_TOKEN",
                    required_by: "REWARD_RPC_URL",
                })
            }
            (None, _) => None,
        };

        let mut game = GameConfig::default();
        if let Some(secs) = parse_nonzero(&var, "ROUND_DURATION_SECS")? {
            game.round_duration = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_nonzero(&var, "GUESS_INTERVAL_SECS")? {
            game.guess_interval = Duration::from_secs(secs);
        }
        if let Some(wins) = parse_nonzero(&var, "WINS_NEEDED")? {
            game.wins_needed = wins;
        }
        if let Some(amount) = parse(&var, "REWARD_AMOUNT")? {
            game.reward_amount = amount;
        }

        Ok(Self {
            port: parse(&var, "PORT")?.unwrap_or(DEFAULT_PORT),
            roster,
            reward_rpc,
            winners_file: var("WINNERS_FILE")
                .unwrap_or_else(|| DEFAULT_WINNERS_FILE.to_string())
                .into(),
            host_secret_key: var("HOST_SECRET_KEY"),
            words_file: var("WORDS_FILE").map(PathBuf::from),
            game,
        })
    }
}

fn parse<T, F>(var: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    var(name)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid { name, value })
        })
        .transpose()
}

fn parse_nonzero<T, F>(var: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr + Default + PartialEq,
    F: Fn(&str) -> Option<String>,
{
    match parse::<T, F>(var, name)? {
        Some(value) if value == T::default() => Err(ConfigError::Invalid {
            name,
            value: var(name).unwrap_or_default(),
        }),
        parsed => Ok(parsed),
    }
}
