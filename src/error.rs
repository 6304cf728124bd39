use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("{} is missing required columns: {}", file.display(), missing.join(", "))]
    MissingColumns { file: PathBuf, missing: Vec<String> },

    #[error("{0} is not a valid game ID")]
    UnknownGame(u64),

    #[error("play {play_id} does not exist in game {game_id}")]
    UnknownPlay { game_id: u64, play_id: u64 },

    #[error("no tracking data for play {play_id} of game {game_id}")]
    NoTracking { game_id: u64, play_id: u64 },

    #[error("{0} is not a valid team")]
    UnknownTeam(String),

    #[error("{0} is not a valid week; weeks run 1 through 17")]
    InvalidWeek(i64),

    #[error("could not parse {field} value {value:?} as a date")]
    BadDate { field: &'static str, value: String },

    #[error("input closed before a valid value was entered")]
    InputClosed,
}
