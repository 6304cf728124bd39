use anyhow::Result;
use serde::Serialize;
use tracing::warn;

use crate::dataset::Dataset;
use crate::error::DataError;
use crate::models::{Game, Play, PlayDirection, PlayKey, TrackingSample};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMatch {
    /// `home` hosted `away`.
    Hosted(u64),
    /// Only the reversed pairing was played.
    Reversed(u64),
    NotPlayed,
}

impl GameMatch {
    pub fn game_id(self) -> Option<u64> {
        match self {
            GameMatch::Hosted(id) | GameMatch::Reversed(id) => Some(id),
            GameMatch::NotPlayed => None,
        }
    }
}

/// At most one meeting per pair of teams is assumed; the first listed wins.
pub fn game_id(ds: &Dataset, home: &str, away: &str) -> GameMatch {
    let find = |h: &str, a: &str| {
        ds.games
            .iter()
            .find(|g| g.home.eq_ignore_ascii_case(h) && g.away.eq_ignore_ascii_case(a))
            .map(|g| g.game_id)
    };
    if let Some(id) = find(home, away) {
        return GameMatch::Hosted(id);
    }
    match find(away, home) {
        Some(id) => GameMatch::Reversed(id),
        None => GameMatch::NotPlayed,
    }
}

fn game(ds: &Dataset, game_id: u64) -> Result<&Game, DataError> {
    ds.game(game_id).ok_or(DataError::UnknownGame(game_id))
}

fn play(ds: &Dataset, key: PlayKey) -> Result<&Play, DataError> {
    game(ds, key.game_id)?;
    ds.play(key.game_id, key.play_id).ok_or(DataError::UnknownPlay {
        game_id: key.game_id,
        play_id: key.play_id,
    })
}

/// `(home, away)` for a game.
pub fn game_teams(ds: &Dataset, game_id: u64) -> Result<(String, String), DataError> {
    let g = game(ds, game_id)?;
    Ok((g.home.clone(), g.away.clone()))
}

pub fn game_week(ds: &Dataset, game_id: u64) -> Result<u8, DataError> {
    Ok(game(ds, game_id)?.week)
}

/// Column filter applied to the play table. A play passes when its value in
/// `column` matches any of `values`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayFilter {
    pub column: String,
    pub values: Vec<String>,
}

impl PlayFilter {
    pub fn new(column: impl Into<String>, values: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Parses `key=v1,v2`.
    pub fn parse(raw: &str) -> Option<Self> {
        let (key, vals) = raw.split_once('=')?;
        let key = key.trim();
        if key.is_empty() {
            return None;
        }
        Some(Self::new(key, vals.split(',').map(str::trim)))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlayResolution {
    Unique(PlayKey),
    Ambiguous(Vec<PlayKey>),
    NoMatch,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaySearch {
    pub resolution: PlayResolution,
    /// Filter keys that name no play column; they were skipped.
    pub ignored: Vec<String>,
}

/// Narrows the plays of one game by column filters.
pub fn play_id(ds: &Dataset, game_id: u64, filters: &[PlayFilter]) -> Result<PlaySearch, DataError> {
    game(ds, game_id)?;
    let mut candidates: Vec<&Play> = ds.plays_for_game(game_id).collect();
    let mut ignored = Vec::new();

    for filter in filters {
        if !Play::has_column(&filter.column) {
            warn!(key = %filter.column, "{} is not a play column; ignoring", filter.column);
            ignored.push(filter.column.clone());
            continue;
        }
        candidates.retain(|p| {
            p.column(&filter.column)
                .is_some_and(|cell| filter.values.iter().any(|v| cell.matches(v)))
        });
    }

    let mut keys: Vec<PlayKey> = candidates.iter().map(|p| p.key()).collect();
    keys.sort();
    let resolution = match keys.len() {
        0 => PlayResolution::NoMatch,
        1 => PlayResolution::Unique(keys[0]),
        _ => PlayResolution::Ambiguous(keys),
    };
    Ok(PlaySearch { resolution, ignored })
}

pub fn line_of_scrimmage(ds: &Dataset, key: PlayKey) -> Result<Option<f64>, DataError> {
    Ok(play(ds, key)?.absolute_yard_line)
}

pub fn yards_to_go(ds: &Dataset, key: PlayKey) -> Result<u16, DataError> {
    Ok(play(ds, key)?.yds_to_go)
}

/// Direction of play at the earliest frame of the play.
pub fn play_direction(tracking: &[TrackingSample], key: PlayKey) -> Option<PlayDirection> {
    tracking
        .iter()
        .filter(|s| s.key() == key)
        .min_by_key(|s| s.frame_id)
        .map(|s| s.play_direction)
}

/// Yardline the offense must reach. Direction comes from the tracking rows;
/// without them nothing is computed.
pub fn first_down_line(
    ds: &Dataset,
    key: PlayKey,
    tracking: &[TrackingSample],
) -> Result<Option<f64>, DataError> {
    let p = play(ds, key)?;
    let Some(direction) = play_direction(tracking, key) else {
        return Err(DataError::NoTracking {
            game_id: key.game_id,
            play_id: key.play_id,
        });
    };
    Ok(p.absolute_yard_line
        .map(|los| advance(los, p.yds_to_go, direction)))
}

pub fn advance(los: f64, yds_to_go: u16, direction: PlayDirection) -> f64 {
    match direction {
        PlayDirection::Right => los + f64::from(yds_to_go),
        PlayDirection::Left => los - f64::from(yds_to_go),
    }
}

/// Highest frame id observed for the play. Gaps are not filled in, so this is
/// not a count.
pub fn n_frames(tracking: &[TrackingSample], key: PlayKey) -> Result<u32, DataError> {
    tracking
        .iter()
        .filter(|s| s.key() == key)
        .map(|s| s.frame_id)
        .max()
        .ok_or(DataError::NoTracking {
            game_id: key.game_id,
            play_id: key.play_id,
        })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaySnapshot {
    pub game_id: u64,
    pub play_id: u64,
    pub home: String,
    pub away: String,
    pub week: u8,
    pub down_dist_summary: String,
    pub line_of_scrimmage: Option<f64>,
    pub yards_to_go: u16,
    pub play_direction: Option<PlayDirection>,
    pub first_down_line: Option<f64>,
    pub n_frames: Option<u32>,
}

/// Every derived quantity for one play. Tracking gaps show up as `None`
/// rather than an error.
pub fn snapshot(ds: &Dataset, key: PlayKey, tracking: &[TrackingSample]) -> Result<PlaySnapshot> {
    let p = play(ds, key)?;
    let g = game(ds, key.game_id)?;
    let direction = play_direction(tracking, key);
    Ok(PlaySnapshot {
        game_id: key.game_id,
        play_id: key.play_id,
        home: g.home.clone(),
        away: g.away.clone(),
        week: g.week,
        down_dist_summary: p.down_dist_summary.clone(),
        line_of_scrimmage: p.absolute_yard_line,
        yards_to_go: p.yds_to_go,
        play_direction: direction,
        first_down_line: direction
            .and_then(|d| p.absolute_yard_line.map(|los| advance(los, p.yds_to_go, d))),
        n_frames: n_frames(tracking, key).ok(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_parse_from_key_value_lists() {
        let f = PlayFilter::parse("down=2, 3").unwrap();
        assert_eq!(f.column, "down");
        assert_eq!(f.values, vec!["2", "3"]);
        assert!(PlayFilter::parse("down").is_none());
        assert!(PlayFilter::parse("=3").is_none());
    }

    #[test]
    fn advance_follows_direction() {
        assert_eq!(advance(35.0, 7, PlayDirection::Right), 42.0);
        assert_eq!(advance(35.0, 7, PlayDirection::Left), 28.0);
    }
}
