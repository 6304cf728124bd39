//! Identifier validation against the loaded reference tables.
//!
//! Every check is pure: it returns either the accepted value or a
//! [`Rejection`] carrying what a caller needs to offer the user alternatives.
//! Re-prompting lives in [`crate::prompt`].

use std::fmt;

use crate::data_loaders::{FIRST_WEEK, LAST_WEEK};
use crate::dataset::Dataset;
use crate::models::{PlayKey, TrackingSample};
use crate::teams;

#[derive(Debug, Clone, PartialEq)]
pub enum Checked<T> {
    Valid(T),
    Invalid(Rejection),
}

impl<T> Checked<T> {
    pub fn ok(self) -> Option<T> {
        match self {
            Checked::Valid(v) => Some(v),
            Checked::Invalid(_) => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Checked::Valid(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameChoice {
    pub game_id: u64,
    pub home: String,
    pub away: String,
    pub week: u8,
}

impl fmt::Display for GameChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -- {} @ {}", self.game_id, self.away, self.home)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayChoice {
    pub play_id: u64,
    pub summary: String,
}

impl fmt::Display for PlayChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -- {}", self.play_id, self.summary)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    UnknownTeam { given: String, options: Vec<String> },
    WeekOutOfRange { given: i64 },
    UnknownGame { given: u64, options: Vec<GameChoice> },
    UnknownPlay { game_id: u64, given: u64, options: Vec<PlayChoice> },
    FrameOutOfRange { given: u32, min: u32, max: u32 },
    NoFrames { game_id: u64, play_id: u64 },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::UnknownTeam { given, options } => write!(
                f,
                "{given} is not a valid team. Choose from: {}",
                options.join(", ")
            ),
            Rejection::WeekOutOfRange { given } => write!(
                f,
                "{given} is not a valid week. Weeks run {FIRST_WEEK} through {LAST_WEEK}"
            ),
            Rejection::UnknownGame { given, .. } => write!(f, "{given} is not a valid game ID"),
            Rejection::UnknownPlay { game_id, given, .. } => {
                write!(f, "{given} is not a valid play ID for game {game_id}")
            }
            Rejection::FrameOutOfRange { given, min, max } => write!(
                f,
                "{given} is not a valid frame number. Choose a frame between {min} and {max}"
            ),
            Rejection::NoFrames { game_id, play_id } => {
                write!(f, "no tracking frames for play {play_id} of game {game_id}")
            }
        }
    }
}

pub fn team_code(ds: &Dataset, code: &str) -> Checked<String> {
    let code = code.trim().to_ascii_uppercase();
    let known = ds
        .team_codes()
        .any(|c| c == code)
        || teams::is_conference(&code);
    if known {
        return Checked::Valid(code);
    }
    let mut options: Vec<String> = ds.team_codes().map(str::to_string).collect();
    for conf in [teams::NFC, teams::AFC] {
        if !options.iter().any(|o| o == conf) {
            options.push(conf.to_string());
        }
    }
    options.sort();
    Checked::Invalid(Rejection::UnknownTeam { given: code, options })
}

pub fn week_number(week: i64) -> Checked<u8> {
    match u8::try_from(week) {
        Ok(w) if (FIRST_WEEK..=LAST_WEEK).contains(&w) => Checked::Valid(w),
        _ => Checked::Invalid(Rejection::WeekOutOfRange { given: week }),
    }
}

/// Game choices for a re-prompt, optionally narrowed to one week.
pub fn game_choices(ds: &Dataset, week: Option<u8>) -> Vec<GameChoice> {
    let mut out: Vec<GameChoice> = ds
        .games
        .iter()
        .filter(|g| week.is_none_or(|w| g.week == w))
        .map(|g| GameChoice {
            game_id: g.game_id,
            home: g.home.clone(),
            away: g.away.clone(),
            week: g.week,
        })
        .collect();
    out.sort_by_key(|c| c.game_id);
    out
}

pub fn game_id(ds: &Dataset, game_id: u64) -> Checked<u64> {
    if ds.game(game_id).is_some() {
        Checked::Valid(game_id)
    } else {
        Checked::Invalid(Rejection::UnknownGame {
            given: game_id,
            options: game_choices(ds, None),
        })
    }
}

pub fn play_choices(ds: &Dataset, game_id: u64) -> Vec<PlayChoice> {
    let mut out: Vec<PlayChoice> = ds
        .plays_for_game(game_id)
        .map(|p| PlayChoice {
            play_id: p.play_id,
            summary: p.down_dist_summary.clone(),
        })
        .collect();
    out.sort_by_key(|c| c.play_id);
    out
}

/// Checks the game first, then the play within that game.
pub fn play_id(ds: &Dataset, game: u64, play: u64) -> Checked<PlayKey> {
    if let Checked::Invalid(r) = game_id(ds, game) {
        return Checked::Invalid(r);
    }
    if ds.play(game, play).is_some() {
        Checked::Valid(PlayKey::new(game, play))
    } else {
        Checked::Invalid(Rejection::UnknownPlay {
            game_id: game,
            given: play,
            options: play_choices(ds, game),
        })
    }
}

/// Range of frame ids observed for one play.
pub fn frame_range(tracking: &[TrackingSample], key: PlayKey) -> Option<(u32, u32)> {
    tracking
        .iter()
        .filter(|s| s.key() == key)
        .map(|s| s.frame_id)
        .fold(None, |acc, f| match acc {
            None => Some((f, f)),
            Some((lo, hi)) => Some((lo.min(f), hi.max(f))),
        })
}

/// Checks `frame` against the frames observed for the play in `tracking`,
/// which the caller loads from the play's week.
pub fn frame_no(ds: &Dataset, key: PlayKey, frame: u32, tracking: &[TrackingSample]) -> Checked<u32> {
    if let Checked::Invalid(r) = play_id(ds, key.game_id, key.play_id) {
        return Checked::Invalid(r);
    }
    let Some((min, max)) = frame_range(tracking, key) else {
        return Checked::Invalid(Rejection::NoFrames {
            game_id: key.game_id,
            play_id: key.play_id,
        });
    };
    if (min..=max).contains(&frame) {
        Checked::Valid(frame)
    } else {
        Checked::Invalid(Rejection::FrameOutOfRange {
            given: frame,
            min,
            max,
        })
    }
}
