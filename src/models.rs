use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Game {
    pub game_id: u64,
    pub game_date: NaiveDate,
    pub kickoff_time: Option<NaiveTime>,
    pub home: String,
    pub away: String,
    pub week: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PlayKey {
    pub game_id: u64,
    pub play_id: u64,
}

impl PlayKey {
    pub const fn new(game_id: u64, play_id: u64) -> Self {
        Self { game_id, play_id }
    }
}

impl fmt::Display for PlayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.game_id, self.play_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Play {
    pub game_id: u64,
    pub play_id: u64,
    pub play_description: String,
    pub quarter: u8,
    pub down: u8,
    pub yds_to_go: u16,
    pub possession_team: String,
    pub play_type: Option<String>,
    pub yardline_side: Option<String>,
    pub yardline_number: Option<u8>,
    pub offense_formation: Option<String>,
    pub personnel_offense: Option<String>,
    pub defenders_in_box: Option<u8>,
    pub n_pass_rushers: Option<u8>,
    pub personnel_defense: Option<String>,
    pub type_dropback: Option<String>,
    pub presnap_away_score: Option<u16>,
    pub presnap_home_score: Option<u16>,
    pub game_clock: String,
    pub absolute_yard_line: Option<f64>,
    pub penalty_code: Option<String>,
    pub penalty_player: Option<String>,
    pub pass_result: Option<String>,
    pub offensive_play_result: Option<i16>,
    pub play_result: Option<i16>,
    pub epa: Option<f64>,
    pub is_defensive_pi: Option<bool>,
    pub down_dist_summary: String,
}

/// Internal column names addressable through [`Play::column`].
pub const PLAY_COLUMN_NAMES: [&str; 28] = [
    "game_id",
    "play_id",
    "play_description",
    "quarter",
    "down",
    "yds_to_go",
    "possession_team",
    "play_type",
    "yardline_side",
    "yardline_number",
    "offense_formation",
    "personnel_offense",
    "defenders_in_box",
    "n_pass_rushers",
    "personnel_defense",
    "type_dropback",
    "presnap_away_score",
    "presnap_home_score",
    "game_clock",
    "absolute_yard_line",
    "penalty_code",
    "penalty_player",
    "pass_result",
    "offensive_play_result",
    "play_result",
    "epa",
    "is_defensive_pi",
    "down_dist_summary",
];

impl Play {
    pub fn has_column(name: &str) -> bool {
        PLAY_COLUMN_NAMES.contains(&name)
    }

    pub fn key(&self) -> PlayKey {
        PlayKey::new(self.game_id, self.play_id)
    }

    /// Value of a schema column by its internal name. `None` means the column
    /// does not exist; `Some(CellValue::Missing)` means it exists but is blank.
    pub fn column(&self, name: &str) -> Option<CellValue> {
        let text = |v: &Option<String>| {
            v.as_ref()
                .map_or(CellValue::Missing, |s| CellValue::Text(s.clone()))
        };
        let int = |v: Option<i64>| v.map_or(CellValue::Missing, CellValue::Int);
        let float = |v: Option<f64>| v.map_or(CellValue::Missing, CellValue::Float);
        let value = match name {
            "game_id" => CellValue::Int(self.game_id as i64),
            "play_id" => CellValue::Int(self.play_id as i64),
            "play_description" => CellValue::Text(self.play_description.clone()),
            "quarter" => CellValue::Int(i64::from(self.quarter)),
            "down" => CellValue::Int(i64::from(self.down)),
            "yds_to_go" => CellValue::Int(i64::from(self.yds_to_go)),
            "possession_team" => CellValue::Text(self.possession_team.clone()),
            "play_type" => text(&self.play_type),
            "yardline_side" => text(&self.yardline_side),
            "yardline_number" => int(self.yardline_number.map(i64::from)),
            "offense_formation" => text(&self.offense_formation),
            "personnel_offense" => text(&self.personnel_offense),
            "defenders_in_box" => int(self.defenders_in_box.map(i64::from)),
            "n_pass_rushers" => int(self.n_pass_rushers.map(i64::from)),
            "personnel_defense" => text(&self.personnel_defense),
            "type_dropback" => text(&self.type_dropback),
            "presnap_away_score" => int(self.presnap_away_score.map(i64::from)),
            "presnap_home_score" => int(self.presnap_home_score.map(i64::from)),
            "game_clock" => CellValue::Text(self.game_clock.clone()),
            "absolute_yard_line" => float(self.absolute_yard_line),
            "penalty_code" => text(&self.penalty_code),
            "penalty_player" => text(&self.penalty_player),
            "pass_result" => text(&self.pass_result),
            "offensive_play_result" => int(self.offensive_play_result.map(i64::from)),
            "play_result" => int(self.play_result.map(i64::from)),
            "epa" => float(self.epa),
            "is_defensive_pi" => self.is_defensive_pi.map_or(CellValue::Missing, CellValue::Flag),
            "down_dist_summary" => CellValue::Text(self.down_dist_summary.clone()),
            _ => return None,
        };
        Some(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Int(i64),
    Float(f64),
    Text(String),
    Flag(bool),
    Missing,
}

impl CellValue {
    /// Compares against user-supplied text using the cell's own type.
    pub fn matches(&self, wanted: &str) -> bool {
        let wanted = wanted.trim();
        match self {
            CellValue::Int(v) => wanted.parse::<i64>().is_ok_and(|w| w == *v),
            CellValue::Float(v) => wanted.parse::<f64>().is_ok_and(|w| (w - v).abs() < 1e-9),
            CellValue::Text(v) => v == wanted,
            CellValue::Flag(v) => wanted.eq_ignore_ascii_case(if *v { "true" } else { "false" }),
            CellValue::Missing => wanted.is_empty() || wanted.eq_ignore_ascii_case("na"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamRole {
    Home,
    Away,
    Football,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayDirection {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackingSample {
    pub time: String,
    pub x: f64,
    pub y: f64,
    pub speed: f64,
    pub acceleration: f64,
    pub distance: f64,
    /// Radians, counter-clockwise from +x.
    pub orientation: Option<f64>,
    /// Radians, counter-clockwise from +x.
    pub direction: Option<f64>,
    pub event: Option<String>,
    pub player_id: Option<u64>,
    pub player_name: String,
    pub jersey_number: Option<u8>,
    pub position: Option<String>,
    pub frame_id: u32,
    pub team: TeamRole,
    pub game_id: u64,
    pub play_id: u64,
    pub play_direction: PlayDirection,
    pub route: Option<String>,
}

impl TrackingSample {
    pub fn key(&self) -> PlayKey {
        PlayKey::new(self.game_id, self.play_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Player {
    pub player_id: u64,
    pub height_inches: Option<u16>,
    pub weight: Option<u16>,
    pub dob: Option<NaiveDate>,
    pub college: Option<String>,
    pub position: Option<String>,
    pub name: String,
}
