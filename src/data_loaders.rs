//! CSV readers for the Big Data Bowl tables.
//!
//! Columns are matched by header name, never by position. Each reader checks
//! the header row against the columns it needs before decoding any record and
//! fails with [`DataError::MissingColumns`] when the file does not fit.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveTime;
use rayon::prelude::*;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use tracing::{debug, info, warn};

use crate::data_cleaners::{normalize_angle, parse_date, play_down_dist, player_height};
use crate::error::DataError;
use crate::models::{Game, Play, PlayDirection, Player, TeamRole, TrackingSample};
use crate::settings::{self, Settings};
use crate::teams::{self, TeamInfo, Uniform};

pub const FIRST_WEEK: u8 = 1;
pub const LAST_WEEK: u8 = 17;

const GAME_COLUMNS: [&str; 6] = [
    "gameId",
    "gameDate",
    "gameTimeEastern",
    "homeTeamAbbr",
    "visitorTeamAbbr",
    "week",
];

const PLAY_COLUMNS: [&str; 27] = [
    "gameId",
    "playId",
    "playDescription",
    "quarter",
    "down",
    "yardsToGo",
    "possessionTeam",
    "playType",
    "yardlineSide",
    "yardlineNumber",
    "offenseFormation",
    "personnelO",
    "defendersInTheBox",
    "numberOfPassRushers",
    "personnelD",
    "typeDropback",
    "preSnapVisitorScore",
    "preSnapHomeScore",
    "gameClock",
    "absoluteYardlineNumber",
    "penaltyCodes",
    "penaltyJerseyNumbers",
    "passResult",
    "offensePlayResult",
    "playResult",
    "epa",
    "isDefensivePI",
];

const TRACKING_COLUMNS: [&str; 19] = [
    "time",
    "x",
    "y",
    "s",
    "a",
    "dis",
    "o",
    "dir",
    "event",
    "nflId",
    "displayName",
    "jerseyNumber",
    "position",
    "frameId",
    "team",
    "gameId",
    "playId",
    "playDirection",
    "route",
];

const PLAYER_COLUMNS: [&str; 7] = [
    "nflId",
    "height",
    "weight",
    "birthDate",
    "collegeName",
    "position",
    "displayName",
];

const TEAM_COLUMNS: [&str; 12] = [
    "team_code",
    "nickname",
    "endzone_text",
    "endzone_shadow",
    "home_uni_base",
    "home_uni_highlight",
    "home_uni_number",
    "home_uni_number_highlight",
    "away_uni_base",
    "away_uni_highlight",
    "away_uni_number",
    "away_uni_number_highlight",
];

const PLOT_TESTING_COLUMNS: [&str; 8] = [
    "home",
    "away",
    "home_x",
    "home_y",
    "home_jersey_no",
    "away_x",
    "away_y",
    "away_jersey_no",
];

/// One row of `plot_testing.csv`: a home and an away player placed by hand.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlotTestRow {
    pub home: String,
    pub away: String,
    pub home_x: f64,
    pub home_y: f64,
    pub home_jersey_no: u8,
    pub away_x: f64,
    pub away_y: f64,
    pub away_jersey_no: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeekScope {
    Week(u8),
    /// Every weekly file, concatenated in week order. Slow.
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackingQuery {
    pub game_id: Option<u64>,
    pub play_id: Option<u64>,
    pub weeks: WeekScope,
}

impl TrackingQuery {
    pub fn week(week: u8) -> Self {
        Self {
            game_id: None,
            play_id: None,
            weeks: WeekScope::Week(week),
        }
    }

    pub fn play(week: u8, game_id: u64, play_id: u64) -> Self {
        Self {
            game_id: Some(game_id),
            play_id: Some(play_id),
            weeks: WeekScope::Week(week),
        }
    }

    pub fn game(week: u8, game_id: u64) -> Self {
        Self {
            game_id: Some(game_id),
            play_id: None,
            weeks: WeekScope::Week(week),
        }
    }

    fn accepts(&self, game_id: u64, play_id: u64) -> bool {
        self.game_id.is_none_or(|g| g == game_id) && self.play_id.is_none_or(|p| p == play_id)
    }
}

pub fn games_data(path: &Path) -> Result<Vec<Game>> {
    let rows: Vec<GameRecord> = read_checked(path, &GAME_COLUMNS)?;
    rows.into_iter()
        .map(|r| -> Result<Game> {
            let game_date = parse_date("gameDate", &r.game_date)
                .with_context(|| format!("game {} in {}", r.game_id, path.display()))?;
            let kickoff_time = r.game_time_eastern.as_deref().and_then(|t| {
                NaiveTime::parse_from_str(t.trim(), "%H:%M:%S")
                    .inspect_err(|e| {
                        warn!(game_id = r.game_id, value = t, error = %e, "unreadable gameTimeEastern; left blank")
                    })
                    .ok()
            });
            Ok(Game {
                game_id: r.game_id,
                game_date,
                kickoff_time,
                home: r.home.trim().to_ascii_uppercase(),
                away: r.away.trim().to_ascii_uppercase(),
                week: r.week,
            })
        })
        .collect()
}

pub fn plays_data(path: &Path) -> Result<Vec<Play>> {
    let rows: Vec<PlayRecord> = read_checked(path, &PLAY_COLUMNS)?;
    Ok(rows.into_iter().map(PlayRecord::into_play).collect())
}

/// Loads tracking rows for one week (or all of them), keeping only the rows
/// the query asks for.
pub fn tracking_data(data_dir: &Path, query: &TrackingQuery) -> Result<Vec<TrackingSample>> {
    match query.weeks {
        WeekScope::Week(week) => {
            if !(FIRST_WEEK..=LAST_WEEK).contains(&week) {
                return Err(DataError::InvalidWeek(i64::from(week)).into());
            }
            read_tracking_week(data_dir, week, query)
        }
        WeekScope::All => {
            info!("loading tracking for every week; this reads all weekly files");
            let weeks: Vec<Vec<TrackingSample>> = (FIRST_WEEK..=LAST_WEEK)
                .into_par_iter()
                .map(|week| read_tracking_week(data_dir, week, query))
                .collect::<Result<_>>()?;
            Ok(weeks.into_iter().flatten().collect())
        }
    }
}

fn read_tracking_week(
    data_dir: &Path,
    week: u8,
    query: &TrackingQuery,
) -> Result<Vec<TrackingSample>> {
    let path = settings::week_file(data_dir, week);
    debug!(week, path = %path.display(), "loading tracking week");
    let mut reader = open_checked(&path, &TRACKING_COLUMNS)?;
    let mut out = Vec::new();
    for (idx, row) in reader.deserialize::<TrackingRecord>().enumerate() {
        let row = row.with_context(|| format!("{} record {}", path.display(), idx + 1))?;
        if query.accepts(row.game_id, row.play_id) {
            out.push(row.into_sample());
        }
    }
    Ok(out)
}

/// Team reference table from `team_data.csv`, or the built-in table when
/// the file is absent.
pub fn teams_data(settings: &Settings) -> Result<Vec<TeamInfo>> {
    let path = settings.teams_file();
    if !path.exists() {
        debug!(path = %path.display(), "no team data file; using built-in table");
        return Ok(teams::builtin_teams());
    }
    let rows: Vec<TeamRecord> = read_checked(&path, &TEAM_COLUMNS)?;
    Ok(rows.into_iter().map(TeamRecord::into_team).collect())
}

pub fn player_data(path: &Path) -> Result<Vec<Player>> {
    let rows: Vec<PlayerRecord> = read_checked(path, &PLAYER_COLUMNS)?;
    Ok(rows
        .into_iter()
        .map(|r| Player {
            player_id: r.player_id,
            height_inches: r.height.as_deref().and_then(player_height),
            weight: r.weight,
            dob: r.birth_date.as_deref().and_then(|d| {
                parse_date("birthDate", d)
                    .inspect_err(|e| warn!(player_id = r.player_id, error = %e, "birthDate left blank"))
                    .ok()
            }),
            college: r.college,
            position: r.position,
            name: r.name,
        })
        .collect())
}

pub fn plot_testing_data(path: &Path) -> Result<Vec<PlotTestRow>> {
    read_checked(path, &PLOT_TESTING_COLUMNS)
}

fn open_checked(path: &Path, required: &[&str]) -> Result<csv::Reader<File>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Fields)
        .from_path(path)
        .with_context(|| format!("open {}", path.display()))?;
    let headers = reader
        .headers()
        .with_context(|| format!("read header row of {}", path.display()))?;
    let missing: Vec<String> = required
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .map(|col| (*col).to_string())
        .collect();
    if !missing.is_empty() {
        return Err(DataError::MissingColumns {
            file: PathBuf::from(path),
            missing,
        }
        .into());
    }
    Ok(reader)
}

fn read_checked<T: DeserializeOwned>(path: &Path, required: &[&str]) -> Result<Vec<T>> {
    let mut reader = open_checked(path, required)?;
    let mut out = Vec::new();
    for (idx, row) in reader.deserialize::<T>().enumerate() {
        out.push(row.with_context(|| format!("{} record {}", path.display(), idx + 1))?);
    }
    Ok(out)
}

/// Blank and `NA` cells become `None`.
fn na_text<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
    let raw = Option::<String>::deserialize(de)?;
    Ok(raw.filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("na")))
}

fn na_flag<'de, D: Deserializer<'de>>(de: D) -> Result<Option<bool>, D::Error> {
    let raw = na_text(de)?;
    Ok(raw.and_then(|s| match s.to_ascii_lowercase().as_str() {
        "true" | "t" | "1" => Some(true),
        "false" | "f" | "0" => Some(false),
        _ => None,
    }))
}

#[derive(Debug, Deserialize)]
struct GameRecord {
    #[serde(rename = "gameId")]
    game_id: u64,
    #[serde(rename = "gameDate")]
    game_date: String,
    #[serde(rename = "gameTimeEastern", deserialize_with = "na_text")]
    game_time_eastern: Option<String>,
    #[serde(rename = "homeTeamAbbr")]
    home: String,
    #[serde(rename = "visitorTeamAbbr")]
    away: String,
    week: u8,
}

#[derive(Debug, Deserialize)]
struct PlayRecord {
    #[serde(rename = "gameId")]
    game_id: u64,
    #[serde(rename = "playId")]
    play_id: u64,
    #[serde(rename = "playDescription", default)]
    play_description: String,
    quarter: u8,
    #[serde(deserialize_with = "csv::invalid_option")]
    down: Option<u8>,
    #[serde(rename = "yardsToGo")]
    yds_to_go: u16,
    #[serde(rename = "possessionTeam")]
    possession_team: String,
    #[serde(rename = "playType", deserialize_with = "na_text")]
    play_type: Option<String>,
    #[serde(rename = "yardlineSide", deserialize_with = "na_text")]
    yardline_side: Option<String>,
    #[serde(rename = "yardlineNumber", deserialize_with = "csv::invalid_option")]
    yardline_number: Option<u8>,
    #[serde(rename = "offenseFormation", deserialize_with = "na_text")]
    offense_formation: Option<String>,
    #[serde(rename = "personnelO", deserialize_with = "na_text")]
    personnel_offense: Option<String>,
    #[serde(rename = "defendersInTheBox", deserialize_with = "csv::invalid_option")]
    defenders_in_box: Option<f64>,
    #[serde(rename = "numberOfPassRushers", deserialize_with = "csv::invalid_option")]
    n_pass_rushers: Option<f64>,
    #[serde(rename = "personnelD", deserialize_with = "na_text")]
    personnel_defense: Option<String>,
    #[serde(rename = "typeDropback", deserialize_with = "na_text")]
    type_dropback: Option<String>,
    #[serde(rename = "preSnapVisitorScore", deserialize_with = "csv::invalid_option")]
    presnap_away_score: Option<f64>,
    #[serde(rename = "preSnapHomeScore", deserialize_with = "csv::invalid_option")]
    presnap_home_score: Option<f64>,
    #[serde(rename = "gameClock", default)]
    game_clock: String,
    #[serde(rename = "absoluteYardlineNumber", deserialize_with = "csv::invalid_option")]
    absolute_yard_line: Option<f64>,
    #[serde(rename = "penaltyCodes", deserialize_with = "na_text")]
    penalty_code: Option<String>,
    #[serde(rename = "penaltyJerseyNumbers", deserialize_with = "na_text")]
    penalty_player: Option<String>,
    #[serde(rename = "passResult", deserialize_with = "na_text")]
    pass_result: Option<String>,
    #[serde(rename = "offensePlayResult", deserialize_with = "csv::invalid_option")]
    offensive_play_result: Option<f64>,
    #[serde(rename = "playResult", deserialize_with = "csv::invalid_option")]
    play_result: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    epa: Option<f64>,
    #[serde(rename = "isDefensivePI", deserialize_with = "na_flag")]
    is_defensive_pi: Option<bool>,
}

impl PlayRecord {
    fn into_play(self) -> Play {
        // Counts and scores come through as floats in some exports ("7.0").
        let small = |v: Option<f64>| v.map(|x| x.round() as u8);
        let score = |v: Option<f64>| v.map(|x| x.round() as u16);
        let signed = |v: Option<f64>| v.map(|x| x.round() as i16);
        let mut play = Play {
            game_id: self.game_id,
            play_id: self.play_id,
            play_description: self.play_description,
            quarter: self.quarter,
            down: self.down.unwrap_or(0),
            yds_to_go: self.yds_to_go,
            possession_team: self.possession_team.trim().to_ascii_uppercase(),
            play_type: self.play_type,
            yardline_side: self.yardline_side,
            yardline_number: self.yardline_number,
            offense_formation: self.offense_formation,
            personnel_offense: self.personnel_offense,
            defenders_in_box: small(self.defenders_in_box),
            n_pass_rushers: small(self.n_pass_rushers),
            personnel_defense: self.personnel_defense,
            type_dropback: self.type_dropback,
            presnap_away_score: score(self.presnap_away_score),
            presnap_home_score: score(self.presnap_home_score),
            game_clock: self.game_clock,
            absolute_yard_line: self.absolute_yard_line,
            penalty_code: self.penalty_code,
            penalty_player: self.penalty_player,
            pass_result: self.pass_result,
            offensive_play_result: signed(self.offensive_play_result),
            play_result: signed(self.play_result),
            epa: self.epa,
            is_defensive_pi: self.is_defensive_pi,
            down_dist_summary: String::new(),
        };
        play.down_dist_summary = play_down_dist(&play);
        play
    }
}

#[derive(Debug, Deserialize)]
struct TrackingRecord {
    time: String,
    x: f64,
    y: f64,
    s: f64,
    a: f64,
    dis: f64,
    #[serde(deserialize_with = "csv::invalid_option")]
    o: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    dir: Option<f64>,
    #[serde(deserialize_with = "na_text")]
    event: Option<String>,
    #[serde(rename = "nflId", deserialize_with = "csv::invalid_option")]
    player_id: Option<f64>,
    #[serde(rename = "displayName")]
    player_name: String,
    #[serde(rename = "jerseyNumber", deserialize_with = "csv::invalid_option")]
    jersey_number: Option<f64>,
    #[serde(deserialize_with = "na_text")]
    position: Option<String>,
    #[serde(rename = "frameId")]
    frame_id: u32,
    team: TeamRole,
    #[serde(rename = "gameId")]
    game_id: u64,
    #[serde(rename = "playId")]
    play_id: u64,
    #[serde(rename = "playDirection")]
    play_direction: PlayDirection,
    #[serde(deserialize_with = "na_text")]
    route: Option<String>,
}

impl TrackingRecord {
    fn into_sample(self) -> TrackingSample {
        TrackingSample {
            time: self.time,
            x: self.x,
            y: self.y,
            speed: self.s,
            acceleration: self.a,
            distance: self.dis,
            orientation: self.o.map(normalize_angle),
            direction: self.dir.map(normalize_angle),
            event: self.event,
            player_id: self.player_id.map(|id| id.round() as u64),
            player_name: self.player_name,
            jersey_number: self.jersey_number.map(|n| n.round() as u8),
            position: self.position,
            frame_id: self.frame_id,
            team: self.team,
            game_id: self.game_id,
            play_id: self.play_id,
            play_direction: self.play_direction,
            route: self.route,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PlayerRecord {
    #[serde(rename = "nflId")]
    player_id: u64,
    #[serde(deserialize_with = "na_text")]
    height: Option<String>,
    #[serde(deserialize_with = "csv::invalid_option")]
    weight: Option<u16>,
    #[serde(rename = "birthDate", deserialize_with = "na_text")]
    birth_date: Option<String>,
    #[serde(rename = "collegeName", deserialize_with = "na_text")]
    college: Option<String>,
    #[serde(deserialize_with = "na_text")]
    position: Option<String>,
    #[serde(rename = "displayName")]
    name: String,
}

#[derive(Debug, Deserialize)]
struct TeamRecord {
    team_code: String,
    nickname: String,
    endzone_text: String,
    endzone_shadow: String,
    home_uni_base: String,
    home_uni_highlight: String,
    home_uni_number: String,
    home_uni_number_highlight: String,
    away_uni_base: String,
    away_uni_highlight: String,
    away_uni_number: String,
    away_uni_number_highlight: String,
}

impl TeamRecord {
    fn into_team(self) -> TeamInfo {
        TeamInfo {
            team_code: self.team_code.trim().to_ascii_uppercase(),
            nickname: self.nickname,
            endzone_text: self.endzone_text,
            endzone_shadow: self.endzone_shadow,
            home_uni: Uniform {
                base: self.home_uni_base,
                highlight: self.home_uni_highlight,
                number: self.home_uni_number,
                number_highlight: self.home_uni_number_highlight,
            },
            away_uni: Uniform {
                base: self.away_uni_base,
                highlight: self.away_uni_highlight,
                number: self.away_uni_number,
                number_highlight: self.away_uni_number_highlight,
            },
        }
    }
}
