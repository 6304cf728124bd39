use std::f64::consts::PI;

use chrono::NaiveDate;

use crate::error::DataError;
use crate::models::Play;

const DATE_LAYOUTS: [&str; 3] = ["%m/%d/%Y", "%Y-%m-%d", "%m/%d/%y"];

pub fn down_ordinal(down: u8) -> &'static str {
    match down {
        1 => "1st",
        2 => "2nd",
        3 => "3rd",
        _ => "4th",
    }
}

/// Pre-snap summary, e.g. `Q1 - 10:00 - CHI - 2nd & 7 from CHI 35`.
pub fn play_down_dist(play: &Play) -> String {
    format_down_dist(
        play.quarter,
        &play.game_clock,
        &play.possession_team,
        play.down,
        play.yds_to_go,
        play.yardline_side.as_deref(),
        play.yardline_number,
    )
}

pub fn format_down_dist(
    quarter: u8,
    game_clock: &str,
    possession_team: &str,
    down: u8,
    yds_to_go: u16,
    yardline_side: Option<&str>,
    yardline_number: Option<u8>,
) -> String {
    let spot = match (yardline_side, yardline_number) {
        (Some(side), Some(n)) => format!("{side} {n}"),
        (None, Some(n)) => n.to_string(),
        (_, None) => "unknown spot".to_string(),
    };
    format!(
        "Q{quarter} - {game_clock} - {possession_team} - {} & {yds_to_go} from {spot}",
        down_ordinal(down)
    )
}

/// Height in inches from `F-I`. A missing inches part counts as zero, so a
/// bare `6` is six feet while a bare `73` is already inches.
pub fn player_height(raw: &str) -> Option<u16> {
    let raw = raw.trim();
    let mut parts = raw.splitn(2, '-');
    let first: u16 = parts.next()?.trim().parse().ok()?;
    let inches: u16 = match parts.next().map(str::trim) {
        Some(s) if !s.is_empty() => s.parse().ok()?,
        _ => 0,
    };
    // A small leading component is feet; anything larger is already inches.
    let base = if first <= 6 { first * 12 } else { first };
    Some(base + inches)
}

pub fn parse_date(field: &'static str, raw: &str) -> Result<NaiveDate, DataError> {
    let trimmed = raw.trim();
    // Some exports carry a time component after the date.
    let date_part = trimmed
        .split(|c| c == 'T' || c == ' ')
        .next()
        .unwrap_or(trimmed);
    DATE_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDate::parse_from_str(date_part, layout).ok())
        .ok_or_else(|| DataError::BadDate {
            field,
            value: raw.to_string(),
        })
}

/// Tracking angles are compass degrees (0 = +y, clockwise). Returns radians
/// measured counter-clockwise from +x.
pub fn normalize_angle(degrees: f64) -> f64 {
    (90.0 - degrees).rem_euclid(360.0) * PI / 180.0
}
