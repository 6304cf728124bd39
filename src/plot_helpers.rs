use std::path::PathBuf;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::canvas::{BLACK, Canvas, Color, TextAnchor, TextStyle, WHITE, hex_color};
use crate::coord_ops::{Origin, Point, Unit};
use crate::data_mergers::{self, MergedRow};
use crate::data_loaders::TrackingQuery;
use crate::dataset::Dataset;
use crate::error::DataError;
use crate::field_coords::{FieldGeometry, football_field_coords};
use crate::file_movers::{self, FrameDir};
use crate::logos;
use crate::lookup;
use crate::models::{PlayDirection, PlayKey, TeamRole, TrackingSample};
use crate::settings::Settings;
use crate::teams::{self, TeamInfo};

pub const FIELD_COLOR: &str = "#196f0c";
pub const LOS_COLOR: &str = "#183ec1";
pub const FIRST_DOWN_COLOR: &str = "#ffcb05";
pub const FOOTBALL_COLOR: &str = "#624a2e";

const FIELD_WIDTH: f64 = 160.0 / 3.0;
const LOGO_EXTENT: (f64, f64, f64, f64) = (52.0, 68.0, 18.65, 34.65);
const LINE_HALF_WIDTH: f64 = 2.0 / 12.0;
const PLAYER_RADIUS: f64 = 1.0;
const BALL_RADIUS: f64 = 0.5;
const ARROW_LENGTH: f64 = 3.0;
const NUMBER_HEIGHT: f64 = 2.0;
const JERSEY_HEIGHT: f64 = 0.9;
const NICKNAME_HEIGHT: f64 = 4.5;

static FIELD_GEOMETRY: OnceCell<FieldGeometry> = OnceCell::new();

/// Field markings in yards with a lower-left origin, built once per process.
pub fn field_geometry() -> &'static FieldGeometry {
    FIELD_GEOMETRY.get_or_init(|| football_field_coords(Unit::Yards, Origin::LowerLeft))
}

/// Rotation of a jersey number in degrees, so numbers read toward the
/// defending end zone of each side.
pub fn jersey_orientation(team: TeamRole, direction: PlayDirection) -> f64 {
    match (team, direction) {
        (TeamRole::Football, _) => 0.0,
        (TeamRole::Home, PlayDirection::Right) | (TeamRole::Away, PlayDirection::Left) => -90.0,
        (TeamRole::Home, PlayDirection::Left) | (TeamRole::Away, PlayDirection::Right) => 90.0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub los: bool,
    pub first_down: bool,
    pub arrows: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            los: true,
            first_down: true,
            arrows: true,
        }
    }
}

/// Home and away clubs of a drawing. `NFL` as the home side means the
/// conference pseudo-teams.
#[derive(Debug, Clone, PartialEq)]
pub struct Matchup {
    pub home: TeamInfo,
    pub away: TeamInfo,
}

impl Matchup {
    pub fn resolve(table: &[TeamInfo], home: &str, away: Option<&str>) -> Result<Self> {
        let (home, away) = if home.eq_ignore_ascii_case(teams::NFL) {
            (teams::NFC, teams::AFC)
        } else {
            (home, away.unwrap_or(teams::AFC))
        };
        let find = |code: &str| {
            teams::find_team(table, code)
                .cloned()
                .or_else(|| {
                    teams::is_conference(code)
                        .then(|| teams::find_team(&teams::builtin_teams(), code).cloned())
                        .flatten()
                })
                .ok_or_else(|| DataError::UnknownTeam(code.to_string()))
        };
        Ok(Self {
            home: find(home)?,
            away: find(away)?,
        })
    }

    pub fn for_game(ds: &Dataset, game_id: u64) -> Result<Self> {
        let (home, away) = lookup::game_teams(ds, game_id)?;
        Self::resolve(&ds.teams, &home, Some(&away))
    }
}

/// Empty field for a matchup: markings, yard numbers, the home logo at
/// midfield, and both nicknames in the end zones.
pub fn field(settings: &Settings, matchup: &Matchup) -> Result<Canvas> {
    let mut c = Canvas::new(settings.pixels_per_yard, hex_color(FIELD_COLOR)?);
    let geometry = field_geometry();

    for (_, set) in geometry.marking_sets() {
        for polygon in &set.polylines {
            c.fill_polygon(polygon, WHITE);
        }
    }
    for label in &geometry.field_marks {
        let style = TextStyle {
            height: NUMBER_HEIGHT,
            rotation: label.rotation,
            placement: TextAnchor::BaselineStart,
            fill: WHITE,
            outline: None,
        };
        c.text(label.position, &label.text, &style);
    }

    let logo = logos::logo_file(&settings.logos_dir(), &matchup.home.team_code);
    match image::open(&logo) {
        Ok(img) => {
            let (x0, x1, y0, y1) = LOGO_EXTENT;
            c.blend_image(&img.to_rgba8(), x0, x1, y0, y1);
        }
        Err(err) => warn!(path = %logo.display(), "logo not drawn: {err}"),
    }

    let endzones = [(&matchup.home, 5.0, 90.0), (&matchup.away, 115.0, -90.0)];
    for (team, x, rotation) in endzones {
        let style = TextStyle {
            height: NICKNAME_HEIGHT,
            rotation,
            placement: TextAnchor::Center,
            fill: hex_color(&team.endzone_text)?,
            outline: Some(hex_color(&team.endzone_shadow)?),
        };
        c.text(Point::new(x, FIELD_WIDTH / 2.0), &team.nickname, &style);
    }
    Ok(c)
}

fn yard_line(c: &mut Canvas, x: f64, color: Color) {
    c.fill_rect(
        x - LINE_HALF_WIDTH,
        x + LINE_HALF_WIDTH,
        1.0 / 9.0,
        FIELD_WIDTH - 1.0 / 9.0,
        color,
    );
}

/// Scrimmage and first-down lines of a frame, in absolute yards.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Lines {
    pub line_of_scrimmage: Option<f64>,
    pub first_down: Option<f64>,
}

/// Draws one frame's samples over a copy of `field`.
pub fn play_frame<'a>(
    field: &Canvas,
    matchup: &Matchup,
    samples: impl IntoIterator<Item = &'a TrackingSample>,
    lines: Lines,
    options: RenderOptions,
) -> Result<Canvas> {
    let mut c = field.clone();
    if options.los {
        if let Some(x) = lines.line_of_scrimmage {
            yard_line(&mut c, x, hex_color(LOS_COLOR)?);
        }
    }
    if options.first_down {
        if let Some(x) = lines.first_down {
            yard_line(&mut c, x, hex_color(FIRST_DOWN_COLOR)?);
        }
    }

    let mut ball = None;
    for s in samples {
        let uni = match s.team {
            TeamRole::Football => {
                ball = Some(Point::new(s.x, s.y));
                continue;
            }
            TeamRole::Home => matchup.home.uniform(true),
            TeamRole::Away => matchup.away.uniform(false),
        };
        let at = Point::new(s.x, s.y);
        let highlight = hex_color(&uni.highlight)?;
        if options.arrows {
            if let Some(angle) = s.orientation {
                c.arrow(at, angle, ARROW_LENGTH, highlight, 2);
            }
        }
        c.disc(at, PLAYER_RADIUS, hex_color(&uni.base)?, Some((highlight, 2.0)));
        if let Some(number) = s.jersey_number {
            let style = TextStyle {
                height: JERSEY_HEIGHT,
                rotation: jersey_orientation(s.team, s.play_direction),
                placement: TextAnchor::Center,
                fill: hex_color(&uni.number)?,
                outline: Some(hex_color(&uni.number_highlight)?),
            };
            c.text(at, &number.to_string(), &style);
        }
    }
    if let Some(at) = ball {
        c.disc(at, BALL_RADIUS, hex_color(FOOTBALL_COLOR)?, Some((BLACK, 1.0)));
    }
    Ok(c)
}

/// Merged tracking rows of one play. `tracking` may already hold the play's
/// samples (other plays are dropped); otherwise its game's week is read.
pub fn play_rows(
    ds: &Dataset,
    key: PlayKey,
    tracking: Option<Vec<TrackingSample>>,
) -> Result<Vec<MergedRow>> {
    let week = lookup::game_week(ds, key.game_id)?;
    let query = TrackingQuery::play(week, key.game_id, key.play_id);
    let tracking = tracking.map(|t| t.into_iter().filter(|s| s.key() == key).collect());
    let rows = data_mergers::tracking_and_plays(ds, &query, tracking, None)?;
    if rows.is_empty() {
        return Err(DataError::NoTracking {
            game_id: key.game_id,
            play_id: key.play_id,
        }
        .into());
    }
    Ok(rows)
}

fn frame_lines(ds: &Dataset, key: PlayKey, samples: &[TrackingSample]) -> Result<Lines> {
    Ok(Lines {
        line_of_scrimmage: lookup::line_of_scrimmage(ds, key)?,
        first_down: lookup::first_down_line(ds, key, samples)?,
    })
}

/// A single frame of a play as an image.
pub fn render_frame(
    ds: &Dataset,
    key: PlayKey,
    frame_id: u32,
    tracking: Option<Vec<TrackingSample>>,
    options: RenderOptions,
) -> Result<Canvas> {
    let rows = play_rows(ds, key, tracking)?;
    let samples: Vec<TrackingSample> = rows.into_iter().map(|r| r.sample).collect();
    let matchup = Matchup::for_game(ds, key.game_id)?;
    let lines = frame_lines(ds, key, &samples)?;
    let base = field(&ds.settings, &matchup)?;
    play_frame(
        &base,
        &matchup,
        samples.iter().filter(|s| s.frame_id == frame_id),
        lines,
        options,
    )
}

/// Renders every frame of a play and assembles them into a looping GIF.
/// `name` defaults to the play's down-and-distance summary.
pub fn play_gif(
    ds: &Dataset,
    key: PlayKey,
    name: Option<&str>,
    tracking: Option<Vec<TrackingSample>>,
    options: RenderOptions,
) -> Result<PathBuf> {
    let rows = play_rows(ds, key, tracking)?;
    let context = rows[0].context.clone();
    let samples: Vec<TrackingSample> = rows.into_iter().map(|r| r.sample).collect();
    let matchup = Matchup::for_game(ds, key.game_id)?;
    let lines = frame_lines(ds, key, &samples)?;
    let base = field(&ds.settings, &matchup)?;

    let mut frame_ids: Vec<u32> = samples.iter().map(|s| s.frame_id).collect();
    frame_ids.sort_unstable();
    frame_ids.dedup();

    let frames = FrameDir::create(&ds.settings.temp_dir(), key)?;
    let total = frame_ids.len();
    frame_ids.par_iter().try_for_each(|&frame_id| -> Result<()> {
        debug!(play = %key, frame = frame_id, total, "rendering frame");
        let img = play_frame(
            &base,
            &matchup,
            samples.iter().filter(|s| s.frame_id == frame_id),
            lines,
            options,
        )?;
        let path = frames.frame_path(frame_id);
        img.image()
            .save(&path)
            .with_context(|| format!("write {}", path.display()))
    })?;

    let stem = name
        .map(file_movers::sanitize_file_stem)
        .filter(|s| !s.is_empty())
        .or_else(|| Some(file_movers::sanitize_file_stem(&context.play.down_dist_summary)))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| key.play_id.to_string());
    let out = file_movers::gif_path(
        &ds.settings.gif_dir(),
        key.game_id,
        &context.home,
        &context.away,
        &stem,
    );
    file_movers::make_gif(&frames.frames()?, &out, ds.settings.frame_delay_ms)?;
    frames.close()?;
    info!(play = %key, frames = frame_ids.len(), "play animated");
    Ok(out)
}
