use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use bdb_tracking::data_loaders::{self, PlotTestRow};
use bdb_tracking::models::{PlayDirection, TeamRole, TrackingSample};
use bdb_tracking::plot_helpers::{self, Lines, Matchup, RenderOptions};
use bdb_tracking::settings::Settings;

fn main() -> Result<()> {
    bdb_tracking::init_logging();
    let mut settings = Settings::from_env();
    for arg in std::env::args().skip(1) {
        if let Some(dir) = arg.strip_prefix("--data-dir=") {
            settings.data_dir = PathBuf::from(dir);
        } else if let Some(dir) = arg.strip_prefix("--img-dir=") {
            settings.img_dir = PathBuf::from(dir);
        }
    }

    let teams = data_loaders::teams_data(&settings)?;
    let rows = data_loaders::plot_testing_data(&settings.plot_testing_file())?;
    let out_dir = settings.test_plots_dir();
    fs::create_dir_all(&out_dir).with_context(|| format!("create {}", out_dir.display()))?;

    for row in &rows {
        let matchup = Matchup::resolve(&teams, &row.home, Some(&row.away))?;
        let base = plot_helpers::field(&settings, &matchup)?;
        let players = preview_players(row);
        let options = RenderOptions {
            los: false,
            first_down: false,
            arrows: false,
        };
        let canvas = plot_helpers::play_frame(&base, &matchup, &players, Lines::default(), options)?;
        let out = out_dir.join(format!("plt_preview_{}.png", row.home));
        canvas
            .image()
            .save(&out)
            .with_context(|| format!("write {}", out.display()))?;
        info!(path = %out.display(), "preview written");
    }
    println!("{} previews in {}", rows.len(), out_dir.display());
    Ok(())
}

// Facing right puts the home number at -90 degrees and the away number at +90.
fn preview_players(row: &PlotTestRow) -> [TrackingSample; 2] {
    let player = |team: TeamRole, x: f64, y: f64, jersey: u8| TrackingSample {
        time: String::new(),
        x,
        y,
        speed: 0.0,
        acceleration: 0.0,
        distance: 0.0,
        orientation: None,
        direction: None,
        event: None,
        player_id: None,
        player_name: String::new(),
        jersey_number: Some(jersey),
        position: None,
        frame_id: 1,
        team,
        game_id: 0,
        play_id: 0,
        play_direction: PlayDirection::Right,
        route: None,
    };
    [
        player(TeamRole::Home, row.home_x, row.home_y, row.home_jersey_no),
        player(TeamRole::Away, row.away_x, row.away_y, row.away_jersey_no),
    ]
}
