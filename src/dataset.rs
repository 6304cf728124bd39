use anyhow::{Context, Result};
use tracing::info;

use crate::data_loaders::{self, TrackingQuery};
use crate::models::{Game, Play, Player, TrackingSample};
use crate::settings::Settings;
use crate::teams::TeamInfo;

/// Reference tables read once per run. Tracking is far larger and is read
/// per week on demand.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub settings: Settings,
    pub games: Vec<Game>,
    pub plays: Vec<Play>,
    pub teams: Vec<TeamInfo>,
}

impl Dataset {
    pub fn load(settings: &Settings) -> Result<Self> {
        let games = data_loaders::games_data(&settings.games_file()).context("load games")?;
        let plays = data_loaders::plays_data(&settings.plays_file()).context("load plays")?;
        let teams = data_loaders::teams_data(settings).context("load team reference")?;
        info!(
            games = games.len(),
            plays = plays.len(),
            teams = teams.len(),
            data_dir = %settings.data_dir.display(),
            "reference tables loaded"
        );
        Ok(Self {
            settings: settings.clone(),
            games,
            plays,
            teams,
        })
    }

    /// Player reference table; read on demand since rendering never needs it.
    pub fn players(&self) -> Result<Vec<Player>> {
        data_loaders::player_data(&self.settings.players_file()).context("load players")
    }

    pub fn game(&self, game_id: u64) -> Option<&Game> {
        self.games.iter().find(|g| g.game_id == game_id)
    }

    pub fn play(&self, game_id: u64, play_id: u64) -> Option<&Play> {
        self.plays
            .iter()
            .find(|p| p.game_id == game_id && p.play_id == play_id)
    }

    pub fn plays_for_game(&self, game_id: u64) -> impl Iterator<Item = &Play> {
        self.plays.iter().filter(move |p| p.game_id == game_id)
    }

    pub fn games_in_week(&self, week: u8) -> impl Iterator<Item = &Game> {
        self.games.iter().filter(move |g| g.week == week)
    }

    pub fn team_codes(&self) -> impl Iterator<Item = &str> {
        self.teams.iter().map(|t| t.team_code.as_str())
    }

    pub fn tracking(&self, query: &TrackingQuery) -> Result<Vec<TrackingSample>> {
        data_loaders::tracking_data(&self.settings.data_dir, query)
    }

    /// Tracking rows of a single play, read from the week its game was played.
    pub fn play_tracking(&self, week: u8, game_id: u64, play_id: u64) -> Result<Vec<TrackingSample>> {
        self.tracking(&TrackingQuery::play(week, game_id, play_id))
            .with_context(|| format!("load tracking for {game_id}_{play_id}"))
    }
}
