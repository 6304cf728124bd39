use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;
use tracing::debug;

use crate::data_loaders::TrackingQuery;
use crate::dataset::Dataset;
use crate::models::{Game, Play, PlayKey, TrackingSample};

/// One play joined with its game.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayContext {
    pub play: Play,
    pub home: String,
    pub away: String,
    pub week: u8,
    pub offensive_team: String,
    pub defensive_team: String,
}

impl PlayContext {
    pub fn new(play: Play, game: &Game) -> Self {
        let offensive_team = play.possession_team.clone();
        let defensive_team = if offensive_team == game.home {
            game.away.clone()
        } else {
            game.home.clone()
        };
        Self {
            play,
            home: game.home.clone(),
            away: game.away.clone(),
            week: game.week,
            offensive_team,
            defensive_team,
        }
    }

    pub fn key(&self) -> PlayKey {
        self.play.key()
    }
}

/// One tracking sample with the play and game it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedRow {
    pub sample: TrackingSample,
    pub context: Arc<PlayContext>,
}

/// Plays of one game (or of every game) joined with their game rows. Plays
/// whose game is missing are dropped.
pub fn plays_and_games(ds: &Dataset, game_id: Option<u64>) -> Vec<PlayContext> {
    let games: HashMap<u64, &Game> = ds.games.iter().map(|g| (g.game_id, g)).collect();
    let mut out: Vec<PlayContext> = ds
        .plays
        .iter()
        .filter(|p| game_id.is_none_or(|g| p.game_id == g))
        .filter_map(|p| games.get(&p.game_id).map(|g| PlayContext::new(p.clone(), g)))
        .collect();
    out.sort_by_key(PlayContext::key);
    out
}

/// Inner join of tracking to plays and games. Samples without a matching
/// play are dropped. Output order follows `tracking`.
pub fn join(tracking: Vec<TrackingSample>, plays: &[Play], games: &[Game]) -> Vec<MergedRow> {
    let games: HashMap<u64, &Game> = games.iter().map(|g| (g.game_id, g)).collect();
    let mut contexts: HashMap<PlayKey, Arc<PlayContext>> = HashMap::new();
    for p in plays {
        if let Some(g) = games.get(&p.game_id) {
            contexts.insert(p.key(), Arc::new(PlayContext::new(p.clone(), g)));
        }
    }
    let total = tracking.len();
    let rows: Vec<MergedRow> = tracking
        .into_iter()
        .filter_map(|sample| {
            let context = Arc::clone(contexts.get(&sample.key())?);
            Some(MergedRow { sample, context })
        })
        .collect();
    debug!(total, joined = rows.len(), "tracking joined to plays");
    rows
}

/// Joined rows for a tracking query. Already-loaded tracking or plays can be
/// handed in to skip re-reading them; the result is the same either way.
pub fn tracking_and_plays(
    ds: &Dataset,
    query: &TrackingQuery,
    tracking: Option<Vec<TrackingSample>>,
    plays: Option<&[Play]>,
) -> Result<Vec<MergedRow>> {
    let tracking = match tracking {
        Some(t) => t,
        None => ds.tracking(query)?,
    };
    let plays = plays.unwrap_or(&ds.plays);
    Ok(join(tracking, plays, &ds.games))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::data_cleaners::play_down_dist;
    use crate::models::{PlayDirection, TeamRole};

    fn game() -> Game {
        Game {
            game_id: 1,
            game_date: NaiveDate::from_ymd_opt(2018, 9, 6).unwrap(),
            kickoff_time: None,
            home: "CHI".into(),
            away: "GB".into(),
            week: 1,
        }
    }

    fn play(possession: &str) -> Play {
        let mut p = Play {
            game_id: 1,
            play_id: 10,
            play_description: String::new(),
            quarter: 1,
            down: 2,
            yds_to_go: 7,
            possession_team: possession.into(),
            play_type: None,
            yardline_side: Some("CHI".into()),
            yardline_number: Some(35),
            offense_formation: None,
            personnel_offense: None,
            defenders_in_box: None,
            n_pass_rushers: None,
            personnel_defense: None,
            type_dropback: None,
            presnap_away_score: None,
            presnap_home_score: None,
            game_clock: "10:00".into(),
            absolute_yard_line: Some(45.0),
            penalty_code: None,
            penalty_player: None,
            pass_result: None,
            offensive_play_result: None,
            play_result: None,
            epa: None,
            is_defensive_pi: None,
            down_dist_summary: String::new(),
        };
        p.down_dist_summary = play_down_dist(&p);
        p
    }

    fn sample(play_id: u64, frame_id: u32) -> TrackingSample {
        TrackingSample {
            time: String::new(),
            x: 45.0,
            y: 26.0,
            speed: 0.0,
            acceleration: 0.0,
            distance: 0.0,
            orientation: None,
            direction: None,
            event: None,
            player_id: None,
            player_name: "Football".into(),
            jersey_number: None,
            position: None,
            frame_id,
            team: TeamRole::Football,
            game_id: 1,
            play_id,
            play_direction: PlayDirection::Right,
            route: None,
        }
    }

    #[test]
    fn defense_is_the_other_club() {
        assert_eq!(PlayContext::new(play("CHI"), &game()).defensive_team, "GB");
        assert_eq!(PlayContext::new(play("GB"), &game()).defensive_team, "CHI");
    }

    #[test]
    fn join_drops_orphans_and_shares_context() {
        let rows = join(
            vec![sample(10, 1), sample(99, 1), sample(10, 2)],
            &[play("CHI")],
            &[game()],
        );
        assert_eq!(rows.len(), 2);
        assert!(Arc::ptr_eq(&rows[0].context, &rows[1].context));
        assert_eq!(rows[1].sample.frame_id, 2);
        assert_eq!(rows[0].context.offensive_team, "CHI");
    }
}
