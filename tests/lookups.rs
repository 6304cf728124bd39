use std::io::Cursor;
use std::path::PathBuf;

use bdb_tracking::data_mergers;
use bdb_tracking::dataset::Dataset;
use bdb_tracking::error::DataError;
use bdb_tracking::input_checkers::{self, Checked, Rejection};
use bdb_tracking::lookup::{self, GameMatch, PlayFilter, PlayResolution};
use bdb_tracking::models::{PlayDirection, PlayKey, TrackingSample};
use bdb_tracking::prompt::Prompter;
use bdb_tracking::settings::Settings;

fn fixture_dataset() -> Dataset {
    let mut dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    dir.push("tests");
    dir.push("fixtures");
    dir.push("bdb");
    Dataset::load(&Settings::new(dir, std::env::temp_dir())).expect("fixture dataset should load")
}

fn tracking(ds: &Dataset, key: PlayKey) -> Vec<TrackingSample> {
    let week = lookup::game_week(ds, key.game_id).unwrap();
    ds.play_tracking(week, key.game_id, key.play_id).unwrap()
}

fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
    Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
}

#[test]
fn game_lookups_are_single_valued() {
    let ds = fixture_dataset();
    assert_eq!(lookup::game_teams(&ds, 1).unwrap(), ("CHI".to_string(), "GB".to_string()));
    assert_eq!(lookup::game_week(&ds, 3).unwrap(), 2);
    assert!(matches!(lookup::game_week(&ds, 99), Err(DataError::UnknownGame(99))));
}

#[test]
fn game_id_tries_the_reversed_pairing() {
    let ds = fixture_dataset();
    assert_eq!(lookup::game_id(&ds, "CHI", "GB"), GameMatch::Hosted(1));
    assert_eq!(lookup::game_id(&ds, "gb", "chi"), GameMatch::Reversed(1));
    assert_eq!(lookup::game_id(&ds, "CHI", "MIN"), GameMatch::NotPlayed);
}

#[test]
fn first_down_line_follows_play_direction() {
    let ds = fixture_dataset();

    let right = PlayKey::new(1, 10);
    let t = tracking(&ds, right);
    assert_eq!(lookup::play_direction(&t, right), Some(PlayDirection::Right));
    let los = lookup::line_of_scrimmage(&ds, right).unwrap().unwrap();
    let ytg = lookup::yards_to_go(&ds, right).unwrap();
    assert_eq!(lookup::first_down_line(&ds, right, &t).unwrap(), Some(los + f64::from(ytg)));

    let left = PlayKey::new(1, 20);
    let t = tracking(&ds, left);
    assert_eq!(lookup::first_down_line(&ds, left, &t).unwrap(), Some(90.0 - 4.0));
}

#[test]
fn first_down_line_needs_tracking() {
    let ds = fixture_dataset();
    let key = PlayKey::new(1, 30);
    let t = tracking(&ds, key);
    assert!(t.is_empty());
    assert!(matches!(
        lookup::first_down_line(&ds, key, &t),
        Err(DataError::NoTracking { game_id: 1, play_id: 30 })
    ));
}

#[test]
fn n_frames_is_the_highest_frame_not_a_count() {
    let ds = fixture_dataset();
    let key = PlayKey::new(1, 10);
    let t = tracking(&ds, key);
    assert_eq!(lookup::n_frames(&t, key).unwrap(), 4);
    assert!(lookup::n_frames(&t, PlayKey::new(1, 30)).is_err());
}

#[test]
fn filters_narrow_plays_and_skip_unknown_columns() {
    let ds = fixture_dataset();
    let search = lookup::play_id(&ds, 1, &[PlayFilter::new("down", ["3"])]).unwrap();
    assert_eq!(
        search.resolution,
        PlayResolution::Ambiguous(vec![PlayKey::new(1, 20), PlayKey::new(1, 30)])
    );

    let filters = [
        PlayFilter::new("down", ["3"]),
        PlayFilter::new("possession_team", ["CHI"]),
        PlayFilter::new("stadium", ["Soldier Field"]),
    ];
    let search = lookup::play_id(&ds, 1, &filters).unwrap();
    assert_eq!(search.resolution, PlayResolution::Unique(PlayKey::new(1, 30)));
    assert_eq!(search.ignored, vec!["stadium".to_string()]);

    let search = lookup::play_id(&ds, 1, &[PlayFilter::new("pass_result", ["IN", "I"])]).unwrap();
    assert_eq!(
        search.resolution,
        PlayResolution::Ambiguous(vec![PlayKey::new(1, 20), PlayKey::new(1, 40)])
    );

    let search = lookup::play_id(&ds, 1, &[PlayFilter::new("quarter", ["4"])]).unwrap();
    assert_eq!(search.resolution, PlayResolution::NoMatch);
}

#[test]
fn unknown_yardline_does_not_match_midfield() {
    let ds = fixture_dataset();
    let search = lookup::play_id(&ds, 2, &[PlayFilter::new("yardline_number", ["50"])]).unwrap();
    assert_eq!(search.resolution, PlayResolution::NoMatch);
    let search = lookup::play_id(&ds, 1, &[PlayFilter::new("yardline_number", ["50"])]).unwrap();
    assert_eq!(search.resolution, PlayResolution::Unique(PlayKey::new(1, 40)));
}

#[test]
fn checkers_explain_rejections() {
    let ds = fixture_dataset();
    assert_eq!(input_checkers::team_code(&ds, "chi"), Checked::Valid("CHI".to_string()));
    assert!(input_checkers::team_code(&ds, "nfc").is_valid());
    match input_checkers::team_code(&ds, "XYZ") {
        Checked::Invalid(Rejection::UnknownTeam { options, .. }) => {
            assert!(options.contains(&"GB".to_string()));
            assert!(options.contains(&"AFC".to_string()));
        }
        other => panic!("unexpected {other:?}"),
    }

    assert_eq!(input_checkers::week_number(17), Checked::Valid(17));
    assert!(!input_checkers::week_number(0).is_valid());
    assert!(!input_checkers::week_number(18).is_valid());

    match input_checkers::play_id(&ds, 1, 11) {
        Checked::Invalid(Rejection::UnknownPlay { options, .. }) => {
            assert_eq!(options.len(), 4);
            assert_eq!(options[0].to_string(), "10 -- Q1 - 10:00 - CHI - 2nd & 7 from CHI 35");
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(matches!(
        input_checkers::play_id(&ds, 77, 10),
        Checked::Invalid(Rejection::UnknownGame { given: 77, .. })
    ));
}

#[test]
fn frame_check_reports_the_observed_range() {
    let ds = fixture_dataset();
    let key = PlayKey::new(1, 10);
    let t = tracking(&ds, key);
    assert_eq!(input_checkers::frame_no(&ds, key, 4, &t), Checked::Valid(4));
    let rejection = input_checkers::frame_no(&ds, key, 9, &t);
    assert_eq!(
        rejection,
        Checked::Invalid(Rejection::FrameOutOfRange { given: 9, min: 1, max: 4 })
    );
    if let Checked::Invalid(r) = rejection {
        assert!(r.to_string().ends_with("between 1 and 4"));
    }
}

#[test]
fn prompter_asks_until_the_team_is_known() {
    let ds = fixture_dataset();
    let mut p = prompter("XYZ\ngb\n");
    assert_eq!(p.team_code(&ds, "zzz").unwrap(), "GB");
    let out = String::from_utf8(p.into_output()).unwrap();
    assert_eq!(out.matches("is not a valid team").count(), 2);
}

#[test]
fn prompter_offers_games_by_week() {
    let ds = fixture_dataset();
    let mut p = prompter("y\n2\n3\n");
    assert_eq!(p.game_id(&ds, 404).unwrap(), 3);
    let out = String::from_utf8(p.into_output()).unwrap();
    assert!(out.contains("3 -- MIN @ GB"));
    assert!(!out.contains("1 -- GB @ CHI"));
}

#[test]
fn prompter_re_enters_teams_that_never_met() {
    let ds = fixture_dataset();
    let mut p = prompter("ATL\nPHI\n");
    assert_eq!(p.game_from_teams(&ds, "CHI", "MIN").unwrap(), 2);
}

#[test]
fn prompter_disambiguates_with_more_filters() {
    let ds = fixture_dataset();
    let mut p = prompter("possession_team=GB\n");
    let key = p.resolve_play(&ds, 1, &[PlayFilter::new("down", ["3"])]).unwrap();
    assert_eq!(key, PlayKey::new(1, 20));

    let mut p = prompter("30\n");
    let key = p.resolve_play(&ds, 1, &[PlayFilter::new("down", ["3"])]).unwrap();
    assert_eq!(key, PlayKey::new(1, 30));
}

#[test]
fn closed_input_ends_the_prompt() {
    let ds = fixture_dataset();
    let mut p = prompter("");
    let err = p.game_id(&ds, 404).unwrap_err();
    assert!(matches!(err.downcast_ref::<DataError>(), Some(DataError::InputClosed)));
}

#[test]
fn non_interactive_prompter_fails_fast() {
    let ds = fixture_dataset();
    let mut p = Prompter::non_interactive(Cursor::new(b"1\n".to_vec()), Vec::new());
    let err = p.play_id(&ds, 1, 11).unwrap_err();
    assert!(err.to_string().contains("11 is not a valid play ID for game 1"));
}

#[test]
fn merge_labels_offense_and_defense() {
    let ds = fixture_dataset();
    let key = PlayKey::new(1, 20);
    let rows = data_mergers::tracking_and_plays(
        &ds,
        &bdb_tracking::data_loaders::TrackingQuery::play(1, 1, 20),
        None,
        None,
    )
    .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].context.key(), key);
    assert_eq!(rows[0].context.offensive_team, "GB");
    assert_eq!(rows[0].context.defensive_team, "CHI");

    let preloaded = tracking(&ds, key);
    let again = data_mergers::tracking_and_plays(
        &ds,
        &bdb_tracking::data_loaders::TrackingQuery::play(1, 1, 20),
        Some(preloaded),
        Some(&ds.plays),
    )
    .unwrap();
    assert_eq!(again, rows);

    let listing = data_mergers::plays_and_games(&ds, Some(1));
    assert_eq!(listing.len(), 4);
    assert!(listing.iter().all(|c| c.home == "CHI" && c.week == 1));
}
