use std::fs::{self, File};
use std::io::BufReader;
use std::path::PathBuf;

use image::AnimationDecoder;
use image::codecs::gif::GifDecoder;

use bdb_tracking::canvas::{WHITE, hex_color};
use bdb_tracking::coord_ops::{Origin, Point, Unit};
use bdb_tracking::data_loaders::TrackingQuery;
use bdb_tracking::dataset::Dataset;
use bdb_tracking::field_coords::football_field_coords;
use bdb_tracking::models::PlayKey;
use bdb_tracking::plot_helpers::{self, FIELD_COLOR, FIRST_DOWN_COLOR, LOS_COLOR, RenderOptions};
use bdb_tracking::settings::Settings;

fn fixture_dataset(img_dir: &std::path::Path) -> Dataset {
    let mut dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    dir.push("tests");
    dir.push("fixtures");
    dir.push("bdb");
    Dataset::load(&Settings::new(dir, img_dir)).expect("fixture dataset should load")
}

#[test]
fn field_spans_end_line_to_end_line() {
    let f = football_field_coords(Unit::Yards, Origin::LowerLeft);
    let xs: Vec<f64> = f.endlines.points().map(|p| p.x).collect();
    let min = xs.iter().copied().fold(f64::MAX, f64::min);
    let max = xs.iter().copied().fold(f64::MIN, f64::max);
    assert!((min + 2.0).abs() < 1e-9);
    assert!((max - 122.0).abs() < 1e-9);
    assert_eq!(f.field_marks.len(), 36);
}

#[test]
fn frame_draws_scrimmage_and_first_down_lines() {
    let img = tempfile::tempdir().unwrap();
    let ds = fixture_dataset(img.path());
    let key = PlayKey::new(1, 10);

    let canvas = plot_helpers::render_frame(&ds, key, 1, None, RenderOptions::default()).unwrap();
    assert_eq!(canvas.pixel(Point::new(45.0, 5.0)), Some(hex_color(LOS_COLOR).unwrap()));
    assert_eq!(canvas.pixel(Point::new(52.0, 5.0)), Some(hex_color(FIRST_DOWN_COLOR).unwrap()));

    let home_base = hex_color(&ds.teams.iter().find(|t| t.team_code == "CHI").unwrap().home_uni.base).unwrap();
    assert_eq!(canvas.pixel(Point::new(40.6, 25.0)), Some(home_base));

    let options = RenderOptions {
        first_down: false,
        ..RenderOptions::default()
    };
    let canvas = plot_helpers::render_frame(&ds, key, 1, None, options).unwrap();
    assert_eq!(canvas.pixel(Point::new(52.0, 5.0)), Some(hex_color(FIELD_COLOR).unwrap()));
}

#[test]
fn preloaded_week_renders_the_same_frame() {
    let img = tempfile::tempdir().unwrap();
    let ds = fixture_dataset(img.path());
    let key = PlayKey::new(1, 10);

    let week = ds.tracking(&TrackingQuery::week(1)).unwrap();
    let from_week = plot_helpers::render_frame(&ds, key, 2, Some(week), RenderOptions::default()).unwrap();
    let from_disk = plot_helpers::render_frame(&ds, key, 2, None, RenderOptions::default()).unwrap();
    assert!(from_week.image() == from_disk.image());

    let other_play = ds.play_tracking(1, 1, 20).unwrap();
    assert!(plot_helpers::render_frame(&ds, key, 2, Some(other_play), RenderOptions::default()).is_err());
}

#[test]
fn frame_without_tracking_is_an_error() {
    let img = tempfile::tempdir().unwrap();
    let ds = fixture_dataset(img.path());
    assert!(plot_helpers::render_frame(&ds, PlayKey::new(1, 30), 1, None, RenderOptions::default()).is_err());
}

#[test]
fn gif_has_one_frame_per_observed_frame_and_cleans_up() {
    let img = tempfile::tempdir().unwrap();
    let ds = fixture_dataset(img.path());
    let key = PlayKey::new(1, 10);

    let out = plot_helpers::play_gif(&ds, key, None, None, RenderOptions::default()).unwrap();
    assert_eq!(
        out,
        img.path()
            .join("gifs")
            .join("1_CHI_GB")
            .join("Q1_-_10_00_-_CHI_-_2nd_and_7_from_CHI_35.gif")
    );
    let decoder = GifDecoder::new(BufReader::new(File::open(&out).unwrap())).unwrap();
    assert_eq!(decoder.into_frames().count(), 3);

    let temp = ds.settings.temp_dir();
    assert_eq!(fs::read_dir(temp).unwrap().count(), 0);
}

#[test]
fn gif_name_can_be_chosen() {
    let img = tempfile::tempdir().unwrap();
    let ds = fixture_dataset(img.path());
    let out = plot_helpers::play_gif(&ds, PlayKey::new(1, 20), Some("deep shot"), None, RenderOptions::default()).unwrap();
    assert!(out.ends_with("1_CHI_GB/deep_shot.gif"));
    assert!(out.exists());
}

#[test]
fn midfield_stripe_is_white() {
    let img = tempfile::tempdir().unwrap();
    let ds = fixture_dataset(img.path());
    let matchup = plot_helpers::Matchup::for_game(&ds, 1).unwrap();
    let canvas = plot_helpers::field(&ds.settings, &matchup).unwrap();
    assert_eq!(canvas.pixel(Point::new(60.0, 40.0)), Some(WHITE));
}
