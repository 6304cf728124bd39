use std::path::PathBuf;

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use bdb_tracking::canvas::{Canvas, WHITE};
use bdb_tracking::coord_ops::{Origin, Unit};
use bdb_tracking::data_loaders::{self, TrackingQuery};
use bdb_tracking::field_coords::football_field_coords;
use bdb_tracking::plot_helpers::{self, Lines, Matchup, RenderOptions};
use bdb_tracking::settings::Settings;
use bdb_tracking::teams;

fn fixture_dir() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push("bdb");
    path
}

fn bench_field_geometry(c: &mut Criterion) {
    c.bench_function("field_geometry_yards", |b| {
        b.iter(|| {
            let f = football_field_coords(black_box(Unit::Yards), black_box(Origin::LowerLeft));
            black_box(f.field_marks.len());
        })
    });
}

fn bench_field_raster(c: &mut Criterion) {
    let geometry = plot_helpers::field_geometry();
    c.bench_function("field_markings_raster", |b| {
        b.iter(|| {
            let mut canvas = Canvas::new(10, WHITE);
            for (_, set) in geometry.marking_sets() {
                for polygon in &set.polylines {
                    canvas.fill_polygon(polygon, WHITE);
                }
            }
            black_box(canvas.width());
        })
    });
}

fn bench_frame_render(c: &mut Criterion) {
    let dir = tempfile::tempdir().expect("temp dir");
    let settings = Settings::new(fixture_dir(), dir.path());
    let matchup = Matchup::resolve(&teams::builtin_teams(), "CHI", Some("GB")).expect("matchup");
    let base = plot_helpers::field(&settings, &matchup).expect("field");
    let samples = data_loaders::tracking_data(&fixture_dir(), &TrackingQuery::play(1, 1, 10)).expect("tracking");
    let lines = Lines {
        line_of_scrimmage: Some(45.0),
        first_down: Some(52.0),
    };
    c.bench_function("play_frame_render", |b| {
        b.iter(|| {
            let frame = plot_helpers::play_frame(
                &base,
                &matchup,
                samples.iter().filter(|s| s.frame_id == 1),
                lines,
                RenderOptions::default(),
            )
            .unwrap();
            black_box(frame.height());
        })
    });
}

fn bench_tracking_parse(c: &mut Criterion) {
    let dir = fixture_dir();
    c.bench_function("tracking_week_parse", |b| {
        b.iter(|| {
            let rows = data_loaders::tracking_data(black_box(&dir), &TrackingQuery::week(1)).unwrap();
            black_box(rows.len());
        })
    });
}

criterion_group!(
    benches,
    bench_field_geometry,
    bench_field_raster,
    bench_frame_render,
    bench_tracking_parse
);
criterion_main!(benches);
