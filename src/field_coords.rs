//! Regulation field markings as pure geometry.
//!
//! Everything is laid out in feet around the center of the field (x runs
//! sideline-parallel from -186 to 186 including the end lines, y from -86 to
//! 86 including the sideline borders) and only then moved into the frame the
//! caller asked for.

use serde::Serialize;

use crate::coord_ops::{self, Origin, Point, Translation, Unit};

const LINE_HALF_WIDTH: f64 = 2.0 / 12.0;
const HASH_HALF_LENGTH: f64 = 10.0 / 12.0;
const INSET: f64 = 4.0 / 12.0;

pub type Polyline = Vec<Point>;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MarkingSet {
    pub polylines: Vec<Polyline>,
}

impl MarkingSet {
    fn from_polylines(polylines: Vec<Polyline>) -> Self {
        Self { polylines }
    }

    pub fn points(&self) -> impl Iterator<Item = &Point> {
        self.polylines.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.polylines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polylines.is_empty()
    }

    fn map(&self, f: impl Fn(Point) -> Point) -> Self {
        Self {
            polylines: self
                .polylines
                .iter()
                .map(|line| line.iter().map(|p| f(*p)).collect())
                .collect(),
        }
    }

    /// This set followed by its reflection across midfield (x -> -x).
    fn with_x_mirror(self) -> Self {
        let mirrored = self.map(|p| Point::new(-p.x, p.y));
        let mut polylines = self.polylines;
        polylines.extend(mirrored.polylines);
        Self { polylines }
    }

    fn map_in_place(&mut self, f: &impl Fn(&mut [Point])) {
        for line in &mut self.polylines {
            f(line);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldLabel {
    pub position: Point,
    pub text: String,
    /// Degrees; 0 reads from the near sideline, 180 from the far one.
    pub rotation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldGeometry {
    #[serde(skip)]
    pub unit: Unit,
    #[serde(skip)]
    pub origin: Origin,
    pub sidelines: MarkingSet,
    pub endlines: MarkingSet,
    pub goal_lines: MarkingSet,
    pub midline: MarkingSet,
    pub minor_yd_lines_b: MarkingSet,
    pub minor_yd_lines_t: MarkingSet,
    pub minor_yd_lines_l: MarkingSet,
    pub minor_yd_lines_u: MarkingSet,
    pub major_yd_lines: MarkingSet,
    pub hashes_l: MarkingSet,
    pub hashes_u: MarkingSet,
    pub extra_pt_mark: MarkingSet,
    pub arrow_40_l: MarkingSet,
    pub arrow_40_u: MarkingSet,
    pub arrow_30_l: MarkingSet,
    pub arrow_30_u: MarkingSet,
    pub arrow_20_l: MarkingSet,
    pub arrow_20_u: MarkingSet,
    pub arrow_10_l: MarkingSet,
    pub arrow_10_u: MarkingSet,
    pub field_marks: Vec<FieldLabel>,
}

impl FieldGeometry {
    /// Every polygon family in draw order, paired with its name.
    pub fn marking_sets(&self) -> [(&'static str, &MarkingSet); 20] {
        [
            ("sidelines", &self.sidelines),
            ("endlines", &self.endlines),
            ("goal_lines", &self.goal_lines),
            ("midline", &self.midline),
            ("minor_yd_lines_b", &self.minor_yd_lines_b),
            ("minor_yd_lines_t", &self.minor_yd_lines_t),
            ("minor_yd_lines_l", &self.minor_yd_lines_l),
            ("minor_yd_lines_u", &self.minor_yd_lines_u),
            ("major_yd_lines", &self.major_yd_lines),
            ("hashes_l", &self.hashes_l),
            ("hashes_u", &self.hashes_u),
            ("extra_pt_mark", &self.extra_pt_mark),
            ("arrow_40_l", &self.arrow_40_l),
            ("arrow_40_u", &self.arrow_40_u),
            ("arrow_30_l", &self.arrow_30_l),
            ("arrow_30_u", &self.arrow_30_u),
            ("arrow_20_l", &self.arrow_20_l),
            ("arrow_20_u", &self.arrow_20_u),
            ("arrow_10_l", &self.arrow_10_l),
            ("arrow_10_u", &self.arrow_10_u),
        ]
    }

    fn marking_sets_mut(&mut self) -> [&mut MarkingSet; 20] {
        [
            &mut self.sidelines,
            &mut self.endlines,
            &mut self.goal_lines,
            &mut self.midline,
            &mut self.minor_yd_lines_b,
            &mut self.minor_yd_lines_t,
            &mut self.minor_yd_lines_l,
            &mut self.minor_yd_lines_u,
            &mut self.major_yd_lines,
            &mut self.hashes_l,
            &mut self.hashes_u,
            &mut self.extra_pt_mark,
            &mut self.arrow_40_l,
            &mut self.arrow_40_u,
            &mut self.arrow_30_l,
            &mut self.arrow_30_u,
            &mut self.arrow_20_l,
            &mut self.arrow_20_u,
            &mut self.arrow_10_l,
            &mut self.arrow_10_u,
        ]
    }

    fn transform(&mut self, f: impl Fn(&mut [Point])) {
        for set in self.marking_sets_mut() {
            set.map_in_place(&f);
        }
        let mut anchors: Vec<Point> = self.field_marks.iter().map(|l| l.position).collect();
        f(&mut anchors);
        for (label, p) in self.field_marks.iter_mut().zip(anchors) {
            label.position = p;
        }
    }
}

/// Builds every field marking in the requested unit and origin.
pub fn football_field_coords(unit: Unit, origin: Origin) -> FieldGeometry {
    let mut field = field_in_feet();
    match (unit, origin) {
        (Unit::Feet, Origin::Center) => {}
        (Unit::Yards, Origin::LowerLeft) => {
            field.transform(|pts| coord_ops::to_yards(pts, Translation::default()));
        }
        (Unit::Yards, Origin::Center) => {
            field.transform(|pts| coord_ops::convert_trans(pts, Unit::Feet, None));
        }
        (Unit::Feet, Origin::LowerLeft) => {
            let t = Translation::default();
            field.transform(|pts| {
                for p in pts.iter_mut() {
                    p.x += t.x * coord_ops::FEET_PER_YARD;
                    p.y += t.y * coord_ops::FEET_PER_YARD;
                }
            });
        }
    }
    field.unit = unit;
    field.origin = origin;
    field
}

fn rect(x0: f64, x1: f64, y0: f64, y1: f64) -> Polyline {
    vec![
        Point::new(x0, y0),
        Point::new(x1, y0),
        Point::new(x1, y1),
        Point::new(x0, y1),
        Point::new(x0, y0),
    ]
}

fn arrow(base: f64) -> Polyline {
    let tip = (36.0_f64.powi(2) - 36.0).sqrt() / 12.0;
    let back = -base - 6.0 / 12.0;
    vec![
        Point::new(back, -44.0),
        Point::new(back, -44.0 + 9.0 / 12.0),
        Point::new(-base - tip, -44.0),
        Point::new(back, -44.0 - 9.0 / 12.0),
        Point::new(back, -44.0),
    ]
}

fn field_in_feet() -> FieldGeometry {
    let sidelines = MarkingSet::from_polylines(vec![
        rect(-180.0, 180.0, -86.0, -80.0),
        rect(-180.0, 180.0, 80.0, 86.0),
    ]);

    let endlines = MarkingSet::from_polylines(vec![
        rect(-186.0, -180.0, -86.0, 86.0),
        rect(180.0, 186.0, -86.0, 86.0),
    ]);

    let goal_lines = MarkingSet::from_polylines(vec![
        rect(-150.0 - LINE_HALF_WIDTH, -150.0 + LINE_HALF_WIDTH, -86.0, 86.0),
        rect(150.0 - LINE_HALF_WIDTH, 150.0 + LINE_HALF_WIDTH, -86.0, 86.0),
    ]);

    let midline = MarkingSet::from_polylines(vec![rect(
        -LINE_HALF_WIDTH,
        LINE_HALF_WIDTH,
        -80.0 + INSET,
        80.0 - INSET,
    )]);

    // One tick per yard between the goal line and midfield, near the bottom
    // sideline; the other three families are reflections of this one.
    let minor_yd_lines_b = MarkingSet::from_polylines(
        (1..50)
            .map(|i| {
                let x = -3.0 * f64::from(i);
                rect(
                    x - LINE_HALF_WIDTH,
                    x + LINE_HALF_WIDTH,
                    -80.0 + INSET,
                    -78.0 + INSET,
                )
            })
            .collect(),
    )
    .with_x_mirror();
    let minor_yd_lines_t = minor_yd_lines_b.map(|p| Point::new(p.x, -p.y));
    let minor_yd_lines_l = minor_yd_lines_b.map(|p| Point::new(p.x, p.y + 58.0));
    let minor_yd_lines_u = minor_yd_lines_l.map(|p| Point::new(p.x, -p.y));

    let major_yd_lines = MarkingSet::from_polylines(
        (1..10)
            .map(|i| {
                let x = 15.0 * f64::from(i);
                rect(
                    x - LINE_HALF_WIDTH,
                    x + LINE_HALF_WIDTH,
                    -80.0 + INSET,
                    80.0 - INSET,
                )
            })
            .collect(),
    )
    .with_x_mirror();

    let hashes_l = MarkingSet::from_polylines(
        (1..10)
            .map(|i| {
                let x = -15.0 * f64::from(i);
                rect(
                    x - HASH_HALF_LENGTH,
                    x + HASH_HALF_LENGTH,
                    -20.0 + INSET,
                    -20.0 + 2.0 / 12.0,
                )
            })
            .collect(),
    )
    .with_x_mirror();
    let hashes_u = hashes_l.map(|p| Point::new(p.x, p.y + 39.5));

    let extra_pt_mark = MarkingSet::from_polylines(vec![rect(
        -141.0 - LINE_HALF_WIDTH,
        -141.0 + LINE_HALF_WIDTH,
        -1.0,
        1.0,
    )])
    .with_x_mirror();

    let arrows = |base: f64| {
        let lower = MarkingSet::from_polylines(vec![arrow(base)]).with_x_mirror();
        let upper = lower.map(|p| Point::new(p.x, p.y + 92.0));
        (lower, upper)
    };
    let (arrow_40_l, arrow_40_u) = arrows(36.5);
    let (arrow_30_l, arrow_30_u) = arrows(66.5);
    let (arrow_20_l, arrow_20_u) = arrows(96.5);
    let (arrow_10_l, arrow_10_u) = arrows(126.5);

    FieldGeometry {
        unit: Unit::Feet,
        origin: Origin::Center,
        sidelines,
        endlines,
        goal_lines,
        midline,
        minor_yd_lines_b,
        minor_yd_lines_t,
        minor_yd_lines_l,
        minor_yd_lines_u,
        major_yd_lines,
        hashes_l,
        hashes_u,
        extra_pt_mark,
        arrow_40_l,
        arrow_40_u,
        arrow_30_l,
        arrow_30_u,
        arrow_20_l,
        arrow_20_u,
        arrow_10_l,
        arrow_10_u,
        field_marks: field_numbers(),
    }
}

/// Yardage numbers, one glyph per label: the tens digit and its trailing
/// zero are separate labels, both read upright from the near sideline and
/// upside down from the far one.
fn field_numbers() -> Vec<FieldLabel> {
    let mut labels = Vec::with_capacity(36);
    let mut push_number = |offset: f64, tens: u32| {
        let digit = tens.to_string();
        labels.push(label(-6.5 + offset, -46.0, &digit, 0.0));
        labels.push(label(0.25 + offset, 46.0, &digit, 180.0));
        labels.push(label(1.25 + offset, -46.0, "0", 0.0));
        labels.push(label(-6.75 + offset, 46.0, "0", 180.0));
    };
    for k in 0..5u32 {
        push_number(-30.0 * f64::from(k), 5 - k);
    }
    for j in 1..5u32 {
        push_number(30.0 * f64::from(j), 5 - j);
    }
    labels
}

fn label(x: f64, y: f64, text: &str, rotation: f64) -> FieldLabel {
    FieldLabel {
        position: Point::new(x, y),
        text: text.to_string(),
        rotation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn ys(set: &MarkingSet) -> Vec<f64> {
        set.points().map(|p| p.y).collect()
    }

    fn xs(set: &MarkingSet) -> Vec<f64> {
        set.points().map(|p| p.x).collect()
    }

    #[test]
    fn minor_lines_reflect_about_center_in_feet() {
        let f = football_field_coords(Unit::Feet, Origin::Center);
        assert_eq!(f.minor_yd_lines_b.len(), 98);
        for (t, b) in ys(&f.minor_yd_lines_t).iter().zip(ys(&f.minor_yd_lines_b)) {
            assert!((t + b).abs() < EPS);
        }
        for (u, l) in ys(&f.minor_yd_lines_u).iter().zip(ys(&f.minor_yd_lines_l)) {
            assert!((u + l).abs() < EPS);
        }
        assert_eq!(xs(&f.minor_yd_lines_t), xs(&f.minor_yd_lines_b));
    }

    #[test]
    fn minor_lines_reflect_about_offset_in_yards() {
        let f = football_field_coords(Unit::Yards, Origin::LowerLeft);
        let offset = 80.0 / 3.0;
        for (u, l) in ys(&f.minor_yd_lines_u).iter().zip(ys(&f.minor_yd_lines_l)) {
            assert!((u - (2.0 * offset - l)).abs() < 1e-9);
        }
        for (t, b) in ys(&f.minor_yd_lines_t).iter().zip(ys(&f.minor_yd_lines_b)) {
            assert!((t - (2.0 * offset - b)).abs() < 1e-9);
        }
    }

    #[test]
    fn mirrored_families_are_symmetric_left_right() {
        let f = football_field_coords(Unit::Feet, Origin::Center);
        for set in [&f.major_yd_lines, &f.hashes_l, &f.extra_pt_mark, &f.arrow_20_l] {
            let half = set.len() / 2;
            for (a, b) in set.polylines[..half].iter().zip(&set.polylines[half..]) {
                for (p, q) in a.iter().zip(b) {
                    assert!((p.x + q.x).abs() < EPS);
                    assert!((p.y - q.y).abs() < EPS);
                }
            }
        }
    }

    #[test]
    fn every_polygon_is_closed() {
        let f = football_field_coords(Unit::Yards, Origin::LowerLeft);
        for (name, set) in f.marking_sets() {
            assert!(!set.is_empty(), "{name} is empty");
            for line in &set.polylines {
                assert_eq!(line.first(), line.last(), "{name} not closed");
            }
        }
    }

    #[test]
    fn lower_left_frame_spans_the_field() {
        let f = football_field_coords(Unit::Yards, Origin::LowerLeft);
        let (mut min_x, mut max_x) = (f64::MAX, f64::MIN);
        for p in f.endlines.points() {
            min_x = min_x.min(p.x);
            max_x = max_x.max(p.x);
        }
        assert!((min_x + 2.0).abs() < EPS);
        assert!((max_x - 122.0).abs() < EPS);
        let goal: Vec<f64> = xs(&f.goal_lines);
        assert!(goal.iter().any(|x| (x - (10.0 - 1.0 / 18.0)).abs() < EPS));
    }

    #[test]
    fn numbers_spell_the_nfl_pattern() {
        let f = football_field_coords(Unit::Feet, Origin::Center);
        assert_eq!(f.field_marks.len(), 36);
        let near: String = f
            .field_marks
            .iter()
            .filter(|l| l.rotation == 0.0)
            .map(|l| l.text.as_str())
            .collect();
        assert_eq!(near, "504030201040302010");
        assert!(
            f.field_marks
                .iter()
                .all(|l| (l.rotation == 0.0 && l.position.y < 0.0)
                    || (l.rotation == 180.0 && l.position.y > 0.0))
        );
    }

    #[test]
    fn yards_center_only_scales() {
        let feet = football_field_coords(Unit::Feet, Origin::Center);
        let yards = football_field_coords(Unit::Yards, Origin::Center);
        for (a, b) in feet.sidelines.points().zip(yards.sidelines.points()) {
            assert!((a.x / 3.0 - b.x).abs() < EPS);
            assert!((a.y / 3.0 - b.y).abs() < EPS);
        }
    }
}
