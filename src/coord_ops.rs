use serde::Serialize;

pub const FEET_PER_YARD: f64 = 3.0;
pub const DEFAULT_X_TRANSLATION: f64 = 60.0;
pub const DEFAULT_Y_TRANSLATION: f64 = 80.0 / 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Feet,
    Yards,
}

/// Origin of a field coordinate frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Center,
    LowerLeft,
}

/// Offset applied after the unit change, expressed in the target unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Translation {
    pub x: f64,
    pub y: f64,
}

impl Translation {
    pub const NONE: Self = Self { x: 0.0, y: 0.0 };

    pub fn negated(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
        }
    }

    /// Translation that takes the feet/center field frame to the
    /// yards/lower-left plotting frame.
    pub fn field_lower_left() -> Self {
        Self {
            x: DEFAULT_X_TRANSLATION,
            y: DEFAULT_Y_TRANSLATION,
        }
    }
}

impl Default for Translation {
    fn default() -> Self {
        Self::field_lower_left()
    }
}

pub fn convert_point(p: Point, from: Unit, translation: Option<Translation>) -> Point {
    let scaled = match from {
        Unit::Feet => Point::new(p.x / FEET_PER_YARD, p.y / FEET_PER_YARD),
        Unit::Yards => Point::new(p.x * FEET_PER_YARD, p.y * FEET_PER_YARD),
    };
    match translation {
        Some(t) => Point::new(scaled.x + t.x, scaled.y + t.y),
        None => scaled,
    }
}

/// Converts every point out of `from` into the other unit, then applies the
/// optional translation.
pub fn convert_trans(points: &mut [Point], from: Unit, translation: Option<Translation>) {
    for p in points.iter_mut() {
        *p = convert_point(*p, from, translation);
    }
}

/// Inverse of `convert_trans(.., Feet, Some(t))`: removes the translation in
/// yards and scales back to feet.
pub fn to_feet(points: &mut [Point], translation: Translation) {
    for p in points.iter_mut() {
        let untranslated = Point::new(p.x - translation.x, p.y - translation.y);
        *p = convert_point(untranslated, Unit::Yards, None);
    }
}

pub fn to_yards(points: &mut [Point], translation: Translation) {
    convert_trans(points, Unit::Feet, Some(translation));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn field_center_maps_to_midfield_lower_left() {
        let mut pts = vec![Point::new(0.0, 0.0), Point::new(-180.0, -80.0)];
        to_yards(&mut pts, Translation::default());
        assert!(close(pts[0], Point::new(60.0, 80.0 / 3.0)));
        assert!(close(pts[1], Point::new(0.0, 0.0)));
    }

    #[test]
    fn feet_yards_feet_round_trip() {
        let original = vec![
            Point::new(-186.0, 86.0),
            Point::new(12.25, -3.5),
            Point::new(150.0 + 2.0 / 12.0, 0.1),
        ];
        let t = Translation::default();
        let mut pts = original.clone();
        to_yards(&mut pts, t);
        to_feet(&mut pts, t);
        for (a, b) in pts.iter().zip(&original) {
            assert!(close(*a, *b));
        }
    }

    #[test]
    fn yards_feet_yards_round_trip_with_negated_translation() {
        let original = vec![Point::new(10.0, 53.3), Point::new(119.9, 0.0)];
        let t = Translation::default();
        let mut pts = original.clone();
        // yards -> feet, shifting the origin back to field center
        for p in pts.iter_mut() {
            *p = Point::new(p.x + t.negated().x, p.y + t.negated().y);
        }
        convert_trans(&mut pts, Unit::Yards, None);
        convert_trans(&mut pts, Unit::Feet, Some(t));
        for (a, b) in pts.iter().zip(&original) {
            assert!(close(*a, *b));
        }
    }

    #[test]
    fn no_translation_only_scales() {
        let p = convert_point(Point::new(9.0, -3.0), Unit::Feet, None);
        assert!(close(p, Point::new(3.0, -1.0)));
        let q = convert_point(p, Unit::Yards, None);
        assert!(close(q, Point::new(9.0, -3.0)));
    }
}
