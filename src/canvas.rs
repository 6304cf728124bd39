//! Raster canvas addressed in field yards.
//!
//! World coordinates are yards with the lower-left origin used by tracking
//! data; image rows grow downward, so y is flipped on the way to pixels.

use anyhow::{Result, anyhow};
use image::{Rgba, RgbaImage};

use crate::coord_ops::Point;
use crate::glyphs::{self, GLYPH_ADVANCE, GLYPH_HEIGHT};

pub const X_MIN: f64 = -2.0;
pub const X_MAX: f64 = 122.0;
pub const Y_MIN: f64 = -2.0;
pub const Y_MAX: f64 = 160.0 / 3.0 + 2.0;

pub type Color = Rgba<u8>;

pub const WHITE: Color = Rgba([255, 255, 255, 255]);
pub const BLACK: Color = Rgba([0, 0, 0, 255]);

/// `#rrggbb` (or `rrggbb`) to an opaque colour.
pub fn hex_color(hex: &str) -> Result<Color> {
    let digits = hex.trim().trim_start_matches('#');
    if digits.len() != 6 || !digits.is_ascii() {
        return Err(anyhow!("{hex:?} is not a #rrggbb colour"));
    }
    let channel = |i: usize| {
        u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| anyhow!("{hex:?} is not a #rrggbb colour"))
    };
    Ok(Rgba([channel(0)?, channel(2)?, channel(4)?, 255]))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    /// Anchor is the left end of the baseline before rotation.
    BaselineStart,
    Center,
}

#[derive(Debug, Clone, Copy)]
pub struct TextStyle {
    /// Glyph height in yards.
    pub height: f64,
    /// Degrees counter-clockwise about the anchor.
    pub rotation: f64,
    pub placement: TextAnchor,
    pub fill: Color,
    pub outline: Option<Color>,
}

#[derive(Debug, Clone)]
pub struct Canvas {
    img: RgbaImage,
    ppy: f64,
}

impl Canvas {
    pub fn new(pixels_per_yard: u32, background: Color) -> Self {
        let ppy = f64::from(pixels_per_yard.max(1));
        let w = ((X_MAX - X_MIN) * ppy).round() as u32;
        let h = ((Y_MAX - Y_MIN) * ppy).round() as u32;
        Self {
            img: RgbaImage::from_pixel(w, h, background),
            ppy,
        }
    }

    pub fn width(&self) -> u32 {
        self.img.width()
    }

    pub fn height(&self) -> u32 {
        self.img.height()
    }

    pub fn pixels_per_yard(&self) -> f64 {
        self.ppy
    }

    pub fn image(&self) -> &RgbaImage {
        &self.img
    }

    /// Continuous pixel position of a world point.
    pub fn to_px(&self, p: Point) -> (f64, f64) {
        ((p.x - X_MIN) * self.ppy, (Y_MAX - p.y) * self.ppy)
    }

    pub fn pixel(&self, p: Point) -> Option<Color> {
        let (x, y) = self.to_px(p);
        if x < 0.0 || y < 0.0 {
            return None;
        }
        self.img.get_pixel_checked(x as u32, y as u32).copied()
    }

    fn put(&mut self, x: i64, y: i64, color: Color) {
        if x < 0 || y < 0 || x >= i64::from(self.img.width()) || y >= i64::from(self.img.height()) {
            return;
        }
        self.img.put_pixel(x as u32, y as u32, color);
    }

    fn fill_px_rect(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, color: Color) {
        for y in y0..y1 {
            for x in x0..x1 {
                self.put(x, y, color);
            }
        }
    }

    /// Fills a closed polygon (even-odd rule). Shapes thinner than a pixel
    /// are widened to one so that field lines never vanish.
    pub fn fill_polygon(&mut self, points: &[Point], color: Color) {
        if points.len() < 3 {
            return;
        }
        let px: Vec<(f64, f64)> = points.iter().map(|p| self.to_px(*p)).collect();
        let (mut min_x, mut max_x) = (f64::MAX, f64::MIN);
        let (mut min_y, mut max_y) = (f64::MAX, f64::MIN);
        for &(x, y) in &px {
            min_x = min_x.min(x);
            max_x = max_x.max(x);
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }
        if max_x - min_x < 1.5 || max_y - min_y < 1.5 {
            let x0 = min_x.floor() as i64;
            let y0 = min_y.floor() as i64;
            let x1 = (max_x.ceil() as i64).max(x0 + 1);
            let y1 = (max_y.ceil() as i64).max(y0 + 1);
            self.fill_px_rect(x0, y0, x1, y1, color);
            return;
        }

        let mut crossings = Vec::new();
        for row in min_y.floor() as i64..=max_y.ceil() as i64 {
            let yc = row as f64 + 0.5;
            crossings.clear();
            for i in 0..px.len() {
                let (x0, y0) = px[i];
                let (x1, y1) = px[(i + 1) % px.len()];
                if (y0 <= yc && yc < y1) || (y1 <= yc && yc < y0) {
                    crossings.push(x0 + (yc - y0) / (y1 - y0) * (x1 - x0));
                }
            }
            crossings.sort_by(f64::total_cmp);
            for pair in crossings.chunks_exact(2) {
                let start = (pair[0] - 0.5).ceil() as i64;
                let end = (pair[1] - 0.5).floor() as i64;
                for x in start..=end {
                    self.put(x, row, color);
                }
            }
        }
    }

    pub fn fill_rect(&mut self, x0: f64, x1: f64, y0: f64, y1: f64, color: Color) {
        self.fill_polygon(
            &[
                Point::new(x0, y0),
                Point::new(x1, y0),
                Point::new(x1, y1),
                Point::new(x0, y1),
            ],
            color,
        );
    }

    /// Disc of `radius` yards with an optional ring `ring_px` pixels wide.
    pub fn disc(&mut self, center: Point, radius: f64, fill: Color, ring: Option<(Color, f64)>) {
        let (cx, cy) = self.to_px(center);
        let r = (radius * self.ppy).max(1.0);
        let ring_w = ring.map_or(0.0, |(_, w)| w);
        for y in (cy - r).floor() as i64..=(cy + r).ceil() as i64 {
            for x in (cx - r).floor() as i64..=(cx + r).ceil() as i64 {
                let dx = x as f64 + 0.5 - cx;
                let dy = y as f64 + 0.5 - cy;
                let d = (dx * dx + dy * dy).sqrt();
                if d > r {
                    continue;
                }
                match ring {
                    Some((ring_color, _)) if d > r - ring_w => self.put(x, y, ring_color),
                    _ => self.put(x, y, fill),
                }
            }
        }
    }

    /// Bresenham line stamped with a square brush.
    pub fn line(&mut self, from: Point, to: Point, color: Color, thickness: u32) {
        let (fx, fy) = self.to_px(from);
        let (tx, ty) = self.to_px(to);
        let (mut x0, mut y0) = (fx.floor() as i64, fy.floor() as i64);
        let (x1, y1) = (tx.floor() as i64, ty.floor() as i64);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let t = i64::from(thickness.max(1));
        let half = t / 2;
        loop {
            self.fill_px_rect(x0 - half, y0 - half, x0 - half + t, y0 - half + t, color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    /// Arrow from `from`, `length` yards long, pointing at `angle` radians
    /// (counter-clockwise from +x).
    pub fn arrow(&mut self, from: Point, angle: f64, length: f64, color: Color, thickness: u32) {
        let tip = Point::new(from.x + length * angle.cos(), from.y + length * angle.sin());
        self.line(from, tip, color, thickness);
        let head = (length * 0.3).min(1.0);
        for side in [-1.0, 1.0] {
            let a = angle + std::f64::consts::PI + side * 0.5;
            let end = Point::new(tip.x + head * a.cos(), tip.y + head * a.sin());
            self.line(tip, end, color, thickness);
        }
    }

    pub fn text(&mut self, anchor: Point, text: &str, style: &TextStyle) {
        let height = style.height;
        let cell = height / GLYPH_HEIGHT as f64;
        let width_cells = glyphs::text_width(text) as f64;
        let (origin_u, origin_v) = match style.placement {
            TextAnchor::BaselineStart => (0.0, 0.0),
            TextAnchor::Center => (-width_cells * cell / 2.0, -height / 2.0),
        };
        let (sin, cos) = style.rotation.to_radians().sin_cos();
        let cell_px = (cell * self.ppy).max(1.0);

        let mut centers = Vec::new();
        for (i, c) in text.chars().enumerate() {
            let advance = (i * GLYPH_ADVANCE) as f64;
            for (col, row) in glyphs::cells(c) {
                let u = origin_u + (advance + col as f64 + 0.5) * cell;
                let v = origin_v + (GLYPH_HEIGHT as f64 - row as f64 - 0.5) * cell;
                let world = Point::new(anchor.x + u * cos - v * sin, anchor.y + u * sin + v * cos);
                centers.push(self.to_px(world));
            }
        }

        let stamp = |canvas: &mut Self, grow: f64, color: Color| {
            let half = cell_px / 2.0 + grow;
            for &(x, y) in &centers {
                let x0 = (x - half).round() as i64;
                let y0 = (y - half).round() as i64;
                let x1 = ((x + half).round() as i64).max(x0 + 1);
                let y1 = ((y + half).round() as i64).max(y0 + 1);
                canvas.fill_px_rect(x0, y0, x1, y1, color);
            }
        };
        if let Some(edge) = style.outline {
            stamp(self, 1.0, edge);
        }
        stamp(self, 0.0, style.fill);
    }

    /// Alpha-blends `overlay` into the world rectangle `[x0, x1] × [y0, y1]`.
    pub fn blend_image(&mut self, overlay: &RgbaImage, x0: f64, x1: f64, y0: f64, y1: f64) {
        let (left, top) = self.to_px(Point::new(x0, y1));
        let (right, bottom) = self.to_px(Point::new(x1, y0));
        let w = (right - left).round().max(1.0) as u32;
        let h = (bottom - top).round().max(1.0) as u32;
        let scaled = image::imageops::resize(overlay, w, h, image::imageops::FilterType::Triangle);
        let (left, top) = (left.round() as i64, top.round() as i64);
        for (x, y, src) in scaled.enumerate_pixels() {
            let (px, py) = (left + i64::from(x), top + i64::from(y));
            if px < 0 || py < 0 {
                continue;
            }
            let Some(dst) = self.img.get_pixel_mut_checked(px as u32, py as u32) else {
                continue;
            };
            let a = f64::from(src[3]) / 255.0;
            for c in 0..3 {
                dst[c] = (f64::from(src[c]) * a + f64::from(dst[c]) * (1.0 - a)).round() as u8;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors_parse_with_or_without_hash() {
        assert_eq!(hex_color("#196f0c").unwrap(), Rgba([0x19, 0x6f, 0x0c, 255]));
        assert_eq!(hex_color("ffffff").unwrap(), WHITE);
        assert!(hex_color("#fff").is_err());
        assert!(hex_color("#gg0000").is_err());
    }

    #[test]
    fn world_corners_map_to_image_corners() {
        let c = Canvas::new(10, BLACK);
        assert_eq!(c.width(), 1240);
        assert_eq!(c.to_px(Point::new(X_MIN, Y_MAX)), (0.0, 0.0));
        let (x, y) = c.to_px(Point::new(X_MAX, Y_MIN));
        assert!((x - 1240.0).abs() < 1e-9 && (y - f64::from(c.height())).abs() < 1.0);
    }

    #[test]
    fn thin_polygons_still_paint() {
        let mut c = Canvas::new(10, BLACK);
        c.fill_rect(50.0, 50.02, 0.0, 53.0, WHITE);
        assert_eq!(c.pixel(Point::new(50.01, 20.0)), Some(WHITE));
        c.fill_rect(10.0, 20.0, 10.0, 20.0, WHITE);
        assert_eq!(c.pixel(Point::new(15.0, 15.0)), Some(WHITE));
        assert_eq!(c.pixel(Point::new(25.0, 15.0)), Some(BLACK));
    }

    #[test]
    fn rotated_text_turns_with_the_anchor() {
        let style = TextStyle {
            height: 7.0,
            rotation: 90.0,
            placement: TextAnchor::BaselineStart,
            fill: WHITE,
            outline: None,
        };
        let mut c = Canvas::new(10, BLACK);
        // "1" has a full-height stem in its middle column; turned a quarter
        // it lies along -x from the anchor.
        c.text(Point::new(60.0, 20.0), "1", &style);
        assert_eq!(c.pixel(Point::new(57.0, 22.5)), Some(WHITE));
        assert_eq!(c.pixel(Point::new(63.0, 22.5)), Some(BLACK));
    }

    #[test]
    fn discs_have_rings() {
        let mut c = Canvas::new(10, BLACK);
        let red = Rgba([255, 0, 0, 255]);
        c.disc(Point::new(30.0, 30.0), 1.0, WHITE, Some((red, 2.0)));
        assert_eq!(c.pixel(Point::new(30.0, 30.0)), Some(WHITE));
        assert_eq!(c.pixel(Point::new(30.95, 30.0)), Some(red));
    }
}
