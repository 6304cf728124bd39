use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame};
use tempfile::TempDir;
use tracing::{debug, info};

use crate::models::PlayKey;

/// Per-render scratch directory for frame PNGs. The name carries the play
/// plus a random suffix, so concurrent renders of one play do not collide.
/// Removed on drop.
pub struct FrameDir {
    key: PlayKey,
    dir: TempDir,
}

impl FrameDir {
    pub fn create(temp_root: &Path, key: PlayKey) -> Result<Self> {
        fs::create_dir_all(temp_root)
            .with_context(|| format!("create {}", temp_root.display()))?;
        let dir = tempfile::Builder::new()
            .prefix(&format!("{key}_"))
            .tempdir_in(temp_root)
            .with_context(|| format!("create frame directory under {}", temp_root.display()))?;
        debug!(path = %dir.path().display(), "frame directory created");
        Ok(Self { key, dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn frame_path(&self, frame_id: u32) -> PathBuf {
        self.dir.path().join(frame_file_name(self.key, frame_id))
    }

    /// Frame PNGs in frame order.
    pub fn frames(&self) -> Result<Vec<PathBuf>> {
        collect_frames(self.dir.path())
    }

    pub fn close(self) -> Result<()> {
        let path = self.dir.path().to_path_buf();
        self.dir
            .close()
            .with_context(|| format!("remove {}", path.display()))
    }
}

pub fn frame_file_name(key: PlayKey, frame_id: u32) -> String {
    format!("{key}_{frame_id:04}.png")
}

/// PNG files of a directory sorted by name; zero-padded frame numbers make
/// that frame order.
pub fn collect_frames(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut frames = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("read {}", dir.display()))? {
        let path = entry?.path();
        let is_png = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("png"));
        if is_png {
            frames.push(path);
        }
    }
    frames.sort();
    Ok(frames)
}

/// Replaces characters that are awkward in file names.
pub fn sanitize_file_stem(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut last_sep = false;
    for c in raw.trim().chars() {
        if c.is_ascii_alphanumeric() || c == '-' {
            out.push(c);
            last_sep = false;
        } else if c == '&' {
            out.push_str("and");
            last_sep = false;
        } else if !last_sep && !out.is_empty() {
            out.push('_');
            last_sep = true;
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    out
}

/// `{gif_root}/{game}_{home}_{away}/{name}.gif`.
pub fn gif_path(gif_root: &Path, game_id: u64, home: &str, away: &str, name: &str) -> PathBuf {
    let mut file = name.to_string();
    if !file.to_ascii_lowercase().ends_with(".gif") {
        file.push_str(".gif");
    }
    gif_root.join(format!("{game_id}_{home}_{away}")).join(file)
}

/// Encodes the frames, in the order given, into a looping GIF.
pub fn make_gif(frames: &[PathBuf], out: &Path, delay_ms: u32) -> Result<()> {
    if let Some(parent) = out.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let tmp = out.with_extension("gif.tmp");
    if let Err(err) = encode_gif(frames, &tmp, delay_ms) {
        let _ = fs::remove_file(&tmp);
        return Err(err);
    }
    fs::rename(&tmp, out).with_context(|| format!("move gif into {}", out.display()))?;
    info!(frames = frames.len(), path = %out.display(), "gif written");
    Ok(())
}

fn encode_gif(frames: &[PathBuf], dest: &Path, delay_ms: u32) -> Result<()> {
    let file = File::create(dest).with_context(|| format!("create {}", dest.display()))?;
    let mut encoder = GifEncoder::new(BufWriter::new(file));
    encoder.set_repeat(Repeat::Infinite)?;
    for path in frames {
        let img = image::open(path)
            .with_context(|| format!("read frame {}", path.display()))?
            .to_rgba8();
        let frame = Frame::from_parts(img, 0, 0, Delay::from_numer_denom_ms(delay_ms, 1));
        encoder
            .encode_frame(frame)
            .with_context(|| format!("encode {}", path.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_names_sort_numerically() {
        let key = PlayKey::new(2018090600, 75);
        assert_eq!(frame_file_name(key, 7), "2018090600_75_0007.png");
        assert!(frame_file_name(key, 9) < frame_file_name(key, 10));
    }

    #[test]
    fn stems_are_filesystem_safe() {
        assert_eq!(
            sanitize_file_stem("Q1 - 10:00 - CHI - 2nd & 7 from CHI 35"),
            "Q1_-_10_00_-_CHI_-_2nd_and_7_from_CHI_35"
        );
        assert_eq!(sanitize_file_stem("  ?? "), "");
    }

    #[test]
    fn gif_path_groups_by_game() {
        let p = gif_path(Path::new("img/gifs"), 1, "CHI", "GB", "10");
        assert_eq!(p, PathBuf::from("img/gifs/1_CHI_GB/10.gif"));
        let p = gif_path(Path::new("img/gifs"), 1, "CHI", "GB", "opening.GIF");
        assert!(p.ends_with("opening.GIF"));
    }

    #[test]
    fn failed_gif_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("a_0001.png");
        image::RgbaImage::from_pixel(4, 4, image::Rgba([0, 128, 0, 255]))
            .save(&good)
            .unwrap();
        let bad = dir.path().join("a_0002.png");
        fs::write(&bad, b"not a png").unwrap();

        let out = dir.path().join("gifs").join("play.gif");
        assert!(make_gif(&[good, bad], &out, 100).is_err());
        assert!(!out.exists());
        assert!(!out.with_extension("gif.tmp").exists());
    }

    #[test]
    fn frame_dirs_are_unique_and_removed() {
        let root = tempfile::tempdir().unwrap();
        let key = PlayKey::new(1, 10);
        let a = FrameDir::create(root.path(), key).unwrap();
        let b = FrameDir::create(root.path(), key).unwrap();
        assert_ne!(a.path(), b.path());
        let a_path = a.path().to_path_buf();
        a.close().unwrap();
        assert!(!a_path.exists());
        drop(b);
        assert_eq!(fs::read_dir(root.path()).unwrap().count(), 0);
    }
}
