use std::path::{Path, PathBuf};

const DEFAULT_PIXELS_PER_YARD: u32 = 10;
const DEFAULT_FRAME_DELAY_MS: u32 = 100;

pub const GAMES_FILE: &str = "games.csv";
pub const PLAYS_FILE: &str = "plays.csv";
pub const PLAYERS_FILE: &str = "players.csv";
pub const TEAMS_FILE: &str = "team_data.csv";
pub const PLOT_TESTING_FILE: &str = "plot_testing.csv";

#[derive(Debug, Clone)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub img_dir: PathBuf,
    pub pixels_per_yard: u32,
    pub frame_delay_ms: u32,
}

impl Settings {
    pub fn new(data_dir: impl Into<PathBuf>, img_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            img_dir: img_dir.into(),
            pixels_per_yard: DEFAULT_PIXELS_PER_YARD,
            frame_delay_ms: DEFAULT_FRAME_DELAY_MS,
        }
    }

    /// Reads `.env.local`/`.env` and the `BDB_*` variables, falling back to
    /// `./data` and `./img`.
    pub fn from_env() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");

        let data_dir = env_path("BDB_DATA_DIR").unwrap_or_else(|| PathBuf::from("data"));
        let img_dir = env_path("BDB_IMG_DIR").unwrap_or_else(|| PathBuf::from("img"));
        let pixels_per_yard = std::env::var("BDB_PIXELS_PER_YARD")
            .ok()
            .and_then(|val| val.parse::<u32>().ok())
            .unwrap_or(DEFAULT_PIXELS_PER_YARD)
            .clamp(2, 40);
        let frame_delay_ms = std::env::var("BDB_FRAME_DELAY_MS")
            .ok()
            .and_then(|val| val.parse::<u32>().ok())
            .unwrap_or(DEFAULT_FRAME_DELAY_MS)
            .max(20);

        Self {
            data_dir,
            img_dir,
            pixels_per_yard,
            frame_delay_ms,
        }
    }

    pub fn games_file(&self) -> PathBuf {
        self.data_dir.join(GAMES_FILE)
    }

    pub fn plays_file(&self) -> PathBuf {
        self.data_dir.join(PLAYS_FILE)
    }

    pub fn players_file(&self) -> PathBuf {
        self.data_dir.join(PLAYERS_FILE)
    }

    pub fn teams_file(&self) -> PathBuf {
        self.data_dir.join(TEAMS_FILE)
    }

    pub fn plot_testing_file(&self) -> PathBuf {
        self.data_dir.join(PLOT_TESTING_FILE)
    }

    pub fn week_file(&self, week: u8) -> PathBuf {
        week_file(&self.data_dir, week)
    }

    pub fn logos_dir(&self) -> PathBuf {
        self.img_dir.join("logos")
    }

    pub fn temp_dir(&self) -> PathBuf {
        self.img_dir.join("temp")
    }

    pub fn gif_dir(&self) -> PathBuf {
        self.img_dir.join("gifs")
    }

    pub fn test_plots_dir(&self) -> PathBuf {
        self.img_dir.join("test_plots")
    }
}

pub fn week_file(data_dir: &Path, week: u8) -> PathBuf {
    data_dir.join(format!("week{week}.csv"))
}

fn env_path(key: &str) -> Option<PathBuf> {
    let val = std::env::var(key).ok()?;
    if val.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(val.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directories_follow_img_layout() {
        let s = Settings::new("/d", "/i");
        assert_eq!(s.logos_dir(), PathBuf::from("/i/logos"));
        assert_eq!(s.gif_dir(), PathBuf::from("/i/gifs"));
        assert_eq!(s.week_file(7), PathBuf::from("/d/week7.csv"));
    }
}
