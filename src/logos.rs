//! Team logo acquisition. A one-off asset step; rendering only reads what
//! ends up in the logos directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use reqwest::blocking::Client;
use tracing::{info, warn};

use crate::teams::{self, TeamInfo};

pub const LOGO_URL_BASE: &str = "https://a.espncdn.com/i/teamlogos/nfl/500";

/// The CDN keys clubs by lower-case code, with a few spelled differently.
pub fn logo_url(team_code: &str) -> String {
    let code = match team_code.to_ascii_uppercase().as_str() {
        "WAS" => "wsh".to_string(),
        "LA" => "lar".to_string(),
        "NFC" | "AFC" | "NFL" => "nfl".to_string(),
        other => other.to_ascii_lowercase(),
    };
    format!("{LOGO_URL_BASE}/{code}.png")
}

pub fn logo_file(logos_dir: &Path, team_code: &str) -> PathBuf {
    if teams::is_conference(team_code) || team_code.eq_ignore_ascii_case(teams::NFL) {
        logos_dir.join("nfl.png")
    } else {
        logos_dir.join(format!("{}.png", team_code.to_ascii_uppercase()))
    }
}

fn download(client: &Client, url: &str, dest: &Path) -> Result<u64> {
    let resp = client.get(url).send().context("request failed")?;
    let status = resp.status();
    if !status.is_success() {
        return Err(anyhow!("http {status} for {url}"));
    }
    let bytes = resp.bytes().context("failed reading body")?;
    image::load_from_memory(&bytes).with_context(|| format!("{url} is not an image"))?;
    let tmp = dest.with_extension("png.tmp");
    fs::write(&tmp, &bytes).with_context(|| format!("write {}", tmp.display()))?;
    fs::rename(&tmp, dest).with_context(|| format!("swap {}", dest.display()))?;
    Ok(bytes.len() as u64)
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FetchReport {
    pub saved: Vec<String>,
    pub skipped: Vec<String>,
    pub failed: Vec<String>,
}

/// Downloads a logo for every club, plus the league shield used for the
/// conference pseudo-teams. Existing files are kept unless `overwrite`.
pub fn fetch_all(client: &Client, teams: &[TeamInfo], logos_dir: &Path, overwrite: bool) -> Result<FetchReport> {
    fs::create_dir_all(logos_dir).with_context(|| format!("create {}", logos_dir.display()))?;
    let mut codes: Vec<&str> = teams
        .iter()
        .map(|t| t.team_code.as_str())
        .filter(|c| !teams::is_conference(c))
        .collect();
    codes.push(teams::NFL);

    let mut report = FetchReport::default();
    for code in codes {
        let dest = logo_file(logos_dir, code);
        if dest.exists() && !overwrite {
            report.skipped.push(code.to_string());
            continue;
        }
        let url = logo_url(code);
        match download(client, &url, &dest) {
            Ok(bytes) => {
                info!(team = code, bytes, path = %dest.display(), "logo saved");
                report.saved.push(code.to_string());
            }
            Err(err) => {
                warn!(team = code, "logo download failed: {err:#}");
                report.failed.push(code.to_string());
            }
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_use_cdn_codes() {
        assert_eq!(logo_url("GB"), format!("{LOGO_URL_BASE}/gb.png"));
        assert_eq!(logo_url("was"), format!("{LOGO_URL_BASE}/wsh.png"));
        assert_eq!(logo_url("LA"), format!("{LOGO_URL_BASE}/lar.png"));
    }

    #[test]
    fn conference_logos_share_the_shield() {
        let dir = Path::new("img/logos");
        assert_eq!(logo_file(dir, "NFC"), dir.join("nfl.png"));
        assert_eq!(logo_file(dir, "chi"), dir.join("CHI.png"));
    }
}
