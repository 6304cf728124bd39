use std::path::PathBuf;

use anyhow::Result;

use bdb_tracking::http_client::http_client;
use bdb_tracking::logos;
use bdb_tracking::settings::Settings;
use bdb_tracking::teams;

fn main() -> Result<()> {
    bdb_tracking::init_logging();
    let mut settings = Settings::from_env();
    if let Some(dir) = parse_img_dir_arg() {
        settings.img_dir = dir;
    }
    let overwrite = std::env::args().skip(1).any(|a| a == "--overwrite");

    let client = http_client()?;
    let report = logos::fetch_all(client, &teams::builtin_teams(), &settings.logos_dir(), overwrite)?;

    println!("Logos: {}", settings.logos_dir().display());
    println!(
        "saved={} skipped={} failed={}",
        report.saved.len(),
        report.skipped.len(),
        report.failed.len()
    );
    if !report.failed.is_empty() {
        println!("  failed: {}", report.failed.join(", "));
    }
    Ok(())
}

fn parse_img_dir_arg() -> Option<PathBuf> {
    std::env::args()
        .skip(1)
        .find_map(|arg| arg.strip_prefix("--img-dir=").map(PathBuf::from))
}
