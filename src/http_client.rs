use std::time::Duration;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;

const LOGO_TIMEOUT_SECS: u64 = 15;
const AGENT: &str = concat!("bdb_tracking/", env!("CARGO_PKG_VERSION"));

static CLIENT: OnceCell<Client> = OnceCell::new();

/// Shared blocking client for asset downloads.
pub fn http_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        Client::builder()
            .user_agent(AGENT)
            .timeout(Duration::from_secs(LOGO_TIMEOUT_SECS))
            .build()
            .context("build asset download client")
    })
}
