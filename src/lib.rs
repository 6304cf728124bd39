pub mod canvas;
pub mod coord_ops;
pub mod data_cleaners;
pub mod data_loaders;
pub mod data_mergers;
pub mod dataset;
pub mod error;
pub mod field_coords;
pub mod file_movers;
pub mod glyphs;
pub mod http_client;
pub mod input_checkers;
pub mod logos;
pub mod lookup;
pub mod models;
pub mod plot_helpers;
pub mod prompt;
pub mod settings;
pub mod teams;

use tracing_subscriber::EnvFilter;

/// Logs to stderr; `RUST_LOG` overrides the `info` default.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
