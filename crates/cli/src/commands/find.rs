//! `uv-autoenv find`: print the nearest virtual environment

use super::Outcome;
use crate::cli::{CliError, EXIT_FALSE};
use std::path::Path;
use tracing::debug;
use uv_autoenv_core::config::Config;

/// Print the nearest environment above `dir`; exit 1 when there is none
pub fn execute_find(dir: &Path, marker: Option<String>) -> Result<Outcome, CliError> {
    let config = Config::load_default()?.with_marker_override(marker);
    find_with(dir, &config)
}

fn find_with(dir: &Path, config: &Config) -> Result<Outcome, CliError> {
    match config.search()?.find(dir)? {
        Some(found) => {
            debug!(root = %found.root.display(), "Found environment");
            Ok(Outcome::ok(format!("{}\n", found.path.display())))
        }
        None => Ok(Outcome::with_exit_code("", EXIT_FALSE)),
    }
}
