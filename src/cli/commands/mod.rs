pub mod add_key;
pub mod add_language;
pub mod init;
pub mod languages;
pub mod sync;
pub mod sync_missing;

use colored::Colorize;

use super::args::CommonArgs;
use super::exit_status::ExitStatus;
use crate::config::{Config, load_config};
use crate::error::Error;
use crate::store::Driver;

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Load configuration from the working directory upwards and apply the
/// command-line overrides on top.
pub(super) fn load(common: &CommonArgs) -> anyhow::Result<Config> {
    let cwd = std::env::current_dir()?;
    let mut config = load_config(&cwd)?.config;

    if let Some(driver) = &common.driver {
        config.driver = driver.clone();
    }
    if let Some(root) = &common.languages_root {
        config.languages_root = root.to_string_lossy().to_string();
    }
    if let Some(language) = &common.source_language {
        config.source_language = language.clone();
    }

    Ok(config)
}

/// Print a refusal (a request the backend rejected, not an internal error)
/// and return the matching exit status.
pub(super) fn refuse(err: &Error) -> ExitStatus {
    eprintln!("{} {}", FAILURE_MARK.red(), err.to_string().red());
    ExitStatus::Failure
}

/// Resolve a backend by name, turning an unknown name into a refusal instead
/// of an internal error.
pub(super) fn resolve_driver(
    name: &str,
    config: &Config,
) -> anyhow::Result<Result<Driver, ExitStatus>> {
    match Driver::resolve(name, config) {
        Ok(driver) => Ok(Ok(driver)),
        Err(err @ Error::InvalidDriver { .. }) => Ok(Err(refuse(&err))),
        Err(err) => Err(err.into()),
    }
}
