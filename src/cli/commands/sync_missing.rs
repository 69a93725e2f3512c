use anyhow::Result;
use colored::Colorize;

use super::super::args::SyncMissingCommand;
use super::super::exit_status::ExitStatus;
use super::{SUCCESS_MARK, load, resolve_driver};
use crate::store::Translations;

pub fn sync_missing(cmd: SyncMissingCommand) -> Result<ExitStatus> {
    let config = load(&cmd.common)?;
    let mut driver = match resolve_driver(&config.driver, &config)? {
        Ok(driver) => driver,
        Err(status) => return Ok(status),
    };

    for warning in &driver.scanner().find_translations().warnings {
        eprintln!("{} {warning}", "warning:".yellow().bold());
    }

    driver.save_missing_translations(cmd.language.as_deref())?;

    let scope = cmd
        .language
        .clone()
        .unwrap_or_else(|| "all languages".to_string());
    println!(
        "{} {}",
        SUCCESS_MARK.green(),
        format!("Stored missing translation keys for {scope}").green()
    );
    Ok(ExitStatus::Success)
}
