use anyhow::Result;
use colored::Colorize;

use super::super::args::SyncCommand;
use super::super::exit_status::ExitStatus;
use super::{SUCCESS_MARK, load, resolve_driver};

pub fn sync(cmd: SyncCommand) -> Result<ExitStatus> {
    let config = load(&cmd.common)?;

    let mut from = match resolve_driver(&cmd.from, &config)? {
        Ok(driver) => driver,
        Err(status) => return Ok(status),
    };
    let mut to = match resolve_driver(&cmd.to, &config)? {
        Ok(driver) => driver,
        Err(status) => return Ok(status),
    };

    crate::sync::sync(&mut from, &mut to, cmd.language.as_deref())?;

    println!(
        "{} {}",
        SUCCESS_MARK.green(),
        format!("Synced translations from {} to {}", cmd.from, cmd.to).green()
    );
    Ok(ExitStatus::Success)
}
