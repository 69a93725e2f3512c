use anyhow::Result;
use colored::Colorize;

use super::super::args::AddKeyCommand;
use super::super::exit_status::ExitStatus;
use super::{SUCCESS_MARK, load, resolve_driver};
use crate::store::Translations;

pub fn add_key(cmd: AddKeyCommand) -> Result<ExitStatus> {
    let config = load(&cmd.common)?;
    let mut driver = match resolve_driver(&config.driver, &config)? {
        Ok(driver) => driver,
        Err(status) => return Ok(status),
    };

    match &cmd.group {
        Some(group) => {
            driver.add_group_translation(&cmd.language, group, &cmd.key, &cmd.value)?;
        }
        None => {
            driver.add_single_translation(&cmd.language, "single", &cmd.key, &cmd.value)?;
        }
    }

    println!(
        "{} {}",
        SUCCESS_MARK.green(),
        format!("Stored {} for {}", cmd.key, cmd.language).green()
    );
    Ok(ExitStatus::Success)
}
