use anyhow::Result;
use colored::Colorize;

use super::super::args::AddLanguageCommand;
use super::super::exit_status::ExitStatus;
use super::{SUCCESS_MARK, load, refuse, resolve_driver};
use crate::error::Error;
use crate::store::Translations;

pub fn add_language(cmd: AddLanguageCommand) -> Result<ExitStatus> {
    let config = load(&cmd.common)?;
    let mut driver = match resolve_driver(&config.driver, &config)? {
        Ok(driver) => driver,
        Err(status) => return Ok(status),
    };

    match driver.add_language(&cmd.language, cmd.name.as_deref()) {
        Ok(()) => {
            println!(
                "{} {}",
                SUCCESS_MARK.green(),
                format!("Added language {}", cmd.language).green()
            );
            Ok(ExitStatus::Success)
        }
        Err(err @ Error::LanguageExists { .. }) => Ok(refuse(&err)),
        Err(err) => Err(err.into()),
    }
}
