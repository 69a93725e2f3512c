use anyhow::Result;
use colored::Colorize;

use super::super::args::LanguagesCommand;
use super::super::exit_status::ExitStatus;
use super::{load, resolve_driver};
use crate::store::Translations;

pub fn languages(cmd: LanguagesCommand) -> Result<ExitStatus> {
    let config = load(&cmd.common)?;
    let driver = match resolve_driver(&config.driver, &config)? {
        Ok(driver) => driver,
        Err(status) => return Ok(status),
    };

    let languages = driver.all_languages()?;
    if languages.is_empty() {
        println!(
            "{}",
            "No languages registered. Add one with `lingo add-language <code>`.".yellow()
        );
        return Ok(ExitStatus::Success);
    }

    for (code, name) in &languages {
        if code == name {
            println!("{code}");
        } else {
            println!("{code}\t{name}");
        }
    }

    Ok(ExitStatus::Success)
}
