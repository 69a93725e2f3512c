use anyhow::Result;

use super::args::{Arguments, Command};
use super::commands::{add_key, add_language, init, languages, sync, sync_missing};
use super::exit_status::ExitStatus;

pub fn run(Arguments { command }: Arguments) -> Result<ExitStatus> {
    match command {
        Some(Command::Init) => init::init(),
        Some(Command::Languages(cmd)) => languages::languages(cmd),
        Some(Command::AddLanguage(cmd)) => add_language::add_language(cmd),
        Some(Command::AddKey(cmd)) => add_key::add_key(cmd),
        Some(Command::SyncMissing(cmd)) => sync_missing::sync_missing(cmd),
        Some(Command::Sync(cmd)) => sync::sync(cmd),
        None => {
            anyhow::bail!("No command provided. Use --help to see available commands.")
        }
    }
}
