//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `init`: Initialize a lingo configuration file
//! - `languages`: List registered languages
//! - `add-language`: Register a new language
//! - `add-key`: Add or update one translation
//! - `sync-missing`: Scan the application and write placeholders for keys
//!   that have no entry yet
//! - `sync`: Copy translations from one backend into the other

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }
}

/// Common arguments shared by the catalog commands.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Backend to use: "file" or "table" (overrides config file)
    #[arg(long)]
    pub driver: Option<String>,

    /// Language directory root for the file backend (overrides config file)
    #[arg(long)]
    pub languages_root: Option<PathBuf>,

    /// Default locale used as the comparison baseline (overrides config file)
    #[arg(long)]
    pub source_language: Option<String>,
}

#[derive(Debug, Args)]
pub struct LanguagesCommand {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct AddLanguageCommand {
    /// Language code to register, e.g. "fr"
    pub language: String,

    /// Display name for the language (table backend only)
    #[arg(long)]
    pub name: Option<String>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct AddKeyCommand {
    /// Language code the translation belongs to
    pub language: String,

    /// Translation key; dotted paths nest inside the group
    pub key: String,

    /// Translated value
    pub value: String,

    /// Group (file) to store the key under; without it the key is stored as
    /// a flat single translation
    #[arg(long)]
    pub group: Option<String>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct SyncMissingCommand {
    /// Language to fill in; all registered languages when omitted
    pub language: Option<String>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct SyncCommand {
    /// Backend to copy from: "file" or "table"
    pub from: String,

    /// Backend to copy into: "file" or "table"
    pub to: String,

    /// Only copy this language; all languages when omitted
    #[arg(long)]
    pub language: Option<String>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Initialize a new .lingorc.json configuration file
    Init,
    /// List the languages the configured backend knows about
    Languages(LanguagesCommand),
    /// Register a new language in the configured backend
    AddLanguage(AddLanguageCommand),
    /// Add or update one translation in the configured backend
    AddKey(AddKeyCommand),
    /// Scan the application and store placeholders for missing keys
    SyncMissing(SyncMissingCommand),
    /// Copy every translation from one backend into the other
    Sync(SyncCommand),
}
