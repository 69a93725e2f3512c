use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result};
use glob::Pattern;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_NAME: &str = ".lingorc.json";

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Backend used for reads and writes: "file" or "table".
    #[serde(default = "default_driver")]
    pub driver: String,
    /// Root of the file backend's language directories.
    #[serde(default = "default_languages_root")]
    pub languages_root: String,
    /// Row file used by the table backend.
    #[serde(default = "default_table_file")]
    pub table_file: String,
    /// The application's default locale, used as the left-hand side of merge
    /// comparisons.
    #[serde(default = "default_source_language")]
    pub source_language: String,
    /// Directories scanned for translation key references.
    #[serde(default = "default_scan_paths")]
    pub scan_paths: Vec<String>,
    /// Names of the translation lookup functions the scanner matches.
    #[serde(default = "default_translation_methods")]
    pub translation_methods: Vec<String>,
    /// Glob patterns or literal paths excluded from scanning.
    #[serde(default)]
    pub ignores: Vec<String>,
}

fn default_driver() -> String {
    "file".to_string()
}

fn default_languages_root() -> String {
    "./lang".to_string()
}

fn default_table_file() -> String {
    "./translations.table.json".to_string()
}

fn default_source_language() -> String {
    "en".to_string()
}

fn default_scan_paths() -> Vec<String> {
    ["./app", "./resources"].map(String::from).to_vec()
}

fn default_translation_methods() -> Vec<String> {
    ["__", "trans", "trans_choice", "@lang", "@choice"]
        .map(String::from)
        .to_vec()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            driver: default_driver(),
            languages_root: default_languages_root(),
            table_file: default_table_file(),
            source_language: default_source_language(),
            scan_paths: default_scan_paths(),
            translation_methods: default_translation_methods(),
            ignores: Vec::new(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error if any glob patterns in `ignores` are invalid or the
    /// scanner has no lookup functions to match.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignores {
            if pattern.contains('*') || pattern.contains('?') {
                Pattern::new(pattern).with_context(|| {
                    format!("Invalid glob pattern in 'ignores': \"{}\"", pattern)
                })?;
            }
        }

        if self.translation_methods.is_empty() {
            anyhow::bail!("'translationMethods' must not be empty");
        }

        Ok(())
    }

    pub fn scan_paths(&self) -> Vec<PathBuf> {
        self.scan_paths.iter().map(PathBuf::from).collect()
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: false,
        }),
    }
}
