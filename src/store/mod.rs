//! Translation stores and the backend-agnostic engine operations.
//!
//! `Translations` is the capability contract shared by the two backends; the
//! engine operations (missing-key diff, tri-way merge, filtering) are
//! provided methods on the trait so both backends get identical behavior
//! through their read contract alone.

pub mod cache;
pub mod file;
pub mod table;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::scanner::Scanner;
use crate::store::cache::MemoryCache;
use crate::store::file::FileStore;
use crate::store::table::TableStore;
use crate::tree::{ComparisonRow, ComparisonTree, GroupComparison, TranslationTree, flatten, leaf_to_string};

pub trait Translations {
    fn scanner(&self) -> &Scanner;

    /// The application's default locale, the left-hand side of merges.
    fn source_language(&self) -> &str;

    fn all_languages(&self) -> Result<BTreeMap<String, String>>;

    fn language_exists(&self, language: &str) -> Result<bool>;

    /// Register a new language. Fails with [`Error::LanguageExists`] when the
    /// code is already present.
    fn add_language(&mut self, language: &str, name: Option<&str>) -> Result<()>;

    /// Upsert a group translation. The language is created on first write;
    /// `key` may be a dotted path and `group` may be vendor-namespaced.
    fn add_group_translation(
        &mut self,
        language: &str,
        group: &str,
        key: &str,
        value: &str,
    ) -> Result<()>;

    /// Upsert a single (flat string) translation under the `single` or
    /// `vendor::single` namespace.
    fn add_single_translation(
        &mut self,
        language: &str,
        vendor: &str,
        key: &str,
        value: &str,
    ) -> Result<()>;

    /// Nested group translations, vendor-namespaced groups included, the
    /// single namespace excluded.
    fn get_group_translations_for(&mut self, language: &str) -> Result<Map<String, Value>>;

    /// Flat single translations per vendor namespace.
    fn get_single_translations_for(&mut self, language: &str) -> Result<Map<String, Value>>;

    fn get_groups_for(&self, language: &str) -> Result<Vec<String>>;

    fn all_translations_for(&mut self, language: &str) -> Result<TranslationTree> {
        Ok(TranslationTree {
            group: self.get_group_translations_for(language)?,
            single: self.get_single_translations_for(language)?,
        })
    }

    fn all_translations(&mut self) -> Result<BTreeMap<String, TranslationTree>> {
        let mut out = BTreeMap::new();
        for language in self.all_languages()?.into_keys() {
            let tree = self.all_translations_for(&language)?;
            out.insert(language, tree);
        }
        Ok(out)
    }

    /// Keys the scan found in the application that have no entry at the same
    /// path for `language`. An empty-string value counts as present.
    fn find_missing_translations(&mut self, language: &str) -> Result<TranslationTree> {
        let stored = self.all_translations_for(language)?;
        let scanned = self.scanner().find_translations();
        Ok(scanned.tree.diff(&stored))
    }

    /// Write every missing key as an empty-string placeholder, for one
    /// language or all of them. Re-running once nothing is missing is a
    /// no-op.
    fn save_missing_translations(&mut self, language: Option<&str>) -> Result<()> {
        let languages: Vec<String> = match language {
            Some(language) => vec![language.to_string()],
            None => self.all_languages()?.into_keys().collect(),
        };

        for language in languages {
            let missing = self.find_missing_translations(&language)?;
            for groups in [&missing.group, &missing.single] {
                for (group, values) in groups {
                    let Value::Object(values) = values else {
                        continue;
                    };
                    for key in flatten(values).keys() {
                        if group.contains("single") {
                            self.add_single_translation(&language, group, key, "")?;
                        } else {
                            self.add_group_translation(&language, group, key, "")?;
                        }
                    }
                }
            }
        }

        Ok(())
    }

    /// Tri-way merge: every key of `source_language`'s tree, flattened, with
    /// the matching values from the target language and the application's
    /// default language. Missing entries surface as `None`, never as absent
    /// keys.
    fn get_language_translations_with(
        &mut self,
        language: &str,
        source_language: &str,
    ) -> Result<ComparisonTree> {
        let source = self.all_translations_for(source_language)?;
        let target = self.all_translations_for(language)?;
        let default_language = self.source_language().to_string();
        let default = if source_language == default_language {
            source.clone()
        } else {
            self.all_translations_for(&default_language)?
        };

        let mut out = ComparisonTree::default();
        merge_namespace(&source.group, &target.group, &default.group, &mut out.group);
        merge_namespace(&source.single, &target.single, &default.single, &mut out.single);
        Ok(out)
    }

    fn get_source_language_translations_with(&mut self, language: &str) -> Result<ComparisonTree> {
        let source_language = self.source_language().to_string();
        self.get_language_translations_with(language, &source_language)
    }

    /// Merge, then keep only rows whose group, key, target value or source
    /// value contains `filter`. Groups left with no rows are pruned.
    fn filter_translations_for(
        &mut self,
        language: &str,
        source_language: &str,
        filter: Option<&str>,
    ) -> Result<ComparisonTree> {
        let mut merged = self.get_language_translations_with(language, source_language)?;
        let Some(filter) = filter else {
            return Ok(merged);
        };

        for namespace in [&mut merged.group, &mut merged.single] {
            for (group, rows) in namespace.iter_mut() {
                if group.contains(filter) {
                    continue;
                }
                rows.retain(|key, row| {
                    key.contains(filter)
                        || row.source.contains(filter)
                        || row.target.as_deref().is_some_and(|v| v.contains(filter))
                });
            }
            namespace.retain(|_, rows| !rows.is_empty());
        }

        Ok(merged)
    }
}

fn merge_namespace(
    source: &Map<String, Value>,
    target: &Map<String, Value>,
    default: &Map<String, Value>,
    out: &mut BTreeMap<String, GroupComparison>,
) {
    for (group, values) in source {
        let Value::Object(values) = values else {
            continue;
        };
        let source_flat = flatten(values);
        let target_flat = flat_group(target, group);
        let default_flat = flat_group(default, group);

        let mut rows = GroupComparison::new();
        for (key, value) in &source_flat {
            rows.insert(
                key.clone(),
                ComparisonRow {
                    source: leaf_to_string(value),
                    target: target_flat.get(key).map(leaf_to_string),
                    default: default_flat.get(key).map(leaf_to_string),
                },
            );
        }
        out.insert(group.clone(), rows);
    }
}

fn flat_group(namespace: &Map<String, Value>, group: &str) -> Map<String, Value> {
    match namespace.get(group) {
        Some(Value::Object(values)) => flatten(values),
        _ => Map::new(),
    }
}

/// The closed set of backends, selected by configuration.
pub enum Driver {
    File(FileStore),
    Table(TableStore),
}

impl Driver {
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::resolve(&config.driver, config)
    }

    /// Construct the named backend, failing with [`Error::InvalidDriver`]
    /// for anything other than "file" or "table".
    pub fn resolve(name: &str, config: &Config) -> Result<Self> {
        let scanner = Scanner::new(
            config.scan_paths(),
            config.ignores.clone(),
            &config.translation_methods,
        )?;

        match name {
            "file" => Ok(Driver::File(FileStore::new(
                PathBuf::from(&config.languages_root),
                config.source_language.clone(),
                scanner,
            )?)),
            "table" => Ok(Driver::Table(TableStore::new(
                PathBuf::from(&config.table_file),
                config.source_language.clone(),
                scanner,
                Box::new(MemoryCache::default()),
            )?)),
            other => Err(Error::InvalidDriver {
                name: other.to_string(),
            }),
        }
    }
}

impl Translations for Driver {
    fn scanner(&self) -> &Scanner {
        match self {
            Driver::File(store) => store.scanner(),
            Driver::Table(store) => store.scanner(),
        }
    }

    fn source_language(&self) -> &str {
        match self {
            Driver::File(store) => store.source_language(),
            Driver::Table(store) => store.source_language(),
        }
    }

    fn all_languages(&self) -> Result<BTreeMap<String, String>> {
        match self {
            Driver::File(store) => store.all_languages(),
            Driver::Table(store) => store.all_languages(),
        }
    }

    fn language_exists(&self, language: &str) -> Result<bool> {
        match self {
            Driver::File(store) => store.language_exists(language),
            Driver::Table(store) => store.language_exists(language),
        }
    }

    fn add_language(&mut self, language: &str, name: Option<&str>) -> Result<()> {
        match self {
            Driver::File(store) => store.add_language(language, name),
            Driver::Table(store) => store.add_language(language, name),
        }
    }

    fn add_group_translation(
        &mut self,
        language: &str,
        group: &str,
        key: &str,
        value: &str,
    ) -> Result<()> {
        match self {
            Driver::File(store) => store.add_group_translation(language, group, key, value),
            Driver::Table(store) => store.add_group_translation(language, group, key, value),
        }
    }

    fn add_single_translation(
        &mut self,
        language: &str,
        vendor: &str,
        key: &str,
        value: &str,
    ) -> Result<()> {
        match self {
            Driver::File(store) => store.add_single_translation(language, vendor, key, value),
            Driver::Table(store) => store.add_single_translation(language, vendor, key, value),
        }
    }

    fn get_group_translations_for(&mut self, language: &str) -> Result<Map<String, Value>> {
        match self {
            Driver::File(store) => store.get_group_translations_for(language),
            Driver::Table(store) => store.get_group_translations_for(language),
        }
    }

    fn get_single_translations_for(&mut self, language: &str) -> Result<Map<String, Value>> {
        match self {
            Driver::File(store) => store.get_single_translations_for(language),
            Driver::Table(store) => store.get_single_translations_for(language),
        }
    }

    fn get_groups_for(&self, language: &str) -> Result<Vec<String>> {
        match self {
            Driver::File(store) => store.get_groups_for(language),
            Driver::Table(store) => store.get_groups_for(language),
        }
    }
}

/// Write a file atomically: write a sibling temp file, then rename over the
/// target. Group-file writes are read-modify-write over the whole file, so a
/// torn write would corrupt the catalog.
pub(crate) fn atomic_write(path: &Path, contents: &str) -> Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .map_or_else(|| "file".to_string(), |n| n.to_string_lossy().to_string());
    let tmp = parent.join(format!(".{file_name}.tmp"));

    fs::write(&tmp, contents).map_err(|e| Error::io("write", &tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| Error::io("rename", path, e))?;
    Ok(())
}
