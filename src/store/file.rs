//! File-backed translation store.
//!
//! One directory per language under the root. Group translations are one PHP
//! array-literal file per group; single translations are one JSON object per
//! language. Vendor-namespaced files live under `vendor/<namespace>/`:
//! group files as `vendor/<namespace>/<language>/<group>.php`, single files
//! as `vendor/<namespace>/<language>.json`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::php;
use crate::scanner::Scanner;
use crate::store::{Translations, atomic_write};
use crate::tree::{flatten, sort_recursive, split_vendor, unflatten};

pub struct FileStore {
    root: PathBuf,
    source_language: String,
    scanner: Scanner,
}

impl FileStore {
    pub fn new(root: PathBuf, source_language: String, scanner: Scanner) -> Result<Self> {
        fs::create_dir_all(&root).map_err(|e| Error::io("create directory", &root, e))?;
        Ok(Self {
            root,
            source_language,
            scanner,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn ensure_language(&mut self, language: &str) -> Result<()> {
        if !self.language_exists(language)? {
            self.add_language(language, None)?;
        }
        Ok(())
    }

    fn group_file(&self, language: &str, group: &str) -> PathBuf {
        match split_vendor(group) {
            (Some(vendor), base) => self
                .root
                .join("vendor")
                .join(vendor)
                .join(language)
                .join(format!("{base}.php")),
            (None, base) => self.root.join(language).join(format!("{base}.php")),
        }
    }

    fn single_file(&self, language: &str, vendor: Option<&str>) -> PathBuf {
        match vendor {
            Some(vendor) => self
                .root
                .join("vendor")
                .join(vendor)
                .join(format!("{language}.json")),
            None => self.root.join(format!("{language}.json")),
        }
    }

    /// Vendor namespaces present under the root, sorted.
    fn vendors(&self) -> Result<Vec<String>> {
        let vendor_dir = self.root.join("vendor");
        if !vendor_dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut vendors = Vec::new();
        let entries =
            fs::read_dir(&vendor_dir).map_err(|e| Error::io("read directory", &vendor_dir, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| Error::io("read directory", &vendor_dir, e))?;
            if entry.path().is_dir()
                && let Some(name) = entry.file_name().to_str()
            {
                vendors.push(name.to_string());
            }
        }
        vendors.sort();
        Ok(vendors)
    }

    /// Group files for a language directory, sorted by file name.
    fn group_files_in(dir: &Path) -> Result<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut files = Vec::new();
        let entries = fs::read_dir(dir).map_err(|e| Error::io("read directory", dir, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| Error::io("read directory", dir, e))?;
            let path = entry.path();
            if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("php") {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    fn read_group_file(&self, path: &Path) -> Result<Map<String, Value>> {
        let contents =
            fs::read_to_string(path).map_err(|e| Error::io("read", path, e))?;
        php::parse_file(&contents).map_err(|detail| Error::malformed(path, detail))
    }

    fn read_single_file(&self, path: &Path) -> Result<Map<String, Value>> {
        let contents =
            fs::read_to_string(path).map_err(|e| Error::io("read", path, e))?;
        match serde_json::from_str::<Value>(&contents) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(Error::malformed(path, format!("expected object, found {other}"))),
            Err(e) => Err(Error::malformed(path, e.to_string())),
        }
    }

    fn write_single_file(&self, path: &Path, translations: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io("create directory", parent, e))?;
        }
        let contents = serde_json::to_string_pretty(translations)
            .map_err(|e| Error::malformed(path, e.to_string()))?;
        atomic_write(path, &contents)
    }

    /// Rewrite a whole group file from a nested tree, keys sorted ascending
    /// at every level so repeated writes are stable.
    fn write_group_file(&self, path: &Path, translations: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io("create directory", parent, e))?;
        }
        atomic_write(path, &php::export_file(&sort_recursive(translations)))
    }
}

impl Translations for FileStore {
    fn scanner(&self) -> &Scanner {
        &self.scanner
    }

    fn source_language(&self) -> &str {
        &self.source_language
    }

    /// Languages are the direct subdirectories of the root; `vendor` is the
    /// namespacing directory, not a language.
    fn all_languages(&self) -> Result<BTreeMap<String, String>> {
        let mut languages = BTreeMap::new();
        let entries =
            fs::read_dir(&self.root).map_err(|e| Error::io("read directory", &self.root, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| Error::io("read directory", &self.root, e))?;
            if entry.path().is_dir()
                && let Some(name) = entry.file_name().to_str()
                && name != "vendor"
            {
                languages.insert(name.to_string(), name.to_string());
            }
        }
        Ok(languages)
    }

    fn language_exists(&self, language: &str) -> Result<bool> {
        Ok(self.all_languages()?.contains_key(language))
    }

    fn add_language(&mut self, language: &str, _name: Option<&str>) -> Result<()> {
        if self.language_exists(language)? {
            return Err(Error::LanguageExists {
                language: language.to_string(),
            });
        }

        let dir = self.root.join(language);
        fs::create_dir_all(&dir).map_err(|e| Error::io("create directory", &dir, e))?;

        let single = self.single_file(language, None);
        if !single.exists() {
            self.write_single_file(&single, &Map::new())?;
        }
        Ok(())
    }

    fn add_group_translation(
        &mut self,
        language: &str,
        group: &str,
        key: &str,
        value: &str,
    ) -> Result<()> {
        self.ensure_language(language)?;

        let path = self.group_file(language, group);
        let existing = if path.exists() {
            self.read_group_file(&path)?
        } else {
            Map::new()
        };

        // Read-modify-write over the whole file: flatten, splice the dotted
        // key, rebuild the nested shape.
        let mut flat = flatten(&existing);
        flat.insert(key.to_string(), Value::String(value.to_string()));
        self.write_group_file(&path, &unflatten(&flat))
    }

    fn add_single_translation(
        &mut self,
        language: &str,
        vendor: &str,
        key: &str,
        value: &str,
    ) -> Result<()> {
        self.ensure_language(language)?;

        let (namespace, _) = split_vendor(vendor);
        let path = self.single_file(language, namespace);
        let mut translations = if path.exists() {
            self.read_single_file(&path)?
        } else {
            Map::new()
        };
        translations.insert(key.to_string(), Value::String(value.to_string()));
        self.write_single_file(&path, &translations)
    }

    fn get_group_translations_for(&mut self, language: &str) -> Result<Map<String, Value>> {
        let mut out = Map::new();

        for path in Self::group_files_in(&self.root.join(language))? {
            if let Some(group) = path.file_stem().and_then(|s| s.to_str()) {
                let translations = self.read_group_file(&path)?;
                out.insert(group.to_string(), Value::Object(translations));
            }
        }

        for vendor in self.vendors()? {
            let dir = self.root.join("vendor").join(&vendor).join(language);
            for path in Self::group_files_in(&dir)? {
                if let Some(group) = path.file_stem().and_then(|s| s.to_str()) {
                    let translations = self.read_group_file(&path)?;
                    out.insert(format!("{vendor}::{group}"), Value::Object(translations));
                }
            }
        }

        Ok(out)
    }

    fn get_single_translations_for(&mut self, language: &str) -> Result<Map<String, Value>> {
        let mut out = Map::new();

        let plain = self.single_file(language, None);
        if plain.is_file() {
            out.insert(
                "single".to_string(),
                Value::Object(self.read_single_file(&plain)?),
            );
        }

        for vendor in self.vendors()? {
            let path = self.single_file(language, Some(&vendor));
            if path.is_file() {
                out.insert(
                    format!("{vendor}::single"),
                    Value::Object(self.read_single_file(&path)?),
                );
            }
        }

        Ok(out)
    }

    fn get_groups_for(&self, language: &str) -> Result<Vec<String>> {
        let mut groups = Vec::new();

        for path in Self::group_files_in(&self.root.join(language))? {
            if let Some(group) = path.file_stem().and_then(|s| s.to_str()) {
                groups.push(group.to_string());
            }
        }

        for vendor in self.vendors()? {
            let dir = self.root.join("vendor").join(&vendor).join(language);
            for path in Self::group_files_in(&dir)? {
                if let Some(group) = path.file_stem().and_then(|s| s.to_str()) {
                    groups.push(format!("{vendor}::{group}"));
                }
            }
        }

        Ok(groups)
    }
}
