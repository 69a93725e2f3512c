//! Row-oriented translation store.
//!
//! Languages and translations are flat rows keyed by synthetic ids, persisted
//! as one JSON document. Group rows keep their dotted key verbatim; nesting is
//! rebuilt on read. Reads go through a per-namespace cache that every write
//! invalidates before returning.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::scanner::Scanner;
use crate::store::cache::Cache;
use crate::store::{Translations, atomic_write};
use crate::tree::dot_set;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LanguageRow {
    pub id: u64,
    pub language: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TranslationRow {
    pub id: u64,
    pub language_id: u64,
    /// `None` only in data written before namespaces existed; such rows are
    /// folded into the `single` namespace on first single read.
    pub group: Option<String>,
    pub key: String,
    pub value: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TableData {
    pub languages: Vec<LanguageRow>,
    pub translations: Vec<TranslationRow>,
}

pub struct TableStore {
    path: PathBuf,
    source_language: String,
    scanner: Scanner,
    data: TableData,
    cache: Box<dyn Cache>,
}

fn is_single_group(group: &str) -> bool {
    group == "single" || group.ends_with("::single")
}

fn group_cache_key(language: &str) -> String {
    format!("language.{language}.group")
}

fn single_cache_key(language: &str) -> String {
    format!("language.{language}.single")
}

impl TableStore {
    pub fn new(
        path: PathBuf,
        source_language: String,
        scanner: Scanner,
        cache: Box<dyn Cache>,
    ) -> Result<Self> {
        let data = if path.is_file() {
            let contents = fs::read_to_string(&path).map_err(|e| Error::io("read", &path, e))?;
            serde_json::from_str(&contents).map_err(|e| Error::malformed(&path, e.to_string()))?
        } else {
            TableData::default()
        };

        Ok(Self {
            path,
            source_language,
            scanner,
            data,
            cache,
        })
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| Error::io("create directory", parent, e))?;
        }
        let contents = serde_json::to_string_pretty(&self.data)
            .map_err(|e| Error::malformed(&self.path, e.to_string()))?;
        atomic_write(&self.path, &contents)
    }

    fn language_id(&self, language: &str) -> Option<u64> {
        self.data
            .languages
            .iter()
            .find(|row| row.language == language)
            .map(|row| row.id)
    }

    fn ensure_language(&mut self, language: &str) -> Result<u64> {
        if let Some(id) = self.language_id(language) {
            return Ok(id);
        }
        self.add_language(language, None)?;
        // Registered above, so the lookup cannot miss.
        self.language_id(language).ok_or_else(|| Error::Scan {
            detail: format!("language {language} vanished after registration"),
        })
    }

    fn next_language_id(&self) -> u64 {
        self.data.languages.iter().map(|row| row.id).max().unwrap_or(0) + 1
    }

    fn next_translation_id(&self) -> u64 {
        self.data
            .translations
            .iter()
            .map(|row| row.id)
            .max()
            .unwrap_or(0)
            + 1
    }

    fn upsert(&mut self, language_id: u64, group: &str, key: &str, value: &str) {
        let existing = self.data.translations.iter_mut().find(|row| {
            row.language_id == language_id
                && row.group.as_deref() == Some(group)
                && row.key == key
        });
        match existing {
            Some(row) => row.value = value.to_string(),
            None => {
                let id = self.next_translation_id();
                self.data.translations.push(TranslationRow {
                    id,
                    language_id,
                    group: Some(group.to_string()),
                    key: key.to_string(),
                    value: value.to_string(),
                });
            }
        }
    }

    /// Fold pre-namespace rows (`group: null`) into the `single` namespace.
    /// Returns the number of rows rewritten; the file is only touched when
    /// that number is non-zero.
    pub fn migrate_legacy_groups(&mut self) -> Result<usize> {
        let mut migrated = 0;
        let mut touched_languages = Vec::new();

        for row in &mut self.data.translations {
            if row.group.is_none() {
                row.group = Some("single".to_string());
                migrated += 1;
                if !touched_languages.contains(&row.language_id) {
                    touched_languages.push(row.language_id);
                }
            }
        }

        if migrated > 0 {
            for id in touched_languages {
                if let Some(row) = self.data.languages.iter().find(|l| l.id == id) {
                    self.cache.invalidate(&single_cache_key(&row.language));
                }
            }
            self.persist()?;
        }
        Ok(migrated)
    }
}

impl Translations for TableStore {
    fn scanner(&self) -> &Scanner {
        &self.scanner
    }

    fn source_language(&self) -> &str {
        &self.source_language
    }

    fn all_languages(&self) -> Result<BTreeMap<String, String>> {
        Ok(self
            .data
            .languages
            .iter()
            .map(|row| {
                let name = row.name.clone().unwrap_or_else(|| row.language.clone());
                (row.language.clone(), name)
            })
            .collect())
    }

    fn language_exists(&self, language: &str) -> Result<bool> {
        Ok(self.language_id(language).is_some())
    }

    fn add_language(&mut self, language: &str, name: Option<&str>) -> Result<()> {
        if self.language_exists(language)? {
            return Err(Error::LanguageExists {
                language: language.to_string(),
            });
        }
        let id = self.next_language_id();
        self.data.languages.push(LanguageRow {
            id,
            language: language.to_string(),
            name: name.map(str::to_string),
        });
        self.persist()
    }

    fn add_group_translation(
        &mut self,
        language: &str,
        group: &str,
        key: &str,
        value: &str,
    ) -> Result<()> {
        let language_id = self.ensure_language(language)?;
        self.upsert(language_id, group, key, value);
        self.cache.invalidate(&group_cache_key(language));
        self.persist()
    }

    fn add_single_translation(
        &mut self,
        language: &str,
        vendor: &str,
        key: &str,
        value: &str,
    ) -> Result<()> {
        let language_id = self.ensure_language(language)?;
        self.upsert(language_id, vendor, key, value);
        self.cache.invalidate(&single_cache_key(language));
        self.persist()
    }

    fn get_group_translations_for(&mut self, language: &str) -> Result<Map<String, Value>> {
        let cache_key = group_cache_key(language);
        if let Some(cached) = self.cache.get(&cache_key) {
            return Ok(cached);
        }

        let Some(language_id) = self.language_id(language) else {
            return Ok(Map::new());
        };

        let mut groups: BTreeMap<String, Map<String, Value>> = BTreeMap::new();
        for row in &self.data.translations {
            if row.language_id != language_id {
                continue;
            }
            let Some(group) = row.group.as_deref() else {
                continue;
            };
            if is_single_group(group) {
                continue;
            }
            dot_set(
                groups.entry(group.to_string()).or_default(),
                &row.key,
                Value::String(row.value.clone()),
            );
        }

        let out: Map<String, Value> = groups
            .into_iter()
            .map(|(group, values)| (group, Value::Object(values)))
            .collect();
        self.cache.set(&cache_key, out.clone());
        Ok(out)
    }

    fn get_single_translations_for(&mut self, language: &str) -> Result<Map<String, Value>> {
        self.migrate_legacy_groups()?;

        let cache_key = single_cache_key(language);
        if let Some(cached) = self.cache.get(&cache_key) {
            return Ok(cached);
        }

        let Some(language_id) = self.language_id(language) else {
            return Ok(Map::new());
        };

        let mut namespaces: BTreeMap<String, Map<String, Value>> = BTreeMap::new();
        for row in &self.data.translations {
            if row.language_id != language_id {
                continue;
            }
            let Some(group) = row.group.as_deref() else {
                continue;
            };
            if !is_single_group(group) {
                continue;
            }
            // Single keys are whole phrases; dots never nest here.
            namespaces
                .entry(group.to_string())
                .or_default()
                .insert(row.key.clone(), Value::String(row.value.clone()));
        }

        let out: Map<String, Value> = namespaces
            .into_iter()
            .map(|(group, values)| (group, Value::Object(values)))
            .collect();
        self.cache.set(&cache_key, out.clone());
        Ok(out)
    }

    fn get_groups_for(&self, language: &str) -> Result<Vec<String>> {
        let Some(language_id) = self.language_id(language) else {
            return Ok(Vec::new());
        };

        let mut groups = Vec::new();
        for row in &self.data.translations {
            if row.language_id != language_id {
                continue;
            }
            if let Some(group) = row.group.as_deref()
                && !is_single_group(group)
                && !groups.iter().any(|g| g == group)
            {
                groups.push(group.to_string());
            }
        }
        groups.sort();
        Ok(groups)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::path::Path;
    use std::rc::Rc;

    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::tempdir;

    use crate::store::cache::MemoryCache;

    use super::*;

    fn scanner() -> Scanner {
        Scanner::new(Vec::new(), Vec::new(), &["__".to_string()]).unwrap()
    }

    fn store(path: &Path) -> TableStore {
        TableStore::new(
            path.to_path_buf(),
            "en".to_string(),
            scanner(),
            Box::new(MemoryCache::default()),
        )
        .unwrap()
    }

    #[test]
    fn test_add_language_and_listing() {
        let dir = tempdir().unwrap();
        let mut store = store(&dir.path().join("table.json"));

        store.add_language("en", None).unwrap();
        store.add_language("es", Some("Español")).unwrap();

        assert_eq!(
            store.all_languages().unwrap(),
            BTreeMap::from([
                ("en".to_string(), "en".to_string()),
                ("es".to_string(), "Español".to_string()),
            ])
        );
        assert!(store.language_exists("es").unwrap());
        assert!(!store.language_exists("fr").unwrap());
    }

    #[test]
    fn test_duplicate_language_fails() {
        let dir = tempdir().unwrap();
        let mut store = store(&dir.path().join("table.json"));

        store.add_language("en", None).unwrap();
        let result = store.add_language("en", Some("English"));
        assert!(matches!(result, Err(Error::LanguageExists { language }) if language == "en"));
    }

    #[test]
    fn test_group_translation_round_trip() {
        let dir = tempdir().unwrap();
        let mut store = store(&dir.path().join("table.json"));

        store.add_group_translation("en", "test", "hello", "Hello").unwrap();
        store.add_group_translation("en", "test", "nested.deep", "Deep").unwrap();

        let groups = store.get_group_translations_for("en").unwrap();
        assert_eq!(
            Value::Object(groups),
            json!({"test": {"hello": "Hello", "nested": {"deep": "Deep"}}})
        );
    }

    #[test]
    fn test_upsert_overwrites_in_place() {
        let dir = tempdir().unwrap();
        let mut store = store(&dir.path().join("table.json"));

        store.add_group_translation("en", "test", "hello", "Hello").unwrap();
        store.add_group_translation("en", "test", "hello", "Hello!").unwrap();

        assert_eq!(store.data.translations.len(), 1);
        let groups = store.get_group_translations_for("en").unwrap();
        assert_eq!(Value::Object(groups), json!({"test": {"hello": "Hello!"}}));
    }

    #[test]
    fn test_single_translation_round_trip() {
        let dir = tempdir().unwrap();
        let mut store = store(&dir.path().join("table.json"));

        store.add_single_translation("es", "single", "Hello", "Hola!").unwrap();
        store
            .add_single_translation("es", "package::single", "Bye", "Adios")
            .unwrap();

        let singles = store.get_single_translations_for("es").unwrap();
        assert_eq!(
            Value::Object(singles),
            json!({
                "package::single": {"Bye": "Adios"},
                "single": {"Hello": "Hola!"},
            })
        );
    }

    #[test]
    fn test_single_namespace_excluded_from_group_reads() {
        let dir = tempdir().unwrap();
        let mut store = store(&dir.path().join("table.json"));

        store.add_group_translation("en", "test", "hello", "Hello").unwrap();
        store.add_single_translation("en", "single", "Hi", "Hi").unwrap();

        let groups = store.get_group_translations_for("en").unwrap();
        assert_eq!(Value::Object(groups), json!({"test": {"hello": "Hello"}}));
        assert_eq!(store.get_groups_for("en").unwrap(), vec!["test"]);
    }

    #[test]
    fn test_writes_auto_create_language() {
        let dir = tempdir().unwrap();
        let mut store = store(&dir.path().join("table.json"));

        store.add_group_translation("de", "test", "hello", "Hallo").unwrap();
        assert!(store.language_exists("de").unwrap());
    }

    #[test]
    fn test_persists_across_instances() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("table.json");

        {
            let mut store = store(&path);
            store.add_group_translation("en", "test", "hello", "Hello").unwrap();
            store.add_single_translation("en", "single", "Hi", "Hi!").unwrap();
        }

        let mut reopened = store(&path);
        let tree = reopened.all_translations_for("en").unwrap();
        assert_eq!(Value::Object(tree.group), json!({"test": {"hello": "Hello"}}));
        assert_eq!(Value::Object(tree.single), json!({"single": {"Hi": "Hi!"}}));
    }

    #[test]
    fn test_malformed_table_file_is_a_hard_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("table.json");
        fs::write(&path, "{ not json").unwrap();

        let result = TableStore::new(
            path,
            "en".to_string(),
            scanner(),
            Box::new(MemoryCache::default()),
        );
        assert!(matches!(result, Err(Error::MalformedData { .. })));
    }

    #[test]
    fn test_legacy_null_groups_migrate_on_single_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("table.json");
        fs::write(
            &path,
            serde_json::to_string(&json!({
                "languages": [{"id": 1, "language": "en", "name": null}],
                "translations": [
                    {"id": 1, "language_id": 1, "group": null, "key": "Hello", "value": "Hello"},
                    {"id": 2, "language_id": 1, "group": "test", "key": "hi", "value": "Hi"},
                ],
            }))
            .unwrap(),
        )
        .unwrap();

        let mut opened = store(&path);
        let singles = opened.get_single_translations_for("en").unwrap();
        assert_eq!(
            Value::Object(singles),
            json!({"single": {"Hello": "Hello"}})
        );

        // Rewritten once; a reopened store sees no null groups left.
        let reopened = store(&path);
        assert!(reopened.data.translations.iter().all(|r| r.group.is_some()));
    }

    #[test]
    fn test_migrate_legacy_groups_counts_and_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("table.json");
        fs::write(
            &path,
            serde_json::to_string(&json!({
                "languages": [{"id": 1, "language": "en", "name": null}],
                "translations": [
                    {"id": 1, "language_id": 1, "group": null, "key": "a", "value": "A"},
                    {"id": 2, "language_id": 1, "group": null, "key": "b", "value": "B"},
                ],
            }))
            .unwrap(),
        )
        .unwrap();

        let mut store = store(&path);
        assert_eq!(store.migrate_legacy_groups().unwrap(), 2);
        assert_eq!(store.migrate_legacy_groups().unwrap(), 0);
    }

    /// Records cache traffic so invalidation can be asserted directly.
    #[derive(Default)]
    struct SpyCache {
        inner: MemoryCache,
        invalidated: Rc<RefCell<Vec<String>>>,
    }

    impl Cache for SpyCache {
        fn get(&self, key: &str) -> Option<Map<String, Value>> {
            self.inner.get(key)
        }
        fn set(&mut self, key: &str, value: Map<String, Value>) {
            self.inner.set(key, value);
        }
        fn invalidate(&mut self, key: &str) {
            self.invalidated.borrow_mut().push(key.to_string());
            self.inner.invalidate(key);
        }
    }

    #[test]
    fn test_writes_invalidate_the_matching_namespace_only() {
        let dir = tempdir().unwrap();
        let invalidated = Rc::new(RefCell::new(Vec::new()));
        let cache = SpyCache {
            inner: MemoryCache::default(),
            invalidated: Rc::clone(&invalidated),
        };
        let mut store = TableStore::new(
            dir.path().join("table.json"),
            "en".to_string(),
            scanner(),
            Box::new(cache),
        )
        .unwrap();

        store.add_group_translation("en", "test", "hello", "Hello").unwrap();
        store.add_single_translation("en", "single", "Hi", "Hi!").unwrap();

        assert_eq!(
            *invalidated.borrow(),
            vec!["language.en.group", "language.en.single"]
        );
    }

    #[test]
    fn test_read_after_write_sees_the_write() {
        let dir = tempdir().unwrap();
        let mut store = store(&dir.path().join("table.json"));

        store.add_group_translation("en", "test", "hello", "Hello").unwrap();
        // Populate the cache, then write behind it.
        let _ = store.get_group_translations_for("en").unwrap();
        store.add_group_translation("en", "test", "hello", "Changed").unwrap();

        let groups = store.get_group_translations_for("en").unwrap();
        assert_eq!(Value::Object(groups), json!({"test": {"hello": "Changed"}}));
    }

    #[test]
    fn test_unknown_language_reads_are_empty() {
        let dir = tempdir().unwrap();
        let mut store = store(&dir.path().join("table.json"));
        assert!(store.get_group_translations_for("fr").unwrap().is_empty());
        assert!(store.get_single_translations_for("fr").unwrap().is_empty());
        assert!(store.get_groups_for("fr").unwrap().is_empty());
    }
}
