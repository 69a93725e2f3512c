//! Nested translation tree transforms.
//!
//! Every backend materialises translations as a two-namespace tree:
//! `group` holds file-per-group translations whose keys may be dotted paths,
//! `single` holds flat string-keyed translations per vendor. Writers take
//! dotted keys while readers return nested trees, so the `flatten` and
//! `unflatten` transforms are used everywhere that boundary is crossed.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// The materialised, in-memory shape of a language's translations.
///
/// Both backends must produce identical shapes for identical data so the
/// engine operations stay backend-agnostic.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TranslationTree {
    pub group: Map<String, Value>,
    pub single: Map<String, Value>,
}

impl TranslationTree {
    pub fn is_empty(&self) -> bool {
        self.group.is_empty() && self.single.is_empty()
    }

    /// Structural set-difference against another tree: a key survives iff it
    /// is absent at the same path in `other`, regardless of value.
    pub fn diff(&self, other: &TranslationTree) -> TranslationTree {
        TranslationTree {
            group: diff(&self.group, &other.group),
            single: diff(&self.single, &other.single),
        }
    }
}

/// One row of a three-way language comparison. `None` means the language has
/// no entry at all for the key, which is distinct from an empty-string
/// translation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    /// Value in the comparison source language.
    pub source: String,
    /// Value in the target language, if any.
    pub target: Option<String>,
    /// Value in the application's default language, if any.
    pub default: Option<String>,
}

/// Flattened `key -> row` comparisons per group, per namespace.
pub type GroupComparison = BTreeMap<String, ComparisonRow>;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComparisonTree {
    pub group: BTreeMap<String, GroupComparison>,
    pub single: BTreeMap<String, GroupComparison>,
}

/// Set `key` in `map`, expanding dots into nested objects. Intermediate
/// scalar values are replaced by objects, matching `Arr::set` semantics.
pub fn dot_set(map: &mut Map<String, Value>, key: &str, value: Value) {
    match key.split_once('.') {
        None => {
            map.insert(key.to_string(), value);
        }
        Some((head, rest)) => {
            let entry = map
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            if let Value::Object(inner) = entry {
                dot_set(inner, rest, value);
            }
        }
    }
}

/// Flatten a nested tree into a single-level map keyed by dot-joined paths.
pub fn flatten(map: &Map<String, Value>) -> Map<String, Value> {
    let mut out = Map::new();
    flatten_into("", map, &mut out);
    out
}

fn flatten_into(prefix: &str, map: &Map<String, Value>, out: &mut Map<String, Value>) {
    for (key, value) in map {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match value {
            Value::Object(nested) => flatten_into(&path, nested, out),
            leaf => {
                out.insert(path, leaf.clone());
            }
        }
    }
}

/// Rebuild a nested tree from a flattened dotted-key map. Inverse of
/// [`flatten`] for well-formed trees; empty nested maps do not survive the
/// round-trip (they flatten to nothing), which both backends rely on.
pub fn unflatten(flat: &Map<String, Value>) -> Map<String, Value> {
    let mut out = Map::new();
    for (key, value) in flat {
        dot_set(&mut out, key, value.clone());
    }
    out
}

fn diff(expected: &Map<String, Value>, actual: &Map<String, Value>) -> Map<String, Value> {
    let mut out = Map::new();
    for (key, value) in expected {
        match actual.get(key) {
            None => {
                out.insert(key.clone(), value.clone());
            }
            Some(Value::Object(actual_nested)) => {
                if let Value::Object(nested) = value {
                    let missing = diff(nested, actual_nested);
                    if !missing.is_empty() {
                        out.insert(key.clone(), Value::Object(missing));
                    }
                }
            }
            // A leaf exists at this path, so the key is present no matter
            // what the stored value is. An empty string is a known,
            // untranslated key, not a missing one.
            Some(_) => {}
        }
    }
    out
}

/// Sort object keys ascending at every level. Group files are written from
/// sorted trees so repeated writes produce stable diffs.
pub fn sort_recursive(map: &Map<String, Value>) -> Map<String, Value> {
    let sorted: BTreeMap<&String, &Value> = map.iter().collect();
    let mut out = Map::new();
    for (key, value) in sorted {
        let value = match value {
            Value::Object(nested) => Value::Object(sort_recursive(nested)),
            other => other.clone(),
        };
        out.insert(key.clone(), value);
    }
    out
}

/// Split a `vendor::group` name into its namespace and base group.
pub fn split_vendor(group: &str) -> (Option<&str>, &str) {
    match group.split_once("::") {
        Some((vendor, base)) => (Some(vendor), base),
        None => (None, group),
    }
}

/// Render a leaf value the way it is surfaced to users and comparison rows.
pub fn leaf_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
