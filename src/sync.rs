//! Cross-backend catalog synchronisation.
//!
//! Copies every translation the source backend holds into the destination
//! backend through the write contract, so each backend keeps its own storage
//! shape. Existing destination values are overwritten; keys only the
//! destination has are left alone.

use serde_json::{Map, Value};

use crate::error::Result;
use crate::store::{Driver, Translations};
use crate::tree::leaf_to_string;

/// Copy one language, or every language the source knows, from `from` into
/// `to`.
pub fn sync(from: &mut Driver, to: &mut Driver, language: Option<&str>) -> Result<()> {
    let languages: Vec<String> = match language {
        Some(language) => vec![language.to_string()],
        None => from.all_languages()?.into_keys().collect(),
    };

    for language in languages {
        if !to.language_exists(&language)? {
            to.add_language(&language, None)?;
        }

        let tree = from.all_translations_for(&language)?;

        for (group, values) in &tree.group {
            if let Value::Object(values) = values {
                copy_group(to, &language, group, values, "")?;
            }
        }

        for (namespace, values) in &tree.single {
            if let Value::Object(values) = values {
                for (key, value) in values {
                    to.add_single_translation(&language, namespace, key, &leaf_to_string(value))?;
                }
            }
        }
    }

    Ok(())
}

/// Depth-first walk of one group's nested values, re-joining the path into a
/// dotted key at each leaf.
fn copy_group(
    to: &mut Driver,
    language: &str,
    group: &str,
    values: &Map<String, Value>,
    prefix: &str,
) -> Result<()> {
    for (key, value) in values {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Value::Object(nested) => copy_group(to, language, group, nested, &path)?,
            leaf => to.add_group_translation(language, group, &path, &leaf_to_string(leaf))?,
        }
    }
    Ok(())
}
