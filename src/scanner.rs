//! Static key-extraction scanner.
//!
//! Walks the configured scan paths, matches call sites of the configured
//! translation lookup functions and collects their first string argument into
//! a two-namespace tree. The scan result is the source of truth for which
//! keys the application expects to exist in every language.

use std::path::{Path, PathBuf};

use glob::Pattern;
use regex::Regex;
use serde_json::Value;
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::tree::{TranslationTree, dot_set};

/// Pattern a literal must match to be classified as a `group.key` reference:
/// two or more dot-separated segments of alphanumerics, `:`, `_` and `-`.
/// Anything else is treated as a flat single-namespace string.
const GROUP_KEY_PATTERN: &str = r"^[A-Za-z0-9:_-]+(\.[A-Za-z0-9:_-]+)+$";

#[derive(Debug)]
pub struct Scanner {
    scan_paths: Vec<PathBuf>,
    ignores: Vec<String>,
    call_pattern: Regex,
    group_pattern: Regex,
}

/// Scan result: the key tree plus warnings for files that could not be read.
/// Unreadable files are skipped, not fatal, so partial results are returned.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub tree: TranslationTree,
    pub warnings: Vec<String>,
}

impl Scanner {
    /// Build a scanner for the given paths and lookup-function names.
    ///
    /// A configuration that cannot be compiled into a matcher (no functions,
    /// or an alternation the regex engine rejects) is a construction error.
    pub fn new(
        scan_paths: Vec<PathBuf>,
        ignores: Vec<String>,
        translation_methods: &[String],
    ) -> Result<Self> {
        if translation_methods.is_empty() {
            return Err(Error::Scan {
                detail: "no translation methods configured".to_string(),
            });
        }

        let alternation = translation_methods
            .iter()
            .map(|method| regex::escape(method))
            .collect::<Vec<_>>()
            .join("|");

        // Matches `func("literal")` / `func('literal')`, keeping only the
        // first string argument; a trailing `,` ends the match so later
        // interpolation parameters are ignored. The single character before
        // the function name is captured to reject method-call syntax after
        // the match (the regex engine has no look-behind).
        let call_pattern = Regex::new(&format!(
            r#"(?si)([^\w])({alternation})\(['"](.+?)['"][),]"#
        ))
        .map_err(|e| Error::Scan {
            detail: e.to_string(),
        })?;

        let group_pattern = Regex::new(GROUP_KEY_PATTERN).map_err(|e| Error::Scan {
            detail: e.to_string(),
        })?;

        Ok(Self {
            scan_paths,
            ignores,
            call_pattern,
            group_pattern,
        })
    }

    /// Scan all files under the configured paths for translation keys.
    ///
    /// Placeholder values are the empty string; duplicate literals across
    /// files collapse to one entry.
    pub fn find_translations(&self) -> ScanOutcome {
        let mut outcome = ScanOutcome::default();
        let ignore_patterns = self.compiled_ignores();

        for root in &self.scan_paths {
            if !root.exists() {
                continue;
            }
            for entry in WalkDir::new(root) {
                let entry = match entry {
                    Ok(e) => e,
                    Err(e) => {
                        outcome.warnings.push(format!("cannot access path: {e}"));
                        continue;
                    }
                };
                let path = entry.path();
                if !entry.file_type().is_file() || self.is_ignored(path, &ignore_patterns) {
                    continue;
                }

                match std::fs::read_to_string(path) {
                    Ok(contents) => self.scan_contents(&contents, &mut outcome.tree),
                    Err(e) => outcome
                        .warnings
                        .push(format!("skipped {}: {e}", path.display())),
                }
            }
        }

        outcome
    }

    fn scan_contents(&self, contents: &str, tree: &mut TranslationTree) {
        for captures in self.call_pattern.captures_iter(contents) {
            let Some(lead) = captures.get(1) else {
                continue;
            };
            // Reject `->func(` and `.func(`: a lookup function called as a
            // method on something else is not a translation reference.
            let lead_str = lead.as_str();
            if lead_str == "." {
                continue;
            }
            if lead_str == ">" && contents[..lead.start()].ends_with('-') {
                continue;
            }

            let Some(literal) = captures.get(3) else {
                continue;
            };
            let literal = literal.as_str();

            if self.group_pattern.is_match(literal) {
                dot_set(&mut tree.group, literal, Value::String(String::new()));
            } else {
                let singles = tree
                    .single
                    .entry("single".to_string())
                    .or_insert_with(|| Value::Object(serde_json::Map::new()));
                if let Value::Object(map) = singles {
                    // Flat literals go in verbatim; dots inside a sentence do
                    // not create nesting.
                    map.entry(literal.to_string())
                        .or_insert_with(|| Value::String(String::new()));
                }
            }
        }
    }

    fn compiled_ignores(&self) -> Vec<IgnorePattern> {
        self.ignores
            .iter()
            .filter_map(|p| {
                if p.contains('*') || p.contains('?') {
                    Pattern::new(p).ok().map(IgnorePattern::Glob)
                } else {
                    Some(IgnorePattern::Literal(PathBuf::from(p)))
                }
            })
            .collect()
    }

    fn is_ignored(&self, path: &Path, patterns: &[IgnorePattern]) -> bool {
        let path_str = path.to_string_lossy();
        patterns.iter().any(|pattern| match pattern {
            IgnorePattern::Glob(glob) => glob.matches(&path_str),
            IgnorePattern::Literal(prefix) => path.starts_with(prefix),
        })
    }
}

enum IgnorePattern {
    Glob(Pattern),
    Literal(PathBuf),
}
