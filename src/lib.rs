//! Localized-string catalog management for Laravel-style applications.
//!
//! Translation keys live in two namespaces: dotted `group.key` references
//! resolved against per-group files, and flat natural-language strings. Two
//! interchangeable backends store them (a directory of PHP array-literal and
//! JSON files, and a row-oriented table file), and the engine operations on
//! top of the store contract find missing keys, merge languages for review
//! and copy whole catalogs between backends.

pub mod cli;
pub mod config;
pub mod error;
pub mod php;
pub mod scanner;
pub mod store;
pub mod sync;
pub mod tree;
