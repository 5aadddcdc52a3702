//! Named code lookup backed by an INI-style key/value source
//!
//! A code book maps friendly names to pointer paths, e.g.
//!
//! ```ini
//! [codes]
//! health = base+00A1B2C4,10,4
//! player_name = engine.dll+2F00
//! ```
//!
//! Section and key names match case-insensitively. Values are trimmed and a
//! single pair of surrounding quotes is removed.

use crate::core::types::MemoryResult;
use std::collections::btree_map::{self, BTreeMap};
use std::fs;
use std::path::Path;
use tracing::{debug, trace};

/// Section that holds code aliases
pub const CODES_SECTION: &str = "codes";

/// Parsed key/value sections
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeBook {
    sections: BTreeMap<String, BTreeMap<String, String>>,
}

impl CodeBook {
    /// Creates an empty book
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a book from a file on disk
    pub fn load<P: AsRef<Path>>(path: P) -> MemoryResult<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        let book = Self::parse(&contents);
        debug!(
            path = %path.as_ref().display(),
            codes = book.len(),
            "loaded code book"
        );
        Ok(book)
    }

    /// Parses INI-style text. Lines that are neither a section header nor a
    /// `key=value` pair are ignored, as are entries before the first header.
    /// When a key repeats within a section the first value is kept, matching
    /// `GetPrivateProfileString`.
    pub fn parse(contents: &str) -> Self {
        let mut book = CodeBook::new();
        let mut section: Option<String> = None;

        for (number, raw) in contents.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
                continue;
            }

            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                section = Some(name.trim().to_ascii_lowercase());
                continue;
            }

            match (&section, line.split_once('=')) {
                (Some(current), Some((key, value))) => {
                    if !book.insert_first(current, key, value) {
                        debug!(section = %current, key = key.trim(), "duplicate key ignored");
                    }
                }
                _ => trace!(line = number + 1, "skipping line"),
            }
        }

        book
    }

    /// Builds a book whose `codes` section holds the given entries
    pub fn from_codes<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut book = CodeBook::new();
        for (key, value) in entries {
            book.insert(CODES_SECTION, key.as_ref(), value.as_ref());
        }
        book
    }

    /// Inserts or replaces an entry
    pub fn insert(&mut self, section: &str, key: &str, value: &str) {
        self.section_mut(section)
            .insert(key.trim().to_ascii_lowercase(), unquote(value.trim()).to_string());
    }

    /// Inserts an entry only when the key is not present yet
    fn insert_first(&mut self, section: &str, key: &str, value: &str) -> bool {
        match self.section_mut(section).entry(key.trim().to_ascii_lowercase()) {
            btree_map::Entry::Vacant(slot) => {
                slot.insert(unquote(value.trim()).to_string());
                true
            }
            btree_map::Entry::Occupied(_) => false,
        }
    }

    fn section_mut(&mut self, section: &str) -> &mut BTreeMap<String, String> {
        self.sections
            .entry(section.trim().to_ascii_lowercase())
            .or_default()
    }

    /// Looks up `key` in `section`
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(&section.trim().to_ascii_lowercase())?
            .get(&key.trim().to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Looks up a code alias
    pub fn code(&self, name: &str) -> Option<&str> {
        self.get(CODES_SECTION, name)
    }

    /// Merges entries from `other`, which take precedence
    pub fn merge(&mut self, other: &CodeBook) {
        for (section, entries) in &other.sections {
            for (key, value) in entries {
                self.insert(section, key, value);
            }
        }
    }

    /// Number of code aliases
    pub fn len(&self) -> usize {
        self.sections.get(CODES_SECTION).map_or(0, BTreeMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
        .unwrap_or(value)
}

/// Returns the pointer path for `name`.
///
/// With a book the name is looked up in the `codes` section and a missing entry
/// yields an empty string, which later fails to parse. Without a book the name
/// is itself the pointer path.
pub fn load_code<'a>(name: &'a str, book: Option<&'a CodeBook>) -> &'a str {
    match book {
        Some(book) => book.code(name).unwrap_or(""),
        None => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"
; player values
[Codes]
Health = base+00A1B2C4,10,4
name="engine.dll+2F00"
broken line without equals

[other]
health = 1234
"#;

    #[test]
    fn test_parse_sections() {
        let book = CodeBook::parse(SAMPLE);
        assert_eq!(book.code("health"), Some("base+00A1B2C4,10,4"));
        assert_eq!(book.code("NAME"), Some("engine.dll+2F00"));
        assert_eq!(book.get("other", "health"), Some("1234"));
        assert_eq!(book.len(), 2);
    }

    #[test]
    fn test_entries_before_header_are_ignored() {
        let book = CodeBook::parse("orphan=1\n[codes]\nx=2\n");
        assert_eq!(book.code("orphan"), None);
        assert_eq!(book.code("x"), Some("2"));
    }

    #[test]
    fn test_load_code_with_and_without_book() {
        let book = CodeBook::from_codes([("ammo", "game.exe+44")]);
        assert_eq!(load_code("ammo", Some(&book)), "game.exe+44");
        assert_eq!(load_code("missing", Some(&book)), "");
        assert_eq!(load_code("game.exe+44", None), "game.exe+44");
    }

    #[test]
    fn test_first_duplicate_key_wins() {
        let book = CodeBook::parse("[codes]\nhp=base+10\nHP=base+20\n[codes]\nhp=base+30\n");
        assert_eq!(book.code("hp"), Some("base+10"));
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn test_insert_replaces() {
        let mut book = CodeBook::parse("[codes]\nhp=base+10\n");
        book.insert(CODES_SECTION, "hp", "base+20");
        assert_eq!(book.code("hp"), Some("base+20"));
    }

    #[test]
    fn test_merge_prefers_other() {
        let mut base = CodeBook::from_codes([("a", "1"), ("b", "2")]);
        let overrides = CodeBook::from_codes([("b", "3")]);
        base.merge(&overrides);
        assert_eq!(base.code("a"), Some("1"));
        assert_eq!(base.code("b"), Some("3"));
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("\"x\""), "x");
        assert_eq!(unquote("'x'"), "x");
        assert_eq!(unquote("\"x"), "\"x");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("codes.ini");
        std::fs::write(&path, SAMPLE).unwrap();

        let book = CodeBook::load(&path).unwrap();
        assert_eq!(book.code("health"), Some("base+00A1B2C4,10,4"));

        assert!(CodeBook::load(dir.path().join("absent.ini")).is_err());
    }
}
