//! Export map construction from a module's re-export statements.
//!
//! The scan is line-oriented: only trimmed lines starting with `export` are considered, and only
//! two statement shapes are recognised:
//!
//! ```text
//! export { A, B } from "./path.ts";
//! export { default as C } from "./other.ts";
//! ```
//!
//! Anything else is ignored. Symbols that cannot be expressed in these shapes can be supplied
//! through an overrides table.

use std::collections::{BTreeMap, btree_map};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{ReadmeError, Result};

/// `export { A, B } from "path"` with a plain identifier list.
static NAMED_EXPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^export\s*\{\s*([\w$]+(?:\s*,\s*[\w$]+)*)\s*,?\s*\}\s*from\s*["']([^"']+)["']"#)
        .expect("named export pattern is valid")
});

/// `export { default as X } from "path"`.
static DEFAULT_EXPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^export\s*\{\s*default\s+as\s+([\w$]+)\s*\}\s*from\s*["']([^"']+)["']"#)
        .expect("default export pattern is valid")
});

/// Mapping from exported symbol name to the module-relative path that defines it.
///
/// Entries iterate in symbol-name order, so two maps built from the same input always render
/// identically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportMap {
    /// Symbol name to defining path.
    entries: BTreeMap<String, String>,
}

impl ExportMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan `source` for recognised export statements, then merge `overrides` on top.
    ///
    /// When a symbol is exported more than once, the statement that appears last in the source
    /// wins. Override entries win over anything found in the source.
    pub fn build(source: &str, overrides: Option<&BTreeMap<String, String>>) -> Self {
        let mut map = Self::new();
        for line in source.lines() {
            let line = line.trim();
            if !line.starts_with("export") {
                continue;
            }
            if let Some(caps) = NAMED_EXPORT.captures(line) {
                for symbol in caps[1].split(',') {
                    map.insert(symbol.trim(), &caps[2]);
                }
            } else if let Some(caps) = DEFAULT_EXPORT.captures(line) {
                map.insert(&caps[1], &caps[2]);
            }
        }

        if let Some(overrides) = overrides {
            for (symbol, path) in overrides {
                map.insert(symbol, path);
            }
        }
        map
    }

    /// Record `symbol` as defined in `path`, replacing any earlier mapping.
    pub fn insert(&mut self, symbol: impl Into<String>, path: impl Into<String>) {
        self.entries.insert(symbol.into(), path.into());
    }

    /// Path that defines `symbol`, if known.
    pub fn get(&self, symbol: &str) -> Option<&str> {
        self.entries.get(symbol).map(String::as_str)
    }

    /// Number of mapped symbols.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(symbol, path)` pairs in symbol-name order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a ExportMap {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Parse `SYMBOL=PATH` specifications into an overrides table.
///
/// Later specifications for the same symbol replace earlier ones.
pub fn parse_overrides<I, S>(specs: I) -> Result<BTreeMap<String, String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut overrides = BTreeMap::new();
    for spec in specs {
        let spec = spec.as_ref();
        let (symbol, path) = spec
            .split_once('=')
            .map(|(s, p)| (s.trim(), p.trim()))
            .filter(|(s, p)| !s.is_empty() && !p.is_empty())
            .ok_or_else(|| ReadmeError::InvalidOverride(spec.to_string()))?;
        overrides.insert(symbol.to_string(), path.to_string());
    }
    Ok(overrides)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SOURCE: &str = r#"
        // Plugins
        export { cssBanner } from "./plugins/css_banner.ts";
        export { linkIcons, pagefindDefer } from "./processors/mod.ts";
        export { default as shuffle } from './filters/shuffle.ts';
        export * from "./types.ts";
        import { something } from "./internal.ts";
        export const VERSION = "1.0.0";
    "#;

    #[test]
    fn recognises_both_forms() {
        let map = ExportMap::build(SOURCE, None);
        assert_eq!(map.get("cssBanner"), Some("./plugins/css_banner.ts"));
        assert_eq!(map.get("linkIcons"), Some("./processors/mod.ts"));
        assert_eq!(map.get("pagefindDefer"), Some("./processors/mod.ts"));
        assert_eq!(map.get("shuffle"), Some("./filters/shuffle.ts"));
        assert_eq!(map.len(), 4);
    }

    #[test]
    fn ignores_other_lines() {
        let map = ExportMap::build(SOURCE, None);
        assert_eq!(map.get("something"), None);
        assert_eq!(map.get("VERSION"), None);
        assert_eq!(map.get("default as shuffle"), None);
        assert!(ExportMap::build("const x = 1;\nexport default x;\n", None).is_empty());
    }

    #[test]
    fn last_occurrence_wins() {
        let source = "export { X } from \"./a.ts\";\nexport { Y } from \"./c.ts\";\nexport { X } from \"./b.ts\";\n";
        let map = ExportMap::build(source, None);
        assert_eq!(map.get("X"), Some("./b.ts"));
        assert_eq!(map.get("Y"), Some("./c.ts"));
    }

    #[test]
    fn deterministic() {
        let first = ExportMap::build(SOURCE, None);
        let second = ExportMap::build(SOURCE, None);
        assert_eq!(first, second);
        let order: Vec<_> = first.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            order,
            vec!["cssBanner", "linkIcons", "pagefindDefer", "shuffle"]
        );
    }

    #[test]
    fn trailing_comma_and_spacing() {
        let map = ExportMap::build("export {A,  B , } from './x.ts'", None);
        assert_eq!(map.get("A"), Some("./x.ts"));
        assert_eq!(map.get("B"), Some("./x.ts"));
    }

    #[test]
    fn overrides_win() {
        let mut overrides = BTreeMap::new();
        overrides.insert("cssBanner".to_string(), "./plugins/banner.ts".to_string());
        overrides.insert("renamed".to_string(), "./other.ts".to_string());
        let map = ExportMap::build(SOURCE, Some(&overrides));
        assert_eq!(map.get("cssBanner"), Some("./plugins/banner.ts"));
        assert_eq!(map.get("renamed"), Some("./other.ts"));
    }

    #[test]
    fn override_specs() {
        let overrides = parse_overrides(["a=./a.ts", " b = ./b.ts ", "a=./c.ts"]).unwrap();
        assert_eq!(overrides.get("a").map(String::as_str), Some("./c.ts"));
        assert_eq!(overrides.get("b").map(String::as_str), Some("./b.ts"));

        assert!(matches!(
            parse_overrides(["missing-separator"]),
            Err(ReadmeError::InvalidOverride(_))
        ));
        assert!(matches!(
            parse_overrides(["=./a.ts"]),
            Err(ReadmeError::InvalidOverride(_))
        ));
    }
}
