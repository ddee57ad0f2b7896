//! Resolution of `{@link ...}` tags into Markdown links.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::debug;

use crate::exports::ExportMap;

/// `{@link ref}` or `{@link ref|text}`.
static LINK_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{@link\s+([^\s}|]+)\s*(?:\|([^}]*))?\}")
        .expect("link tag pattern is valid")
});

/// A parsed `{@link}` occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTarget {
    /// Symbol name or absolute URL.
    pub reference: String,
    /// Optional text shown instead of the reference.
    pub display_text: Option<String>,
}

impl LinkTarget {
    /// Create a target with no custom display text.
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            display_text: None,
        }
    }

    /// Attach display text. Blank text is ignored.
    pub fn with_display_text(mut self, text: impl AsRef<str>) -> Self {
        let text = text.as_ref().trim();
        self.display_text = (!text.is_empty()).then(|| text.to_string());
        self
    }

    /// Whether the reference is an absolute `http://` or `https://` URL.
    pub fn is_external(&self) -> bool {
        self.reference.starts_with("http://") || self.reference.starts_with("https://")
    }

    /// Text to show for the link.
    pub fn display(&self) -> &str {
        self.display_text.as_deref().unwrap_or(&self.reference)
    }

    /// Build a target from a regex match of [`LINK_TAG`].
    fn from_captures(caps: &Captures<'_>) -> Self {
        let target = Self::new(&caps[1]);
        match caps.get(2) {
            Some(text) => target.with_display_text(text.as_str()),
            None => target,
        }
    }
}

/// Outcome of resolving a [`LinkTarget`], one variant per resolution rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Absolute URL, used unchanged.
    External(String),
    /// Symbol found in the export map, linked into its defining file.
    ResolvedInternal(String),
    /// Unknown symbol, linked as an anchor into the main module file.
    FallbackInternal(String),
}

impl Resolution {
    /// The resolved URL.
    pub fn url(&self) -> &str {
        match self {
            Self::External(url) | Self::ResolvedInternal(url) | Self::FallbackInternal(url) => url,
        }
    }
}

/// Rewrites link tags in doc text against an export map.
#[derive(Debug, Clone)]
pub struct LinkResolver {
    /// Known symbol locations.
    exports: ExportMap,
    /// Prefix prepended to every internal path.
    base_url: String,
    /// Path used for symbols missing from the export map.
    fallback_path: String,
}

impl LinkResolver {
    /// Create a resolver over `exports`.
    pub fn new(
        exports: ExportMap,
        base_url: impl Into<String>,
        fallback_path: impl Into<String>,
    ) -> Self {
        Self {
            exports,
            base_url: base_url.into(),
            fallback_path: fallback_path.into(),
        }
    }

    /// The export map links are resolved against.
    pub fn exports(&self) -> &ExportMap {
        &self.exports
    }

    /// Decide where `target` points.
    ///
    /// External URLs win over everything, then export-map entries, then the fallback anchor.
    pub fn classify(&self, target: &LinkTarget) -> Resolution {
        let reference = &target.reference;
        if target.is_external() {
            Resolution::External(reference.clone())
        } else if let Some(path) = self.exports.get(reference) {
            Resolution::ResolvedInternal(format!("{}{path}#{reference}", self.base_url))
        } else {
            debug!(symbol = %reference, "link target not exported, using fallback anchor");
            Resolution::FallbackInternal(format!(
                "{}{}#{reference}",
                self.base_url, self.fallback_path
            ))
        }
    }

    /// URL for an exported symbol, applying the same rules as link tags.
    pub fn symbol_url(&self, symbol: &str) -> String {
        self.classify(&LinkTarget::new(symbol)).url().to_string()
    }

    /// Replace every link tag in `text` with a Markdown inline link.
    ///
    /// Text without link tags is returned unchanged.
    pub fn resolve<'t>(&self, text: &'t str) -> Cow<'t, str> {
        LINK_TAG.replace_all(text, |caps: &Captures<'_>| {
            let target = LinkTarget::from_captures(caps);
            let resolution = self.classify(&target);
            format!("[{}]({})", target.display(), resolution.url())
        })
    }
}

/// Resolve link tags in `text` with a one-off resolver.
pub fn resolve(text: &str, exports: &ExportMap, base_url: &str, fallback_path: &str) -> String {
    LinkResolver::new(exports.clone(), base_url, fallback_path)
        .resolve(text)
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const BASE: &str = "https://github.com/org/repo/blob/main/";

    fn resolver() -> LinkResolver {
        let mut exports = ExportMap::new();
        exports.insert("cssBanner", "./plugins/css_banner.ts");
        LinkResolver::new(exports, BASE, "mod.ts")
    }

    #[test]
    fn identity_without_tags() {
        let r = resolver();
        for text in [
            "",
            "plain text",
            "already [resolved](https://example.com) markdown",
            "{@linkcode x} and {link cssBanner}",
            "{@link cssBanner CSS Banner} needs a pipe for display text",
        ] {
            assert_eq!(r.resolve(text), text);
        }
        let once = r.resolve("see {@link cssBanner}").into_owned();
        assert_eq!(r.resolve(&once), once);
    }

    #[test]
    fn external() {
        assert_eq!(
            resolver().resolve("{@link https://example.com}"),
            "[https://example.com](https://example.com)"
        );
        let mut exports = ExportMap::new();
        exports.insert("http://shadow", "./x.ts");
        assert_eq!(
            resolve("{@link http://shadow}", &exports, BASE, "mod.ts"),
            "[http://shadow](http://shadow)"
        );
    }

    #[test]
    fn internal() {
        assert_eq!(
            resolver().resolve("{@link cssBanner}"),
            "[cssBanner](https://github.com/org/repo/blob/main/./plugins/css_banner.ts#cssBanner)"
        );
    }

    #[test]
    fn fallback() {
        assert_eq!(
            resolver().resolve("{@link unknownSym}"),
            "[unknownSym](https://github.com/org/repo/blob/main/mod.ts#unknownSym)"
        );
    }

    #[test]
    fn display_text() {
        let r = resolver();
        let url = "https://github.com/org/repo/blob/main/./plugins/css_banner.ts#cssBanner";
        assert_eq!(
            r.resolve("{@link cssBanner|CSS Banner}"),
            format!("[CSS Banner]({url})")
        );
        assert_eq!(
            r.resolve("{@link cssBanner | CSS Banner }"),
            format!("[CSS Banner]({url})")
        );
        assert_eq!(
            r.resolve("{@link cssBanner }"),
            format!("[cssBanner]({url})")
        );
        assert_eq!(r.resolve("{@link cssBanner|}"), format!("[cssBanner]({url})"));
        assert_eq!(
            r.resolve("{@link https://example.com|the site}"),
            "[the site](https://example.com)"
        );
    }

    #[test]
    fn many_occurrences() {
        let r = resolver();
        assert_eq!(
            r.resolve("Use {@link cssBanner}{@link other|Other}, or {@link https://a.b}."),
            "Use [cssBanner](https://github.com/org/repo/blob/main/./plugins/css_banner.ts#cssBanner)\
             [Other](https://github.com/org/repo/blob/main/mod.ts#other), or [https://a.b](https://a.b)."
        );
    }

    #[test]
    fn classification() {
        let r = resolver();
        assert!(matches!(
            r.classify(&LinkTarget::new("https://x.y")),
            Resolution::External(_)
        ));
        assert!(matches!(
            r.classify(&LinkTarget::new("cssBanner")),
            Resolution::ResolvedInternal(_)
        ));
        assert!(matches!(
            r.classify(&LinkTarget::new("nope")),
            Resolution::FallbackInternal(_)
        ));
    }
}
