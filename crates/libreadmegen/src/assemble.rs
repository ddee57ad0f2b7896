//! Final document assembly and output.

use std::{fmt::Write as _, fs, io::Write as _, path::Path};

use tempfile::NamedTempFile;
use tracing::info;

use crate::{error::Result, links::LinkResolver, render::RenderedSection};

/// Fixed parts of the README that do not come from the documentation input.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    /// Document title.
    pub title: String,
    /// Badge or metadata lines shown under the title.
    pub badges: Vec<String>,
    /// Pre-formatted usage snippets, inserted verbatim.
    pub usage: Vec<String>,
}

impl Layout {
    /// Create a layout with only a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Add badge lines.
    pub fn with_badges(mut self, badges: Vec<String>) -> Self {
        self.badges = badges;
        self
    }

    /// Add usage snippets.
    pub fn with_usage(mut self, usage: Vec<String>) -> Self {
        self.usage = usage;
        self
    }
}

/// Top-level sections listed in the table of contents, with their anchors.
const TOC: &[(&str, &str)] = &[
    ("Overview", "overview"),
    ("Usage", "usage"),
    ("Exports", "exports"),
    ("API", "api"),
];

/// Build the full README text.
///
/// Order: title, badges, table of contents, overview, usage, exports, then every rendered
/// section. Export entries link to the same URLs `{@link}` tags would resolve to.
pub fn assemble(
    layout: &Layout,
    overview: &str,
    resolver: &LinkResolver,
    sections: &[RenderedSection],
) -> String {
    let mut out = String::new();
    writeln!(out, "# {}\n", layout.title).expect("write title");

    if !layout.badges.is_empty() {
        for badge in &layout.badges {
            writeln!(out, "{badge}").expect("write badge");
        }
        out.push('\n');
    }

    out.push_str("## Table of Contents\n\n");
    for (label, anchor) in TOC {
        writeln!(out, "- [{label}](#{anchor})").expect("write toc entry");
    }

    out.push_str("\n## Overview\n\n");
    if !overview.is_empty() {
        writeln!(out, "{overview}\n").expect("write overview");
    }

    out.push_str("## Usage\n\n");
    for snippet in &layout.usage {
        writeln!(out, "{}\n", snippet.trim_end()).expect("write usage snippet");
    }

    out.push_str("## Exports\n\n");
    if !resolver.exports().is_empty() {
        for (symbol, _) in resolver.exports() {
            writeln!(out, "- [`{symbol}`]({})", resolver.symbol_url(symbol))
                .expect("write export entry");
        }
        out.push('\n');
    }

    out.push_str("## API\n");
    for section in sections {
        write!(out, "\n{}\n", section.to_markdown()).expect("write section");
    }
    out
}

/// Replace `path` with `contents` in one step.
///
/// The text is written to a temporary file beside `path` and then renamed over it, so a
/// failure leaves any existing file untouched.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.flush()?;
    tmp.persist(path).map_err(|err| err.error)?;

    info!(path = %path.display(), bytes = contents.len(), "wrote document");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{docs::DocKind, exports::ExportMap};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn section(name: &str, body: &str) -> RenderedSection {
        RenderedSection {
            name: name.to_string(),
            kind: DocKind::Function,
            blocks: vec![format!("### `{name}`"), body.to_string()],
        }
    }

    #[test]
    fn document_order() {
        let mut exports = ExportMap::new();
        exports.insert("shuffle", "./filters/shuffle.ts");
        let resolver = LinkResolver::new(exports, "https://x.test/blob/main/", "mod.ts");
        let layout = Layout::new("site-kit")
            .with_badges(vec!["[![JSR](https://jsr.io/badge)](https://jsr.io)".into()])
            .with_usage(vec!["```ts\nimport { shuffle } from \"./mod.ts\";\n```\n".into()]);

        let doc = assemble(
            &layout,
            "Overview text",
            &resolver,
            &[section("shuffle", "Shuffles."), section("sample", "Samples.")],
        );

        assert_eq!(
            doc,
            "# site-kit\n\n\
             [![JSR](https://jsr.io/badge)](https://jsr.io)\n\n\
             ## Table of Contents\n\n\
             - [Overview](#overview)\n\
             - [Usage](#usage)\n\
             - [Exports](#exports)\n\
             - [API](#api)\n\n\
             ## Overview\n\n\
             Overview text\n\n\
             ## Usage\n\n\
             ```ts\nimport { shuffle } from \"./mod.ts\";\n```\n\n\
             ## Exports\n\n\
             - [`shuffle`](https://x.test/blob/main/./filters/shuffle.ts#shuffle)\n\n\
             ## API\n\n\
             ### `shuffle`\n\nShuffles.\n\n\
             ### `sample`\n\nSamples.\n"
        );
    }

    #[test]
    fn empty_parts() {
        let resolver = LinkResolver::new(ExportMap::new(), "", "mod.ts");
        let doc = assemble(&Layout::new("t"), "", &resolver, &[]);
        assert_eq!(
            doc,
            "# t\n\n## Table of Contents\n\n- [Overview](#overview)\n- [Usage](#usage)\n\
             - [Exports](#exports)\n- [API](#api)\n\n## Overview\n\n## Usage\n\n## Exports\n\n## API\n"
        );
    }

    #[test]
    fn atomic_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("README.md");
        fs::write(&path, "old contents that are longer than the new ones").unwrap();

        write_atomic(&path, "new").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");

        let nested = dir.path().join("docs/README.md");
        write_atomic(&nested, "nested").unwrap();
        assert_eq!(fs::read_to_string(&nested).unwrap(), "nested");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }
}
