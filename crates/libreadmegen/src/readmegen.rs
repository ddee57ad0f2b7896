use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use tracing::debug;

use super::{
    assemble::{Layout, assemble, write_atomic},
    docs::{DocItem, doc_items_from_value},
    error::*,
    exports::ExportMap,
    links::LinkResolver,
    reflect::DocSource,
    render::Renderer,
};

/// ReadmeGen turns a module's documentation into a single Markdown README.
///
/// A run reads the module entry point, obtains structured documentation for it (normally by
/// running `deno doc --json`), builds an export map from the entry point's re-export
/// statements, renders every documented symbol and assembles the result. Nothing is written
/// until the whole document has been built in memory.
#[derive(Debug, Clone)]
pub struct ReadmeGen {
    /// Module entry point, e.g. `mod.ts`.
    entry: PathBuf,

    /// Prefix for links into the repository's source files.
    base_url: String,

    /// Path used for links to symbols missing from the export map. Defaults to `entry`.
    fallback_path: Option<String>,

    /// Document title. Defaults to the entry point's file stem.
    title: Option<String>,

    /// Badge lines rendered under the title.
    badges: Vec<String>,

    /// Verbatim usage snippets.
    usage: Vec<String>,

    /// Static symbol locations that win over scanned export statements.
    overrides: BTreeMap<String, String>,

    /// Where structured documentation is read from.
    source: DocSource,
}

impl ReadmeGen {
    /// Creates a generator for the module at `entry` with default configuration.
    ///
    /// By default links are relative to the README, the title is the entry's file stem and the
    /// documentation is obtained by running `deno doc --json <entry>`.
    pub fn new(entry: impl Into<PathBuf>) -> Self {
        Self {
            entry: entry.into(),
            base_url: String::new(),
            fallback_path: None,
            title: None,
            badges: Vec::new(),
            usage: Vec::new(),
            overrides: BTreeMap::new(),
            source: DocSource::default(),
        }
    }

    /// Sets the URL prefix for source links, e.g. `https://github.com/org/repo/blob/main/`.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the path linked for symbols that are not in the export map.
    pub fn with_fallback_path(mut self, path: impl Into<String>) -> Self {
        self.fallback_path = Some(path.into());
        self
    }

    /// Sets the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the badge lines.
    pub fn with_badges(mut self, badges: Vec<String>) -> Self {
        self.badges = badges;
        self
    }

    /// Sets the usage snippets.
    pub fn with_usage(mut self, usage: Vec<String>) -> Self {
        self.usage = usage;
        self
    }

    /// Sets the static export overrides.
    pub fn with_overrides(mut self, overrides: BTreeMap<String, String>) -> Self {
        self.overrides = overrides;
        self
    }

    /// Sets where structured documentation comes from.
    pub fn with_doc_source(mut self, source: DocSource) -> Self {
        self.source = source;
        self
    }

    /// Loads and parses the structured documentation for the entry point.
    pub fn inspect(&self) -> Result<Vec<DocItem>> {
        doc_items_from_value(self.source.load(&self.entry)?)
    }

    /// Renders the README and returns it without writing anything.
    pub fn render(&self) -> Result<String> {
        let source = fs::read_to_string(&self.entry)?;
        let items = self.inspect()?;
        debug!(items = items.len(), "loaded documentation items");

        let exports = ExportMap::build(&source, Some(&self.overrides));
        debug!(exports = exports.len(), "built export map");

        let resolver = LinkResolver::new(exports, self.base_url.clone(), self.fallback_path());
        let doc = Renderer::new(&resolver).render(&items);

        let layout = Layout::new(self.title())
            .with_badges(self.badges.clone())
            .with_usage(self.usage.clone());
        Ok(assemble(&layout, &doc.overview, &resolver, &doc.sections))
    }

    /// Renders the README and atomically replaces `output` with it.
    ///
    /// If any step fails, `output` is left untouched.
    pub fn write(&self, output: &Path) -> Result<()> {
        let document = self.render()?;
        write_atomic(output, &document)
    }

    /// Returns the parsed documentation items as pretty-printed JSON.
    pub fn raw_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.inspect()?)?)
    }

    /// Configured title, or the entry's file stem.
    fn title(&self) -> String {
        self.title.clone().unwrap_or_else(|| {
            self.entry
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default()
        })
    }

    /// Configured fallback path, or the entry path with forward slashes.
    fn fallback_path(&self) -> String {
        self.fallback_path
            .clone()
            .unwrap_or_else(|| self.entry.to_string_lossy().replace('\\', "/"))
    }
}
