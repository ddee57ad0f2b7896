use tracing::warn;

use crate::{
    docs::{DocItem, DocKind, Param, TagKind},
    links::LinkResolver,
};

/// Markdown heading prefix for symbol sections, nested under the `## API` section.
const SYMBOL_HEADING: &str = "###";

/// Markdown for one documented symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedSection {
    /// Symbol name.
    pub name: String,
    /// Symbol kind.
    pub kind: DocKind,
    /// Markdown blocks in output order, starting with the heading.
    pub blocks: Vec<String>,
}

impl RenderedSection {
    /// Join the blocks into one Markdown fragment.
    pub fn to_markdown(&self) -> String {
        self.blocks.join("\n\n")
    }
}

/// Output of a render pass: the module overview plus one section per symbol.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedDoc {
    /// Resolved module-level description. Empty when the module is undocumented.
    pub overview: String,
    /// Per-symbol sections in input order.
    pub sections: Vec<RenderedSection>,
}

/// Renders [`DocItem`]s into Markdown sections, resolving link tags as it goes.
#[derive(Debug, Clone)]
pub struct Renderer<'a> {
    /// Resolver applied to all prose. Example bodies are never resolved.
    resolver: &'a LinkResolver,
}

impl<'a> Renderer<'a> {
    /// Create a renderer that resolves links with `resolver`.
    pub fn new(resolver: &'a LinkResolver) -> Self {
        Self { resolver }
    }

    /// Render the overview and every symbol section.
    pub fn render(&self, items: &[DocItem]) -> RenderedDoc {
        let overview = match items.iter().find(|item| item.is_module_doc()) {
            Some(module) => module
                .description
                .as_deref()
                .map(|doc| self.resolver.resolve(doc).trim().to_string())
                .unwrap_or_default(),
            None => {
                warn!("no module documentation found, overview will be empty");
                String::new()
            }
        };

        let sections = items
            .iter()
            .filter(|item| item.is_symbol())
            .map(|item| self.render_item(item))
            .collect();

        RenderedDoc { overview, sections }
    }

    /// Render a single symbol.
    pub fn render_item(&self, item: &DocItem) -> RenderedSection {
        let mut blocks = vec![format!("{SYMBOL_HEADING} `{}`", item.name)];

        present(&mut blocks, item.description.as_deref(), |doc| {
            self.resolve(doc)
        });
        present(
            &mut blocks,
            (!item.parameters.is_empty()).then_some(item.parameters.as_slice()),
            |params| self.render_params(params),
        );
        present(&mut blocks, item.return_description.as_deref(), |doc| {
            format!("**Returns:** {}", self.resolve(doc))
        });
        for tag in &item.tags {
            present(
                &mut blocks,
                (tag.kind == TagKind::Example).then_some(tag.body.as_str()),
                render_example,
            );
            present(
                &mut blocks,
                (tag.kind == TagKind::See).then_some(tag.body.as_str()),
                |see| format!("_See also: {}_", self.resolve(see)),
            );
        }

        RenderedSection {
            name: item.name.clone(),
            kind: item.kind.clone(),
            blocks,
        }
    }

    /// Resolve links in prose and trim surrounding whitespace.
    fn resolve(&self, text: &str) -> String {
        self.resolver.resolve(text.trim()).into_owned()
    }

    /// Bullet list with one line per parameter.
    fn render_params(&self, params: &[Param]) -> String {
        let mut out = String::from("**Parameters:**\n");
        for param in params {
            out.push('\n');
            out.push_str(&self.render_param(param));
        }
        out
    }

    /// `- `name` (`type`): description`, omitting missing parts.
    fn render_param(&self, param: &Param) -> String {
        let mut line = String::from("-");
        if !param.name.is_empty() {
            line.push_str(&format!(" `{}`", param.name));
        }
        if let Some(ty) = &param.type_repr {
            line.push_str(&format!(" (`{ty}`)"));
        }
        if let Some(doc) = &param.description {
            line.push_str(&format!(": {}", self.resolve(doc)));
        }
        line
    }
}

/// Push the block produced by `render` when `value` is present; absent values emit nothing.
fn present<T>(blocks: &mut Vec<String>, value: Option<T>, render: impl FnOnce(T) -> String) {
    if let Some(value) = value {
        blocks.push(render(value));
    }
}

/// Fence an example body. Bodies that already carry their own fence are kept as written.
fn render_example(body: &str) -> String {
    let body = body.trim_matches('\n').trim_end();
    if body.trim_start().starts_with("```") {
        body.to_string()
    } else {
        format!("```ts\n{body}\n```")
    }
}
