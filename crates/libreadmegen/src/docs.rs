//! Documentation items read from the reflection tool's JSON output.
//!
//! The input is a JSON array of nodes in the shape emitted by `deno doc --json`. Each node is
//! converted into a [`DocItem`]; nodes that do not fit the expected shape are skipped. Only a
//! top-level value that is not an array aborts parsing.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{ReadmeError, Result};

/// What kind of symbol a [`DocItem`] documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum DocKind {
    /// The module-level overview.
    ModuleDoc,
    /// A function.
    Function,
    /// A class.
    Class,
    /// A variable or constant.
    Variable,
    /// An interface.
    Interface,
    /// A type alias.
    TypeAlias,
    /// An enum.
    Enum,
    /// A namespace marker.
    Namespace,
    /// An import marker.
    Import,
    /// Any other kind reported by the tool.
    Other(String),
}

impl DocKind {
    /// Whether the kind only marks module structure and has no documentation of its own.
    pub fn is_marker(&self) -> bool {
        matches!(self, Self::Namespace | Self::Import)
    }

    /// The name used by the reflection tool.
    pub fn as_str(&self) -> &str {
        match self {
            Self::ModuleDoc => "moduleDoc",
            Self::Function => "function",
            Self::Class => "class",
            Self::Variable => "variable",
            Self::Interface => "interface",
            Self::TypeAlias => "typeAlias",
            Self::Enum => "enum",
            Self::Namespace => "namespace",
            Self::Import => "import",
            Self::Other(kind) => kind,
        }
    }
}

impl From<&str> for DocKind {
    fn from(kind: &str) -> Self {
        match kind {
            "moduleDoc" => Self::ModuleDoc,
            "function" => Self::Function,
            "class" => Self::Class,
            "variable" => Self::Variable,
            "interface" => Self::Interface,
            "typeAlias" => Self::TypeAlias,
            "enum" => Self::Enum,
            "namespace" => Self::Namespace,
            "import" => Self::Import,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<DocKind> for String {
    fn from(kind: DocKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for DocKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One documented parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Param {
    /// Parameter name. Empty for destructured parameters.
    pub name: String,
    /// Type as written in the source.
    pub type_repr: Option<String>,
    /// Description taken from the matching `@param` tag.
    pub description: Option<String>,
}

/// Doc-comment tag kinds the renderer cares about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TagKind {
    /// `@example`
    Example,
    /// `@see`
    See,
    /// Any other tag.
    Other(String),
}

impl From<&str> for TagKind {
    fn from(kind: &str) -> Self {
        match kind {
            "example" => Self::Example,
            "see" => Self::See,
            other => Self::Other(other.to_string()),
        }
    }
}

/// A doc-comment tag with its body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    /// Tag kind.
    pub kind: TagKind,
    /// Raw tag body.
    pub body: String,
}

/// Documentation for one exported symbol, or for the module itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocItem {
    /// Symbol name. Empty for the module overview.
    pub name: String,
    /// Symbol kind.
    pub kind: DocKind,
    /// Raw doc text.
    pub description: Option<String>,
    /// Parameters in declaration order.
    pub parameters: Vec<Param>,
    /// Description of the return value.
    pub return_description: Option<String>,
    /// Tags in source order, excluding `@param` and `@return`.
    pub tags: Vec<Tag>,
}

impl DocItem {
    /// Create an item with no documentation attached.
    pub fn new(name: impl Into<String>, kind: DocKind) -> Self {
        Self {
            name: name.into(),
            kind,
            description: None,
            parameters: Vec::new(),
            return_description: None,
            tags: Vec::new(),
        }
    }

    /// Whether this is the module overview item.
    pub fn is_module_doc(&self) -> bool {
        self.kind == DocKind::ModuleDoc && self.name.is_empty()
    }

    /// Whether the item gets its own section in the rendered document.
    pub fn is_symbol(&self) -> bool {
        !self.name.is_empty() && self.kind != DocKind::ModuleDoc && !self.kind.is_marker()
    }
}

/// Raw node as emitted by the reflection tool. Unknown fields are ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawNode {
    /// Node kind.
    kind: String,
    /// Symbol name.
    #[serde(default)]
    name: String,
    /// Attached doc comment.
    #[serde(default)]
    js_doc: Option<RawJsDoc>,
    /// Function details.
    #[serde(default)]
    function_def: Option<RawFunctionDef>,
    /// Class details.
    #[serde(default)]
    class_def: Option<RawClassDef>,
}

/// Parsed doc comment.
#[derive(Debug, Default, Deserialize)]
struct RawJsDoc {
    /// Main description.
    #[serde(default)]
    doc: Option<String>,
    /// Block tags.
    #[serde(default)]
    tags: Vec<RawTag>,
}

/// Block tag inside a doc comment.
#[derive(Debug, Deserialize)]
struct RawTag {
    /// Tag name without the `@`.
    kind: String,
    /// Parameter name for `@param`.
    #[serde(default)]
    name: Option<String>,
    /// Tag body.
    #[serde(default, alias = "body")]
    doc: Option<String>,
}

/// Function signature details.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFunctionDef {
    /// Declared parameters.
    #[serde(default)]
    params: Vec<RawParam>,
    /// Declared return type.
    #[serde(default)]
    return_type: Option<RawReturnType>,
}

/// Class details; only constructors are used.
#[derive(Debug, Default, Deserialize)]
struct RawClassDef {
    /// Declared constructors.
    #[serde(default)]
    constructors: Vec<RawConstructor>,
}

/// Class constructor.
#[derive(Debug, Default, Deserialize)]
struct RawConstructor {
    /// Constructor parameters.
    #[serde(default)]
    params: Vec<RawParam>,
}

/// Declared parameter.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawParam {
    /// Parameter name.
    #[serde(default)]
    name: Option<String>,
    /// Parameter type.
    #[serde(default)]
    ts_type: Option<RawTsType>,
    /// Binding of a default-valued parameter (`kind: "assign"`).
    #[serde(default)]
    left: Option<Box<RawParam>>,
    /// Binding of a rest parameter (`kind: "rest"`).
    #[serde(default)]
    arg: Option<Box<RawParam>>,
}

impl RawParam {
    /// The wrapped binding of an `assign` or `rest` parameter.
    fn inner(&self) -> Option<&Self> {
        self.left.as_deref().or(self.arg.as_deref())
    }

    /// Parameter name, looking through `assign` and `rest` wrappers.
    fn name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .filter(|name| !name.is_empty())
            .or_else(|| self.inner().and_then(Self::name))
    }

    /// Non-empty type representation, preferring the outermost annotation.
    fn type_repr(&self) -> Option<String> {
        self.ts_type
            .as_ref()
            .and_then(|ty| non_empty(Some(ty.repr.clone())))
            .or_else(|| self.inner().and_then(Self::type_repr))
    }
}

/// Return type with optional attached docs.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReturnType {
    /// Docs attached to the return type.
    #[serde(default)]
    js_doc: Option<RawJsDoc>,
}

/// Type annotation.
#[derive(Debug, Deserialize)]
struct RawTsType {
    /// Source representation.
    #[serde(default)]
    repr: String,
}

/// Treat blank strings as absent.
fn non_empty(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty())
}

impl From<RawNode> for DocItem {
    fn from(node: RawNode) -> Self {
        let js_doc = node.js_doc.unwrap_or_default();
        let mut item = Self::new(node.name, DocKind::from(node.kind.as_str()));
        item.description = non_empty(js_doc.doc);

        let raw_params: Vec<&RawParam> = match (node.function_def.as_ref(), node.class_def.as_ref()) {
            (Some(def), _) => def.params.iter().collect(),
            (None, Some(class)) => class
                .constructors
                .first()
                .map(|ctor| ctor.params.iter().collect())
                .unwrap_or_default(),
            (None, None) => Vec::new(),
        };

        let mut return_tag = None;
        for tag in &js_doc.tags {
            if matches!(tag.kind.as_str(), "return" | "returns") && return_tag.is_none() {
                return_tag = non_empty(tag.doc.clone());
            }
        }

        item.parameters = raw_params
            .into_iter()
            .map(|param| {
                let name = param.name().unwrap_or_default().to_string();
                let description = js_doc
                    .tags
                    .iter()
                    .find(|tag| tag.kind == "param" && tag.name.as_deref() == Some(name.as_str()))
                    .and_then(|tag| non_empty(tag.doc.clone()));
                Param {
                    type_repr: param.type_repr(),
                    name,
                    description,
                }
            })
            .collect();

        item.return_description = node
            .function_def
            .and_then(|def| def.return_type)
            .and_then(|ret| ret.js_doc)
            .and_then(|doc| non_empty(doc.doc))
            .or(return_tag);

        item.tags = js_doc
            .tags
            .into_iter()
            .filter(|tag| !matches!(tag.kind.as_str(), "param" | "return" | "returns"))
            .filter_map(|tag| {
                Some(Tag {
                    kind: TagKind::from(tag.kind.as_str()),
                    body: tag.doc?,
                })
            })
            .collect();
        item
    }
}

/// Convert an already-parsed JSON value into doc items.
///
/// Fails with [`ReadmeError::MalformedInput`] unless `value` is an array. Array elements that do
/// not match the node shape are skipped.
pub fn doc_items_from_value(value: Value) -> Result<Vec<DocItem>> {
    let Value::Array(nodes) = value else {
        return Err(ReadmeError::MalformedInput(format!(
            "expected an array of documentation nodes, found {}",
            json_type_name(&value)
        )));
    };

    let mut items = Vec::with_capacity(nodes.len());
    for (index, node) in nodes.into_iter().enumerate() {
        match serde_json::from_value::<RawNode>(node) {
            Ok(raw) => items.push(DocItem::from(raw)),
            Err(err) => debug!(index, error = %err, "skipping malformed documentation node"),
        }
    }
    Ok(items)
}

/// Parse the reflection tool's JSON output into doc items.
pub fn parse_doc_items(json: &str) -> Result<Vec<DocItem>> {
    doc_items_from_value(serde_json::from_str(json)?)
}

/// Short JSON type name for diagnostics.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
