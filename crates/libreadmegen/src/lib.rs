//! Generates README documentation for a module from its doc-reflection output.
//!
//! The pipeline reads the module's entry point, obtains structured documentation for its
//! exported symbols, maps each exported symbol to the file that defines it, and renders
//! Markdown with `{@link}` tags resolved to source links.

/// Final document assembly and atomic output.
mod assemble;
/// Documentation item model and reflection output parsing.
mod docs;
/// Error types and result alias.
mod error;
/// Export map construction.
mod exports;
/// Markdown highlighting for terminal previews.
mod highlight;
/// Link tag resolution.
mod links;
/// Top-level generator.
mod readmegen;
/// Reflection tool invocation.
mod reflect;
/// Per-symbol Markdown rendering.
mod render;

pub use crate::assemble::{Layout, assemble, write_atomic};
pub use crate::docs::{
    DocItem, DocKind, Param, Tag, TagKind, doc_items_from_value, parse_doc_items,
};
pub use crate::error::{MALFORMED_INPUT_EXIT_CODE, ReadmeError, Result};
pub use crate::exports::{ExportMap, parse_overrides};
pub use crate::highlight::highlight_markdown;
pub use crate::links::{LinkResolver, LinkTarget, Resolution, resolve};
pub use crate::readmegen::ReadmeGen;
pub use crate::reflect::{DEFAULT_TOOL, DocSource, locate_tool};
pub use crate::render::{RenderedDoc, RenderedSection, Renderer};
