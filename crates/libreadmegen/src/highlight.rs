//! Terminal highlighting for Markdown previews.

use once_cell::sync::Lazy;
use syntect::{
    easy::HighlightLines,
    highlighting::{Style, Theme, ThemeSet},
    parsing::{SyntaxReference, SyntaxSet},
    util::{LinesWithEndings, as_24_bit_terminal_escaped},
};

use crate::{Result, ReadmeError};

/// Lazily loaded syntect syntax definitions including newline handling.
static SYNTAX_SET: Lazy<SyntaxSet> = Lazy::new(SyntaxSet::load_defaults_newlines);
/// Shared theme catalog for syntax highlighting.
static THEME_SET: Lazy<ThemeSet> = Lazy::new(ThemeSet::load_defaults);
/// Cached lookup for the Markdown syntax definition.
static MARKDOWN_SYNTAX: Lazy<Option<&'static SyntaxReference>> =
    Lazy::new(|| SYNTAX_SET.find_syntax_by_extension("md"));
/// Reference to the Solarized (dark) theme used for highlighting output.
static SOLARIZED_THEME: Lazy<Option<&'static Theme>> =
    Lazy::new(|| THEME_SET.themes.get("Solarized (dark)"));

/// Applies ANSI syntax highlighting to a Markdown document.
pub fn highlight_markdown(text: &str) -> Result<String> {
    let syntax = MARKDOWN_SYNTAX
        .ok_or_else(|| ReadmeError::Highlight("Markdown syntax not found".to_string()))?;
    let theme = SOLARIZED_THEME
        .ok_or_else(|| ReadmeError::Highlight("Solarized (dark) theme not found".to_string()))?;
    let mut h = HighlightLines::new(syntax, theme);

    let mut output = String::new();
    for line in LinesWithEndings::from(text) {
        let ranges: Vec<(Style, &str)> = h.highlight_line(line, &SYNTAX_SET)?;
        output.push_str(&as_24_bit_terminal_escaped(&ranges[..], false));
    }
    // Reset colours so the terminal is left clean.
    output.push_str("\x1b[0m");
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emits_escapes_and_keeps_text() {
        let out = highlight_markdown("# Title\n\nSome `code`.\n").unwrap();
        assert!(out.contains("\x1b["));
        assert!(out.contains("Title"));
        assert!(out.contains("code"));
    }
}
