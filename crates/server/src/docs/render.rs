//! Markdown to HTML rendering.

use pulldown_cmark::{html, Options, Parser};

/// Converts Markdown text to HTML.
///
/// Implementations must be pure and total: any input renders, and the same
/// input always renders to the same output.
pub trait Renderer: Send + Sync {
    /// Render `markdown` to an HTML fragment.
    fn render(&self, markdown: &str) -> String;
}

/// CommonMark renderer with the GitHub-flavoured extensions documentation
/// usually relies on (tables, strikethrough, task lists).
#[derive(Debug, Clone, Copy)]
pub struct MarkdownRenderer {
    options: Options,
}

impl MarkdownRenderer {
    /// Create a renderer with the default extension set.
    pub fn new() -> Self {
        Self {
            options: Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS,
        }
    }

    /// Create a renderer with an explicit option set.
    pub fn with_options(options: Options) -> Self {
        Self { options }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for MarkdownRenderer {
    fn render(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.options);
        let mut out = String::with_capacity(markdown.len() + markdown.len() / 2);
        html::push_html(&mut out, parser);
        out
    }
}
