//! Page rendering for the terminal
//!
//! This module turns the page a [`Paginator`] currently displays into text:
//! - A `Page N (rows a-b)` header
//! - One line per displayed row, indented by nesting depth
//! - Panel title rows and placeholders styled apart from plain rows
//! - An end marker telling whether more pages follow

use nu_ansi_term::{Color, Style};

use crate::config::DisplayConfig;
use crate::engine::{Component, NodeView, PageBoundary, Paginatable, Paginator};

/// Text shown for a container that has no template.
pub const PLACEHOLDER_TEXT: &str = "(no template)";

/// Main formatter for pages
pub struct Formatter {
    /// Colorizer for output highlighting
    colorizer: Colorizer,

    /// Spaces per nesting level
    indent: usize,

    /// Print the page header
    show_header: bool,
}

/// Color scheme for output highlighting
pub struct Colorizer {
    /// Enable colors
    enabled: bool,
}

impl Formatter {
    /// Create a new formatter
    ///
    /// # Arguments
    /// * `config` - Display settings
    ///
    /// # Returns
    /// * `Self` - New formatter instance
    pub fn new(config: &DisplayConfig) -> Self {
        Self {
            colorizer: Colorizer::new(config.color_output),
            indent: config.indent,
            show_header: config.show_page_header,
        }
    }

    /// Format the page on display
    ///
    /// Returns a hint line when no page has been produced yet.
    pub fn format_page<T>(&self, paginator: &Paginator<T>) -> String
    where
        T: Clone + Send + Sync + 'static,
    {
        let Some(page) = paginator.current() else {
            return self.colorizer.marker("(nothing displayed yet)");
        };

        let mut lines = Vec::new();
        if self.show_header {
            lines.push(self.colorizer.header(&page_header(page)));
        }
        self.write_view(paginator.root().view(), 0, &mut lines);
        lines.push(self.colorizer.marker(end_marker(page)));
        lines.join("\n")
    }

    /// Format only the rows of the page on display, without header or marker
    pub fn format_rows(&self, view: NodeView<'_>) -> Vec<String> {
        let mut lines = Vec::new();
        self.write_view(view, 0, &mut lines);
        lines
    }

    fn write_view(&self, view: NodeView<'_>, depth: usize, lines: &mut Vec<String>) {
        if view.placeholder {
            lines.push(self.line(depth, &self.colorizer.marker(PLACEHOLDER_TEXT)));
        }
        for child in view.children {
            self.write_child(child, depth, lines);
        }
    }

    fn write_child(&self, child: &dyn Component, depth: usize, lines: &mut Vec<String>) {
        let Some(paginatable) = child.as_paginatable_ref() else {
            lines.push(self.line(depth, &child.label()));
            return;
        };

        let view = paginatable.view();
        if view.own_row {
            lines.push(self.line(depth, &self.colorizer.title(&child.label())));
        }
        if view.children.is_empty() && !view.own_row && !view.placeholder {
            // Paginates without exposing children: one line per row it reported.
            for _ in 0..paginatable.pagination().rows_displayed {
                lines.push(self.line(depth, &child.label()));
            }
            return;
        }
        self.write_view(view, depth + 1, lines);
    }

    fn line(&self, depth: usize, text: &str) -> String {
        format!("{:width$}{text}", "", width = depth * self.indent)
    }
}

/// Header line for a page, with 1-based page and row numbers
pub fn page_header(page: &PageBoundary) -> String {
    let number = page.current_page + 1;
    if page.rows_displayed == 0 {
        return format!("Page {number} (no rows)");
    }
    let first = page.current_index + 1;
    let last = page.current_index + page.rows_displayed;
    format!("Page {number} (rows {first}-{last})")
}

/// Marker printed under a page
pub fn end_marker(page: &PageBoundary) -> &'static str {
    if page.has_next() {
        "-- more --"
    } else {
        "(end)"
    }
}

impl Colorizer {
    /// Create a new colorizer
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Whether colors are applied
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn header(&self, text: &str) -> String {
        self.paint(Color::Cyan.bold(), text)
    }

    pub fn title(&self, text: &str) -> String {
        self.paint(Style::new().bold(), text)
    }

    pub fn marker(&self, text: &str) -> String {
        self.paint(Color::DarkGray.dimmed(), text)
    }

    pub fn error(&self, text: &str) -> String {
        self.paint(Color::Red.bold(), text)
    }

    fn paint(&self, style: Style, text: &str) -> String {
        if self.enabled {
            style.paint(text).to_string()
        } else {
            text.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::PaginationNode;
    use crate::source::JsonTemplate;
    use serde_json::{Value, json};
    use std::sync::Arc;

    fn plain() -> Formatter {
        Formatter::new(&DisplayConfig {
            color_output: false,
            show_page_header: true,
            indent: 2,
        })
    }

    fn paginator(items: Value, rows: usize) -> Paginator<Value> {
        let items = match items {
            Value::Array(items) => items,
            other => vec![other],
        };
        let root = PaginationNode::from_items(items).with_template(Arc::new(JsonTemplate));
        Paginator::new(root, rows)
    }

    #[tokio::test]
    async fn test_format_flat_page() {
        let mut paginator = paginator(json!(["a", "b", "c"]), 2);
        paginator.jump_to_first_page().await.unwrap();

        assert_eq!(
            plain().format_page(&paginator),
            "Page 1 (rows 1-2)\na\nb\n-- more --"
        );

        paginator.next_page().await.unwrap();
        assert_eq!(plain().format_page(&paginator), "Page 2 (rows 3-3)\nc\n(end)");
    }

    #[tokio::test]
    async fn test_format_nested_panels() {
        let mut paginator = paginator(
            json!(["top", {"title": "Group", "items": ["x", {"items": ["deep"]}]}]),
            0,
        );
        paginator.jump_to_first_page().await.unwrap();

        let text = plain().format_page(&paginator);
        assert_eq!(
            text,
            "Page 1 (rows 1-4)\ntop\nGroup\n  x\n    deep\n(end)"
        );
    }

    #[tokio::test]
    async fn test_format_placeholder() {
        let mut paginator: Paginator<Value> =
            Paginator::new(PaginationNode::from_items(vec![json!(1)]), 5);
        paginator.jump_to_first_page().await.unwrap();

        assert_eq!(
            plain().format_rows(paginator.root().view()),
            vec![PLACEHOLDER_TEXT.to_string()]
        );
    }

    #[test]
    fn test_format_before_first_page() {
        let paginator = paginator(json!([]), 5);
        assert_eq!(plain().format_page(&paginator), "(nothing displayed yet)");
    }

    #[tokio::test]
    async fn test_empty_source_header() {
        let mut paginator = paginator(json!([]), 5);
        paginator.jump_to_first_page().await.unwrap();
        assert_eq!(plain().format_page(&paginator), "Page 1 (no rows)\n(end)");
    }

    #[test]
    fn test_colorizer_toggle() {
        assert_eq!(Colorizer::new(false).header("Page 1"), "Page 1");
        let colored = Colorizer::new(true).header("Page 1");
        assert!(colored.contains("Page 1"));
        assert_ne!(colored, "Page 1");
    }
}
