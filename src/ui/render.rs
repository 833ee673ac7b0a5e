//! Values handed to the rendering sink.
//!
//! A [RenderLine] is everything a front end needs to place one node: indentation, decoration,
//! label and style. The tree never writes to a display itself. [RenderLine] prints as plain
//! text through [fmt::Display] and converts into a ratatui [Line] for TUI front ends.

use crate::core::tree::Node;
use crate::ui::icons::Decoration;

use ratatui::style::Style;
use ratatui::text::{Line, Span};

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderLine {
    pub indent: usize,
    pub decoration: Decoration,
    pub label: String,
    pub style: Style,
}

impl RenderLine {
    pub fn from_node(node: &Node, indent_width: usize) -> Self {
        Self {
            indent: node.indent(indent_width),
            decoration: node.decoration(),
            label: node.label().into_owned(),
            style: node.style(),
        }
    }

    /// Decoration plus its separating space, or nothing for a blank decoration.
    fn prefix(&self) -> String {
        if self.decoration.is_blank() {
            String::new()
        } else {
            format!("{} ", self.decoration)
        }
    }
}

impl fmt::Display for RenderLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:indent$}{}{}",
            "",
            self.prefix(),
            self.label,
            indent = self.indent
        )
    }
}

impl From<RenderLine> for Line<'static> {
    fn from(line: RenderLine) -> Self {
        let mut spans = Vec::with_capacity(3);
        if line.indent > 0 {
            spans.push(Span::raw(" ".repeat(line.indent)));
        }
        let prefix = line.prefix();
        if !prefix.is_empty() {
            spans.push(Span::styled(prefix, line.style));
        }
        spans.push(Span::styled(line.label, line.style));
        Line::from(spans)
    }
}
