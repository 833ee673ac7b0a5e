//! Theme configuration options for treeline
//!
//! This module defines the colors used for tree nodes, read from the `[theme]` section of
//! treeline.toml, and resolves a node's [Style] from its kind and version control status.

use crate::core::vcs::VcsStatus;
use crate::utils::parse_color;

use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

/// Theme configuration options
/// # Examples
/// ```toml
/// [theme.directory]
/// fg = "blue"
/// [theme.vcs.modified]
/// fg = "#e5c07b"
/// ```
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Theme {
    directory: ColorPair,
    entry: ColorPair,
    vcs: VcsTheme,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            directory: ColorPair {
                fg: Color::Blue,
                ..ColorPair::default()
            },
            entry: ColorPair::default(),
            vcs: VcsTheme::default(),
        }
    }
}

impl Theme {
    /// Fixed style for every directory node.
    pub fn directory_style(&self) -> Style {
        self.directory.style().add_modifier(Modifier::BOLD)
    }

    /// Base style for files with no known status.
    pub fn entry_style(&self) -> Style {
        self.entry.style()
    }

    /// File style: the entry style with the status highlight patched on top.
    /// A missing status leaves the base style untouched.
    pub fn file_style(&self, status: Option<VcsStatus>) -> Style {
        let base = self.entry_style();
        match status {
            Some(status) => base.patch(self.vcs.overlay(status)),
            None => base,
        }
    }
}

/// Per-status highlight colors.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct VcsTheme {
    modified: ColorPair,
    added: ColorPair,
    deleted: ColorPair,
    renamed: ColorPair,
    untracked: ColorPair,
    ignored: ColorPair,
    conflicted: ColorPair,
}

impl Default for VcsTheme {
    fn default() -> Self {
        let fg = |fg| ColorPair {
            fg,
            ..ColorPair::default()
        };
        VcsTheme {
            modified: fg(Color::Yellow),
            added: fg(Color::Green),
            deleted: fg(Color::Red),
            renamed: fg(Color::Cyan),
            untracked: fg(Color::LightGreen),
            ignored: fg(Color::DarkGray),
            conflicted: fg(Color::LightRed),
        }
    }
}

impl VcsTheme {
    fn overlay(&self, status: VcsStatus) -> Style {
        let pair = match status {
            VcsStatus::Modified => &self.modified,
            VcsStatus::Added => &self.added,
            VcsStatus::Deleted => &self.deleted,
            VcsStatus::Renamed => &self.renamed,
            VcsStatus::Untracked => &self.untracked,
            VcsStatus::Ignored => &self.ignored,
            VcsStatus::Conflicted => &self.conflicted,
        };
        let style = pair.overlay_style();
        match status {
            VcsStatus::Conflicted => style.add_modifier(Modifier::BOLD),
            VcsStatus::Deleted => style.add_modifier(Modifier::CROSSED_OUT),
            _ => style,
        }
    }
}

/// Foreground and background colors for one kind of node.
#[derive(Deserialize, Debug, PartialEq, Clone, Copy)]
pub struct ColorPair {
    #[serde(default, deserialize_with = "deserialize_color_field")]
    fg: Color,
    #[serde(default, deserialize_with = "deserialize_color_field")]
    bg: Color,
}

/// Default implementation for ColorPair
/// Sets both foreground and background to Color::Reset
impl Default for ColorPair {
    fn default() -> Self {
        Self {
            fg: Color::Reset,
            bg: Color::Reset,
        }
    }
}

impl ColorPair {
    pub fn style(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    /// Only the colors that are actually set, so patching keeps the base for the rest.
    pub fn overlay_style(&self) -> Style {
        let mut style = Style::default();
        if self.fg != Color::Reset {
            style = style.fg(self.fg);
        }
        if self.bg != Color::Reset {
            style = style.bg(self.bg);
        }
        style
    }
}

fn deserialize_color_field<'de, D>(deserializer: D) -> Result<Color, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Ok(parse_color(&s))
}
