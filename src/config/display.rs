//! Display configuration options for treeline
//!
//! This module defines the display configuration options which are read from the `[display]`
//! section of treeline.toml.

use serde::Deserialize;

/// Display configuration options
///
/// `icons` is a preference, not a guarantee: graphical icons are only used when the terminal
/// can show them (see [crate::ui::mode::TerminalProbe]).
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Display {
    icons: bool,
}

impl Default for Display {
    fn default() -> Self {
        Display { icons: true }
    }
}

impl Display {
    pub fn icons(&self) -> bool {
        self.icons
    }

    pub fn set_icons(&mut self, icons: bool) {
        self.icons = icons;
    }
}
