//! The main config loading module for treeline.
//!
//! Handles loading and deserializing settings from `treeline.toml` into [Config], and turning
//! a loaded config into the [TreeSettings] the tree is assembled with.
//!
//! A missing file means internal defaults. A file that exists but does not parse, including
//! an unknown sort mode, is an error the caller has to report.

use crate::config::{Display, General, Theme};
use crate::core::TreeSettings;
use crate::error::{Result, TreeError};
use crate::utils::get_home;

use serde::Deserialize;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Main configuration struct for treeline
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    general: General,
    display: Display,
    theme: Theme,
}

impl Config {
    /// Load configuration from the default path.
    /// Falls back to defaults when no config file exists.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load configuration from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(content) => Self::parse(&content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(TreeError::io(path, e)),
        }
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    // Getters

    #[inline]
    pub fn general(&self) -> &General {
        &self.general
    }

    #[inline]
    pub fn display(&self) -> &Display {
        &self.display
    }

    #[inline]
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn general_mut(&mut self) -> &mut General {
        &mut self.general
    }

    pub fn display_mut(&mut self) -> &mut Display {
        &mut self.display
    }

    /// The settings a [crate::core::FileTree] is built with.
    pub fn tree_settings(&self) -> TreeSettings {
        TreeSettings {
            sort: self.general.sort(),
            filter: Box::new(self.general.filter()),
            theme: self.theme.clone(),
            indent_width: self.general.indent(),
        }
    }

    /// Determine the default configuration file path.
    /// Checks the TREELINE_CONFIG environment variable first,
    /// Checks for XDG_CONFIG_HOME after,
    /// then defaults to ~/.config/treeline/treeline.toml,
    pub fn default_path() -> PathBuf {
        if let Ok(path) = std::env::var("TREELINE_CONFIG") {
            return PathBuf::from(path);
        }

        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg_config).join("treeline/treeline.toml");
        }

        if let Some(home) = get_home() {
            return home.join(".config/treeline/treeline.toml");
        }
        PathBuf::from("treeline.toml")
    }

    /// Generate a default configuration file at the specified path.
    /// If the file already exists, returns an error.
    pub fn generate_default(path: &Path) -> io::Result<()> {
        if path.exists() {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("Config file already exists at {:?}", path),
            ));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = r##"# treeline.toml - default configuration for treeline

# Note:
# Commented values are the internal defaults of treeline
# Use hex codes (eg. "#RRGGBB") or terminal colors ("cyan")

[general]
# sort = "alphabetic-asc"   # alphabetic-asc|desc, size-asc|desc, mod-time-asc|desc
# show_hidden = false
# always_show = []
# ignore = [".git"]
# indent = 2
# git_status = true

[display]
# icons = true

# [theme.directory]
# fg = "blue"

# [theme.entry]
# fg = "default"

# [theme.vcs.modified]
# fg = "yellow"
# [theme.vcs.added]
# fg = "green"
# [theme.vcs.untracked]
# fg = "lightgreen"
# [theme.vcs.ignored]
# fg = "darkgray"
# [theme.vcs.deleted]
# fg = "red"
# [theme.vcs.renamed]
# fg = "cyan"
# [theme.vcs.conflicted]
# fg = "lightred"
"##;

        fs::write(path, content)?;
        println!("Default config generated at {:?}", path);
        Ok(())
    }
}
