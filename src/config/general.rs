//! The general configuration settings for treeline.
//!
//! This module defines the [General] struct, deserialized from the `[general]` section of
//! treeline.toml. The sort mode is parsed strictly: an unknown value fails config loading
//! instead of falling back to a default.

use crate::core::lister::HiddenFilter;
use crate::core::sort::SortMode;

use serde::Deserialize;

use std::collections::HashSet;
use std::ffi::OsString;
use std::sync::Arc;

/// Indentation used when the config does not set one.
pub const DEFAULT_INDENT: usize = 2;

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct General {
    sort: SortMode,
    show_hidden: bool,
    always_show: Vec<String>,
    ignore: Vec<String>,
    indent: usize,
    git_status: bool,
}

impl Default for General {
    fn default() -> Self {
        General {
            sort: SortMode::default(),
            show_hidden: false,
            always_show: Vec::new(),
            ignore: vec![".git".to_string()],
            indent: DEFAULT_INDENT,
            git_status: true,
        }
    }
}

impl General {
    #[inline]
    pub fn sort(&self) -> SortMode {
        self.sort
    }

    #[inline]
    pub fn show_hidden(&self) -> bool {
        self.show_hidden
    }

    #[inline]
    pub fn indent(&self) -> usize {
        self.indent
    }

    #[inline]
    pub fn git_status(&self) -> bool {
        self.git_status
    }

    /// Builds the visibility filter these settings describe.
    pub fn filter(&self) -> HiddenFilter {
        let to_set = |names: &[String]| {
            names
                .iter()
                .map(OsString::from)
                .collect::<HashSet<_>>()
        };
        HiddenFilter::new(
            self.show_hidden,
            Arc::new(to_set(&self.always_show)),
            Arc::new(to_set(&self.ignore)),
        )
    }

    pub fn set_sort(&mut self, sort: SortMode) {
        self.sort = sort;
    }

    pub fn set_show_hidden(&mut self, show_hidden: bool) {
        self.show_hidden = show_hidden;
    }
}
