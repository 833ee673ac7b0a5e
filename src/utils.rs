//! Miscellaneous utility functions for treeline.
//!
//! This module holds the [helpers] submodule (color parsing, home path handling, stack
//! lowercasing) and the [cli] argument parser used by the `tl` binary.

pub mod cli;
pub mod helpers;

pub use helpers::{
    expand_home_path, get_home, parse_color, shorten_home_path, with_lowered_stack,
};
