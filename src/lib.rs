//! Library crate for treeline.
//!
//! The shipped application is the `tl` binary (`src/main.rs`), which prints a tree.
//!
//! The library holds the tree model itself so other front ends (a TUI pane, an editor
//! sidebar) can drive it: build a [core::FileTree], feed it a [core::StatusHandle], and render
//! the [ui::RenderLine]s it produces.

pub mod config;
pub mod core;
pub mod error;
pub mod ui;
pub mod utils;

pub use error::{Result, TreeError};
