//! Configuration for treeline.
//!
//! Settings are read from `treeline.toml` (see [Config::default_path]) and split into:
//! - [general]: sorting, visibility filtering, indentation and git status.
//! - [display]: icon preference.
//! - [theme]: directory, file and version control colors.
//!
//! [load] holds the loading logic and turns a [Config] into [crate::core::TreeSettings].

pub mod display;
pub mod general;
pub mod load;
pub mod theme;

pub use display::Display;
pub use general::General;
pub use load::Config;
pub use theme::Theme;
