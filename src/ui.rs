//! Presentation side of the tree: icons, render mode detection and the values handed to a
//! rendering sink.

pub mod icons;
pub mod mode;
pub mod render;

pub use icons::{Decoration, IconStrategy};
pub use mode::{CapabilityProbe, FixedProbe, RenderContext, RenderMode, TerminalProbe};
pub use render::RenderLine;
