//! Render mode detection.
//!
//! The tree can draw graphical icons or plain text glyphs. Which one is possible depends on
//! the environment, and that can change while the tree is alive (the same session attached to
//! a different terminal, icons toggled in config). [RenderContext::check] compares the
//! current capability against the last observation and swaps the [IconStrategy] when they
//! differ.

use crate::ui::icons::IconStrategy;

use crossterm::tty::IsTty;

use std::cell::Cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Graphical,
    Text,
}

impl RenderMode {
    pub fn from_capability(graphical: bool) -> Self {
        if graphical {
            RenderMode::Graphical
        } else {
            RenderMode::Text
        }
    }

    pub fn strategy(&self) -> IconStrategy {
        match self {
            RenderMode::Graphical => IconStrategy::graphical(),
            RenderMode::Text => IconStrategy::text(),
        }
    }
}

/// Answers "can graphical icons be shown right now".
pub trait CapabilityProbe {
    fn graphical(&self) -> bool;
}

/// Probe backed by the terminal: icons need a tty that is not `TERM=dumb`, and icons enabled.
#[derive(Debug, Clone, Copy)]
pub struct TerminalProbe {
    icons_enabled: bool,
}

impl TerminalProbe {
    pub fn new(icons_enabled: bool) -> Self {
        Self { icons_enabled }
    }
}

impl CapabilityProbe for TerminalProbe {
    fn graphical(&self) -> bool {
        if !self.icons_enabled {
            return false;
        }
        let dumb = std::env::var("TERM").is_ok_and(|t| t == "dumb");
        !dumb && std::io::stdout().is_tty()
    }
}

/// A probe with a settable answer, for callers that know the capability themselves.
#[derive(Debug, Default)]
pub struct FixedProbe(Cell<bool>);

impl FixedProbe {
    pub fn new(graphical: bool) -> Self {
        Self(Cell::new(graphical))
    }

    pub fn set(&self, graphical: bool) {
        self.0.set(graphical);
    }
}

impl CapabilityProbe for FixedProbe {
    fn graphical(&self) -> bool {
        self.0.get()
    }
}

/// The active render mode and icon strategy, threaded through assembly.
///
/// Starts undetermined; until the first [RenderContext::check] the text strategy is used.
#[derive(Debug)]
pub struct RenderContext {
    observed: Option<bool>,
    mode: RenderMode,
    strategy: IconStrategy,
}

impl Default for RenderContext {
    fn default() -> Self {
        Self {
            observed: None,
            mode: RenderMode::Text,
            strategy: IconStrategy::text(),
        }
    }
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// A context already settled on `mode`.
    pub fn with_mode(mode: RenderMode) -> Self {
        Self {
            observed: Some(mode == RenderMode::Graphical),
            mode,
            strategy: mode.strategy(),
        }
    }

    /// Queries `probe` and swaps the strategy if the capability changed since the last call.
    /// Returns whether a swap happened; the first call always swaps.
    pub fn check(&mut self, probe: &dyn CapabilityProbe) -> bool {
        let graphical = probe.graphical();
        if self.observed == Some(graphical) {
            return false;
        }
        let mode = RenderMode::from_capability(graphical);
        tracing::debug!(?mode, "render mode changed");
        self.observed = Some(graphical);
        self.mode = mode;
        self.strategy = mode.strategy();
        true
    }

    #[inline]
    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    #[inline]
    pub fn is_determined(&self) -> bool {
        self.observed.is_some()
    }

    #[inline]
    pub fn strategy(&self) -> &IconStrategy {
        &self.strategy
    }
}
