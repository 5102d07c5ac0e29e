//! SilkCircuit Neon palette and semantic styling for the dashboard.
//!
//! With color disabled every style collapses to plain text plus bold/dim
//! attributes, so the dashboard stays readable on monochrome terminals.

use ratatui::style::{Color, Modifier, Style};

// ── Core Palette ──────────────────────────────────────────────────────

pub const ELECTRIC_PURPLE: Color = Color::Rgb(225, 53, 255); // #e135ff
pub const NEON_CYAN: Color = Color::Rgb(128, 255, 234); // #80ffea
pub const CORAL: Color = Color::Rgb(255, 106, 193); // #ff6ac1
pub const ELECTRIC_YELLOW: Color = Color::Rgb(241, 250, 140); // #f1fa8c
pub const SUCCESS_GREEN: Color = Color::Rgb(80, 250, 123); // #50fa7b
pub const ERROR_RED: Color = Color::Rgb(255, 99, 99); // #ff6363

// ── Extended Palette ──────────────────────────────────────────────────

pub const DIM_WHITE: Color = Color::Rgb(189, 193, 207); // #bdc1cf
pub const BORDER_GRAY: Color = Color::Rgb(98, 114, 164); // #6272a4

/// Usage at or above this fraction of memory is drawn hot.
pub const HOT_USAGE: f64 = 0.9;

// ── Semantic Styles ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    color: bool,
}

impl Theme {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn pick(self, colored: Style, plain: Style) -> Style {
        if self.color { colored } else { plain }
    }

    /// Pane border; stale panes are dimmed.
    pub fn border(self, stale: bool) -> Style {
        match (self.color, stale) {
            (true, false) => Style::default().fg(ELECTRIC_PURPLE),
            (true, true) => Style::default().fg(BORDER_GRAY),
            (false, false) => Style::default(),
            (false, true) => Style::default().add_modifier(Modifier::DIM),
        }
    }

    pub fn title(self) -> Style {
        self.pick(
            Style::default().fg(NEON_CYAN).add_modifier(Modifier::BOLD),
            Style::default().add_modifier(Modifier::BOLD),
        )
    }

    /// Axis labels and ticks.
    pub fn axis(self) -> Style {
        self.pick(
            Style::default().fg(DIM_WHITE),
            Style::default().add_modifier(Modifier::DIM),
        )
    }

    /// Plotted utilization line.
    pub fn line(self) -> Style {
        self.pick(Style::default().fg(NEON_CYAN), Style::default())
    }

    /// Memory column fill.
    pub fn bar(self) -> Style {
        self.pick(Style::default().fg(SUCCESS_GREEN), Style::default())
    }

    /// Chart and bar cells in the top band of the scale.
    pub fn hot(self) -> Style {
        self.pick(
            Style::default().fg(CORAL).add_modifier(Modifier::BOLD),
            Style::default().add_modifier(Modifier::BOLD),
        )
    }

    pub fn bar_label(self, ratio: Option<f64>) -> Style {
        match ratio {
            Some(r) if r >= HOT_USAGE => self.pick(
                Style::default().fg(ERROR_RED).add_modifier(Modifier::BOLD),
                Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED),
            ),
            _ => self.pick(
                Style::default().fg(ELECTRIC_YELLOW),
                Style::default(),
            ),
        }
    }

    /// Status bar text.
    pub fn status_bar(self) -> Style {
        self.pick(Style::default().fg(DIM_WHITE), Style::default())
    }

    /// Stale-pane and telemetry warnings in the status bar.
    pub fn warning(self) -> Style {
        self.pick(
            Style::default().fg(ELECTRIC_YELLOW),
            Style::default().add_modifier(Modifier::BOLD),
        )
    }

    /// Key hint text (e.g., "q quit").
    pub fn key_hint(self) -> Style {
        self.pick(
            Style::default().fg(BORDER_GRAY),
            Style::default().add_modifier(Modifier::DIM),
        )
    }

    /// Key hint key character.
    pub fn key_hint_key(self) -> Style {
        self.pick(
            Style::default().fg(NEON_CYAN).add_modifier(Modifier::BOLD),
            Style::default().add_modifier(Modifier::BOLD),
        )
    }

    /// "Window is too small" notice.
    pub fn notice(self) -> Style {
        self.pick(
            Style::default().fg(ERROR_RED).add_modifier(Modifier::BOLD),
            Style::default().add_modifier(Modifier::BOLD),
        )
    }
}
