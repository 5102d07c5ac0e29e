//! Application core: event loop and tick handling.

use std::time::Duration;

use chrono::Local;
use color_eyre::eyre::{Result, eyre};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use gpugraph_config::Config;
use gpugraph_core::telemetry::snapshot_within;
use gpugraph_core::{DashboardSession, DashboardView, PlanOutcome, TelemetrySource};
use ratatui::{Terminal, backend::Backend};
use tracing::{debug, info, warn};

use crate::event::{Event, EventReader};
use crate::theme::Theme;
use crate::tui::Tui;
use crate::ui;
use crate::widgets::StatusInfo;

/// Top-level application state and event loop.
pub struct App<S> {
    session: DashboardSession,
    source: S,
    theme: Theme,
    tick_interval: Duration,
    telemetry_timeout: Duration,
    status: StatusInfo,
}

impl<S: TelemetrySource> App<S> {
    pub fn new(session: DashboardSession, source: S, config: &Config) -> Self {
        let status = StatusInfo {
            gpus: session.pane_count(),
            interval: config.tick_interval(),
            source: source.describe(),
            ..StatusInfo::default()
        };
        Self {
            session,
            source,
            theme: Theme::new(config.color),
            tick_interval: config.tick_interval(),
            telemetry_timeout: config.telemetry_timeout(),
            status,
        }
    }

    /// Run the main event loop until a quit key, or a fatal error.
    ///
    /// The terminal is restored on every exit path: explicitly here, or by
    /// [`Tui`]'s `Drop` when an error propagates.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        let (cols, lines) = tui.size()?;
        self.session.resize(lines, cols);
        self.redraw(&mut tui.terminal)?;

        let mut events = EventReader::new(self.tick_interval);
        info!("event loop started");

        while self.session.is_running() {
            let Some(first) = events.next().await else {
                break;
            };
            let batch = std::iter::once(first).chain(events.drain());
            self.handle_batch(batch, &mut tui.terminal).await?;
        }

        events.stop();
        tui.exit();
        info!(ticks = self.session.ticks(), "event loop ended");
        Ok(())
    }

    /// Apply everything that arrived in one wake-up, then draw at most once.
    ///
    /// A quit anywhere in the batch wins over ticks and resizes in the same
    /// batch. Resizes alone redraw without touching telemetry.
    pub async fn handle_batch<B: Backend>(
        &mut self,
        events: impl IntoIterator<Item = Event>,
        terminal: &mut Terminal<B>,
    ) -> Result<()> {
        let mut ticked = false;
        let mut resized = false;
        for event in events {
            match event {
                Event::Key(key) if is_quit_key(&key) => self.session.request_quit(),
                Event::Interrupt => self.session.request_quit(),
                Event::Key(_) => {}
                Event::Resize(cols, lines) => {
                    self.session.resize(lines, cols);
                    resized = true;
                }
                Event::Tick => ticked = true,
            }
        }

        if !self.session.is_running() {
            return Ok(());
        }
        if ticked {
            self.tick(terminal).await
        } else if resized {
            self.redraw(terminal)
        } else {
            Ok(())
        }
    }

    /// One refresh: re-plan if needed, pull telemetry, fold it in, draw.
    async fn tick<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        if let PlanOutcome::TooSmall(_) = self.session.ensure_layout() {
            return self.draw(terminal);
        }

        let samples = match snapshot_within(&mut self.source, self.telemetry_timeout).await {
            Ok(samples) => {
                self.status.telemetry_error = None;
                samples
            }
            Err(e) => {
                warn!(error = %e, "telemetry query failed, reusing previous readings");
                self.status.telemetry_error = Some(e.to_string());
                Vec::new()
            }
        };

        let report = self.session.ingest(&samples)?;
        debug!(fresh = report.fresh, stale = report.stale.len(), "tick");
        self.status.stale = report.stale;
        self.status.last_update = Some(Local::now());
        self.draw(terminal)
    }

    /// Redraw after a resize without pulling telemetry.
    fn redraw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        self.session.ensure_layout();
        self.draw(terminal)
    }

    fn draw<B: Backend>(&self, terminal: &mut Terminal<B>) -> Result<()> {
        let view: DashboardView = self.session.view()?;
        terminal
            .draw(|frame| ui::render(frame, &view, &self.status, self.theme))
            .map_err(|e| eyre!("failed to draw frame: {e}"))?;
        Ok(())
    }
}

/// `q`, `Q`, `Esc` or `Ctrl-C`.
pub fn is_quit_key(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}
