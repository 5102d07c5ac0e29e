use std::time::Duration;

use chrono::{DateTime, Local};
use gpugraph_core::GpuIndex;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::theme::Theme;

/// Facts shown on the bottom line.
#[derive(Debug, Clone, Default)]
pub struct StatusInfo {
    pub gpus: usize,
    pub interval: Duration,
    pub source: String,
    pub last_update: Option<DateTime<Local>>,
    pub stale: Vec<GpuIndex>,
    pub telemetry_error: Option<String>,
}

pub struct StatusBar<'a> {
    info: &'a StatusInfo,
    theme: Theme,
}

impl<'a> StatusBar<'a> {
    pub fn new(info: &'a StatusInfo, theme: Theme) -> Self {
        Self { info, theme }
    }

    fn spans(&self) -> Vec<Span<'static>> {
        let info = self.info;
        let text = self.theme.status_bar();
        let sep = || Span::styled(" │ ", self.theme.key_hint());

        let plural = if info.gpus == 1 { "" } else { "s" };
        let updated = info
            .last_update
            .map_or_else(|| "waiting".to_owned(), |t| t.format("%H:%M:%S").to_string());

        let mut spans = vec![
            Span::styled(format!(" {} GPU{plural}", info.gpus), text),
            sep(),
            Span::styled(format!("{} every {}", info.source, humantime::format_duration(info.interval)), text),
            sep(),
            Span::styled(format!("updated {updated}"), text),
        ];

        if let Some(error) = &info.telemetry_error {
            spans.push(sep());
            spans.push(Span::styled(error.clone(), self.theme.warning()));
        } else if !info.stale.is_empty() {
            let list: Vec<String> = info.stale.iter().map(ToString::to_string).collect();
            spans.push(sep());
            spans.push(Span::styled(
                format!("stale: GPU {}", list.join(", ")),
                self.theme.warning(),
            ));
        }

        spans.push(sep());
        spans.push(Span::styled("q", self.theme.key_hint_key()));
        spans.push(Span::styled(" quit", self.theme.key_hint()));
        spans
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(Line::from(self.spans())).render(area, buf);
    }
}
