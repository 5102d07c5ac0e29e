use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    text::Line,
    widgets::{Paragraph, Widget},
};

use crate::theme::Theme;

const MESSAGE: [&str; 3] = [
    "Window is too small.",
    "Please make it bigger",
    "or press \"Q\" to quit.",
];

/// Shown instead of the panes while the grid does not fit.
pub struct TooSmallNotice {
    theme: Theme,
}

impl TooSmallNotice {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }
}

impl Widget for TooSmallNotice {
    fn render(self, area: Rect, buf: &mut Buffer) {
        #[allow(clippy::cast_possible_truncation)]
        let height = (MESSAGE.len() as u16).min(area.height);
        let notice = Rect {
            y: area.y + (area.height - height) / 2,
            height,
            ..area
        };
        let lines: Vec<Line> = MESSAGE.iter().map(|&l| Line::from(l)).collect();
        Paragraph::new(lines)
            .style(self.theme.notice())
            .alignment(Alignment::Center)
            .render(notice, buf);
    }
}
