use gpugraph_core::{PaneView, Region};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Widget},
};

use crate::theme::Theme;

/// One GPU: bordered box, title, utilization chart and memory column.
pub struct PaneWidget<'a> {
    view: &'a PaneView,
    theme: Theme,
}

impl<'a> PaneWidget<'a> {
    pub fn new(view: &'a PaneView, theme: Theme) -> Self {
        Self { view, theme }
    }

    fn draw_chart(&self, area: Rect, buf: &mut Buffer) {
        let Some(chart) = &self.view.chart else {
            return;
        };
        let region = self.view.regions.chart;
        let hot_rows = chart.height().div_ceil(10);
        let axis = chart.axis_width();

        for (i, row) in chart.rows().iter().enumerate() {
            let Some((x, y, room)) = place(area, region, i) else {
                break;
            };
            let label: String = row.chars().take(axis).collect();
            let cells: String = row.chars().skip(axis).collect();
            let cell_style = if i < hot_rows {
                self.theme.hot()
            } else {
                self.theme.line()
            };
            let (next_x, _) = buf.set_stringn(x, y, label, room, self.theme.axis());
            let used = usize::from(next_x - x);
            buf.set_stringn(next_x, y, cells, room.saturating_sub(used), cell_style);
        }
    }

    fn draw_bar(&self, area: Rect, buf: &mut Buffer) {
        let Some(bar) = &self.view.bar else {
            return;
        };
        let region = self.view.regions.bar;
        let hot_rows = bar.rows().len().saturating_sub(1).div_ceil(10);

        for (i, row) in bar.rows().iter().enumerate() {
            let Some((x, y, room)) = place(area, region, i) else {
                break;
            };
            let style = match i {
                0 => self.theme.bar_label(self.view.usage_ratio),
                i if i <= hot_rows => self.theme.hot(),
                _ => self.theme.bar(),
            };
            buf.set_stringn(x, y, row, room, style);
        }
    }
}

/// Absolute position of row `i` of `region`, clipped to `area`.
fn place(area: Rect, region: Region, i: usize) -> Option<(u16, u16, usize)> {
    let row = u16::try_from(i).ok()?;
    let x = area.x.checked_add(region.x)?;
    let y = area.y.checked_add(region.y)?.checked_add(row)?;
    if row >= region.lines || y >= area.bottom() || x >= area.right() {
        return None;
    }
    let room = region.cols.min(area.right() - x);
    Some((x, y, usize::from(room)))
}

impl Widget for PaneWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = Line::from(vec![
            Span::raw(" "),
            Span::styled(self.view.title.as_str(), self.theme.title()),
            Span::raw(" "),
        ]);
        Block::bordered()
            .border_style(self.theme.border(self.view.stale))
            .title(title)
            .render(area, buf);

        self.draw_chart(area, buf);
        self.draw_bar(area, buf);
    }
}
