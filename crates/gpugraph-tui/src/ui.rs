//! Frame composition: the pane grid above, the status line below.

use gpugraph_core::DashboardView;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
};

use crate::theme::Theme;
use crate::widgets::{PaneWidget, StatusBar, StatusInfo, TooSmallNotice};

pub fn render(frame: &mut Frame, view: &DashboardView, status: &StatusInfo, theme: Theme) {
    let [content, status_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(frame.area());

    match view {
        DashboardView::Pending => {}
        DashboardView::TooSmall(_) => {
            frame.render_widget(TooSmallNotice::new(theme), frame.area());
            return;
        }
        DashboardView::Panes(panes) => {
            for pane in panes {
                let g = pane.geometry;
                let area = Rect::new(
                    content.x.saturating_add(g.origin_x),
                    content.y.saturating_add(g.origin_y),
                    g.cols,
                    g.lines,
                )
                .intersection(content);
                frame.render_widget(PaneWidget::new(pane, theme), area);
            }
        }
    }

    frame.render_widget(StatusBar::new(status, theme), status_area);
}
