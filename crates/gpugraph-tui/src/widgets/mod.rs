//! Dashboard widgets. Each draws one already-computed piece of a
//! [`DashboardView`](gpugraph_core::DashboardView); none of them hold state.

mod pane;
mod status_bar;
mod too_small;

pub use pane::PaneWidget;
pub use status_bar::{StatusBar, StatusInfo};
pub use too_small::TooSmallNotice;
