//! Pure chart renderers. Both return ready-to-blit rows of equal character
//! width and never touch terminal state, so identical input always yields
//! byte-identical output.

mod bar;
mod line;

pub use bar::{EMPTY_FILL, FULL_BLOCK, HALF_BLOCK, UsageBar, render_usage_bar};
pub use line::{LabelFormat, SeriesChart, SeriesOptions, render_series};
