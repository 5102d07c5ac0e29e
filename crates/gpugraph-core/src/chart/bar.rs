//! Half-block column chart for a used/total pair.
//!
//! Row 0 holds the centered `used` label; the rows below it form the bar,
//! filled bottom-up at half-row resolution.

use crate::error::ChartError;

pub const FULL_BLOCK: char = '█';
pub const HALF_BLOCK: char = '▄';
/// Fill for a reading of exactly zero, so it differs from "no data yet".
pub const EMPTY_FILL: char = '░';

/// Rendered bar rows, all `width` characters wide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageBar {
    rows: Vec<String>,
    half_blocks: usize,
}

impl UsageBar {
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<String> {
        self.rows
    }

    /// Filled half-row units below the label.
    pub fn half_blocks(&self) -> usize {
        self.half_blocks
    }
}

/// Render `used` out of `total` as a `height × width` column.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn render_usage_bar(
    used: f64,
    total: f64,
    height: usize,
    width: usize,
) -> Result<UsageBar, ChartError> {
    if !(used.is_finite() && used >= 0.0 && total.is_finite() && total > 0.0) {
        return Err(ChartError::InvalidRatio { used, total });
    }
    if height == 0 {
        return Err(ChartError::ZeroHeight);
    }

    let usable = height - 1;
    let capacity = (usable * 2) as f64;
    let half_blocks = (used / total * capacity).floor().min(capacity) as usize;
    let full_rows = half_blocks / 2;
    let half_row = half_blocks % 2 == 1;

    let mut rows = Vec::with_capacity(height);
    rows.push(centered(&format!("{used:.0}"), width));
    for depth in (0..usable).rev() {
        let fill = if used <= 0.0 {
            EMPTY_FILL
        } else if depth < full_rows {
            FULL_BLOCK
        } else if depth == full_rows && half_row {
            HALF_BLOCK
        } else {
            ' '
        };
        rows.push(fill.to_string().repeat(width));
    }

    Ok(UsageBar { rows, half_blocks })
}

fn centered(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.chars().take(width).collect();
    }
    let left = (width - len) / 2;
    format!(
        "{}{text}{}",
        " ".repeat(left),
        " ".repeat(width - len - left)
    )
}
