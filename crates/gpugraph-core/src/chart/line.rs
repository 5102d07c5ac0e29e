//! Box-drawing line chart for a bounded numeric series.
//!
//! Row `r` of the output carries the label for the value that row represents,
//! a tick glyph, then one cell per sample. The segment between samples `x` and
//! `x + 1` is drawn in column `x`, so the last column only ever holds the end
//! of the previous segment.

use std::cmp::Ordering;

use crate::error::ChartError;

const TICK: char = '┤';
const CROSSING: char = '┼';
const HORIZONTAL: char = '─';
const VERTICAL: char = '│';
const RISE_TOP: char = '╭';
const RISE_BOTTOM: char = '╯';
const FALL_TOP: char = '╮';
const FALL_BOTTOM: char = '╰';

// ── Label formatting ────────────────────────────────────────────────

/// Right-justified fixed-point axis labels with an optional suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelFormat {
    precision: usize,
    width: Option<usize>,
    suffix: String,
}

impl Default for LabelFormat {
    fn default() -> Self {
        Self::fixed(2)
    }
}

impl LabelFormat {
    /// Fixed-point labels whose width follows the magnitude of the axis bounds.
    pub fn fixed(precision: usize) -> Self {
        Self {
            precision,
            width: None,
            suffix: String::new(),
        }
    }

    /// Whole percentages, three digits wide: `100%`, ` 50%`, `  0%`.
    pub fn percent() -> Self {
        Self {
            precision: 0,
            width: Some(3),
            suffix: "%".into(),
        }
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Columns used by label, separator and tick for an axis over
    /// `[minimum, maximum]`.
    pub fn axis_width(&self, minimum: f64, maximum: f64) -> usize {
        self.number_width(minimum, maximum) + self.suffix.chars().count() + 2
    }

    fn number_width(&self, minimum: f64, maximum: f64) -> usize {
        self.width.unwrap_or_else(|| {
            let precision = self.precision;
            let widest = format!("{maximum:.precision$}").len();
            widest.max(format!("{minimum:.precision$}").len())
        })
    }

    fn label(&self, value: f64, width: usize) -> String {
        // Adding positive zero turns -0.0 into 0.0 so the bottom label never
        // prints a stray sign.
        let value = value + 0.0;
        format!(
            "{value:>width$.precision$}{suffix}",
            precision = self.precision,
            suffix = self.suffix
        )
    }
}

// ── Options / output ────────────────────────────────────────────────

/// Axis bounds and label format. Unset bounds default to the series' own
/// minimum and maximum.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesOptions {
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub label: Option<LabelFormat>,
}

impl SeriesOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// The fixed 0–100 percent axis used for GPU utilization.
    pub fn utilization() -> Self {
        Self::new().bounds(0.0, 100.0).label(LabelFormat::percent())
    }

    pub fn bounds(mut self, minimum: f64, maximum: f64) -> Self {
        self.minimum = Some(minimum);
        self.maximum = Some(maximum);
        self
    }

    pub fn minimum(mut self, minimum: f64) -> Self {
        self.minimum = Some(minimum);
        self
    }

    pub fn maximum(mut self, maximum: f64) -> Self {
        self.maximum = Some(maximum);
        self
    }

    pub fn label(mut self, label: LabelFormat) -> Self {
        self.label = Some(label);
        self
    }
}

/// Rendered chart rows, all of equal character width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesChart {
    rows: Vec<String>,
    axis_width: usize,
}

impl SeriesChart {
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<String> {
        self.rows
    }

    /// Leading columns of every row taken by label and tick.
    pub fn axis_width(&self) -> usize {
        self.axis_width
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }
}

// ── Scaling ─────────────────────────────────────────────────────────

/// Maps values onto row indices, row 0 at the top.
struct Scale {
    minimum: f64,
    step: f64,
    bottom: usize,
}

impl Scale {
    #[allow(clippy::cast_precision_loss)]
    fn new(minimum: f64, maximum: f64, height: usize) -> Self {
        let bottom = height - 1;
        let step = if bottom == 0 {
            0.0
        } else {
            (maximum - minimum) / bottom as f64
        };
        Self {
            minimum,
            step,
            bottom,
        }
    }

    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    fn row(&self, value: f64) -> usize {
        if self.step <= 0.0 {
            return self.bottom;
        }
        let bottom = self.bottom as f64;
        (bottom - (value - self.minimum) / self.step)
            .round()
            .clamp(0.0, bottom) as usize
    }

    #[allow(clippy::cast_precision_loss)]
    fn value_at(&self, row: usize) -> f64 {
        self.minimum + (self.bottom - row) as f64 * self.step
    }
}

// ── Rendering ───────────────────────────────────────────────────────

/// Render `values` as a `height`-row line chart.
///
/// Supplied bounds must enclose every value; a series poking outside them is
/// a [`ChartError::RangeViolation`], as is any non-finite value or bound.
pub fn render_series(
    values: &[f64],
    height: usize,
    options: &SeriesOptions,
) -> Result<SeriesChart, ChartError> {
    let Some(&first) = values.first() else {
        return Err(ChartError::EmptySeries);
    };
    if height == 0 {
        return Err(ChartError::ZeroHeight);
    }

    let (low, high) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let minimum = options.minimum.unwrap_or(low);
    let maximum = options.maximum.unwrap_or(high);
    let violation = |value| ChartError::RangeViolation {
        value,
        minimum,
        maximum,
    };

    if let Some(&bad) = values.iter().find(|v| !v.is_finite()) {
        return Err(violation(bad));
    }
    if !minimum.is_finite() || minimum > low {
        return Err(violation(low));
    }
    if !maximum.is_finite() || maximum < high {
        return Err(violation(high));
    }

    let scale = Scale::new(minimum, maximum, height);
    let format = options.label.clone().unwrap_or_default();
    let number_width = format.number_width(minimum, maximum);
    let labels: Vec<String> = (0..height)
        .map(|row| format.label(scale.value_at(row), number_width))
        .collect();
    let label_width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);

    let mut cells = vec![vec![' '; values.len()]; height];
    for (x, pair) in values.windows(2).enumerate() {
        let (from, to) = (scale.row(pair[0]), scale.row(pair[1]));
        match from.cmp(&to) {
            Ordering::Equal => cells[from][x] = HORIZONTAL,
            // Rising: the destination sits higher on screen.
            Ordering::Greater => {
                cells[to][x] = RISE_TOP;
                cells[from][x] = RISE_BOTTOM;
                for row in &mut cells[to + 1..from] {
                    row[x] = VERTICAL;
                }
            }
            Ordering::Less => {
                cells[from][x] = FALL_TOP;
                cells[to][x] = FALL_BOTTOM;
                for row in &mut cells[from + 1..to] {
                    row[x] = VERTICAL;
                }
            }
        }
    }

    let first_row = scale.row(first);
    let rows = labels
        .into_iter()
        .zip(cells)
        .enumerate()
        .map(|(row, (label, line))| {
            let tick = if row == scale.bottom || row == first_row {
                CROSSING
            } else {
                TICK
            };
            let mut out = format!("{label:>label_width$} {tick}");
            out.extend(line);
            out
        })
        .collect();

    Ok(SeriesChart {
        rows,
        axis_width: label_width + 2,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn utilization_chart_draws_continuous_polyline() {
        let chart =
            render_series(&[0.0, 50.0, 100.0, 50.0], 5, &SeriesOptions::utilization()).unwrap();
        assert_eq!(
            chart.rows(),
            [
                "100% ┤ ╭╮ ",
                " 75% ┤ ││ ",
                " 50% ┤╭╯╰ ",
                " 25% ┤│   ",
                "  0% ┼╯   ",
            ]
        );
        assert_eq!(chart.axis_width(), 6);
    }

    #[test]
    fn default_labels_follow_series_magnitude() {
        let chart = render_series(&[1.0, 3.0], 3, &SeriesOptions::new()).unwrap();
        assert_eq!(chart.rows(), ["3.00 ┤╭ ", "2.00 ┤│ ", "1.00 ┼╯ "]);
    }

    #[test]
    fn flat_segment_uses_horizontal_glyph() {
        let chart =
            render_series(&[50.0, 50.0, 50.0], 3, &SeriesOptions::utilization()).unwrap();
        assert_eq!(chart.rows(), ["100% ┤   ", " 50% ┼── ", "  0% ┼   "]);
    }

    #[test]
    fn single_sample_renders_axis_only() {
        let chart = render_series(&[42.0], 3, &SeriesOptions::new()).unwrap();
        assert_eq!(chart.rows(), ["42.00 ┤ ", "42.00 ┤ ", "42.00 ┼ "]);
    }

    #[test]
    fn height_one_degenerates_to_single_row() {
        let chart = render_series(&[10.0, 90.0], 1, &SeriesOptions::new()).unwrap();
        assert_eq!(chart.rows(), ["10.00 ┼─ "]);
    }

    #[test]
    fn minimum_above_series_is_range_violation() {
        let err = render_series(&[10.0, 90.0], 5, &SeriesOptions::new().minimum(50.0)).unwrap_err();
        assert_eq!(
            err,
            ChartError::RangeViolation {
                value: 10.0,
                minimum: 50.0,
                maximum: 90.0,
            }
        );
    }

    #[test]
    fn maximum_below_series_is_range_violation() {
        let err = render_series(&[10.0, 90.0], 5, &SeriesOptions::new().maximum(80.0)).unwrap_err();
        assert!(matches!(err, ChartError::RangeViolation { .. }));
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let err = render_series(&[10.0, f64::NAN], 5, &SeriesOptions::utilization()).unwrap_err();
        assert!(matches!(err, ChartError::RangeViolation { .. }));
    }

    #[test]
    fn empty_series_and_zero_height_are_rejected() {
        assert_eq!(
            render_series(&[], 5, &SeriesOptions::new()).unwrap_err(),
            ChartError::EmptySeries
        );
        assert_eq!(
            render_series(&[1.0], 0, &SeriesOptions::new()).unwrap_err(),
            ChartError::ZeroHeight
        );
    }

    #[test]
    fn rows_have_equal_width_and_rerender_is_identical() {
        // Small LCG so the sweep is deterministic without a rand dependency.
        let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
        let mut next = move || {
            seed = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
            f64::from(u32::try_from(seed >> 40).unwrap()) / f64::from(1u32 << 24) * 100.0
        };

        for len in 1..40 {
            let values: Vec<f64> = (0..len).map(|_| next()).collect();
            for height in 2..16 {
                for options in [SeriesOptions::new(), SeriesOptions::utilization()] {
                    let chart = render_series(&values, height, &options).unwrap();
                    assert_eq!(chart.height(), height);
                    let width = chart.rows()[0].chars().count();
                    assert!(chart.rows().iter().all(|r| r.chars().count() == width));
                    assert_eq!(width, chart.axis_width() + values.len());
                    assert_eq!(render_series(&values, height, &options).unwrap(), chart);
                }
            }
        }
    }

    #[test]
    fn percent_axis_width_matches_rendered_axis() {
        let format = LabelFormat::percent();
        let chart = render_series(&[3.0, 97.0], 8, &SeriesOptions::utilization()).unwrap();
        assert_eq!(format.axis_width(0.0, 100.0), chart.axis_width());
    }

    #[test]
    fn custom_suffix_and_width() {
        let options = SeriesOptions::new()
            .bounds(0.0, 10.0)
            .label(LabelFormat::fixed(1).with_width(6).with_suffix(" W"));
        let chart = render_series(&[0.0, 10.0], 2, &options).unwrap();
        assert_eq!(chart.rows(), ["  10.0 W ┤╭ ", "   0.0 W ┼╯ "]);
    }
}
