//! Grid partitioning of the terminal into one pane per GPU.
//!
//! The grid grows one row or column at a time, always splitting the longer
//! pane edge. Edges are compared in visual units: a terminal cell is roughly
//! twice as tall as it is wide, so a pane's width counts half. When the two
//! edges are nearly equal the shape that strands fewer empty cells wins,
//! which keeps e.g. four panes on a wide terminal at 2×2 rather than 1×4.
//!
//! Panes are laid out row-major. Each pane gives up one line and one column
//! to the shared gap with its neighbours; the first row and column start flush
//! with the terminal edge.

use crate::error::Infeasible;

pub const MIN_PANE_LINES: u16 = 10;
pub const MIN_PANE_COLS: u16 = 18;

/// Height-to-width ratio of one terminal cell.
const CELL_ASPECT: f64 = 2.0;
/// Edges closer than this fraction of the longer one are considered a tie.
const TIE_TOLERANCE: f64 = 0.2;

/// Smallest pane the charts remain legible in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinPaneSize {
    pub lines: u16,
    pub cols: u16,
}

impl MinPaneSize {
    /// Smallest pane the chrome fits in. Vertically: border, title gap, a
    /// two-line chart and the bottom border. Horizontally: both borders, the
    /// gaps, the percent axis, one sample and the memory column.
    pub const FLOOR: Self = Self { lines: 5, cols: 17 };

    /// This size with each dimension raised to at least [`Self::FLOOR`].
    #[must_use]
    pub fn at_least_floor(self) -> Self {
        Self {
            lines: self.lines.max(Self::FLOOR.lines),
            cols: self.cols.max(Self::FLOOR.cols),
        }
    }
}

impl Default for MinPaneSize {
    fn default() -> Self {
        Self {
            lines: MIN_PANE_LINES,
            cols: MIN_PANE_COLS,
        }
    }
}

/// Placement of one pane in terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaneGeometry {
    pub lines: u16,
    pub cols: u16,
    pub origin_y: u16,
    pub origin_x: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridShape {
    pub rows: usize,
    pub cols: usize,
}

impl GridShape {
    pub fn cells(self) -> usize {
        self.rows * self.cols
    }

    /// Cells left empty after placing `panes`, or `None` when the grid is too
    /// small to hold them all.
    pub fn unused(self, panes: usize) -> Option<usize> {
        self.cells().checked_sub(panes)
    }
}

/// A successful partition: the grid shape plus one geometry per pane, in
/// row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutPlan {
    pub grid: GridShape,
    pub panes: Vec<PaneGeometry>,
}

/// Partition a `terminal_lines × terminal_cols` area into `pane_count` panes.
///
/// Deterministic: the same arguments always produce the same plan.
pub fn plan(
    terminal_lines: u16,
    terminal_cols: u16,
    pane_count: usize,
    min: MinPaneSize,
) -> Result<LayoutPlan, Infeasible> {
    let infeasible = Infeasible {
        lines: terminal_lines,
        cols: terminal_cols,
        panes: pane_count,
        min_lines: min.lines,
        min_cols: min.cols,
    };

    // A pane of `min` cells plus its gap bounds how many rows and columns can
    // ever fit, whatever shape the grid takes.
    let max_rows = usize::from(terminal_lines) / (usize::from(min.lines) + 1);
    let max_cols = usize::from(terminal_cols) / (usize::from(min.cols) + 1);
    if pane_count > max_rows * max_cols {
        return Err(infeasible);
    }
    if pane_count == 0 {
        return Ok(LayoutPlan {
            grid: GridShape { rows: 1, cols: 1 },
            panes: Vec::new(),
        });
    }

    let grid = choose_grid(terminal_lines, terminal_cols, pane_count);
    let pane_lines = usize::from(terminal_lines) / grid.rows - 1;
    let pane_cols = usize::from(terminal_cols) / grid.cols - 1;
    let (Ok(lines), Ok(cols)) = (u16::try_from(pane_lines), u16::try_from(pane_cols)) else {
        return Err(infeasible);
    };
    if lines < min.lines || cols < min.cols {
        return Err(infeasible);
    }

    let panes = (0..pane_count)
        .map(|i| {
            let (row, col) = (i / grid.cols, i % grid.cols);
            // Both fit: row < rows and rows * (lines + 1) <= terminal_lines.
            let origin_y = u16::try_from(row * (pane_lines + 1)).unwrap_or(u16::MAX);
            let origin_x = u16::try_from(col * (pane_cols + 1)).unwrap_or(u16::MAX);
            PaneGeometry {
                lines,
                cols,
                origin_y,
                origin_x,
            }
        })
        .collect();

    Ok(LayoutPlan { grid, panes })
}

/// Grow a 1×1 grid until it holds `pane_count` panes.
pub fn choose_grid(terminal_lines: u16, terminal_cols: u16, pane_count: usize) -> GridShape {
    let mut grid = GridShape { rows: 1, cols: 1 };

    while grid.cells() < pane_count {
        #[allow(clippy::cast_precision_loss)]
        let (height, width) = (
            f64::from(terminal_lines) / grid.rows as f64,
            f64::from(terminal_cols) / grid.cols as f64 / CELL_ASPECT,
        );
        let taller = GridShape {
            rows: grid.rows + 1,
            ..grid
        };
        let wider = GridShape {
            cols: grid.cols + 1,
            ..grid
        };
        let by_edge = if width > height { wider } else { taller };

        grid = if (width - height).abs() < TIE_TOLERANCE * width.max(height) {
            match (taller.unused(pane_count), wider.unused(pane_count)) {
                (Some(t), Some(w)) if t < w => taller,
                (Some(t), Some(w)) if w < t => wider,
                (Some(_), None) => taller,
                (None, Some(_)) => wider,
                _ => by_edge,
            }
        } else {
            by_edge
        };
    }

    grid
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn four_panes_on_wide_terminal_form_two_by_two() {
        let plan = plan(40, 160, 4, MinPaneSize::default()).unwrap();
        assert_eq!(plan.grid, GridShape { rows: 2, cols: 2 });
        assert_eq!(
            plan.panes,
            vec![
                PaneGeometry { lines: 19, cols: 79, origin_y: 0, origin_x: 0 },
                PaneGeometry { lines: 19, cols: 79, origin_y: 0, origin_x: 80 },
                PaneGeometry { lines: 19, cols: 79, origin_y: 20, origin_x: 0 },
                PaneGeometry { lines: 19, cols: 79, origin_y: 20, origin_x: 80 },
            ]
        );
    }

    #[test]
    fn five_panes_avoid_a_single_strip() {
        assert_eq!(choose_grid(40, 160, 5), GridShape { rows: 2, cols: 3 });
        assert_eq!(choose_grid(50, 250, 5), GridShape { rows: 2, cols: 3 });
    }

    #[test]
    fn two_panes_on_standard_terminal_sit_side_by_side() {
        let plan = plan(23, 80, 2, MinPaneSize::default()).unwrap();
        assert_eq!(plan.grid, GridShape { rows: 1, cols: 2 });
        assert_eq!(plan.panes[1], PaneGeometry { lines: 22, cols: 39, origin_y: 0, origin_x: 40 });
    }

    #[test]
    fn single_pane_fills_terminal_less_gap() {
        let plan = plan(24, 80, 1, MinPaneSize::default()).unwrap();
        assert_eq!(plan.panes, vec![PaneGeometry { lines: 23, cols: 79, origin_y: 0, origin_x: 0 }]);
    }

    #[test]
    fn too_many_panes_is_infeasible() {
        let err = plan(20, 30, 4, MinPaneSize::default()).unwrap_err();
        assert_eq!(err.panes, 4);
        assert!(plan(5, 200, 1, MinPaneSize::default()).is_err());
        assert!(plan(200, 10, 1, MinPaneSize::default()).is_err());
    }

    #[test]
    fn exact_minimum_is_feasible() {
        let plan = plan(11, 19, 1, MinPaneSize::default()).unwrap();
        assert_eq!(plan.panes[0].lines, 10);
        assert_eq!(plan.panes[0].cols, 18);
        assert!(super::plan(10, 19, 1, MinPaneSize::default()).is_err());
    }

    #[test]
    fn planning_is_deterministic() {
        let first = plan(57, 211, 7, MinPaneSize::default());
        for _ in 0..10 {
            assert_eq!(plan(57, 211, 7, MinPaneSize::default()), first);
        }
    }

    #[test]
    fn chosen_grid_covers_panes_without_a_spare_row_or_column() {
        for lines in (10..120).step_by(7) {
            for cols in (20..300).step_by(13) {
                for panes in 1..=16 {
                    let grid = choose_grid(lines, cols, panes);
                    assert!(grid.unused(panes).is_some(), "{lines}x{cols} {panes}: {grid:?}");
                    let minimal = (grid.rows - 1) * grid.cols < panes
                        || grid.rows * (grid.cols - 1) < panes;
                    assert!(minimal, "{lines}x{cols} {panes}: {grid:?}");
                    if grid.rows == 1 {
                        assert_eq!(grid.cols, panes);
                    }
                }
            }
        }
    }

    #[test]
    fn panes_stay_inside_terminal_and_do_not_overlap() {
        for (lines, cols, count) in [(40, 160, 4), (61, 203, 7), (100, 100, 9), (24, 80, 2)] {
            let plan = plan(lines, cols, count, MinPaneSize::default()).unwrap();
            for (i, a) in plan.panes.iter().enumerate() {
                assert!(a.origin_y + a.lines <= lines);
                assert!(a.origin_x + a.cols <= cols);
                for b in &plan.panes[i + 1..] {
                    let apart_y = a.origin_y + a.lines <= b.origin_y || b.origin_y + b.lines <= a.origin_y;
                    let apart_x = a.origin_x + a.cols <= b.origin_x || b.origin_x + b.cols <= a.origin_x;
                    assert!(apart_y || apart_x, "{a:?} overlaps {b:?}");
                }
            }
        }
    }
}
