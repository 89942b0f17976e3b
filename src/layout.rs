//! Correlation grid: one square per feature, wrapped into fixed-width rows
//! and coloured relative to the selected feature.

/// Cells per grid row.
pub const BOXES_PER_ROW: usize = 8;

/// Colour class of a grid cell, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Selected,
    Uncorrelated,
    Correlated,
}

/// A renderable description of one grid cell.
#[derive(Debug, Clone, PartialEq)]
pub struct GridCell {
    pub feature: String,
    pub grid_row: usize,
    pub grid_col: usize,
    pub kind: CellKind,
    pub correlation: Option<f64>,
    pub tooltip: String,
}

impl GridCell {
    /// Plot coordinates: columns grow right, rows grow downward.
    pub fn position(&self) -> [f64; 2] {
        [self.grid_col as f64, -(self.grid_row as f64)]
    }
}

/// Lay out `names` row-major, `per_row` cells per row.
///
/// `correlations` is the selected feature's matrix row, aligned with
/// `names`; missing trailing entries count as undefined.
pub fn correlation_grid(
    selected: &str,
    names: &[String],
    correlations: &[Option<f64>],
    per_row: usize,
) -> Vec<GridCell> {
    let per_row = per_row.max(1);
    names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let correlation = correlations.get(i).copied().flatten();
            let kind = if name == selected {
                CellKind::Selected
            } else if correlation.is_none() {
                CellKind::Uncorrelated
            } else {
                CellKind::Correlated
            };
            let tooltip = match correlation {
                Some(v) => format!("Correlation: {v:.4}"),
                None => name.clone(),
            };
            GridCell {
                feature: name.clone(),
                grid_row: i / per_row,
                grid_col: i % per_row,
                kind,
                correlation,
                tooltip,
            }
        })
        .collect()
}

/// Number of grid rows needed for `count` cells.
pub fn grid_rows(count: usize, per_row: usize) -> usize {
    count.div_ceil(per_row.max(1))
}
