use crate::data::model::WaferDataset;

/// Coefficients at or below this value count as weak and are dropped.
pub const MIN_CORRELATION: f64 = 0.7;
/// Coefficients at or above this value are dropped (removes self-pairs).
pub const MAX_CORRELATION: f64 = 1.0;

/// Label of the synthetic per-column count row.
pub const PAIR_COUNT_LABEL: &str = "No. of pairs";
/// Label of the synthetic per-column sum row.
pub const PAIR_SUM_LABEL: &str = "Sum of pairs";

// ---------------------------------------------------------------------------
// Pearson correlation
// ---------------------------------------------------------------------------

/// Pearson correlation of two equally long samples.
///
/// Returns `None` when either sample has zero variance or fewer than two
/// points, where the coefficient is undefined.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len().min(y.len());
    if n < 2 {
        return None;
    }
    let nf = n as f64;
    let mean_x = x[..n].iter().sum::<f64>() / nf;
    let mean_y = y[..n].iter().sum::<f64>() / nf;

    let mut num = 0.0;
    let mut den_x = 0.0;
    let mut den_y = 0.0;
    for (xi, yi) in x.iter().zip(y.iter()) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        num += dx * dy;
        den_x += dx * dx;
        den_y += dy * dy;
    }

    let den = (den_x * den_y).sqrt();
    if den == 0.0 || !den.is_finite() {
        None
    } else {
        Some(num / den)
    }
}

/// Band filter applied to the absolute coefficient.
fn qualifies(abs_r: f64) -> bool {
    abs_r > MIN_CORRELATION && abs_r < MAX_CORRELATION
}

// ---------------------------------------------------------------------------
// ColumnSummary
// ---------------------------------------------------------------------------

/// Count and sum of the defined cells of one matrix column.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ColumnSummary {
    pub pair_count: usize,
    pub pair_sum: f64,
}

// ---------------------------------------------------------------------------
// CorrelationMatrix
// ---------------------------------------------------------------------------

/// Absolute pairwise correlations that pass the (0.7, 1.0) band.
///
/// `None` marks "no qualifying relationship": the diagonal, weak pairs and
/// pairs involving a constant column.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    names: Vec<String>,
    cells: Vec<Vec<Option<f64>>>,
    summaries: Vec<ColumnSummary>,
}

impl CorrelationMatrix {
    /// Compute the filtered matrix over the dataset's feature columns.
    pub fn compute(dataset: &WaferDataset) -> Self {
        let columns: Vec<Vec<f64>> = (0..dataset.feature_count())
            .map(|i| dataset.column(i))
            .collect();
        Self::from_columns(dataset.feature_names.clone(), &columns)
    }

    /// Compute from already extracted columns, one per name.
    pub fn from_columns(names: Vec<String>, columns: &[Vec<f64>]) -> Self {
        let n = columns.len();
        let mut cells = vec![vec![None; n]; n];

        for i in 0..n {
            for j in (i + 1)..n {
                let cell = pearson(&columns[i], &columns[j])
                    .map(f64::abs)
                    .filter(|r| qualifies(*r));
                cells[i][j] = cell;
                cells[j][i] = cell;
            }
        }

        let summaries = (0..n)
            .map(|j| {
                cells
                    .iter()
                    .filter_map(|row| row[j])
                    .fold(ColumnSummary::default(), |acc, v| ColumnSummary {
                        pair_count: acc.pair_count + 1,
                        pair_sum: acc.pair_sum + v,
                    })
            })
            .collect();

        CorrelationMatrix {
            names,
            cells,
            summaries,
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Cell `(i, j)`; `None` when undefined or out of range.
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.cells.get(i).and_then(|row| row.get(j).copied().flatten())
    }

    /// Full row `i` in feature order.
    pub fn row(&self, i: usize) -> &[Option<f64>] {
        self.cells.get(i).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn column_summary(&self, j: usize) -> Option<ColumnSummary> {
        self.summaries.get(j).copied()
    }

    /// The two synthetic summary rows, keyed apart from feature names.
    pub fn summary_rows(&self) -> [(&'static str, Vec<f64>); 2] {
        [
            (
                PAIR_COUNT_LABEL,
                self.summaries.iter().map(|s| s.pair_count as f64).collect(),
            ),
            (
                PAIR_SUM_LABEL,
                self.summaries.iter().map(|s| s.pair_sum).collect(),
            ),
        ]
    }

    /// Names of the features with a defined cell in row `i`.
    pub fn correlated_with(&self, i: usize) -> Vec<&str> {
        self.names
            .iter()
            .enumerate()
            .filter(|(j, _)| self.get(i, *j).is_some())
            .map(|(_, name)| name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn names(n: usize) -> Vec<String> {
        (1..=n).map(|k| format!("att{k}")).collect()
    }

    /// att1 and att2 correlate perfectly, att3 is close to att1 but noisy,
    /// att4 is unrelated, att5 is constant.
    fn sample() -> CorrelationMatrix {
        let att1 = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let att2 = vec![2.0, 4.0, 6.0, 8.0, 10.0, 12.0];
        let att3 = vec![1.2, 1.9, 3.3, 3.8, 5.4, 5.9];
        let att4 = vec![1.0, -1.0, 1.0, -1.0, 1.0, -1.0];
        let att5 = vec![3.0; 6];
        CorrelationMatrix::from_columns(names(5), &[att1, att2, att3, att4, att5])
    }

    #[test]
    fn pearson_matches_hand_computation() {
        let r = pearson(&[1.0, 2.0, 3.0], &[1.0, 2.0, 2.5]).unwrap();
        assert_relative_eq!(r, 0.9819805060619657, epsilon = 1e-12);
        assert_relative_eq!(pearson(&[1.0, 2.0], &[2.0, 1.0]).unwrap(), -1.0);
        assert_eq!(pearson(&[1.0, 1.0], &[1.0, 2.0]), None);
        assert_eq!(pearson(&[1.0], &[1.0]), None);
    }

    #[test]
    fn diagonal_is_never_defined() {
        let m = sample();
        for i in 0..m.len() {
            assert_eq!(m.get(i, i), None);
        }
    }

    #[test]
    fn matrix_is_symmetric() {
        let m = sample();
        for i in 0..m.len() {
            for j in 0..m.len() {
                assert_eq!(m.get(i, j), m.get(j, i));
            }
        }
    }

    #[test]
    fn band_filter_drops_perfect_weak_and_constant_pairs() {
        let m = sample();
        // perfect correlation sits at the excluded upper bound
        assert_eq!(m.get(0, 1), None);
        // strong but imperfect correlation survives
        let r13 = m.get(0, 2).unwrap();
        assert!(r13 > MIN_CORRELATION && r13 < MAX_CORRELATION);
        // weak and undefined
        assert_eq!(m.get(0, 3), None);
        assert_eq!(m.get(0, 4), None);
    }

    #[test]
    fn negative_correlation_is_taken_absolute() {
        let a = vec![1.0, 2.0, 3.0, 4.0];
        let b = vec![-1.1, -1.9, -3.2, -3.9];
        let m = CorrelationMatrix::from_columns(names(2), &[a, b]);
        let r = m.get(0, 1).unwrap();
        assert!(r > 0.0);
    }

    #[test]
    fn summaries_count_and_sum_defined_cells() {
        let m = sample();
        for j in 0..m.len() {
            let defined: Vec<f64> = (0..m.len()).filter_map(|i| m.get(i, j)).collect();
            let s = m.column_summary(j).unwrap();
            assert_eq!(s.pair_count, defined.len());
            assert_relative_eq!(s.pair_sum, defined.iter().sum::<f64>());
        }

        let [(count_label, counts), (sum_label, sums)] = m.summary_rows();
        assert_eq!(count_label, "No. of pairs");
        assert_eq!(sum_label, "Sum of pairs");
        assert_eq!(counts.len(), 5);
        assert_eq!(sums.len(), 5);
        assert_eq!(counts[4], 0.0);
        assert_eq!(sums[4], 0.0);
    }

    #[test]
    fn correlated_with_lists_defined_cells() {
        let m = sample();
        let related = m.correlated_with(0);
        assert!(related.contains(&"att3"));
        assert!(!related.contains(&"att1"));
        assert!(!related.contains(&"att4"));
        assert!(m.correlated_with(4).is_empty());
        assert!(m.correlated_with(99).is_empty());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        /// How a generated column relates to the first one.
        #[derive(Debug, Clone)]
        enum ColumnKind {
            Random(Vec<f64>),
            Constant(f64),
            Collinear { scale: f64, offset: f64 },
        }

        fn column_kind(rows: usize) -> impl Strategy<Value = ColumnKind> {
            prop_oneof![
                prop::collection::vec(-100.0f64..100.0, rows).prop_map(ColumnKind::Random),
                (-10.0f64..10.0).prop_map(ColumnKind::Constant),
                (prop_oneof![-5.0f64..-0.1, 0.1f64..5.0], -10.0f64..10.0)
                    .prop_map(|(scale, offset)| ColumnKind::Collinear { scale, offset }),
            ]
        }

        /// A first random column plus up to seven columns that are random,
        /// constant or an affine copy of it.
        fn columns() -> impl Strategy<Value = Vec<Vec<f64>>> {
            (2usize..12).prop_flat_map(|rows| {
                (
                    prop::collection::vec(-100.0f64..100.0, rows),
                    prop::collection::vec(column_kind(rows), 0..8),
                )
                    .prop_map(|(base, kinds)| {
                        let mut cols = vec![base.clone()];
                        cols.extend(kinds.into_iter().map(|kind| match kind {
                            ColumnKind::Random(values) => values,
                            ColumnKind::Constant(v) => vec![v; base.len()],
                            ColumnKind::Collinear { scale, offset } => {
                                base.iter().map(|x| scale * x + offset).collect()
                            }
                        }));
                        cols
                    })
            })
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(200))]

            #[test]
            fn diagonal_excluded_and_symmetric(cols in columns()) {
                let m = CorrelationMatrix::from_columns(names(cols.len()), &cols);
                for i in 0..m.len() {
                    prop_assert_eq!(m.get(i, i), None);
                    for j in 0..m.len() {
                        prop_assert_eq!(m.get(i, j), m.get(j, i));
                        if let Some(r) = m.get(i, j) {
                            prop_assert!(r > MIN_CORRELATION && r < MAX_CORRELATION);
                        }
                    }
                }
            }

            #[test]
            fn summary_rows_match_defined_cells(cols in columns()) {
                let m = CorrelationMatrix::from_columns(names(cols.len()), &cols);
                let [(_, counts), (_, sums)] = m.summary_rows();
                prop_assert_eq!(counts.len(), m.len());
                for j in 0..m.len() {
                    let defined: Vec<f64> = (0..m.len()).filter_map(|i| m.get(i, j)).collect();
                    let expected_sum: f64 = defined.iter().sum();
                    prop_assert_eq!(counts[j], defined.len() as f64);
                    prop_assert!((sums[j] - expected_sum).abs() < 1e-9);
                    prop_assert_eq!(m.column_summary(j).map(|s| s.pair_count), Some(defined.len()));
                }
            }
        }
    }
}
