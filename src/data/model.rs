use std::fmt;

use crate::error::DataError;

/// Name of the class-label column in every supported input format.
pub const TARGET_COLUMN: &str = "target";

// ---------------------------------------------------------------------------
// Target – the binary class label of a wafer record
// ---------------------------------------------------------------------------

/// Class label of a wafer record.
///
/// The raw files carry `1` for normal and `-1` for abnormal wafers; the
/// dashboard works with the numeric codes 1 / 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Target {
    Abnormal,
    Normal,
}

impl Target {
    /// Map a raw label to a class. Anything other than `1` / `-1` is a
    /// data-integrity error for row `row`.
    pub fn from_label(label: &str, row: usize) -> Result<Self, DataError> {
        let trimmed = label.trim().trim_matches(|c| c == '\'' || c == '"');
        match trimmed {
            "1" => Ok(Target::Normal),
            "-1" => Ok(Target::Abnormal),
            _ => Err(DataError::UnknownLabel {
                row,
                label: label.to_string(),
            }),
        }
    }

    /// Numeric target code: 1 = normal, 0 = abnormal.
    pub fn code(self) -> u8 {
        match self {
            Target::Normal => 1,
            Target::Abnormal => 0,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Normal => write!(f, "normal"),
            Target::Abnormal => write!(f, "abnormal"),
        }
    }
}

// ---------------------------------------------------------------------------
// WaferRecord – one row of the dataset
// ---------------------------------------------------------------------------

/// A single wafer sample: one reading per feature plus its class.
#[derive(Debug, Clone, PartialEq)]
pub struct WaferRecord {
    /// Sensor readings, aligned with [`WaferDataset::feature_names`].
    pub features: Vec<f64>,
    pub target: Target,
}

// ---------------------------------------------------------------------------
// WaferDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset. Feature order is the file's column order.
#[derive(Debug, Clone, PartialEq)]
pub struct WaferDataset {
    /// Ordered feature column names (`att1`, `att2`, …); excludes `target`.
    pub feature_names: Vec<String>,
    /// All records (rows).
    pub records: Vec<WaferRecord>,
}

impl WaferDataset {
    /// Assemble a dataset, checking every row against the header width and
    /// every value for finiteness.
    pub fn new(feature_names: Vec<String>, records: Vec<WaferRecord>) -> Result<Self, DataError> {
        for (row, rec) in records.iter().enumerate() {
            if rec.features.len() != feature_names.len() {
                return Err(DataError::RowWidth {
                    row,
                    expected: feature_names.len(),
                    found: rec.features.len(),
                });
            }
            if let Some((col, v)) = rec
                .features
                .iter()
                .enumerate()
                .find(|(_, v)| !v.is_finite())
            {
                return Err(DataError::InvalidValue {
                    row,
                    column: feature_names[col].clone(),
                    value: v.to_string(),
                });
            }
        }
        Ok(WaferDataset {
            feature_names,
            records,
        })
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn feature_count(&self) -> usize {
        self.feature_names.len()
    }

    /// Position of a feature by name.
    pub fn feature_index(&self, name: &str) -> Option<usize> {
        self.feature_names.iter().position(|n| n == name)
    }

    /// Copy out one feature column.
    pub fn column(&self, idx: usize) -> Vec<f64> {
        self.records.iter().map(|r| r.features[idx]).collect()
    }
}
