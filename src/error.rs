use thiserror::Error;

// ---------------------------------------------------------------------------
// Dataset errors
// ---------------------------------------------------------------------------

/// Data-integrity failures raised while reading a wafer dataset.
///
/// These are fatal for the file being loaded: nothing is coerced or
/// defaulted, the caller surfaces the message instead.
#[derive(Debug, Error, PartialEq)]
pub enum DataError {
    #[error("row {row}: unknown class label '{label}' (expected '1' or '-1')")]
    UnknownLabel { row: usize, label: String },

    #[error("row {row}, column '{column}': '{value}' is not a finite number")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error("row {row}: expected {expected} values, found {found}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("dataset has no 'target' column")]
    MissingTarget,

    #[error("line {line}: {message}")]
    Arff { line: usize, message: String },
}

// ---------------------------------------------------------------------------
// Inference errors
// ---------------------------------------------------------------------------

/// Failures of the prediction path. None of them abort the session.
#[derive(Debug, Error, PartialEq)]
pub enum InferenceError {
    #[error("model is not available: {0}")]
    ModelUnavailable(String),

    #[error("model feature '{0}' is not part of the input record")]
    FeatureMismatch(String),

    #[error("model row has {found} values but the model expects {expected}")]
    RowShape { expected: usize, found: usize },

    #[error("model returned unexpected class {0}")]
    UnexpectedOutput(i64),

    #[error("invalid model artifact: {0}")]
    InvalidModel(String),
}
