//! Prediction path: input record → classifier row → class label.

pub mod forest;

use std::fmt;
use std::path::Path;

use crate::error::InferenceError;

/// Features the operator sets on the prediction page, in the order the
/// deployed model was trained on. `bin/generate_sample.rs` includes the
/// same list when it writes the sample model.
pub const INPUT_FEATURES: [&str; 41] = include!("input_features.in");

pub const INPUT_MIN: f64 = -4.0;
pub const INPUT_MAX: f64 = 4.0;
pub const INPUT_DEFAULT: f64 = 0.5;

// ---------------------------------------------------------------------------
// InputRecord
// ---------------------------------------------------------------------------

/// One operator-entered reading per [`INPUT_FEATURES`] entry, each kept
/// within `[INPUT_MIN, INPUT_MAX]`.
#[derive(Debug, Clone, PartialEq)]
pub struct InputRecord {
    values: [f64; INPUT_FEATURES.len()],
}

impl Default for InputRecord {
    fn default() -> Self {
        Self::filled(INPUT_DEFAULT)
    }
}

impl InputRecord {
    /// Every feature set to `value` (clamped).
    pub fn filled(value: f64) -> Self {
        InputRecord {
            values: [clamp_input(value); INPUT_FEATURES.len()],
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        feature_position(name).map(|i| self.values[i])
    }

    /// Set a feature by name; returns `false` for names outside the set.
    pub fn set(&mut self, name: &str, value: f64) -> bool {
        match feature_position(name) {
            Some(i) => {
                self.values[i] = clamp_input(value);
                true
            }
            None => false,
        }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

fn feature_position(name: &str) -> Option<usize> {
    INPUT_FEATURES.iter().position(|f| *f == name)
}

fn clamp_input(v: f64) -> f64 {
    if v.is_nan() {
        INPUT_DEFAULT
    } else {
        v.clamp(INPUT_MIN, INPUT_MAX)
    }
}

// ---------------------------------------------------------------------------
// Prediction
// ---------------------------------------------------------------------------

/// Classifier verdict for one input record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Prediction {
    Normal,
    Abnormal,
}

impl Prediction {
    /// Map the deployed model's raw class to a verdict.
    ///
    /// The model was trained with 0 = abnormal and 1 = normal. This happens
    /// to agree with the dataset codes but is a property of the artifact,
    /// not something derived from the loader.
    pub fn from_model_output(raw: i64) -> Result<Self, InferenceError> {
        match raw {
            0 => Ok(Prediction::Abnormal),
            1 => Ok(Prediction::Normal),
            other => Err(InferenceError::UnexpectedOutput(other)),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Prediction::Normal => "normal",
            Prediction::Abnormal => "abnormal",
        }
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Classifier capability
// ---------------------------------------------------------------------------

/// A trained binary classifier consumed as an opaque single-row predictor.
pub trait Classifier {
    /// Feature names in the order `predict` expects its row.
    fn feature_names(&self) -> &[String];

    /// Predict the raw class of one row.
    fn predict(&self, row: &[f64]) -> Result<i64, InferenceError>;
}

// ---------------------------------------------------------------------------
// InferenceAdapter
// ---------------------------------------------------------------------------

/// Holds the loaded classifier, or the reason it could not be loaded.
pub struct InferenceAdapter {
    model: Result<Box<dyn Classifier>, String>,
}

impl fmt::Debug for InferenceAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.model {
            Ok(m) => write!(f, "InferenceAdapter({} features)", m.feature_names().len()),
            Err(e) => write!(f, "InferenceAdapter(unavailable: {e})"),
        }
    }
}

impl InferenceAdapter {
    /// Wrap a classifier, checking that every feature it wants is one the
    /// operator can enter.
    pub fn new(model: Box<dyn Classifier>) -> Result<Self, InferenceError> {
        if let Some(missing) = model
            .feature_names()
            .iter()
            .find(|name| feature_position(name).is_none())
        {
            return Err(InferenceError::FeatureMismatch(missing.clone()));
        }
        Ok(InferenceAdapter { model: Ok(model) })
    }

    /// An adapter whose every prediction fails with `reason`.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        InferenceAdapter {
            model: Err(reason.into()),
        }
    }

    /// Load a forest artifact from disk. Failures are logged and kept so the
    /// prediction page can show them; they never abort the session.
    pub fn load(path: &Path) -> Self {
        let loaded = forest::RandomForest::load(path)
            .map_err(|e| format!("{e:#}"))
            .and_then(|model| Self::new(Box::new(model)).map_err(|e| e.to_string()));
        match loaded {
            Ok(adapter) => {
                log::info!("Loaded classifier from {}", path.display());
                adapter
            }
            Err(reason) => {
                log::error!("Error loading the model: {reason}");
                Self::unavailable(reason)
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        self.model.is_ok()
    }

    /// Why the model is unavailable, if it is.
    pub fn load_error(&self) -> Option<&str> {
        self.model.as_ref().err().map(String::as_str)
    }

    /// Classify one input record.
    pub fn predict(&self, input: &InputRecord) -> Result<Prediction, InferenceError> {
        let model = self
            .model
            .as_ref()
            .map_err(|reason| InferenceError::ModelUnavailable(reason.clone()))?;

        let row = model
            .feature_names()
            .iter()
            .map(|name| {
                input
                    .get(name)
                    .ok_or_else(|| InferenceError::FeatureMismatch(name.clone()))
            })
            .collect::<Result<Vec<f64>, _>>()?;

        Prediction::from_model_output(model.predict(&row)?)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Classifier double that always answers `class`.
    pub(crate) struct ConstantClassifier {
        pub names: Vec<String>,
        pub class: i64,
    }

    impl ConstantClassifier {
        pub(crate) fn new(class: i64) -> Self {
            ConstantClassifier {
                names: INPUT_FEATURES.iter().map(|s| s.to_string()).collect(),
                class,
            }
        }
    }

    impl Classifier for ConstantClassifier {
        fn feature_names(&self) -> &[String] {
            &self.names
        }

        fn predict(&self, row: &[f64]) -> Result<i64, InferenceError> {
            if row.len() != self.names.len() {
                return Err(InferenceError::RowShape {
                    expected: self.names.len(),
                    found: row.len(),
                });
            }
            Ok(self.class)
        }
    }

    /// Returns the first value of the row as the class.
    struct EchoFirst(Vec<String>);

    impl Classifier for EchoFirst {
        fn feature_names(&self) -> &[String] {
            &self.0
        }

        fn predict(&self, row: &[f64]) -> Result<i64, InferenceError> {
            Ok(row[0] as i64)
        }
    }

    #[test]
    fn input_features_are_distinct_dataset_columns() {
        let numbers: Vec<usize> = INPUT_FEATURES
            .iter()
            .map(|name| name.strip_prefix("att").unwrap().parse().unwrap())
            .collect();
        assert!(numbers.windows(2).all(|w| w[0] < w[1]));
        assert!(numbers.iter().all(|k| (1..=152).contains(k)));
        assert_eq!(INPUT_FEATURES.len(), 41);
    }

    #[test]
    fn input_values_are_clamped() {
        let mut rec = InputRecord::default();
        assert_eq!(rec.get("att1"), Some(0.5));
        assert!(rec.set("att151", 9.0));
        assert_eq!(rec.get("att151"), Some(4.0));
        assert!(rec.set("att3", -4.0));
        assert_eq!(rec.get("att3"), Some(-4.0));
        assert!(!rec.set("att2", 1.0));
        assert_eq!(InputRecord::filled(-10.0).values()[0], -4.0);
    }

    #[test]
    fn zero_maps_to_abnormal_and_one_to_normal() {
        assert_eq!(Prediction::from_model_output(0).unwrap(), Prediction::Abnormal);
        assert_eq!(Prediction::from_model_output(1).unwrap(), Prediction::Normal);
        assert_eq!(
            Prediction::from_model_output(2),
            Err(InferenceError::UnexpectedOutput(2))
        );
        assert_eq!(Prediction::Abnormal.to_string(), "abnormal");
    }

    #[test]
    fn constant_zero_classifier_predicts_abnormal() {
        let adapter = InferenceAdapter::new(Box::new(ConstantClassifier::new(0))).unwrap();
        let input = InputRecord::filled(0.5);
        assert_eq!(adapter.predict(&input).unwrap(), Prediction::Abnormal);
    }

    #[test]
    fn row_follows_model_feature_order() {
        let model = EchoFirst(vec!["att151".into(), "att1".into()]);
        let adapter = InferenceAdapter::new(Box::new(model)).unwrap();
        let mut input = InputRecord::filled(0.0);
        input.set("att151", 1.0);
        assert_eq!(adapter.predict(&input).unwrap(), Prediction::Normal);
    }

    #[test]
    fn unknown_model_feature_is_rejected() {
        let model = EchoFirst(vec!["att2".into()]);
        assert_eq!(
            InferenceAdapter::new(Box::new(model)).unwrap_err(),
            InferenceError::FeatureMismatch("att2".into())
        );
    }

    #[test]
    fn unavailable_model_reports_reason() {
        let adapter = InferenceAdapter::unavailable("file not found");
        assert!(!adapter.is_ready());
        assert_eq!(adapter.load_error(), Some("file not found"));
        assert_eq!(
            adapter.predict(&InputRecord::default()),
            Err(InferenceError::ModelUnavailable("file not found".into()))
        );
    }

    #[test]
    fn load_of_missing_artifact_keeps_session_usable() {
        let adapter = InferenceAdapter::load(Path::new("/nonexistent/rf_model.json"));
        assert!(!adapter.is_ready());
        assert!(adapter.load_error().is_some());
    }
}
