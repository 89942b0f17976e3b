use std::time::{Duration, Instant};

use crate::analysis::DatasetAnalysis;
use crate::analysis::correlation::{PAIR_COUNT_LABEL, PAIR_SUM_LABEL};
use crate::config::Config;
use crate::data::loader::load_file;
use crate::data::model::WaferDataset;
use crate::error::InferenceError;
use crate::inference::{InferenceAdapter, InputRecord, Prediction};
use crate::layout::{BOXES_PER_ROW, GridCell, correlation_grid};
use crate::session::{SessionRecord, SessionRecordList};

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Visualization,
    Prediction,
}

impl Page {
    pub const ALL: [Page; 2] = [Page::Visualization, Page::Prediction];

    pub fn label(self) -> &'static str {
        match self {
            Page::Visualization => "Visualization",
            Page::Prediction => "Prediction model",
        }
    }
}

/// A verdict waiting out the cosmetic submit delay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingPrediction {
    pub prediction: Prediction,
    pub ready_at: Instant,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state of one window (one session), independent of rendering.
pub struct AppState {
    /// Active page.
    pub page: Page,

    /// Loaded dataset (None if loading failed or nothing was loaded).
    pub dataset: Option<WaferDataset>,

    /// Statistics derived from `dataset` (cached).
    pub analysis: Option<DatasetAnalysis>,

    /// Feature the correlation grid is centred on.
    pub selected_feature: Option<String>,

    /// Classifier wrapper; may hold a load error instead of a model.
    pub adapter: InferenceAdapter,

    /// Slider values on the prediction page.
    pub input: InputRecord,

    /// Predictions submitted in this session.
    pub records: SessionRecordList,

    /// Verdict still hidden behind the submit delay.
    pub pending: Option<PendingPrediction>,

    /// Most recent verdict shown to the operator.
    pub last_result: Option<Prediction>,

    /// Error of the last prediction attempt.
    pub prediction_error: Option<String>,

    /// 1-based record number chosen in the delete selector.
    pub delete_position: usize,

    pub submit_delay: Duration,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Build the state for a fresh session: load the configured dataset and
    /// model, keeping failures as messages rather than aborting.
    pub fn from_config(config: &Config) -> Self {
        let adapter = InferenceAdapter::load(&config.model_path);
        let mut state = Self::with_parts(None, adapter, config.submit_delay);
        match load_file(&config.dataset_path) {
            Ok(ds) => state.set_dataset(ds),
            Err(e) => state.set_load_error(&e),
        }
        state
    }

    pub fn with_parts(
        dataset: Option<WaferDataset>,
        adapter: InferenceAdapter,
        submit_delay: Duration,
    ) -> Self {
        let mut state = AppState {
            page: Page::Visualization,
            dataset: None,
            analysis: None,
            selected_feature: None,
            adapter,
            input: InputRecord::default(),
            records: SessionRecordList::new(),
            pending: None,
            last_result: None,
            prediction_error: None,
            delete_position: 1,
            submit_delay,
            status_message: None,
        };
        if let Some(ds) = dataset {
            state.set_dataset(ds);
        }
        state
    }

    // -- visualization -----------------------------------------------------

    /// Ingest a newly loaded dataset and recompute its statistics.
    pub fn set_dataset(&mut self, dataset: WaferDataset) {
        if dataset.is_empty() {
            log::warn!("Dataset has no records; correlations and means are undefined");
        }
        self.analysis = Some(DatasetAnalysis::compute(&dataset));
        self.selected_feature = dataset.feature_names.first().cloned();
        self.dataset = Some(dataset);
        self.status_message = None;
    }

    pub fn set_load_error(&mut self, err: &anyhow::Error) {
        log::error!("Failed to load dataset: {err:#}");
        self.status_message = Some(format!("Error: {err:#}"));
    }

    pub fn select_feature(&mut self, name: &str) {
        let known = self
            .dataset
            .as_ref()
            .is_some_and(|ds| ds.feature_index(name).is_some());
        if known {
            self.selected_feature = Some(name.to_string());
        }
    }

    pub fn selected_index(&self) -> Option<usize> {
        let name = self.selected_feature.as_deref()?;
        self.dataset.as_ref()?.feature_index(name)
    }

    /// Grid cells for the selected feature.
    pub fn grid_cells(&self) -> Vec<GridCell> {
        let (Some(analysis), Some(idx), Some(name)) = (
            &self.analysis,
            self.selected_index(),
            self.selected_feature.as_deref(),
        ) else {
            return Vec::new();
        };
        let matrix = &analysis.correlations;
        correlation_grid(name, matrix.names(), matrix.row(idx), BOXES_PER_ROW)
    }

    /// Names correlated with the selected feature.
    pub fn correlated_features(&self) -> Vec<&str> {
        match (&self.analysis, self.selected_index()) {
            (Some(a), Some(idx)) => a.correlations.correlated_with(idx),
            _ => Vec::new(),
        }
    }

    /// `("No. of pairs", n)` and `("Sum of pairs", s)` for the selected feature.
    pub fn selected_summary(&self) -> Vec<(&'static str, f64)> {
        let summary = self
            .analysis
            .as_ref()
            .zip(self.selected_index())
            .and_then(|(a, idx)| a.correlations.column_summary(idx));
        match summary {
            Some(s) => vec![
                (PAIR_COUNT_LABEL, s.pair_count as f64),
                (PAIR_SUM_LABEL, s.pair_sum),
            ],
            None => Vec::new(),
        }
    }

    // -- prediction --------------------------------------------------------

    pub fn set_adapter(&mut self, adapter: InferenceAdapter) {
        self.adapter = adapter;
        self.prediction_error = None;
    }

    /// Classify the current input and append it to the session records.
    /// The verdict is revealed once `submit_delay` has passed.
    pub fn submit_prediction(&mut self, now: Instant) -> Result<Prediction, InferenceError> {
        match self.adapter.predict(&self.input) {
            Ok(prediction) => {
                self.records.append(SessionRecord {
                    input: self.input.clone(),
                    prediction,
                });
                self.prediction_error = None;
                self.last_result = None;
                self.pending = Some(PendingPrediction {
                    prediction,
                    ready_at: now + self.submit_delay,
                });
                log::info!("Predicted {prediction} for record {}", self.records.len());
                Ok(prediction)
            }
            Err(e) => {
                log::error!("Prediction failed: {e}");
                self.prediction_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Reveal the pending verdict if its delay has elapsed.
    pub fn poll_pending(&mut self, now: Instant) -> Option<Prediction> {
        let pending = self.pending?;
        if now < pending.ready_at {
            return None;
        }
        self.pending = None;
        self.last_result = Some(pending.prediction);
        self.last_result
    }

    /// Delete the record chosen in the selector; stale positions are ignored.
    pub fn delete_selected(&mut self) -> Option<SessionRecord> {
        let removed = self.records.remove(self.delete_position);
        self.delete_position = self.delete_position.clamp(1, self.records.len().max(1));
        removed
    }

    pub fn reset_records(&mut self) {
        self.records.reset();
        self.delete_position = 1;
        self.last_result = None;
        self.pending = None;
        log::debug!("Session records reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Target, WaferRecord};
    use crate::inference::INPUT_FEATURES;
    use crate::inference::tests::ConstantClassifier;
    use crate::layout::CellKind;

    fn adapter(class: i64) -> InferenceAdapter {
        InferenceAdapter::new(Box::new(ConstantClassifier::new(class))).unwrap()
    }

    fn dataset() -> WaferDataset {
        let rows = [
            [1.0, 2.1, 0.0],
            [2.0, 3.9, 1.0],
            [3.0, 6.2, 0.0],
            [4.0, 7.8, 1.0],
        ];
        let records = rows
            .iter()
            .enumerate()
            .map(|(i, r)| WaferRecord {
                features: r.to_vec(),
                target: if i % 2 == 0 { Target::Normal } else { Target::Abnormal },
            })
            .collect();
        WaferDataset::new(vec!["att1".into(), "att2".into(), "att3".into()], records).unwrap()
    }

    #[test]
    fn all_features_at_half_against_zero_stub_records_abnormal() {
        let mut state = AppState::with_parts(None, adapter(0), Duration::ZERO);
        assert_eq!(state.input.values().len(), INPUT_FEATURES.len());
        assert!(state.input.values().iter().all(|v| *v == 0.5));

        let now = Instant::now();
        let result = state.submit_prediction(now).unwrap();
        assert_eq!(result, Prediction::Abnormal);
        assert_eq!(state.records.len(), 1);
        assert_eq!(state.records.get(1).unwrap().prediction, Prediction::Abnormal);
        assert_eq!(state.poll_pending(now), Some(Prediction::Abnormal));
        assert_eq!(state.last_result, Some(Prediction::Abnormal));
    }

    #[test]
    fn verdict_waits_for_submit_delay() {
        let mut state = AppState::with_parts(None, adapter(1), Duration::from_secs(2));
        let now = Instant::now();
        state.submit_prediction(now).unwrap();
        assert_eq!(state.records.len(), 1);
        assert_eq!(state.poll_pending(now + Duration::from_secs(1)), None);
        assert!(state.pending.is_some());
        assert_eq!(
            state.poll_pending(now + Duration::from_secs(2)),
            Some(Prediction::Normal)
        );
        assert!(state.pending.is_none());
    }

    #[test]
    fn missing_model_keeps_session_alive() {
        let mut state =
            AppState::with_parts(Some(dataset()), InferenceAdapter::unavailable("no file"), Duration::ZERO);
        assert!(state.submit_prediction(Instant::now()).is_err());
        assert!(state.records.is_empty());
        assert!(state.prediction_error.as_deref().unwrap().contains("no file"));
        // visualization still works
        assert_eq!(state.grid_cells().len(), 3);
    }

    #[test]
    fn stale_delete_position_is_ignored() {
        let mut state = AppState::with_parts(None, adapter(1), Duration::ZERO);
        for _ in 0..3 {
            state.submit_prediction(Instant::now()).unwrap();
        }
        state.delete_position = state.records.len() + 5;
        assert!(state.delete_selected().is_none());
        assert_eq!(state.records.len(), 3);
        assert_eq!(state.delete_position, 3);

        state.delete_position = 3;
        assert!(state.delete_selected().is_some());
        assert_eq!(state.delete_position, 2);

        state.reset_records();
        assert!(state.records.is_empty());
        assert!(state.delete_selected().is_none());
    }

    #[test]
    fn dataset_selection_drives_grid() {
        let mut state = AppState::with_parts(Some(dataset()), adapter(1), Duration::ZERO);
        assert_eq!(state.selected_feature.as_deref(), Some("att1"));

        let cells = state.grid_cells();
        assert_eq!(cells[0].kind, CellKind::Selected);
        assert_eq!(cells[1].kind, CellKind::Correlated);
        assert_eq!(state.correlated_features(), vec!["att2"]);
        let summary = state.selected_summary();
        assert_eq!(summary[0], ("No. of pairs", 1.0));
        assert_eq!(summary[1].0, "Sum of pairs");
        assert!(summary[1].1 > 0.7 && summary[1].1 < 1.0);

        state.select_feature("att3");
        assert_eq!(state.grid_cells()[2].kind, CellKind::Selected);
        state.select_feature("target");
        assert_eq!(state.selected_feature.as_deref(), Some("att3"));
    }
}
