//! Derived statistics over a loaded [`WaferDataset`](crate::data::model::WaferDataset).
//!
//! Everything here is recomputed from scratch whenever the dataset changes;
//! undefined values stay `None` and are never folded into zero.

pub mod class_means;
pub mod correlation;

use std::time::Instant;

use crate::data::model::WaferDataset;

use class_means::ClassMeans;
use correlation::CorrelationMatrix;

/// Bundle of the statistics the visualization page needs.
#[derive(Debug, Clone)]
pub struct DatasetAnalysis {
    pub correlations: CorrelationMatrix,
    pub means: ClassMeans,
}

impl DatasetAnalysis {
    pub fn compute(dataset: &WaferDataset) -> Self {
        let started = Instant::now();
        let correlations = CorrelationMatrix::compute(dataset);
        let means = ClassMeans::compute(dataset);
        log::debug!(
            "Analysed {} features over {} records in {:?}",
            correlations.len(),
            dataset.len(),
            started.elapsed()
        );
        DatasetAnalysis {
            correlations,
            means,
        }
    }
}
