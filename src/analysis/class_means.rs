use crate::data::filter::class_indices;
use crate::data::model::{Target, WaferDataset};

/// Per-feature means of the normal and abnormal records.
///
/// Both vectors follow `feature_names`; an entry is `None` when its class
/// has no rows.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassMeans {
    pub feature_names: Vec<String>,
    pub normal: Vec<Option<f64>>,
    pub abnormal: Vec<Option<f64>>,
}

impl ClassMeans {
    pub fn compute(dataset: &WaferDataset) -> Self {
        ClassMeans {
            feature_names: dataset.feature_names.clone(),
            normal: class_mean(dataset, Target::Normal),
            abnormal: class_mean(dataset, Target::Abnormal),
        }
    }

    pub fn for_class(&self, class: Target) -> &[Option<f64>] {
        match class {
            Target::Normal => &self.normal,
            Target::Abnormal => &self.abnormal,
        }
    }
}

fn class_mean(dataset: &WaferDataset, class: Target) -> Vec<Option<f64>> {
    let rows = class_indices(dataset, class);
    if rows.is_empty() {
        return vec![None; dataset.feature_count()];
    }
    let n = rows.len() as f64;
    (0..dataset.feature_count())
        .map(|col| {
            let sum: f64 = rows.iter().map(|&r| dataset.records[r].features[col]).sum();
            Some(sum / n)
        })
        .collect()
}
