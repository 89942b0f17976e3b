use super::model::{Target, WaferDataset};

// ---------------------------------------------------------------------------
// Class partition: which rows belong to a given target
// ---------------------------------------------------------------------------

/// Return indices of records whose target equals `class`, in row order.
pub fn class_indices(dataset: &WaferDataset, class: Target) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| rec.target == class)
        .map(|(i, _)| i)
        .collect()
}

/// Row counts per class as `(normal, abnormal)`.
pub fn class_counts(dataset: &WaferDataset) -> (usize, usize) {
    dataset
        .records
        .iter()
        .fold((0, 0), |(n, a), rec| match rec.target {
            Target::Normal => (n + 1, a),
            Target::Abnormal => (n, a + 1),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::WaferRecord;

    fn alternating() -> WaferDataset {
        let records = (0..5)
            .map(|i| WaferRecord {
                features: vec![i as f64],
                target: if i % 2 == 0 { Target::Normal } else { Target::Abnormal },
            })
            .collect();
        WaferDataset::new(vec!["att1".into()], records).unwrap()
    }

    #[test]
    fn partitions_rows_by_target() {
        let ds = alternating();
        assert_eq!(class_indices(&ds, Target::Normal), vec![0, 2, 4]);
        assert_eq!(class_indices(&ds, Target::Abnormal), vec![1, 3]);
        assert_eq!(class_counts(&ds), (3, 2));
    }
}
