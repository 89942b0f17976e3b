//! Per-window list of submitted predictions.

use crate::inference::{InputRecord, Prediction};

/// An input record together with the verdict it received.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub input: InputRecord,
    pub prediction: Prediction,
}

/// Ordered records of one session. Positions are 1-based, matching the
/// numbering shown in the records table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionRecordList {
    records: Vec<SessionRecord>,
}

impl SessionRecordList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record at the end. Duplicates are allowed.
    pub fn append(&mut self, record: SessionRecord) {
        self.records.push(record);
        log::debug!("Session record {} added", self.records.len());
    }

    /// Remove the record at 1-based `position`.
    ///
    /// Out-of-range positions (including 0) leave the list untouched and
    /// return `None`; a stale index from a previous frame is not an error.
    pub fn remove(&mut self, position: usize) -> Option<SessionRecord> {
        if position == 0 || position > self.records.len() {
            log::debug!(
                "Ignoring delete of record {position} ({} records)",
                self.records.len()
            );
            return None;
        }
        Some(self.records.remove(position - 1))
    }

    /// Drop every record.
    pub fn reset(&mut self) {
        self.records.clear();
    }

    pub fn get(&self, position: usize) -> Option<&SessionRecord> {
        position.checked_sub(1).and_then(|i| self.records.get(i))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// `(position, record)` pairs, positions starting at 1.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &SessionRecord)> {
        self.records.iter().enumerate().map(|(i, r)| (i + 1, r))
    }
}
