//! CSV export of the session records.

use std::path::Path;

use anyhow::{Context, Result};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};

use crate::inference::INPUT_FEATURES;
use crate::session::SessionRecordList;

/// Default file name offered by the save dialog.
pub const EXPORT_FILE_NAME: &str = "selected_records.csv";

/// Name of the verdict column appended after the input features.
pub const PREDICTION_COLUMN: &str = "Prediction";

/// Serialise the records: header of input features plus `Prediction`, then
/// one row per record in list order.
pub fn to_csv(records: &SessionRecordList) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(INPUT_FEATURES.iter().copied().chain([PREDICTION_COLUMN]))
        .context("writing CSV header")?;

    for (position, record) in records.iter() {
        let row = record
            .input
            .values()
            .iter()
            .map(|v| csv_number(*v))
            .chain([record.prediction.as_str().to_string()]);
        writer
            .write_record(row)
            .with_context(|| format!("writing record {position}"))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("flushing CSV: {}", e.error()))?;
    Ok(String::from_utf8(bytes).context("CSV is not UTF-8")?)
}

/// Float text with a trailing `.0` on whole numbers (`4.0`, `-4.0`, `0.5`).
fn csv_number(v: f64) -> String {
    format!("{v:?}")
}

/// `data:` URL embedding the CSV, for a direct-download link.
pub fn data_url(csv: &str) -> String {
    format!("data:file/csv;base64,{}", BASE64.encode(csv.as_bytes()))
}

/// Write the records as CSV to `path`.
pub fn write_csv(records: &SessionRecordList, path: &Path) -> Result<()> {
    let csv = to_csv(records)?;
    std::fs::write(path, csv).with_context(|| format!("writing {}", path.display()))?;
    log::info!("Exported {} records to {}", records.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::{InputRecord, Prediction};
    use crate::session::SessionRecord;

    fn header() -> String {
        let mut h = INPUT_FEATURES.join(",");
        h.push_str(",Prediction\n");
        h
    }

    #[test]
    fn empty_list_exports_header_only() {
        let csv = to_csv(&SessionRecordList::new()).unwrap();
        assert_eq!(csv, header());
        assert_eq!(csv.lines().count(), 1);
    }

    #[test]
    fn rows_follow_list_order() {
        let mut list = SessionRecordList::new();
        list.append(SessionRecord {
            input: InputRecord::filled(0.5),
            prediction: Prediction::Abnormal,
        });
        let mut second = InputRecord::filled(-1.25);
        second.set("att151", 4.0);
        list.append(SessionRecord {
            input: second,
            prediction: Prediction::Normal,
        });

        let csv = to_csv(&list).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("0.5,0.5,"));
        assert!(lines[1].ends_with(",abnormal"));
        assert!(lines[2].starts_with("-1.25,"));
        assert!(lines[2].ends_with(",4.0,normal"));
        assert_eq!(lines[2].split(',').count(), INPUT_FEATURES.len() + 1);
    }

    #[test]
    fn whole_numbers_keep_a_decimal_point() {
        assert_eq!(csv_number(4.0), "4.0");
        assert_eq!(csv_number(-4.0), "-4.0");
        assert_eq!(csv_number(0.0), "0.0");
        assert_eq!(csv_number(0.5), "0.5");
        assert_eq!(csv_number(-1.25), "-1.25");

        let mut list = SessionRecordList::new();
        list.append(SessionRecord {
            input: InputRecord::filled(-4.0),
            prediction: Prediction::Abnormal,
        });
        let csv = to_csv(&list).unwrap();
        let row = csv.lines().nth(1).unwrap();
        assert!(row.starts_with("-4.0,-4.0,"));
        assert!(row.ends_with(",-4.0,abnormal"));
    }

    #[test]
    fn export_is_deterministic() {
        let mut list = SessionRecordList::new();
        list.append(SessionRecord {
            input: InputRecord::filled(0.123456789),
            prediction: Prediction::Normal,
        });
        assert_eq!(to_csv(&list).unwrap(), to_csv(&list).unwrap());
    }

    #[test]
    fn data_url_is_base64_csv() {
        assert_eq!(data_url("a,b\n"), "data:file/csv;base64,YSxiCg==");
    }

    #[test]
    fn write_csv_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(EXPORT_FILE_NAME);
        write_csv(&SessionRecordList::new(), &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), header());
    }
}
