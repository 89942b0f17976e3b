use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, AsArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::error::DataError;

use super::arff::parse_arff;
use super::model::{TARGET_COLUMN, Target, WaferDataset, WaferRecord};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a wafer dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.arff`    – attribute-relation file with numeric `att<k>` columns and a
///   nominal `target {-1,1}` column (the reference dataset format)
/// * `.csv`     – header row, numeric feature columns and a `target` column
/// * `.parquet` – numeric feature columns and a string or integer `target`
pub fn load_file(path: &Path) -> Result<WaferDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "arff" => load_arff(path),
        "csv" => load_csv(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    log::info!(
        "Loaded {} wafer records with {} features from {}",
        dataset.len(),
        dataset.feature_count(),
        path.display()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// ARFF loader
// ---------------------------------------------------------------------------

fn load_arff(path: &Path) -> Result<WaferDataset> {
    let text = std::fs::read_to_string(path).context("reading ARFF file")?;
    Ok(parse_arff(&text)?)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one `target` column holding
/// `1` / `-1`, every other column numeric.
fn load_csv(path: &Path) -> Result<WaferDataset> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let target_idx = headers
        .iter()
        .position(|h| h == TARGET_COLUMN)
        .ok_or(DataError::MissingTarget)?;

    let feature_names: Vec<String> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != target_idx)
        .map(|(_, h)| h.clone())
        .collect();

    let mut records = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        if record.len() != headers.len() {
            return Err(DataError::RowWidth {
                row: row_no,
                expected: headers.len(),
                found: record.len(),
            }
            .into());
        }

        let target = Target::from_label(record.get(target_idx).unwrap_or(""), row_no)?;
        let mut features = Vec::with_capacity(feature_names.len());
        for (col_idx, value) in record.iter().enumerate() {
            if col_idx == target_idx {
                continue;
            }
            features.push(parse_finite(value, row_no, &headers[col_idx])?);
        }

        records.push(WaferRecord { features, target });
    }

    Ok(WaferDataset::new(feature_names, records)?)
}

fn parse_finite(s: &str, row: usize, column: &str) -> Result<f64, DataError> {
    s.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| DataError::InvalidValue {
            row,
            column: column.to_string(),
            value: s.to_string(),
        })
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file containing wafer records.
///
/// Expected schema:
/// - `target`: Utf8 (`"1"` / `"-1"`) or Int32/Int64 (`1` / `-1`)
/// - every other column: Float64, Float32, Int32 or Int64
fn load_parquet(path: &Path) -> Result<WaferDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut feature_names: Option<Vec<String>> = None;
    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let target_idx = schema
            .index_of(TARGET_COLUMN)
            .map_err(|_| DataError::MissingTarget)?;

        let feature_cols: Vec<(usize, String)> = schema
            .fields()
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != target_idx)
            .map(|(i, f)| (i, f.name().clone()))
            .collect();

        if feature_names.is_none() {
            feature_names = Some(feature_cols.iter().map(|(_, n)| n.clone()).collect());
        }

        let target_col = batch.column(target_idx);
        for row in 0..batch.num_rows() {
            let row_no = records.len();
            let label = extract_label(target_col, row)
                .with_context(|| format!("Row {row_no}: failed to read 'target'"))?;
            let target = Target::from_label(&label, row_no)?;

            let mut features = Vec::with_capacity(feature_cols.len());
            for (col_idx, col_name) in &feature_cols {
                let value = extract_f64(batch.column(*col_idx), row)
                    .with_context(|| format!("Row {row_no}: failed to read '{col_name}'"))?;
                if !value.is_finite() {
                    return Err(DataError::InvalidValue {
                        row: row_no,
                        column: col_name.clone(),
                        value: value.to_string(),
                    }
                    .into());
                }
                features.push(value);
            }

            records.push(WaferRecord { features, target });
        }
    }

    Ok(WaferDataset::new(feature_names.unwrap_or_default(), records)?)
}

// -- Parquet / Arrow helpers --

/// Read a numeric cell as `f64`. Nulls are errors.
fn extract_f64(col: &Arc<dyn Array>, row: usize) -> Result<f64> {
    if col.is_null(row) {
        bail!("null value in feature column");
    }
    match col.data_type() {
        DataType::Float64 => Ok(col
            .as_any()
            .downcast_ref::<Float64Array>()
            .context("expected Float64Array")?
            .value(row)),
        DataType::Float32 => Ok(col
            .as_any()
            .downcast_ref::<Float32Array>()
            .context("expected Float32Array")?
            .value(row) as f64),
        DataType::Int64 => Ok(col
            .as_any()
            .downcast_ref::<Int64Array>()
            .context("expected Int64Array")?
            .value(row) as f64),
        DataType::Int32 => Ok(col
            .as_any()
            .downcast_ref::<Int32Array>()
            .context("expected Int32Array")?
            .value(row) as f64),
        other => bail!("Expected a numeric column, got {other:?}"),
    }
}

/// Read a label cell as text so it goes through the same mapping as ARFF.
fn extract_label(col: &Arc<dyn Array>, row: usize) -> Result<String> {
    if col.is_null(row) {
        bail!("null class label");
    }
    match col.data_type() {
        DataType::Utf8 => Ok(col
            .as_any()
            .downcast_ref::<StringArray>()
            .context("expected StringArray")?
            .value(row)
            .to_string()),
        DataType::LargeUtf8 => Ok(col.as_string::<i64>().value(row).to_string()),
        DataType::Int64 => Ok(col
            .as_any()
            .downcast_ref::<Int64Array>()
            .context("expected Int64Array")?
            .value(row)
            .to_string()),
        DataType::Int32 => Ok(col
            .as_any()
            .downcast_ref::<Int32Array>()
            .context("expected Int32Array")?
            .value(row)
            .to_string()),
        other => bail!("Expected a string or integer target column, got {other:?}"),
    }
}
