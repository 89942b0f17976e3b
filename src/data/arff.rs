//! Dense ARFF (attribute-relation file format) reader for wafer datasets.
//!
//! Supported subset:
//! ```text
//! % comment
//! @relation Wafer
//! @attribute att1 numeric
//! @attribute att2 real
//! @attribute target {-1,1}
//! @data
//! 0.51,-1.2,1
//! ```
//! Keywords are case-insensitive; values may be single- or double-quoted.
//! Sparse rows (`{…}`), missing values (`?`) and string/date attributes are
//! rejected.

use crate::error::DataError;

use super::model::{TARGET_COLUMN, Target, WaferDataset, WaferRecord};

#[derive(Debug, Clone, PartialEq)]
enum AttributeKind {
    Numeric,
    Nominal,
}

#[derive(Debug, Clone)]
struct Attribute {
    name: String,
    kind: AttributeKind,
}

/// Parse ARFF text into a [`WaferDataset`].
pub fn parse_arff(text: &str) -> Result<WaferDataset, DataError> {
    let mut attributes: Vec<Attribute> = Vec::new();
    let mut in_data = false;
    let mut target_idx: Option<usize> = None;
    let mut feature_names: Vec<String> = Vec::new();
    let mut records: Vec<WaferRecord> = Vec::new();

    for (line_no, raw) in text.lines().enumerate() {
        let line_no = line_no + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('%') {
            continue;
        }

        if !in_data {
            let lower = line.to_ascii_lowercase();
            if lower.starts_with("@relation") {
                continue;
            }
            if lower.starts_with("@attribute") {
                let attr = parse_attribute(&line["@attribute".len()..], line_no)?;
                if attr.name == TARGET_COLUMN {
                    if attr.kind != AttributeKind::Nominal {
                        return Err(arff_error(line_no, "'target' must be a nominal attribute"));
                    }
                    target_idx = Some(attributes.len());
                } else if attr.kind == AttributeKind::Nominal {
                    return Err(arff_error(
                        line_no,
                        format!("nominal attribute '{}' is not supported", attr.name),
                    ));
                } else {
                    feature_names.push(attr.name.clone());
                }
                attributes.push(attr);
                continue;
            }
            if lower.starts_with("@data") {
                if target_idx.is_none() {
                    return Err(DataError::MissingTarget);
                }
                in_data = true;
                continue;
            }
            return Err(arff_error(line_no, format!("unexpected header line '{line}'")));
        }

        if line.starts_with('{') {
            return Err(arff_error(line_no, "sparse data rows are not supported"));
        }

        let row = records.len();
        let values: Vec<&str> = line.split(',').map(unquote).collect();
        if values.len() != attributes.len() {
            return Err(DataError::RowWidth {
                row,
                expected: attributes.len(),
                found: values.len(),
            });
        }

        let mut features = Vec::with_capacity(feature_names.len());
        let mut target = None;
        for (col, (value, attr)) in values.iter().zip(&attributes).enumerate() {
            if Some(col) == target_idx {
                target = Some(Target::from_label(value, row)?);
                continue;
            }
            let parsed = value
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| DataError::InvalidValue {
                    row,
                    column: attr.name.clone(),
                    value: value.to_string(),
                })?;
            features.push(parsed);
        }

        let target = target.ok_or(DataError::MissingTarget)?;
        records.push(WaferRecord { features, target });
    }

    if !in_data {
        return Err(arff_error(text.lines().count(), "missing @data section"));
    }

    WaferDataset::new(feature_names, records)
}

fn parse_attribute(rest: &str, line_no: usize) -> Result<Attribute, DataError> {
    let rest = rest.trim();
    let (name, kind_text) = match rest.chars().next() {
        Some(q @ ('\'' | '"')) => {
            let close = rest[1..]
                .find(q)
                .ok_or_else(|| arff_error(line_no, "unterminated attribute name"))?;
            (&rest[1..=close], rest[close + 2..].trim())
        }
        Some(_) => match rest.split_once(char::is_whitespace) {
            Some((name, kind)) => (name, kind.trim()),
            None => return Err(arff_error(line_no, "attribute without a type")),
        },
        None => return Err(arff_error(line_no, "attribute without a name")),
    };

    let kind = if kind_text.starts_with('{') {
        AttributeKind::Nominal
    } else {
        match kind_text.to_ascii_lowercase().as_str() {
            "numeric" | "real" | "integer" => AttributeKind::Numeric,
            other => {
                return Err(arff_error(
                    line_no,
                    format!("attribute type '{other}' is not supported"),
                ));
            }
        }
    };

    Ok(Attribute {
        name: name.to_string(),
        kind,
    })
}

fn unquote(value: &str) -> &str {
    value.trim().trim_matches(|c| c == '\'' || c == '"')
}

fn arff_error(line: usize, message: impl Into<String>) -> DataError {
    DataError::Arff {
        line,
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = "\
% Wafer sample
@RELATION wafer

@ATTRIBUTE att1 NUMERIC
@attribute att2 real
@attribute target {-1,1}

@data
1.0,2.0,'1'
3.0,4.0,'-1'
5.0,6.0,1
";

    #[test]
    fn parses_header_and_rows() {
        let ds = parse_arff(SMALL).unwrap();
        assert_eq!(ds.feature_names, vec!["att1", "att2"]);
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.records[1].features, vec![3.0, 4.0]);
        assert_eq!(ds.records[1].target, Target::Abnormal);
        assert_eq!(ds.records[2].target, Target::Normal);
    }

    #[test]
    fn target_may_appear_before_features() {
        let text = "@attribute target {1,-1}\n@attribute att1 numeric\n@data\n-1,0.25\n";
        let ds = parse_arff(text).unwrap();
        assert_eq!(ds.feature_names, vec!["att1"]);
        assert_eq!(ds.records[0].features, vec![0.25]);
        assert_eq!(ds.records[0].target, Target::Abnormal);
    }

    #[test]
    fn unknown_label_fails_loudly() {
        let text = "@attribute att1 numeric\n@attribute target {-1,1}\n@data\n1.0,1\n1.0,2\n";
        assert_eq!(
            parse_arff(text).unwrap_err(),
            DataError::UnknownLabel {
                row: 1,
                label: "2".into()
            }
        );
    }

    #[test]
    fn missing_value_is_rejected() {
        let text = "@attribute att1 numeric\n@attribute target {-1,1}\n@data\n?,1\n";
        assert!(matches!(
            parse_arff(text),
            Err(DataError::InvalidValue { row: 0, .. })
        ));
    }

    #[test]
    fn missing_target_is_rejected() {
        let text = "@attribute att1 numeric\n@data\n1.0\n";
        assert_eq!(parse_arff(text).unwrap_err(), DataError::MissingTarget);
    }

    #[test]
    fn sparse_rows_are_rejected() {
        let text = "@attribute att1 numeric\n@attribute target {-1,1}\n@data\n{0 1.0, 1 1}\n";
        assert!(matches!(parse_arff(text), Err(DataError::Arff { line: 4, .. })));
    }

    #[test]
    fn quoted_attribute_names() {
        let text = "@attribute 'att 1' numeric\n@attribute target {-1,1}\n@data\n2.5,1\n";
        let ds = parse_arff(text).unwrap();
        assert_eq!(ds.feature_names, vec!["att 1"]);
    }
}
