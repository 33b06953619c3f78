use crate::config::InputConfig;
use crate::error::EngineError;
use crate::model::JoinedRecord;

// Field positions are the contract with the upstream spatial join and are
// fixed; there is no header-name mapping.
const COL_POLYGON_ID: usize = 0;
const COL_SITE_IDENTIFIER: usize = 1;
const COL_TITLE_NUMBER: usize = 2;
const COL_TENURE: usize = 3;
const COL_PROPRIETOR: usize = 4;
const COL_ADDRESS: usize = 5;
const COL_REVISION_DATE: usize = 6;
const COL_RECORD_ID: usize = 7;

/// Parsed input plus everything the loader had to skip over.
#[derive(Debug)]
pub struct LoadOutcome {
    pub records: Vec<JoinedRecord>,
    pub warnings: Vec<String>,
    pub rows_read: usize,
    pub rows_skipped: usize,
}

/// Load joined parcel rows from CSV text.
///
/// Rows with a missing or unparseable polygon id are skipped with a warning,
/// as are short rows and (in the id-tracking layout) rows without a usable
/// record id. A stream that cannot be parsed as CSV at all is fatal.
pub fn load_joined_records(
    csv_data: &str,
    layout: &InputConfig,
) -> Result<LoadOutcome, EngineError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(layout.has_headers)
        .flexible(true)
        .from_reader(csv_data.as_bytes());

    let required = required_fields(layout);
    let valid_idx = valid_flag_index(layout);

    let mut records = Vec::new();
    let mut warnings = Vec::new();
    let mut rows_read = 0usize;
    let mut rows_skipped = 0usize;

    for (i, result) in reader.records().enumerate() {
        let row = i + 1;
        let record = result.map_err(|e| EngineError::InputParse(format!("row {row}: {e}")))?;
        rows_read += 1;

        if record.len() < required {
            warnings.push(format!(
                "row {row}: {} field(s), expected {required}, skipped",
                record.len()
            ));
            rows_skipped += 1;
            continue;
        }

        let polygon_raw = record.get(COL_POLYGON_ID).unwrap_or("");
        let polygon_id: i64 = match polygon_raw.trim().parse() {
            Ok(id) => id,
            Err(_) => {
                warnings.push(format!(
                    "row {row}: missing or unparseable polygon id '{polygon_raw}', skipped"
                ));
                rows_skipped += 1;
                continue;
            }
        };

        let record_id = if layout.track_record_ids {
            let raw = record.get(COL_RECORD_ID).unwrap_or("");
            match raw.trim().parse::<i64>() {
                Ok(id) => Some(id),
                Err(_) => {
                    warnings.push(format!(
                        "row {row}: missing or unparseable record id '{raw}', skipped"
                    ));
                    rows_skipped += 1;
                    continue;
                }
            }
        } else {
            None
        };

        let valid = if layout.has_valid_flag {
            Some(parse_flag(record.get(valid_idx).unwrap_or("")))
        } else {
            None
        };

        records.push(JoinedRecord {
            polygon_id,
            site_identifier: field(&record, COL_SITE_IDENTIFIER),
            title_number: field(&record, COL_TITLE_NUMBER),
            tenure: field(&record, COL_TENURE),
            proprietor: field(&record, COL_PROPRIETOR),
            address: field(&record, COL_ADDRESS),
            revision_date: field(&record, COL_REVISION_DATE),
            record_id,
            valid,
        });
    }

    Ok(LoadOutcome {
        records,
        warnings,
        rows_read,
        rows_skipped,
    })
}

fn required_fields(layout: &InputConfig) -> usize {
    let mut n = COL_REVISION_DATE + 1;
    if layout.track_record_ids {
        n += 1;
    }
    if layout.has_valid_flag {
        n += 1;
    }
    n
}

fn valid_flag_index(layout: &InputConfig) -> usize {
    if layout.track_record_ids {
        COL_RECORD_ID + 1
    } else {
        COL_RECORD_ID
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "y" | "yes"
    )
}

// Text fields are carried verbatim; dedup depends on exact strings.
fn field(record: &csv::StringRecord, idx: usize) -> String {
    record.get(idx).unwrap_or("").to_string()
}
