//! Mail-merge CSV output.

use std::io::Write;

use chrono::{DateTime, Utc};

use crate::error::EngineError;
use crate::model::LandownerRecipient;

/// Column order is fixed; downstream letter templates address fields by
/// these exact names.
pub const MAILMERGE_HEADER: &[&str] = &[
    "Substation",
    "Title Number",
    "Tenure",
    "Name Prefix",
    "Landowner first name",
    "Address 1",
    "Address 2",
    "Address 3",
    "Address 4",
    "Address 5",
    "Address 6",
    "Location of site",
];

/// Write recipient rows as CSV. The `Name Prefix` column is always empty;
/// the letter template owns salutations.
pub fn write_mailmerge_csv(
    recipients: &[LandownerRecipient],
    out: impl Write,
) -> Result<(), EngineError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(out);

    writer
        .write_record(MAILMERGE_HEADER)
        .map_err(|e| EngineError::OutputWrite(e.to_string()))?;

    for recipient in recipients {
        let mut row: Vec<&str> = Vec::with_capacity(MAILMERGE_HEADER.len());
        row.push(&recipient.polygon_name);
        row.push(&recipient.title_number);
        row.push(&recipient.tenure);
        row.push("");
        row.push(&recipient.landowner);
        for line in &recipient.address_lines {
            row.push(line);
        }
        row.push(&recipient.site_location);
        writer
            .write_record(&row)
            .map_err(|e| EngineError::OutputWrite(e.to_string()))?;
    }

    writer
        .flush()
        .map_err(|e| EngineError::OutputWrite(e.to_string()))?;
    Ok(())
}

/// Timestamped output file name, minute resolution, UTC.
pub fn mailmerge_file_name(now: DateTime<Utc>) -> String {
    format!("MailMerge_{}.csv", now.format("%Y%m%d_%H%M"))
}
