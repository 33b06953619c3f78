//! Pivot and mapping statement builders.
//!
//! Pure functions: a deduplicated polygon set in, SQL text out. Execution
//! lives behind [`crate::writer::StatementExecutor`].

use crate::config::StoreConfig;
use crate::model::{PolygonMappingSet, SLOT_COUNT};

/// Replace embedded single quotes so the value can sit inside a quoted SQL
/// literal. Backticks are what the downstream reporting templates have
/// always received; the substitution is not reversible.
pub fn sanitize_text(input: &str) -> String {
    input.replace('\'', "`")
}

fn quoted(input: &str) -> String {
    format!("'{}'", sanitize_text(input))
}

/// Build the single UPDATE that rewrites every slot group for one polygon.
///
/// Slots 1..=L carry the surviving tuples in insertion order; every
/// remaining slot has all four columns set to NULL in the same statement,
/// so a rerun never leaves stale tuples behind. Title numbers are
/// registry-issued identifiers and are interpolated without the quote
/// substitution.
pub fn pivot_update(set: &PolygonMappingSet, store: &StoreConfig) -> String {
    let mut assignments: Vec<String> = Vec::with_capacity(SLOT_COUNT * 4);
    let entries = set.persisted();

    for slot in 0..SLOT_COUNT {
        let n = slot + 1;
        match entries.get(slot) {
            Some(entry) => {
                assignments.push(format!(
                    "[Title_Number_{n}] = '{}'",
                    entry.tuple.title_number
                ));
                assignments.push(format!("[Tenure_{n}] = {}", quoted(&entry.tuple.tenure)));
                assignments.push(format!(
                    "[Proprietor_{n}] = {}",
                    quoted(&entry.tuple.proprietor)
                ));
                assignments.push(format!("[Address_{n}] = {}", quoted(&entry.tuple.address)));
            }
            None => {
                assignments.push(format!("[Title_Number_{n}] = NULL"));
                assignments.push(format!("[Tenure_{n}] = NULL"));
                assignments.push(format!("[Proprietor_{n}] = NULL"));
                assignments.push(format!("[Address_{n}] = NULL"));
            }
        }
    }

    format!(
        "UPDATE [{}] SET {} WHERE [{}] = {}",
        store.pivot_table,
        assignments.join(", "),
        store.pivot_key_column,
        set.polygon_id
    )
}

/// Statement clearing the whole mapping table before repopulation.
pub fn mapping_clear(store: &StoreConfig) -> String {
    format!("DELETE FROM [{}]", store.mapping_table)
}

/// INSERT for one surviving (polygon, record) pair.
pub fn mapping_insert(polygon_id: i64, record_id: i64, store: &StoreConfig) -> String {
    format!(
        "INSERT INTO [{}] ([{}], [{}]) VALUES ({}, {})",
        store.mapping_table,
        store.mapping_polygon_column,
        store.mapping_record_column,
        polygon_id,
        record_id
    )
}
