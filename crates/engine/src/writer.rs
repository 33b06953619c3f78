//! Persistence drivers for the pivot and mapping tables.
//!
//! The engine never talks to a database directly; it pushes statements
//! through [`StatementExecutor`] and records per-statement outcomes.

use crate::config::StoreConfig;
use crate::model::PolygonMappingSet;
use crate::pivot;

/// Executes one SQL statement against whatever store backs the run.
pub trait StatementExecutor {
    fn execute(&mut self, sql: &str) -> Result<(), String>;
}

// ---------------------------------------------------------------------------
// Pivot writes
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct PivotOutcome {
    pub applied: usize,
    pub failed: usize,
    pub errors: Vec<String>,
}

/// Issue one UPDATE per polygon set. A failed statement is recorded and the
/// run moves on to the next polygon; nothing is retried.
pub fn write_pivot(
    sets: &[PolygonMappingSet],
    store: &StoreConfig,
    executor: &mut dyn StatementExecutor,
) -> PivotOutcome {
    let mut outcome = PivotOutcome::default();
    for set in sets {
        match executor.execute(&pivot::pivot_update(set, store)) {
            Ok(()) => outcome.applied += 1,
            Err(e) => {
                outcome.failed += 1;
                outcome
                    .errors
                    .push(format!("polygon {}: {}", set.polygon_id, e));
            }
        }
    }
    outcome
}

// ---------------------------------------------------------------------------
// Mapping rebuild
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct MappingOutcome {
    pub inserted: usize,
    pub failed: usize,
    pub errors: Vec<String>,
}

/// Clear the whole polygon-to-record mapping table. The engine issues this
/// before the first pivot update; the inserts come after the pivot pass.
pub fn clear_mapping(
    store: &StoreConfig,
    executor: &mut dyn StatementExecutor,
) -> Result<(), String> {
    executor.execute(&pivot::mapping_clear(store))
}

/// Insert one mapping row per persisted tuple carrying a record id,
/// polygons in grouper order. Individual insert failures are recorded
/// and skipped.
pub fn insert_mappings(
    sets: &[PolygonMappingSet],
    store: &StoreConfig,
    executor: &mut dyn StatementExecutor,
) -> MappingOutcome {
    let mut outcome = MappingOutcome::default();
    for set in sets {
        for entry in set.persisted() {
            if let Some(record_id) = entry.record_id {
                match executor.execute(&pivot::mapping_insert(set.polygon_id, record_id, store)) {
                    Ok(()) => outcome.inserted += 1,
                    Err(e) => {
                        outcome.failed += 1;
                        outcome.errors.push(format!(
                            "polygon {} record {}: {}",
                            set.polygon_id, record_id, e
                        ));
                    }
                }
            }
        }
    }
    outcome
}
