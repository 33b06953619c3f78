use serde::Serialize;

use crate::model::LandownerRecipient;

// ---------------------------------------------------------------------------
// Shared metadata
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct RunMeta {
    pub config_name: String,
    pub engine_version: String,
    pub run_at: String,
}

// ---------------------------------------------------------------------------
// Reconciliation run
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub rows_read: usize,
    pub rows_skipped: usize,
    pub polygons: usize,
    pub distinct_tuples: usize,
    pub overflowed_polygons: usize,
    pub updates_applied: usize,
    pub updates_failed: usize,
    pub mapping_rows_inserted: usize,
    pub mapping_rows_failed: usize,
}

/// Per-polygon outcome, in the order polygons were first seen.
#[derive(Debug, Clone, Serialize)]
pub struct PolygonReport {
    pub polygon_id: i64,
    pub rows: usize,
    pub distinct_tuples: usize,
    pub persisted_tuples: usize,
    pub overflowed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub meta: RunMeta,
    pub summary: RunSummary,
    pub polygons: Vec<PolygonReport>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

// ---------------------------------------------------------------------------
// Mail merge run
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct MailMergeSummary {
    pub rows_read: usize,
    pub rows_skipped: usize,
    pub polygons: usize,
    pub polygons_skipped: usize,
    pub recipients: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct MailMergeReport {
    pub meta: RunMeta,
    pub summary: MailMergeSummary,
    pub warnings: Vec<String>,
}

/// Report plus the recipients themselves; the caller decides where the
/// CSV goes.
#[derive(Debug)]
pub struct MailMergeOutcome {
    pub report: MailMergeReport,
    pub recipients: Vec<LandownerRecipient>,
}
