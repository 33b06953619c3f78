use crate::config::RunConfig;
use crate::dedup::{dedup_group, overflow_warning};
use crate::error::EngineError;
use crate::group::group_by_polygon;
use crate::input::load_joined_records;
use crate::model::{OwnershipRecord, PolygonGroup};
use crate::report::{
    MailMergeOutcome, MailMergeReport, MailMergeSummary, PolygonReport, RunMeta, RunReport,
    RunSummary,
};
use crate::split::split_holding;
use crate::writer::{clear_mapping, insert_mappings, write_pivot, StatementExecutor};

/// Run the pivot/mapping pipeline over one joined row stream.
///
/// Statement failures never abort the run; they come back in the report's
/// error list. Only an unreadable or unparseable stream is fatal.
pub fn run(
    config: &RunConfig,
    csv_data: &str,
    executor: &mut dyn StatementExecutor,
) -> Result<RunReport, EngineError> {
    let loaded = load_joined_records(csv_data, &config.input)?;
    let groups = group_by_polygon(&loaded.records);

    let mut warnings = loaded.warnings;
    let mut sets = Vec::with_capacity(groups.len());
    let mut polygons = Vec::with_capacity(groups.len());

    for group in &groups {
        let set = dedup_group(group);
        if let Some(warning) = overflow_warning(&set) {
            warnings.push(warning);
        }
        polygons.push(PolygonReport {
            polygon_id: set.polygon_id,
            rows: group.records.len(),
            distinct_tuples: set.len(),
            persisted_tuples: set.persisted().len(),
            overflowed: set.overflowed(),
        });
        sets.push(set);
    }

    let mut errors = Vec::new();

    // The mapping table is cleared before the first pivot update; a failed
    // clear abandons the inserts so stale rows never mix with fresh ones.
    let mapping_cleared = if config.input.track_record_ids {
        match clear_mapping(&config.store, executor) {
            Ok(()) => true,
            Err(e) => {
                errors.push(format!("mapping table clear failed, inserts skipped: {e}"));
                false
            }
        }
    } else {
        false
    };

    let pivot = write_pivot(&sets, &config.store, executor);
    errors.extend(pivot.errors);

    let (mapping_inserted, mapping_failed) = if mapping_cleared {
        let mapping = insert_mappings(&sets, &config.store, executor);
        errors.extend(mapping.errors);
        (mapping.inserted, mapping.failed)
    } else {
        (0, 0)
    };

    Ok(RunReport {
        meta: run_meta(config),
        summary: RunSummary {
            rows_read: loaded.rows_read,
            rows_skipped: loaded.rows_skipped,
            polygons: sets.len(),
            distinct_tuples: sets.iter().map(|s| s.len()).sum(),
            overflowed_polygons: sets.iter().filter(|s| s.overflowed()).count(),
            updates_applied: pivot.applied,
            updates_failed: pivot.failed,
            mapping_rows_inserted: mapping_inserted,
            mapping_rows_failed: mapping_failed,
        },
        polygons,
        warnings,
        errors,
    })
}

/// Build mail-merge recipients from one joined row stream. No store access.
///
/// Rows are grouped and deduplicated first so duplicate joined rows never
/// produce duplicate letters. A polygon whose first record has no site
/// identifier, or is flagged invalid, is skipped with a warning.
pub fn mailmerge(config: &RunConfig, csv_data: &str) -> Result<MailMergeOutcome, EngineError> {
    let loaded = load_joined_records(csv_data, &config.input)?;
    let groups = group_by_polygon(&loaded.records);

    let mut warnings = loaded.warnings;
    let mut recipients = Vec::new();
    let mut polygons_skipped = 0usize;

    for group in &groups {
        match group_site(group) {
            Ok(site) => {
                let set = dedup_group(group);
                // Every distinct tuple gets letters; the pivot's slot cap
                // does not apply here.
                for entry in set.entries() {
                    let record = OwnershipRecord {
                        polygon_name: site.clone(),
                        title_number: entry.tuple.title_number.trim().to_owned(),
                        tenure: entry.tuple.tenure.trim().to_owned(),
                        proprietor: entry.tuple.proprietor.trim().to_owned(),
                        site_location: entry.tuple.address.trim().to_owned(),
                    };
                    recipients.extend(split_holding(&record));
                }
            }
            Err(warning) => {
                polygons_skipped += 1;
                warnings.push(warning);
            }
        }
    }

    Ok(MailMergeOutcome {
        report: MailMergeReport {
            meta: run_meta(config),
            summary: MailMergeSummary {
                rows_read: loaded.rows_read,
                rows_skipped: loaded.rows_skipped,
                polygons: groups.len(),
                polygons_skipped,
                recipients: recipients.len(),
            },
            warnings,
        },
        recipients,
    })
}

/// Site identifier for a polygon group, or the warning explaining why the
/// group takes no part in the mail merge. Both come from the group's first
/// record.
fn group_site(group: &PolygonGroup) -> Result<String, String> {
    let first = &group.records[0];
    let site = first.site_identifier.trim();
    if site.is_empty() {
        return Err(format!(
            "polygon {} has no site identifier, skipped",
            group.polygon_id
        ));
    }
    if first.valid == Some(false) {
        return Err(format!("invalid row for {site}, skipped"));
    }
    Ok(site.to_owned())
}

fn run_meta(config: &RunConfig) -> RunMeta {
    RunMeta {
        config_name: config.name.clone(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        run_at: chrono::Utc::now().to_rfc3339(),
    }
}
