//! `landmap run`: reconcile joined parcel records into the pivot table.
//!
//! The engine decides what to write; this module only picks the executor
//! (real database or dry-run) and renders the report. Statement failures
//! surface in the report and turn into exit code 5, never a mid-run abort.

use std::path::{Path, PathBuf};

use landmap_engine::SLOT_COUNT;
use landmap_store::{DryRunExecutor, SqliteExecutor};

use crate::exit_codes::EXIT_PERSISTENCE;
use crate::{load_config, read_input, require_database, CliError};

pub fn cmd_run(
    config_path: &Path,
    input_override: Option<&Path>,
    dry_run: bool,
    json: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let config = load_config(config_path)?;
    if !dry_run {
        require_database(&config)?;
    }

    let input_path = match input_override {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(&config.input.file),
    };
    let csv_data = read_input(&input_path)?;

    let report = if dry_run {
        let mut executor = DryRunExecutor::default();
        landmap_engine::run(&config, &csv_data, &mut executor).map_err(CliError::engine)?
    } else {
        let mut executor = SqliteExecutor::new(config.store.database.as_str());
        landmap_engine::run(&config, &csv_data, &mut executor).map_err(CliError::engine)?
    };

    if !quiet {
        for warning in &report.warnings {
            eprintln!("warning: {}", warning);
        }
    }
    for error in &report.errors {
        eprintln!("error: {}", error);
    }

    if json {
        let rendered = serde_json::to_string_pretty(&report)
            .map_err(|e| CliError::general(e.to_string()))?;
        println!("{}", rendered);
    } else if !quiet {
        let s = &report.summary;
        println!(
            "{}: {} rows read ({} skipped), {} polygons, {} distinct tuples",
            config.name, s.rows_read, s.rows_skipped, s.polygons, s.distinct_tuples
        );
        if s.overflowed_polygons > 0 {
            println!(
                "overflow: {} polygon(s) past the {}-slot cap",
                s.overflowed_polygons, SLOT_COUNT
            );
        }
        println!("updates: {} applied, {} failed", s.updates_applied, s.updates_failed);
        if config.input.track_record_ids {
            println!(
                "mapping: {} rows inserted, {} failed",
                s.mapping_rows_inserted, s.mapping_rows_failed
            );
        }
    }

    // Failures were already printed (and are in the JSON report);
    // the empty message keeps main from printing a redundant line.
    if !report.errors.is_empty() {
        return Err(CliError {
            code: EXIT_PERSISTENCE,
            message: String::new(),
            hint: None,
        });
    }

    Ok(())
}
