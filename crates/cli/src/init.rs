//! `landmap init`: bootstrap the pivot and mapping tables.
//!
//! Creates the schema the configured names describe and, unless told not
//! to, seeds one pivot row per polygon id found in the input file so the
//! first `run` has rows to update. Existing tables are refused without
//! `--force`; production databases arrive with these tables already built.

use std::path::Path;

use landmap_engine::group::group_by_polygon;
use landmap_engine::input::load_joined_records;
use landmap_store::schema;

use crate::{load_config, read_input, require_database, CliError};

pub fn cmd_init(config_path: &Path, force: bool, no_seed: bool) -> Result<(), CliError> {
    let config = load_config(config_path)?;
    require_database(&config)?;

    let with_mapping = config.input.track_record_ids;
    if let Err(e) = schema::init_schema(&config.store, with_mapping, force) {
        let err = CliError::general(format!("schema init failed: {}", e));
        return Err(if e.contains("already exists") {
            err.with_hint("pass --force to drop and recreate the tables")
        } else {
            err
        });
    }

    if no_seed {
        println!("created tables in {}", config.store.database);
        return Ok(());
    }

    let csv_data = read_input(Path::new(&config.input.file))?;
    let loaded = load_joined_records(&csv_data, &config.input).map_err(CliError::engine)?;
    for warning in &loaded.warnings {
        eprintln!("warning: {}", warning);
    }
    let groups = group_by_polygon(&loaded.records);
    let polygon_ids: Vec<i64> = groups.iter().map(|g| g.polygon_id).collect();

    let seeded = schema::seed_polygons(&config.store, &polygon_ids)
        .map_err(|e| CliError::general(format!("seeding failed: {}", e)))?;

    println!(
        "created tables in {} and seeded {} polygon row(s)",
        config.store.database, seeded
    );

    Ok(())
}
