//! Pivot and mapping table bootstrap.
//!
//! The pivot table is deliberately wide: fifteen slot groups of four TEXT
//! columns each, matching the reporting templates that read it. Table and
//! column names come from the run configuration.

use rusqlite::{params, Connection};

use landmap_engine::config::StoreConfig;
use landmap_engine::SLOT_COUNT;

/// CREATE TABLE text for the wide pivot table.
pub fn pivot_table_ddl(store: &StoreConfig) -> String {
    let mut columns = vec![format!("[{}] INTEGER PRIMARY KEY", store.pivot_key_column)];
    for n in 1..=SLOT_COUNT {
        columns.push(format!("[Title_Number_{n}] TEXT"));
        columns.push(format!("[Tenure_{n}] TEXT"));
        columns.push(format!("[Proprietor_{n}] TEXT"));
        columns.push(format!("[Address_{n}] TEXT"));
    }
    format!(
        "CREATE TABLE [{}] (\n    {}\n)",
        store.pivot_table,
        columns.join(",\n    ")
    )
}

/// CREATE TABLE text for the polygon-to-record mapping table.
pub fn mapping_table_ddl(store: &StoreConfig) -> String {
    format!(
        "CREATE TABLE [{}] (\n    [{}] INTEGER NOT NULL,\n    [{}] INTEGER NOT NULL\n)",
        store.mapping_table, store.mapping_polygon_column, store.mapping_record_column
    )
}

/// Create the pivot table, and the mapping table when identifier tracking
/// is configured. Creating over existing tables is an error unless `force`,
/// which drops them first.
pub fn init_schema(store: &StoreConfig, with_mapping: bool, force: bool) -> Result<(), String> {
    let conn = Connection::open(&store.database).map_err(|e| e.to_string())?;

    if force {
        conn.execute_batch(&format!(
            "DROP TABLE IF EXISTS [{}];\nDROP TABLE IF EXISTS [{}];",
            store.pivot_table, store.mapping_table
        ))
        .map_err(|e| e.to_string())?;
    }

    let mut batch = format!("{};\n", pivot_table_ddl(store));
    if with_mapping {
        batch.push_str(&format!("{};\n", mapping_table_ddl(store)));
    }
    conn.execute_batch(&batch).map_err(|e| e.to_string())?;
    Ok(())
}

/// Seed one pivot row per polygon id so the engine's UPDATE statements have
/// rows to hit. Already-seeded polygons are left alone. Returns the number
/// of rows actually inserted.
pub fn seed_polygons(store: &StoreConfig, polygon_ids: &[i64]) -> Result<usize, String> {
    let conn = Connection::open(&store.database).map_err(|e| e.to_string())?;
    let mut stmt = conn
        .prepare(&format!(
            "INSERT OR IGNORE INTO [{}] ([{}]) VALUES (?1)",
            store.pivot_table, store.pivot_key_column
        ))
        .map_err(|e| e.to_string())?;

    let mut inserted = 0usize;
    for id in polygon_ids {
        inserted += stmt.execute(params![id]).map_err(|e| e.to_string())?;
    }
    Ok(inserted)
}
