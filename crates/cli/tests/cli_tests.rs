// End-to-end tests for the landmap binary: exit codes, stdout contracts,
// and real SQLite round trips.
//
// Run with: cargo test -p landmap-cli --test cli_tests -- --nocapture

use std::process::Command;

use rusqlite::Connection;
use tempfile::TempDir;

fn landmap() -> Command {
    Command::new(env!("CARGO_BIN_EXE_landmap"))
}

const CONFIG_TOML: &str = r#"
name = "Storage site selection"

[input]
file = "joined.csv"

[store]
database = "parcels.sqlite"

[mailmerge]
output_dir = "."
"#;

const JOINED_CSV: &str = "\
POLY_ID,SITE_NAME,TITLE_NO,TENURE,PROPRIETOR,ADDRESS,REV_DATE
501,Barton Grange 132kV,NK421877,Freehold,BARTON ESTATES LIMITED  Estate Office,\"1 Main Street, Preston\",2026-03-01
501,Barton Grange 132kV,NK421877,Freehold,BARTON ESTATES LIMITED  Estate Office,\"1 Main Street, Preston\",2026-03-01
501,Barton Grange 132kV,NK498210,Leasehold,MICHAEL O'BRIEN  4 Chapel Row AND SUSAN O'BRIEN  4 Chapel Row,\"4 Chapel Row, Barton\",2026-03-01
502,Mill Hill 33kV,LA310455,Freehold,CROFTE AGGREGATES PLC,\"Quarry House, Mill Hill\",2026-03-02
";

/// Write the standard config + input fixture into a fresh temp dir.
fn fixture() -> TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("sites.toml"), CONFIG_TOML).expect("write config");
    std::fs::write(dir.path().join("joined.csv"), JOINED_CSV).expect("write csv");
    dir
}

fn config_path(dir: &TempDir) -> String {
    dir.path().join("sites.toml").to_string_lossy().into_owned()
}

/// Assert stdout is a single, parseable JSON value with no extra lines.
fn assert_single_json(stdout: &str) -> serde_json::Value {
    let trimmed = stdout.trim();
    assert!(!trimmed.is_empty(), "stdout should not be empty");
    serde_json::from_str(trimmed).unwrap_or_else(|e| {
        panic!("stdout must be valid JSON.\nParse error: {}\nstdout:\n{}", e, trimmed)
    })
}

// ===========================================================================
// landmap run
// ===========================================================================

#[test]
fn dry_run_prints_statements_and_touches_nothing() {
    let dir = fixture();
    let output = landmap()
        .args(["run", &config_path(&dir), "--dry-run"])
        .output()
        .expect("landmap run --dry-run");

    assert!(
        output.status.success(),
        "exit: {:?}\nstderr: {}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("[dry-run] UPDATE [tblStoragePolygonToLandRegistryMapping]"),
        "stderr should carry the statements: {}",
        stderr
    );
    assert!(stderr.contains("[Storage_Polygon_ID] = 501"), "stderr: {}", stderr);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("4 rows read (0 skipped), 2 polygons, 3 distinct tuples"),
        "stdout: {}",
        stdout
    );

    assert!(
        !dir.path().join("parcels.sqlite").exists(),
        "dry run must not create the database"
    );
}

#[test]
fn init_then_run_fills_the_pivot_table() {
    let dir = fixture();

    let init = landmap()
        .args(["init", &config_path(&dir)])
        .output()
        .expect("landmap init");
    assert!(
        init.status.success(),
        "init stderr: {}",
        String::from_utf8_lossy(&init.stderr)
    );
    let init_stdout = String::from_utf8_lossy(&init.stdout);
    assert!(init_stdout.contains("seeded 2 polygon row(s)"), "stdout: {}", init_stdout);

    let run = landmap()
        .args(["run", &config_path(&dir)])
        .output()
        .expect("landmap run");
    assert!(
        run.status.success(),
        "run stderr: {}",
        String::from_utf8_lossy(&run.stderr)
    );

    // The database path in the config is relative to the config file.
    let conn = Connection::open(dir.path().join("parcels.sqlite")).expect("open db");

    let title: Option<String> = conn
        .query_row(
            "SELECT [Title_Number_1] FROM [tblStoragePolygonToLandRegistryMapping] \
             WHERE [Storage_Polygon_ID] = 501",
            [],
            |row| row.get(0),
        )
        .expect("pivot row for 501");
    assert_eq!(title.as_deref(), Some("NK421877"));

    // Single quotes in proprietors are stored as backticks.
    let proprietor: Option<String> = conn
        .query_row(
            "SELECT [Proprietor_2] FROM [tblStoragePolygonToLandRegistryMapping] \
             WHERE [Storage_Polygon_ID] = 501",
            [],
            |row| row.get(0),
        )
        .expect("pivot row for 501");
    let proprietor = proprietor.expect("second slot occupied");
    assert!(proprietor.contains("MICHAEL O`BRIEN"), "got: {}", proprietor);
    assert!(!proprietor.contains("O'BRIEN"), "got: {}", proprietor);

    // Unused slots are real NULLs.
    let third: Option<String> = conn
        .query_row(
            "SELECT [Title_Number_3] FROM [tblStoragePolygonToLandRegistryMapping] \
             WHERE [Storage_Polygon_ID] = 501",
            [],
            |row| row.get(0),
        )
        .expect("pivot row for 501");
    assert_eq!(third, None);
}

#[test]
fn run_against_missing_tables_exits_5() {
    let dir = fixture();
    // No init: the updates have no table to land in.
    let output = landmap()
        .args(["run", &config_path(&dir)])
        .output()
        .expect("landmap run");

    assert_eq!(output.status.code(), Some(5), "expected persistence exit code");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no such table"), "stderr: {}", stderr);
}

#[test]
fn quiet_drops_warnings_but_never_errors() {
    let dir = fixture();
    // A short row provokes a warning; skipping init leaves the updates
    // with no table to land in, so the same run also carries errors.
    let mut csv = JOINED_CSV.to_owned();
    csv.push_str("503,Moss Side 33kV,NK700001\n");
    std::fs::write(dir.path().join("joined.csv"), csv).expect("write csv");

    let noisy = landmap()
        .args(["run", &config_path(&dir)])
        .output()
        .expect("landmap run");
    assert_eq!(noisy.status.code(), Some(5));
    let stderr = String::from_utf8_lossy(&noisy.stderr);
    assert!(stderr.contains("warning:"), "stderr: {}", stderr);
    assert!(stderr.contains("error:"), "stderr: {}", stderr);

    let quiet = landmap()
        .args(["run", &config_path(&dir), "--quiet"])
        .output()
        .expect("landmap run --quiet");
    assert_eq!(quiet.status.code(), Some(5));
    let stderr = String::from_utf8_lossy(&quiet.stderr);
    assert!(!stderr.contains("warning:"), "stderr: {}", stderr);
    assert!(stderr.contains("error:"), "quiet must keep errors: {}", stderr);
}

#[test]
fn run_json_report_is_a_single_json_value() {
    let dir = fixture();
    let output = landmap()
        .args(["run", &config_path(&dir), "--dry-run", "--json"])
        .output()
        .expect("landmap run --json");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let val = assert_single_json(&stdout);

    assert_eq!(val["meta"]["config_name"], serde_json::json!("Storage site selection"));
    assert_eq!(val["summary"]["rows_read"], serde_json::json!(4));
    assert_eq!(val["summary"]["distinct_tuples"], serde_json::json!(3));
    assert_eq!(val["summary"]["updates_applied"], serde_json::json!(2));
    assert_eq!(val["errors"], serde_json::json!([]));
}

// ===========================================================================
// landmap run --input (id-tracking layout)
// ===========================================================================

const TRACKING_CONFIG: &str = r#"
name = "Storage site selection"

[input]
file = "tracking.csv"
track_record_ids = true

[store]
database = "parcels.sqlite"
"#;

const TRACKING_CSV: &str = "\
POLY_ID,SITE_NAME,TITLE_NO,TENURE,PROPRIETOR,ADDRESS,REV_DATE,RECORD_ID
501,Barton Grange 132kV,NK421877,Freehold,BARTON ESTATES LIMITED,\"1 Main Street, Preston\",2026-03-01,3101
501,Barton Grange 132kV,NK421877,Freehold,BARTON ESTATES LIMITED,\"1 Main Street, Preston\",2026-03-01,3102
502,Mill Hill 33kV,LA310455,Freehold,CROFTE AGGREGATES PLC,\"Quarry House, Mill Hill\",2026-03-02,3203
";

#[test]
fn tracking_run_rebuilds_the_mapping_table() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("sites.toml"), TRACKING_CONFIG).expect("write config");
    std::fs::write(dir.path().join("tracking.csv"), TRACKING_CSV).expect("write csv");

    let init = landmap()
        .args(["init", &config_path(&dir)])
        .output()
        .expect("landmap init");
    assert!(init.status.success(), "stderr: {}", String::from_utf8_lossy(&init.stderr));

    let run = landmap()
        .args(["run", &config_path(&dir)])
        .output()
        .expect("landmap run");
    assert!(run.status.success(), "stderr: {}", String::from_utf8_lossy(&run.stderr));

    let conn = Connection::open(dir.path().join("parcels.sqlite")).expect("open db");
    let rows: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM [tblStoragePolygonLandRegistryRecords]",
            [],
            |row| row.get(0),
        )
        .expect("count mapping rows");
    assert_eq!(rows, 2, "one mapping row per distinct tuple");

    // The duplicate tuple keeps its first-seen record id.
    let record_id: i64 = conn
        .query_row(
            "SELECT [Land_Registry_Record_ID] FROM [tblStoragePolygonLandRegistryRecords] \
             WHERE [Storage_Polygon_ID] = 501",
            [],
            |row| row.get(0),
        )
        .expect("mapping row for 501");
    assert_eq!(record_id, 3101);
}

// ===========================================================================
// landmap mailmerge
// ===========================================================================

#[test]
fn mailmerge_writes_the_recipient_csv() {
    let dir = fixture();
    let letters = dir.path().join("letters.csv");
    let output = landmap()
        .args([
            "mailmerge",
            &config_path(&dir),
            "--output",
            letters.to_str().expect("path"),
        ])
        .output()
        .expect("landmap mailmerge");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("created mail merge file"), "stdout: {}", stdout);
    assert!(stdout.contains("(4 recipients)"), "stdout: {}", stdout);

    let written = std::fs::read_to_string(&letters).expect("read letters.csv");
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(
        lines[0],
        "Substation,Title Number,Tenure,Name Prefix,Landowner first name,\
         Address 1,Address 2,Address 3,Address 4,Address 5,Address 6,Location of site"
    );
    assert_eq!(lines.len(), 5, "header plus four recipients:\n{}", written);
    assert!(written.contains("Barton Estates Limited"), "got:\n{}", written);
    // Co-owners become separate rows; casing restarts after the apostrophe.
    assert!(written.contains("Michael O'Brien"), "got:\n{}", written);
    assert!(written.contains("Susan O'Brien"), "got:\n{}", written);
}

#[test]
fn mailmerge_default_name_lands_in_the_output_dir() {
    let dir = fixture();
    let output = landmap()
        .args(["mailmerge", &config_path(&dir)])
        .output()
        .expect("landmap mailmerge");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    // output_dir "." resolves against the config file, not the working dir.
    let found = std::fs::read_dir(dir.path())
        .expect("read dir")
        .filter_map(|entry| entry.ok())
        .any(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            name.starts_with("MailMerge_") && name.ends_with(".csv")
        });
    assert!(found, "expected a MailMerge_<stamp>.csv next to the config");
}

// ===========================================================================
// landmap init
// ===========================================================================

#[test]
fn init_refuses_existing_tables_without_force() {
    let dir = fixture();

    let first = landmap().args(["init", &config_path(&dir)]).output().expect("init");
    assert!(first.status.success());

    let second = landmap().args(["init", &config_path(&dir)]).output().expect("init");
    assert!(!second.status.success(), "second init should refuse");
    let stderr = String::from_utf8_lossy(&second.stderr);
    assert!(stderr.contains("already exists"), "stderr: {}", stderr);
    assert!(stderr.contains("--force"), "hint should name --force: {}", stderr);

    let forced = landmap()
        .args(["init", &config_path(&dir), "--force"])
        .output()
        .expect("init --force");
    assert!(
        forced.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&forced.stderr)
    );
}

// ===========================================================================
// config and input failures
// ===========================================================================

#[test]
fn invalid_config_exits_3() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(
        dir.path().join("sites.toml"),
        "name = \"Broken\"\n\n[input]\nfile = \"\"\n",
    )
    .expect("write config");

    let output = landmap()
        .args(["validate", &config_path(&dir)])
        .output()
        .expect("landmap validate");

    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("input.file"), "stderr: {}", stderr);
}

#[test]
fn missing_input_file_exits_4() {
    let dir = fixture();
    std::fs::remove_file(dir.path().join("joined.csv")).expect("remove csv");

    let output = landmap()
        .args(["run", &config_path(&dir), "--dry-run"])
        .output()
        .expect("landmap run");

    assert_eq!(output.status.code(), Some(4));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error:"), "stderr: {}", stderr);
}

#[test]
fn run_without_database_exits_3_with_hint() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(
        dir.path().join("sites.toml"),
        "name = \"No database\"\n\n[input]\nfile = \"joined.csv\"\n",
    )
    .expect("write config");
    std::fs::write(dir.path().join("joined.csv"), JOINED_CSV).expect("write csv");

    let output = landmap()
        .args(["run", &config_path(&dir)])
        .output()
        .expect("landmap run");

    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("store.database is not set"), "stderr: {}", stderr);
    assert!(stderr.contains("hint:"), "stderr: {}", stderr);
}

// ===========================================================================
// landmap validate --json
// ===========================================================================

#[test]
fn validate_json_prints_the_resolved_config() {
    let dir = fixture();
    let output = landmap()
        .args(["validate", &config_path(&dir), "--json"])
        .output()
        .expect("landmap validate --json");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let val = assert_single_json(&stdout);

    assert_eq!(val["name"], serde_json::json!("Storage site selection"));
    assert_eq!(
        val["store"]["pivot_table"],
        serde_json::json!("tblStoragePolygonToLandRegistryMapping")
    );
    // Relative paths come back resolved against the config file's directory.
    let input_file = val["input"]["file"].as_str().expect("input.file");
    assert!(input_file.ends_with("joined.csv") && input_file.len() > "joined.csv".len());
}
