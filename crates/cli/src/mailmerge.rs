//! `landmap mailmerge`: landowner letters from joined parcel records.
//!
//! Reads the same joined CSV as `run`, splits co-owned holdings into one
//! recipient per landowner, and writes the mail-merge CSV the letter
//! template expects. No database is involved.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use landmap_engine::engine;
use landmap_engine::mailmerge::{mailmerge_file_name, write_mailmerge_csv};

use crate::{load_config, read_input, CliError};

pub fn cmd_mailmerge(
    config_path: &Path,
    input_override: Option<&Path>,
    output_override: Option<&Path>,
    json: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let config = load_config(config_path)?;

    let input_path = match input_override {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(&config.input.file),
    };
    let csv_data = read_input(&input_path)?;

    let outcome = engine::mailmerge(&config, &csv_data).map_err(CliError::engine)?;

    if !quiet {
        for warning in &outcome.report.warnings {
            eprintln!("warning: {}", warning);
        }
    }

    let output_path = match output_override {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(&config.mailmerge.output_dir)
            .join(mailmerge_file_name(chrono::Utc::now())),
    };

    let file = File::create(&output_path)
        .map_err(|e| CliError::output(format!("{}: {}", output_path.display(), e)))?;
    write_mailmerge_csv(&outcome.recipients, BufWriter::new(file)).map_err(CliError::engine)?;

    if json {
        let mut rendered = serde_json::to_value(&outcome.report)
            .map_err(|e| CliError::general(e.to_string()))?;
        if let Some(obj) = rendered.as_object_mut() {
            obj.insert(
                "output_file".into(),
                serde_json::Value::String(output_path.display().to_string()),
            );
        }
        let pretty =
            serde_json::to_string_pretty(&rendered).map_err(|e| CliError::general(e.to_string()))?;
        println!("{}", pretty);
    } else if !quiet {
        println!(
            "created mail merge file {} ({} recipients)",
            output_path.display(),
            outcome.report.summary.recipients
        );
    }

    Ok(())
}
