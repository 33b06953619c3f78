use serde::Deserialize;

use crate::error::EngineError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct RunConfig {
    pub name: String,
    pub input: InputConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub mailmerge: MailMergeConfig,
}

// ---------------------------------------------------------------------------
// Input layout
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    /// Joined-parcel CSV, resolved relative to the config file.
    pub file: String,
    #[serde(default = "default_true")]
    pub has_headers: bool,
    /// Layout carries a land-registry record id column after the revision
    /// date; enables mapping-table repopulation.
    #[serde(default)]
    pub track_record_ids: bool,
    /// Layout carries a trailing validity flag column.
    #[serde(default)]
    pub has_valid_flag: bool,
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// SQLite database file. Required by `run` and `init`, unused by the
    /// mail merge.
    #[serde(default)]
    pub database: String,
    #[serde(default = "default_pivot_table")]
    pub pivot_table: String,
    #[serde(default = "default_polygon_column")]
    pub pivot_key_column: String,
    #[serde(default = "default_mapping_table")]
    pub mapping_table: String,
    #[serde(default = "default_polygon_column")]
    pub mapping_polygon_column: String,
    #[serde(default = "default_record_column")]
    pub mapping_record_column: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database: String::new(),
            pivot_table: default_pivot_table(),
            pivot_key_column: default_polygon_column(),
            mapping_table: default_mapping_table(),
            mapping_polygon_column: default_polygon_column(),
            mapping_record_column: default_record_column(),
        }
    }
}

// ---------------------------------------------------------------------------
// Mail merge
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct MailMergeConfig {
    /// Directory for the timestamped output file.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl Default for MailMergeConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_pivot_table() -> String {
    "tblStoragePolygonToLandRegistryMapping".into()
}

fn default_polygon_column() -> String {
    "Storage_Polygon_ID".into()
}

fn default_mapping_table() -> String {
    "tblStoragePolygonLandRegistryRecords".into()
}

fn default_record_column() -> String {
    "Land_Registry_Record_ID".into()
}

fn default_output_dir() -> String {
    ".".into()
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl RunConfig {
    pub fn from_toml(input: &str) -> Result<Self, EngineError> {
        let config: RunConfig =
            toml::from_str(input).map_err(|e| EngineError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.input.file.trim().is_empty() {
            return Err(EngineError::ConfigValidation(
                "input.file must not be empty".into(),
            ));
        }

        // Table and column names land inside bracket-quoted identifiers,
        // so a bracket in a name would break out of the quoting.
        let identifiers = [
            ("store.pivot_table", &self.store.pivot_table),
            ("store.pivot_key_column", &self.store.pivot_key_column),
            ("store.mapping_table", &self.store.mapping_table),
            ("store.mapping_polygon_column", &self.store.mapping_polygon_column),
            ("store.mapping_record_column", &self.store.mapping_record_column),
        ];
        for (field, value) in identifiers {
            if value.trim().is_empty() {
                return Err(EngineError::ConfigValidation(format!(
                    "{field} must not be empty"
                )));
            }
            if value.contains('[') || value.contains(']') {
                return Err(EngineError::ConfigValidation(format!(
                    "{field} must not contain brackets, got '{value}'"
                )));
            }
        }

        if self.mailmerge.output_dir.trim().is_empty() {
            return Err(EngineError::ConfigValidation(
                "mailmerge.output_dir must not be empty".into(),
            ));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
