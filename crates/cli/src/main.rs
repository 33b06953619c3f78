// landmap CLI - headless land-parcel reconciliation runs

mod exit_codes;
mod init;
mod mailmerge;
mod run;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use landmap_engine::{EngineError, RunConfig};

// Re-export exit codes from registry (single source of truth)
use exit_codes::{
    engine_exit_code, EXIT_CONFIG, EXIT_ERROR, EXIT_INPUT, EXIT_OUTPUT, EXIT_SUCCESS, EXIT_USAGE,
};

#[derive(Parser)]
#[command(name = "landmap")]
#[command(about = "Reconcile land-parcel records against ownership polygons")]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile joined parcel records into the polygon pivot table
    #[command(after_help = "\
Statements that fail leave the rest of the run untouched; the run finishes,
reports every failure, and exits 5.

Examples:
  landmap run sites.toml
  landmap run sites.toml --dry-run
  landmap run sites.toml --json > report.json
  landmap run sites.toml --input fresh-join.csv")]
    Run {
        /// Run configuration file (TOML)
        config: PathBuf,

        /// Input CSV override (default: input.file from the config)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Print statements to stderr instead of executing them
        #[arg(long)]
        dry_run: bool,

        /// Write the run report to stdout as JSON
        #[arg(long)]
        json: bool,

        /// Quiet mode - only print errors
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Write a landowner mail-merge CSV from joined parcel records
    #[command(after_help = "\
Examples:
  landmap mailmerge sites.toml
  landmap mailmerge sites.toml --output letters.csv
  landmap mailmerge sites.toml --json")]
    Mailmerge {
        /// Run configuration file (TOML)
        config: PathBuf,

        /// Input CSV override (default: input.file from the config)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Output file (default: mailmerge.output_dir/MailMerge_<stamp>.csv)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Write the mail-merge report to stdout as JSON
        #[arg(long)]
        json: bool,

        /// Quiet mode - only print errors
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Create the pivot and mapping tables and seed polygon rows
    #[command(after_help = "\
Examples:
  landmap init sites.toml
  landmap init sites.toml --force
  landmap init sites.toml --no-seed")]
    Init {
        /// Run configuration file (TOML)
        config: PathBuf,

        /// Drop and recreate tables that already exist
        #[arg(long)]
        force: bool,

        /// Skip seeding polygon rows from the input file
        #[arg(long)]
        no_seed: bool,
    },

    /// Check a configuration file and print what a run would use
    #[command(after_help = "\
Examples:
  landmap validate sites.toml
  landmap validate sites.toml --json")]
    Validate {
        /// Run configuration file (TOML)
        config: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        // No subcommand = show usage
        eprintln!("Usage: landmap <command> [options]");
        eprintln!("       landmap --help for more information");
        return ExitCode::from(EXIT_USAGE);
    };

    let result = match command {
        Commands::Run {
            config,
            input,
            dry_run,
            json,
            quiet,
        } => run::cmd_run(&config, input.as_deref(), dry_run, json, quiet),
        Commands::Mailmerge {
            config,
            input,
            output,
            json,
            quiet,
        } => mailmerge::cmd_mailmerge(&config, input.as_deref(), output.as_deref(), json, quiet),
        Commands::Init {
            config,
            force,
            no_seed,
        } => init::cmd_init(&config, force, no_seed),
        Commands::Validate { config, json } => cmd_validate(&config, json),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self { code: EXIT_CONFIG, message: msg.into(), hint: None }
    }

    pub fn input(msg: impl Into<String>) -> Self {
        Self { code: EXIT_INPUT, message: msg.into(), hint: None }
    }

    pub fn output(msg: impl Into<String>) -> Self {
        Self { code: EXIT_OUTPUT, message: msg.into(), hint: None }
    }

    pub fn general(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    /// Create error from an engine error with its registered exit code.
    pub fn engine(err: EngineError) -> Self {
        Self { code: engine_exit_code(&err), message: err.to_string(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

// ============================================================================
// config + input plumbing
// ============================================================================

/// Load a run config and resolve its relative paths against the config
/// file's directory, so a run behaves the same from any working directory.
pub fn load_config(path: &Path) -> Result<RunConfig, CliError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| CliError::config(format!("{}: {}", path.display(), e)))?;
    let mut config = RunConfig::from_toml(&raw).map_err(CliError::engine)?;

    config.input.file = resolve_config_path(path, &config.input.file);
    if !config.store.database.trim().is_empty() {
        config.store.database = resolve_config_path(path, &config.store.database);
    }
    config.mailmerge.output_dir = resolve_config_path(path, &config.mailmerge.output_dir);

    Ok(config)
}

fn resolve_config_path(config_path: &Path, value: &str) -> String {
    let path = Path::new(value);
    if path.is_absolute() {
        return value.to_string();
    }
    match config_path.parent() {
        Some(dir) => dir.join(path).to_string_lossy().into_owned(),
        None => value.to_string(),
    }
}

/// Read the joined-records CSV into memory.
pub fn read_input(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path)
        .map_err(|e| CliError::input(format!("{}: {}", path.display(), e)))
}

/// Commands that touch the database need store.database set.
/// Mail merge and dry runs do not, so the config layer leaves it optional.
pub fn require_database(config: &RunConfig) -> Result<(), CliError> {
    if config.store.database.trim().is_empty() {
        return Err(CliError::config("store.database is not set")
            .with_hint("add database = \"parcels.sqlite\" to [store] in the config"));
    }
    Ok(())
}

// ============================================================================
// validate
// ============================================================================

fn cmd_validate(config_path: &Path, json: bool) -> Result<(), CliError> {
    let config = load_config(config_path)?;

    if json {
        let out = serde_json::json!({
            "name": config.name,
            "input": {
                "file": config.input.file,
                "has_headers": config.input.has_headers,
                "track_record_ids": config.input.track_record_ids,
                "has_valid_flag": config.input.has_valid_flag,
            },
            "store": {
                "database": config.store.database,
                "pivot_table": config.store.pivot_table,
                "pivot_key_column": config.store.pivot_key_column,
                "mapping_table": config.store.mapping_table,
            },
            "mailmerge": {
                "output_dir": config.mailmerge.output_dir,
            },
        });
        let rendered =
            serde_json::to_string_pretty(&out).map_err(|e| CliError::general(e.to_string()))?;
        println!("{}", rendered);
    } else {
        println!("config ok: {}", config.name);
        println!("  input:     {}", config.input.file);
        if config.store.database.trim().is_empty() {
            println!("  database:  (not set; run and init will refuse)");
        } else {
            println!("  database:  {}", config.store.database);
        }
        println!(
            "  pivot:     {} keyed by {}",
            config.store.pivot_table, config.store.pivot_key_column
        );
        if config.input.track_record_ids {
            println!("  mapping:   {}", config.store.mapping_table);
        }
        println!("  mailmerge: {}", config.mailmerge.output_dir);
    }

    Ok(())
}
