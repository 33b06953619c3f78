//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! # Exit Codes
//!
//! | Code | Domain      | Description                                    |
//! |------|-------------|------------------------------------------------|
//! | 0    | Universal   | Success                                        |
//! | 1    | Universal   | General error (unspecified)                    |
//! | 2    | Universal   | CLI usage error (bad args, missing file)       |
//! | 3    | config      | Config file unreadable or invalid              |
//! | 4    | input       | Input file unreadable or unparseable           |
//! | 5    | persistence | Run finished but some statements failed        |
//! | 6    | output      | Mail-merge output could not be written         |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant below
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Reconciliation (3-6)
// =============================================================================

/// Config file missing, unparseable, or failed validation.
pub const EXIT_CONFIG: u8 = 3;

/// Input file could not be read or parsed as CSV.
pub const EXIT_INPUT: u8 = 4;

/// Run completed but one or more persistence statements failed.
/// Surviving statements were applied; the report lists the failures.
pub const EXIT_PERSISTENCE: u8 = 5;

/// Mail-merge output file could not be written.
pub const EXIT_OUTPUT: u8 = 6;

// =============================================================================
// Engine Error Mapping
// =============================================================================

use landmap_engine::EngineError;

/// Map an EngineError to its exit code.
pub fn engine_exit_code(err: &EngineError) -> u8 {
    match err {
        EngineError::ConfigParse(_) | EngineError::ConfigValidation(_) => EXIT_CONFIG,
        EngineError::Io(_) | EngineError::InputParse(_) => EXIT_INPUT,
        EngineError::OutputWrite(_) => EXIT_OUTPUT,
    }
}
