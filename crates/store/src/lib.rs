// SQLite persistence: the engine's StatementExecutor seam plus schema
// bootstrap for the pivot and mapping tables.

pub mod executor;
pub mod schema;

pub use executor::{DryRunExecutor, SqliteExecutor};
