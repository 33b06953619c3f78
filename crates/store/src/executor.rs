// Statement executors backing the engine's persistence seam.

use rusqlite::Connection;

use landmap_engine::StatementExecutor;

/// Executes statements against a SQLite database file.
///
/// Every statement opens a fresh connection and runs in auto-commit; a
/// failed statement leaves no open transaction behind.
pub struct SqliteExecutor {
    path: String,
}

impl SqliteExecutor {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl StatementExecutor for SqliteExecutor {
    fn execute(&mut self, sql: &str) -> Result<(), String> {
        let conn = Connection::open(&self.path).map_err(|e| e.to_string())?;
        conn.execute(sql, []).map_err(|e| e.to_string())?;
        Ok(())
    }
}

/// Prints each statement to stderr instead of executing it.
#[derive(Debug, Default)]
pub struct DryRunExecutor {
    pub statements: usize,
}

impl StatementExecutor for DryRunExecutor {
    fn execute(&mut self, sql: &str) -> Result<(), String> {
        self.statements += 1;
        eprintln!("[dry-run] {sql}");
        Ok(())
    }
}
