use std::fmt;

#[derive(Debug)]
pub enum EngineError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (blank input file, bad table name, etc.).
    ConfigValidation(String),
    /// Input stream could not be obtained (file read, etc.).
    Io(String),
    /// Input stream is not parseable as CSV.
    InputParse(String),
    /// Mail-merge output could not be written.
    OutputWrite(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
            Self::InputParse(msg) => write!(f, "input parse error: {msg}"),
            Self::OutputWrite(msg) => write!(f, "output write error: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}
