use thiserror::Error;

/// Failures raised while a circuit is being put together. All of them surface at the call that
/// built the offending value; assembling a finished [`crate::pil::program::Program`] never fails.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PilError {
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: String,
    },
    #[error("Column `{0}` is already shifted to the next row")]
    DoubleShift(String),
    #[error("Invalid lookup: {0}")]
    InvalidCombinator(String),
    #[error("Row count must be positive")]
    InvalidRowCount,
    #[error("Column `{0}` is declared with conflicting definitions")]
    ColumnRedefinition(String),
    #[error("Fixed column `{name}` describes {len} explicit rows, program has {rows}")]
    LengthMismatch {
        name: String,
        len: usize,
        rows: usize,
    },
    #[error("Fixed column `{0}` has more than one repeating segment")]
    InvalidConstantList(String),
}

#[derive(Error, Debug)]
pub enum ToolchainError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to launch `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{program}` exited with status {}", .code.map_or("<signal>".to_string(), |c| c.to_string()))]
    Failed { program: String, code: Option<i32> },
    #[error("No toolchain command configured")]
    EmptyCommand,
}
