use thiserror::Error;

/// Result type for the driver-facing operations.
pub type Result<T> = std::result::Result<T, Error>;

/// A fatal fault raised while executing an Intcode program.
///
/// Faults abort execution immediately. Whatever the program had committed
/// before the faulting cycle stays in memory; nothing is rolled back.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Fault {
    /// The cell at the cursor is not 1, 2 or 99.
    #[error("invalid operator {opcode} at position {cursor}")]
    InvalidOperator { opcode: i64, cursor: usize },

    /// An index read from the program (or the cursor itself) lies outside
    /// the program.
    #[error("index {index} out of bounds for program of length {len} (instruction at {cursor})")]
    OutOfBounds { index: i64, len: usize, cursor: usize },
}

/// A cell of program or mass text that is not a base-10 integer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid integer {cell:?} at position {position}")]
pub struct ParseError {
    pub position: usize,
    pub cell: String,
}

/// Crate-level errors surfaced to the command line.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Fault(#[from] Fault),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no noun/verb pair produces {target}")]
    NoSolution { target: i64 },
}
