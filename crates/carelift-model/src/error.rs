use thiserror::Error;

#[derive(Debug, Error)]
pub enum MigrateError {
    /// Structural pre-flight failure: nothing to analyze.
    #[error("source contains no columns")]
    EmptySource,
    #[error("unknown target table: {0}")]
    UnknownTable(String),
    #[error("unknown target column: {table}.{column}")]
    UnknownColumn { table: String, column: String },
    #[error("analysis cancelled")]
    Cancelled,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, MigrateError>;
