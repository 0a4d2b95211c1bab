//! Error types for SVM sessions

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SVMError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Index ({row}, {col}) out of bounds for {rows}x{cols} matrix")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    #[error("Unavailable: {0}")]
    Unavailable(String),

    #[error("Not implemented: {0}")]
    NotImplemented(&'static str),

    #[error("Optimization failed: {0}")]
    OptimizationError(String),

    #[error("Model not trained")]
    ModelNotTrained,

    #[error("Invalid label: expected -1 or +1, got {0}")]
    InvalidLabel(f64),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Empty dataset")]
    EmptyDataset,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type Result<T> = std::result::Result<T, SVMError>;
