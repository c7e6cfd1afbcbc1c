pub mod config;
pub use config::{Config, DisplayConfig, ReportConfig};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SatLensError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
    #[error("malformed condition '{condition}': expected '<field> <op> <value>', got {tokens} token(s)")]
    MalformedCondition { condition: String, tokens: usize },
    #[error("Invalid comparison operator '{0}'. Only >, <, >=, <=, ==, != allowed.")]
    UnsupportedOperator(String),
    #[error("field '{field}' not found (available: {available})")]
    MissingField { field: String, available: String },
    #[error("cannot apply '{op}' to column '{field}' of type {data_type} with that value")]
    IncomparableTypes {
        field: String,
        data_type: String,
        op: String,
    },
    #[error("'{0}' is not a feature of the dataset. Did you spell something wrong?")]
    UnknownKey(String),
    #[error("row count mismatch: features have {features} rows, outcomes have {outcomes}")]
    RowCountMismatch { features: usize, outcomes: usize },
    #[error("column '{0}' appears in both the feature and outcome tables")]
    DuplicateColumn(String),
    #[error("feature '{field}' of type {data_type} cannot be plotted as a histogram")]
    NonNumericFeature { field: String, data_type: String },
    #[error("Unsupported table format: {0} (use .csv or .parquet)")]
    UnsupportedFormat(String),
    #[error("Render error: {0}")]
    Render(String),
    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, SatLensError>;
