use fakesql_core::CastError;
use smol_str::SmolStr;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// A table lookup by column name failed.
    #[error("column `{name}` was not found")]
    ColumnNotFound { name: SmolStr },

    /// A cursor lookup by column name failed.
    #[error("column `{name}` was not found in the current result set")]
    IndexOutOfRange { name: SmolStr },

    #[error("ordinal {ordinal} is out of range for {field_count} field(s)")]
    OrdinalOutOfRange { ordinal: usize, field_count: usize },

    #[error("row has {actual} value(s) but the table has {expected} column(s)")]
    RowWidthMismatch { expected: usize, actual: usize },

    #[error("invalid cursor state: {0}")]
    InvalidState(&'static str),

    #[error(transparent)]
    Cast(#[from] CastError),

    #[error("not supported: {0}")]
    NotSupported(&'static str),
}
