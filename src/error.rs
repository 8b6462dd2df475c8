use ninterp::error::{InterpolateError, ValidateError};
use thiserror::Error;

/// Construction-time failures from malformed tables or parameters.
///
/// These are fatal for the run that depends on them; no partially built
/// model or curve is ever returned.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    #[error("{table} table needs at least 2 rows, found {rows}")]
    TooFewRows { table: &'static str, rows: usize },

    #[error("{column} column must be strictly increasing, violated at row {row}")]
    NotStrictlyIncreasing { column: &'static str, row: usize },

    #[error("{table} table columns have different lengths ({left} vs {right})")]
    ColumnLengthMismatch {
        table: &'static str,
        left: usize,
        right: usize,
    },

    #[error("parameter file is missing key `{key}`")]
    MissingParameter { key: &'static str },

    #[error("lumped {dof} mass must be positive to invert M, found {value}")]
    NonInvertibleMass { dof: &'static str, value: f64 },

    #[error(transparent)]
    Grid(#[from] ValidateError),
}

/// Query outside a table's domain under the strict (non-extrapolating) policy.
#[derive(Debug, Error)]
#[error("query {value} is outside the table domain")]
pub struct DomainError {
    pub value: f64,
    #[source]
    pub source: InterpolateError,
}
