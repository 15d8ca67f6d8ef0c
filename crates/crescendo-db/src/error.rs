//! Catalog data-access error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("{0} must contain at least one non-whitespace character")]
    BlankValue(&'static str),

    #[error("{field} exceeds the maximum length of {max} characters")]
    ValueTooLong { field: &'static str, max: usize },

    #[error("{0} did not return its result row")]
    MissingResultRow(&'static str),

    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}
