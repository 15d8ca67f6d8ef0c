//! Thin wrappers over the catalog's stored procedures and table functions.
//!
//! Each function binds parameters in the order the routine declares them
//! and reads results back from the routine's INOUT columns. Inputs carry
//! only client-writable columns, so server-managed fields (`created_on`,
//! `updated_on`) cannot be supplied from this side at all; the trimmed
//! length rules are checked here before the database sees the statement,
//! mirroring the schema's check constraints.

use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::QueryResult;
use uuid::Uuid;

use crate::error::DbError;

mod artist;
mod genre;

pub use artist::{
    create_artist, delete_artist, get_artist, get_artists, update_artist, ArtistInput,
};
pub use genre::{
    create_genre, delete_genre, get_genre, get_genre_relationships, get_genres, update_genre,
    GenreInput,
};

/// Maximum length of an entity name, in characters.
pub const NAME_MAX_LEN: usize = 256;
/// Maximum length of a descriptive text column, in characters.
pub const TEXT_MAX_LEN: usize = 2048;

/// Identifier and timestamps assigned by a `sp_create_*` routine.
///
/// Right after creation `created_on` and `updated_on` hold the same
/// instant; later updates move only `updated_on`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreatedRow {
    pub id: Uuid,
    pub created_on: DateTimeWithTimeZone,
    pub updated_on: DateTimeWithTimeZone,
}

impl CreatedRow {
    fn read(row: &QueryResult) -> Result<Self, DbError> {
        Ok(Self {
            id: row.try_get("", "result_id")?,
            created_on: row.try_get("", "result_created_on")?,
            updated_on: row.try_get("", "result_updated_on")?,
        })
    }
}

fn require_non_blank(field: &'static str, value: &str, max: usize) -> Result<(), DbError> {
    if value.trim().is_empty() {
        return Err(DbError::BlankValue(field));
    }
    if value.chars().count() > max {
        return Err(DbError::ValueTooLong { field, max });
    }
    Ok(())
}

fn require_non_blank_opt(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<(), DbError> {
    match value {
        Some(v) => require_non_blank(field, v, max),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_non_blank_accepts_plain_text() {
        assert!(require_non_blank("name", "Progressive Rock", NAME_MAX_LEN).is_ok());
    }

    #[test]
    fn test_require_non_blank_rejects_empty() {
        assert!(matches!(
            require_non_blank("name", "", NAME_MAX_LEN),
            Err(DbError::BlankValue("name"))
        ));
    }

    #[test]
    fn test_require_non_blank_rejects_whitespace_only() {
        assert!(matches!(
            require_non_blank("name", " \t\n ", NAME_MAX_LEN),
            Err(DbError::BlankValue("name"))
        ));
    }

    #[test]
    fn test_require_non_blank_length_boundary() {
        let at_limit = "x".repeat(NAME_MAX_LEN);
        assert!(require_non_blank("name", &at_limit, NAME_MAX_LEN).is_ok());

        let over_limit = "x".repeat(NAME_MAX_LEN + 1);
        assert!(matches!(
            require_non_blank("name", &over_limit, NAME_MAX_LEN),
            Err(DbError::ValueTooLong { field: "name", max: NAME_MAX_LEN })
        ));
    }

    #[test]
    fn test_require_non_blank_counts_chars_not_bytes() {
        // 256 multi-byte characters stay within a 256-character limit.
        let umlauts = "ü".repeat(NAME_MAX_LEN);
        assert!(require_non_blank("name", &umlauts, NAME_MAX_LEN).is_ok());
    }

    #[test]
    fn test_require_non_blank_opt_allows_none() {
        assert!(require_non_blank_opt("description", None, TEXT_MAX_LEN).is_ok());
    }

    #[test]
    fn test_require_non_blank_opt_rejects_blank_some() {
        assert!(matches!(
            require_non_blank_opt("description", Some("   "), TEXT_MAX_LEN),
            Err(DbError::BlankValue("description"))
        ));
    }
}
