use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait, Statement};
use uuid::Uuid;

use crate::entities::{genre, genre_relationship};
use crate::error::DbError;

use super::{require_non_blank, require_non_blank_opt, CreatedRow, NAME_MAX_LEN, TEXT_MAX_LEN};

/// Client-writable genre columns, in the parameter order of the
/// `sp_create_genre` / `sp_update_genre` routines.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenreInput {
    /// Pass [`Uuid::nil`] on create to let the database generate one.
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub system_entity: bool,
    pub enabled: bool,
}

fn validate(input: &GenreInput) -> Result<(), DbError> {
    require_non_blank("name", &input.name, NAME_MAX_LEN)?;
    require_non_blank_opt("description", input.description.as_deref(), TEXT_MAX_LEN)?;
    Ok(())
}

fn create_statement(input: &GenreInput) -> Statement {
    Statement::from_sql_and_values(
        DbBackend::Postgres,
        "CALL sp_create_genre($1, $2, $3, $4, $5, NULL, NULL, NULL)",
        [
            input.id.into(),
            input.name.clone().into(),
            input.description.clone().into(),
            input.system_entity.into(),
            input.enabled.into(),
        ],
    )
}

fn update_statement(input: &GenreInput) -> Statement {
    Statement::from_sql_and_values(
        DbBackend::Postgres,
        "CALL sp_update_genre($1, $2, $3, $4, $5, NULL)",
        [
            input.id.into(),
            input.name.clone().into(),
            input.description.clone().into(),
            input.system_entity.into(),
            input.enabled.into(),
        ],
    )
}

/// Insert a genre via `sp_create_genre`.
pub async fn create_genre(
    db: &DatabaseConnection,
    input: &GenreInput,
) -> Result<CreatedRow, DbError> {
    validate(input)?;
    let row = db
        .query_one(create_statement(input))
        .await?
        .ok_or(DbError::MissingResultRow("sp_create_genre"))?;
    CreatedRow::read(&row)
}

/// Overwrite every writable column of a genre via `sp_update_genre`.
/// Returns the rows-modified count; 0 means "not found".
pub async fn update_genre(db: &DatabaseConnection, input: &GenreInput) -> Result<u64, DbError> {
    validate(input)?;
    let row = db
        .query_one(update_statement(input))
        .await?
        .ok_or(DbError::MissingResultRow("sp_update_genre"))?;
    let rows: i64 = row.try_get("", "result_rows_updated")?;
    Ok(rows as u64)
}

/// Delete a genre via `sp_delete_genre`. Returns the rows-deleted count.
///
/// Deletion cascades to the genre's own relationship edges but is
/// rejected by the database while other genres still depend on this one.
pub async fn delete_genre(db: &DatabaseConnection, id: Uuid) -> Result<u64, DbError> {
    let stmt = Statement::from_sql_and_values(
        DbBackend::Postgres,
        "CALL sp_delete_genre($1, NULL)",
        [id.into()],
    );
    let row = db
        .query_one(stmt)
        .await?
        .ok_or(DbError::MissingResultRow("sp_delete_genre"))?;
    let rows: i64 = row.try_get("", "result_rows_deleted")?;
    Ok(rows as u64)
}

/// Fetch one genre through `ufn_get_genre`.
pub async fn get_genre(db: &DatabaseConnection, id: Uuid) -> Result<Option<genre::Model>, DbError> {
    let stmt = Statement::from_sql_and_values(
        DbBackend::Postgres,
        "SELECT * FROM ufn_get_genre($1)",
        [id.into()],
    );
    Ok(genre::Entity::find().from_raw_sql(stmt).one(db).await?)
}

/// Fetch the subset of genres whose identifiers appear in `ids`, through
/// the batched `ufn_get_genres`.
pub async fn get_genres(
    db: &DatabaseConnection,
    ids: &[Uuid],
) -> Result<Vec<genre::Model>, DbError> {
    let stmt = Statement::from_sql_and_values(
        DbBackend::Postgres,
        "SELECT * FROM ufn_get_genres((SELECT coalesce(array_agg(ROW(v)::uuid_array), '{}') \
         FROM unnest($1::uuid[]) AS v))",
        [ids.to_vec().into()],
    );
    Ok(genre::Entity::find().from_raw_sql(stmt).all(db).await?)
}

/// Fetch a genre's outgoing relationship edges, ordered by their
/// `order` position, through `ufn_get_genre_relationships`.
pub async fn get_genre_relationships(
    db: &DatabaseConnection,
    genre_id: Uuid,
) -> Result<Vec<genre_relationship::Model>, DbError> {
    let stmt = Statement::from_sql_and_values(
        DbBackend::Postgres,
        "SELECT * FROM ufn_get_genre_relationships($1)",
        [genre_id.into()],
    );
    Ok(genre_relationship::Entity::find()
        .from_raw_sql(stmt)
        .all(db)
        .await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_input() -> GenreInput {
        GenreInput {
            id: Uuid::nil(),
            name: "Krautrock".into(),
            description: None,
            system_entity: false,
            enabled: true,
        }
    }

    #[test]
    fn test_create_statement_arity_matches_routine() {
        let stmt = create_statement(&make_input());
        assert!(stmt.sql.starts_with("CALL sp_create_genre("));
        assert_eq!(stmt.values.unwrap().0.len(), 5);
    }

    #[test]
    fn test_update_statement_arity_matches_routine() {
        let stmt = update_statement(&make_input());
        assert!(stmt.sql.starts_with("CALL sp_update_genre("));
        assert_eq!(stmt.values.unwrap().0.len(), 5);
    }

    #[test]
    fn test_validate_rejects_overlong_description() {
        let mut input = make_input();
        input.description = Some("d".repeat(TEXT_MAX_LEN + 1));
        assert!(matches!(
            validate(&input),
            Err(DbError::ValueTooLong { field: "description", .. })
        ));
    }
}
