use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait, Statement};
use uuid::Uuid;

use crate::entities::artist;
use crate::error::DbError;

use super::{require_non_blank, require_non_blank_opt, CreatedRow, NAME_MAX_LEN, TEXT_MAX_LEN};

/// Client-writable artist columns, in the parameter order of the
/// `sp_create_artist` / `sp_update_artist` routines.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtistInput {
    /// Pass [`Uuid::nil`] on create to let the database generate one.
    /// On update this selects the row to overwrite.
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub disambiguation_text: Option<String>,
    pub system_entity: bool,
    pub enabled: bool,
}

fn validate(input: &ArtistInput) -> Result<(), DbError> {
    require_non_blank("name", &input.name, NAME_MAX_LEN)?;
    require_non_blank_opt("description", input.description.as_deref(), TEXT_MAX_LEN)?;
    require_non_blank_opt(
        "disambiguation_text",
        input.disambiguation_text.as_deref(),
        TEXT_MAX_LEN,
    )?;
    Ok(())
}

fn create_statement(input: &ArtistInput) -> Statement {
    Statement::from_sql_and_values(
        DbBackend::Postgres,
        "CALL sp_create_artist($1, $2, $3, $4, $5, $6, NULL, NULL, NULL)",
        [
            input.id.into(),
            input.name.clone().into(),
            input.description.clone().into(),
            input.disambiguation_text.clone().into(),
            input.system_entity.into(),
            input.enabled.into(),
        ],
    )
}

fn update_statement(input: &ArtistInput) -> Statement {
    Statement::from_sql_and_values(
        DbBackend::Postgres,
        "CALL sp_update_artist($1, $2, $3, $4, $5, $6, NULL)",
        [
            input.id.into(),
            input.name.clone().into(),
            input.description.clone().into(),
            input.disambiguation_text.clone().into(),
            input.system_entity.into(),
            input.enabled.into(),
        ],
    )
}

/// Insert an artist via `sp_create_artist`.
///
/// Returns the resolved identifier together with the server-assigned
/// timestamps.
pub async fn create_artist(
    db: &DatabaseConnection,
    input: &ArtistInput,
) -> Result<CreatedRow, DbError> {
    validate(input)?;
    let row = db
        .query_one(create_statement(input))
        .await?
        .ok_or(DbError::MissingResultRow("sp_create_artist"))?;
    CreatedRow::read(&row)
}

/// Overwrite every writable column of an artist via `sp_update_artist`.
///
/// Returns the number of rows modified; 0 means no artist has that
/// identifier.
pub async fn update_artist(db: &DatabaseConnection, input: &ArtistInput) -> Result<u64, DbError> {
    validate(input)?;
    let row = db
        .query_one(update_statement(input))
        .await?
        .ok_or(DbError::MissingResultRow("sp_update_artist"))?;
    let rows: i64 = row.try_get("", "result_rows_updated")?;
    Ok(rows as u64)
}

/// Delete an artist via `sp_delete_artist`. Returns the rows-deleted
/// count; 0 means no artist has that identifier.
pub async fn delete_artist(db: &DatabaseConnection, id: Uuid) -> Result<u64, DbError> {
    let stmt = Statement::from_sql_and_values(
        DbBackend::Postgres,
        "CALL sp_delete_artist($1, NULL)",
        [id.into()],
    );
    let row = db
        .query_one(stmt)
        .await?
        .ok_or(DbError::MissingResultRow("sp_delete_artist"))?;
    let rows: i64 = row.try_get("", "result_rows_deleted")?;
    Ok(rows as u64)
}

/// Fetch one artist through `ufn_get_artist`.
pub async fn get_artist(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<artist::Model>, DbError> {
    let stmt = Statement::from_sql_and_values(
        DbBackend::Postgres,
        "SELECT * FROM ufn_get_artist($1)",
        [id.into()],
    );
    Ok(artist::Entity::find().from_raw_sql(stmt).one(db).await?)
}

/// Fetch the subset of artists whose identifiers appear in `ids`,
/// through the batched `ufn_get_artists`. One round trip regardless of
/// batch size; unknown identifiers are simply absent from the result.
pub async fn get_artists(
    db: &DatabaseConnection,
    ids: &[Uuid],
) -> Result<Vec<artist::Model>, DbError> {
    let stmt = Statement::from_sql_and_values(
        DbBackend::Postgres,
        "SELECT * FROM ufn_get_artists((SELECT coalesce(array_agg(ROW(v)::uuid_array), '{}') \
         FROM unnest($1::uuid[]) AS v))",
        [ids.to_vec().into()],
    );
    Ok(artist::Entity::find().from_raw_sql(stmt).all(db).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::Value;

    fn make_input() -> ArtistInput {
        ArtistInput {
            id: Uuid::nil(),
            name: "Camel".into(),
            description: Some("English progressive rock band".into()),
            disambiguation_text: None,
            system_entity: false,
            enabled: true,
        }
    }

    #[test]
    fn test_create_statement_binds_all_writable_columns() {
        let stmt = create_statement(&make_input());
        assert!(stmt.sql.starts_with("CALL sp_create_artist("));
        let values = stmt.values.expect("values should be bound");
        assert_eq!(values.0.len(), 6);
    }

    #[test]
    fn test_create_statement_passes_nil_id_through() {
        // The nil identifier is the "generate one for me" sentinel and
        // must reach the routine verbatim.
        let stmt = create_statement(&make_input());
        let values = stmt.values.unwrap();
        assert_eq!(values.0[0], Value::Uuid(Some(Box::new(Uuid::nil()))));
    }

    #[test]
    fn test_create_statement_preserves_explicit_id() {
        let id = Uuid::new_v4();
        let mut input = make_input();
        input.id = id;
        let stmt = create_statement(&input);
        let values = stmt.values.unwrap();
        assert_eq!(values.0[0], Value::Uuid(Some(Box::new(id))));
    }

    #[test]
    fn test_update_statement_binds_id_first() {
        let id = Uuid::new_v4();
        let mut input = make_input();
        input.id = id;
        let stmt = update_statement(&input);
        assert!(stmt.sql.starts_with("CALL sp_update_artist("));
        let values = stmt.values.unwrap();
        assert_eq!(values.0.len(), 6);
        assert_eq!(values.0[0], Value::Uuid(Some(Box::new(id))));
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        let mut input = make_input();
        input.name = "   ".into();
        assert!(matches!(validate(&input), Err(DbError::BlankValue("name"))));
    }

    #[test]
    fn test_validate_rejects_blank_disambiguation_text() {
        let mut input = make_input();
        input.disambiguation_text = Some(String::new());
        assert!(matches!(
            validate(&input),
            Err(DbError::BlankValue("disambiguation_text"))
        ));
    }

    #[test]
    fn test_validate_accepts_absent_optionals() {
        let mut input = make_input();
        input.description = None;
        input.disambiguation_text = None;
        assert!(validate(&input).is_ok());
    }
}
