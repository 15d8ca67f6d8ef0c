use sea_orm_migration::prelude::*;

/// Genres and the directed relationship edges between them, with the
/// same routine set the artists slice established.
///
/// An edge belongs to its owning genre (`genre_id`, delete cascades)
/// and points at a dependent genre (`dependent_genre_id`, delete is
/// restricted while referenced). Within one owning genre every edge
/// occupies a distinct `order` position.
#[derive(DeriveMigrationName)]
pub struct Migration;

fn genres_table() -> TableCreateStatement {
    Table::create()
        .table(Genres::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(Genres::Id)
                .uuid()
                .not_null()
                .primary_key()
                .default(Expr::cust("gen_random_uuid()")),
        )
        .col(
            ColumnDef::new(Genres::Name)
                .string_len(256)
                .not_null()
                .check(Expr::cust("length(trim(name)) > 0")),
        )
        .col(
            ColumnDef::new(Genres::Description)
                .string_len(2048)
                .null()
                .check(Expr::cust(
                    "description IS NULL OR length(trim(description)) > 0",
                )),
        )
        .col(ColumnDef::new(Genres::SystemEntity).boolean().not_null())
        .col(ColumnDef::new(Genres::Enabled).boolean().not_null())
        .col(
            ColumnDef::new(Genres::CreatedOn)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .col(
            ColumnDef::new(Genres::UpdatedOn)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .to_owned()
}

fn genre_relationships_table() -> TableCreateStatement {
    Table::create()
        .table(GenreRelationships::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(GenreRelationships::GenreId)
                .uuid()
                .not_null(),
        )
        .col(
            ColumnDef::new(GenreRelationships::DependentGenreId)
                .uuid()
                .not_null(),
        )
        .col(
            ColumnDef::new(GenreRelationships::Name)
                .string_len(256)
                .not_null()
                .check(Expr::cust("length(trim(name)) > 0")),
        )
        .col(
            ColumnDef::new(GenreRelationships::Description)
                .string_len(2048)
                .null()
                .check(Expr::cust(
                    "description IS NULL OR length(trim(description)) > 0",
                )),
        )
        .col(
            ColumnDef::new(GenreRelationships::Order)
                .integer()
                .not_null(),
        )
        .primary_key(
            Index::create()
                .name("pk_genre_relationships")
                .col(GenreRelationships::GenreId)
                .col(GenreRelationships::DependentGenreId),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_genre_relationships_genre_id")
                .from(GenreRelationships::Table, GenreRelationships::GenreId)
                .to(Genres::Table, Genres::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_genre_relationships_dependent_genre_id")
                .from(
                    GenreRelationships::Table,
                    GenreRelationships::DependentGenreId,
                )
                .to(Genres::Table, Genres::Id)
                .on_delete(ForeignKeyAction::Restrict),
        )
        .to_owned()
}

fn genre_relationships_order_index() -> IndexCreateStatement {
    Index::create()
        .name("idx_genre_relationships_genre_id_order")
        .table(GenreRelationships::Table)
        .col(GenreRelationships::GenreId)
        .col(GenreRelationships::Order)
        .unique()
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(genres_table()).await?;
        manager.create_table(genre_relationships_table()).await?;

        manager
            .create_index(genre_relationships_order_index())
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_genre_relationships_dependent_genre_id")
                    .table(GenreRelationships::Table)
                    .col(GenreRelationships::DependentGenreId)
                    .to_owned(),
            )
            .await?;

        let db = manager.get_connection();

        // set_updated_on() already exists; only the trigger is new here.
        db.execute_unprepared(
            r#"
            CREATE TRIGGER tr_genres_set_updated_on
            BEFORE UPDATE ON genres
            FOR EACH ROW
            EXECUTE FUNCTION set_updated_on();
            "#,
        )
        .await?;

        db.execute_unprepared(
            r#"
            CREATE FUNCTION ufn_get_genre(genre_id uuid)
            RETURNS SETOF genres
            LANGUAGE sql STABLE
            AS $$
                SELECT * FROM genres WHERE id = genre_id;
            $$;
            "#,
        )
        .await?;

        db.execute_unprepared(
            r#"
            CREATE FUNCTION ufn_get_genres(genre_ids uuid_array[])
            RETURNS SETOF genres
            LANGUAGE sql STABLE
            AS $$
                SELECT g.*
                FROM genres AS g
                INNER JOIN (SELECT DISTINCT value FROM unnest(genre_ids)) AS ids
                    ON g.id = ids.value;
            $$;
            "#,
        )
        .await?;

        db.execute_unprepared(
            r#"
            CREATE FUNCTION ufn_get_genre_relationships(owner_genre_id uuid)
            RETURNS SETOF genre_relationships
            LANGUAGE sql STABLE
            AS $$
                SELECT * FROM genre_relationships
                WHERE genre_id = owner_genre_id
                ORDER BY "order";
            $$;
            "#,
        )
        .await?;

        db.execute_unprepared(
            r#"
            CREATE PROCEDURE sp_create_genre(
                id uuid,
                name character varying(256),
                description character varying(2048),
                system_entity boolean,
                enabled boolean,
                INOUT result_id uuid,
                INOUT result_created_on timestamp with time zone,
                INOUT result_updated_on timestamp with time zone
            )
            LANGUAGE plpgsql
            AS $$
            #variable_conflict use_variable
            BEGIN
                IF id = '00000000-0000-0000-0000-000000000000'::uuid THEN
                    id := gen_random_uuid();
                END IF;

                INSERT INTO genres (id, name, description, system_entity, enabled)
                VALUES (id, name, description, system_entity, enabled)
                RETURNING genres.id, genres.created_on, genres.updated_on
                INTO result_id, result_created_on, result_updated_on;
            END;
            $$;
            "#,
        )
        .await?;

        db.execute_unprepared(
            r#"
            CREATE PROCEDURE sp_update_genre(
                id uuid,
                name character varying(256),
                description character varying(2048),
                system_entity boolean,
                enabled boolean,
                INOUT result_rows_updated bigint
            )
            LANGUAGE plpgsql
            AS $$
            #variable_conflict use_variable
            BEGIN
                UPDATE genres
                SET name = name,
                    description = description,
                    system_entity = system_entity,
                    enabled = enabled
                WHERE genres.id = id;

                GET DIAGNOSTICS result_rows_updated = ROW_COUNT;
            END;
            $$;
            "#,
        )
        .await?;

        db.execute_unprepared(
            r#"
            CREATE PROCEDURE sp_delete_genre(
                id uuid,
                INOUT result_rows_deleted bigint
            )
            LANGUAGE plpgsql
            AS $$
            #variable_conflict use_variable
            BEGIN
                DELETE FROM genres WHERE genres.id = id;

                GET DIAGNOSTICS result_rows_deleted = ROW_COUNT;
            END;
            $$;
            "#,
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared("DROP PROCEDURE IF EXISTS sp_delete_genre")
            .await?;
        db.execute_unprepared("DROP PROCEDURE IF EXISTS sp_update_genre")
            .await?;
        db.execute_unprepared("DROP PROCEDURE IF EXISTS sp_create_genre")
            .await?;
        db.execute_unprepared("DROP FUNCTION IF EXISTS ufn_get_genre_relationships")
            .await?;
        db.execute_unprepared("DROP FUNCTION IF EXISTS ufn_get_genres")
            .await?;
        db.execute_unprepared("DROP FUNCTION IF EXISTS ufn_get_genre")
            .await?;
        db.execute_unprepared("DROP TRIGGER IF EXISTS tr_genres_set_updated_on ON genres")
            .await?;

        manager
            .drop_table(Table::drop().table(GenreRelationships::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Genres::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Genres {
    Table,
    Id,
    Name,
    Description,
    SystemEntity,
    Enabled,
    CreatedOn,
    UpdatedOn,
}

#[derive(DeriveIden)]
enum GenreRelationships {
    Table,
    GenreId,
    DependentGenreId,
    Name,
    Description,
    Order,
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm_migration::sea_orm::sea_query::PostgresQueryBuilder;

    #[test]
    fn test_edges_have_composite_primary_key() {
        let sql = genre_relationships_table().to_string(PostgresQueryBuilder);
        assert!(sql.contains(
            "CONSTRAINT \"pk_genre_relationships\" PRIMARY KEY (\"genre_id\", \"dependent_genre_id\")"
        ));
    }

    #[test]
    fn test_owning_side_cascades_and_dependent_side_restricts() {
        let sql = genre_relationships_table().to_string(PostgresQueryBuilder);
        let cascade = sql
            .find("fk_genre_relationships_genre_id")
            .expect("owning-side foreign key missing");
        assert!(sql[cascade..].contains("ON DELETE CASCADE"));

        let restrict = sql
            .find("fk_genre_relationships_dependent_genre_id")
            .expect("dependent-side foreign key missing");
        assert!(sql[restrict..].contains("ON DELETE RESTRICT"));
    }

    #[test]
    fn test_order_position_is_unique_per_owning_genre() {
        let sql = genre_relationships_order_index().to_string(PostgresQueryBuilder);
        assert!(sql.starts_with("CREATE UNIQUE INDEX"));
        assert!(sql.contains("\"genre_id\", \"order\""));
    }

    #[test]
    fn test_genres_table_mirrors_artist_constraints() {
        let sql = genres_table().to_string(PostgresQueryBuilder);
        assert!(sql.contains("CHECK (length(trim(name)) > 0)"));
        assert!(!sql.contains("disambiguation_text"));
    }
}
