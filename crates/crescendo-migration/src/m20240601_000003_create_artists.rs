use sea_orm_migration::prelude::*;

/// The artists table plus its server-side machinery: identifier and
/// timestamp defaults, the `updated_on` refresh trigger, single and
/// batched lookup functions, and the create/update/delete procedures
/// that report results through INOUT parameters.
#[derive(DeriveMigrationName)]
pub struct Migration;

fn artists_table() -> TableCreateStatement {
    Table::create()
        .table(Artists::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(Artists::Id)
                .uuid()
                .not_null()
                .primary_key()
                .default(Expr::cust("gen_random_uuid()")),
        )
        .col(
            ColumnDef::new(Artists::Name)
                .string_len(256)
                .not_null()
                .check(Expr::cust("length(trim(name)) > 0")),
        )
        .col(
            ColumnDef::new(Artists::Description)
                .string_len(2048)
                .null()
                .check(Expr::cust(
                    "description IS NULL OR length(trim(description)) > 0",
                )),
        )
        .col(
            ColumnDef::new(Artists::DisambiguationText)
                .string_len(2048)
                .null()
                .check(Expr::cust(
                    "disambiguation_text IS NULL OR length(trim(disambiguation_text)) > 0",
                )),
        )
        .col(ColumnDef::new(Artists::SystemEntity).boolean().not_null())
        .col(ColumnDef::new(Artists::Enabled).boolean().not_null())
        .col(
            ColumnDef::new(Artists::CreatedOn)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .col(
            ColumnDef::new(Artists::UpdatedOn)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(artists_table()).await?;

        let db = manager.get_connection();

        // Shared trigger function: every table with an updated_on column
        // attaches its own BEFORE UPDATE trigger to this.
        db.execute_unprepared(
            r#"
            CREATE FUNCTION set_updated_on()
            RETURNS TRIGGER AS $$
            BEGIN
                NEW.updated_on = CURRENT_TIMESTAMP;
                RETURN NEW;
            END;
            $$ LANGUAGE plpgsql;
            "#,
        )
        .await?;

        db.execute_unprepared(
            r#"
            CREATE TRIGGER tr_artists_set_updated_on
            BEFORE UPDATE ON artists
            FOR EACH ROW
            EXECUTE FUNCTION set_updated_on();
            "#,
        )
        .await?;

        db.execute_unprepared(
            r#"
            CREATE FUNCTION ufn_get_artist(artist_id uuid)
            RETURNS SETOF artists
            LANGUAGE sql STABLE
            AS $$
                SELECT * FROM artists WHERE id = artist_id;
            $$;
            "#,
        )
        .await?;

        db.execute_unprepared(
            r#"
            CREATE FUNCTION ufn_get_artists(artist_ids uuid_array[])
            RETURNS SETOF artists
            LANGUAGE sql STABLE
            AS $$
                SELECT a.*
                FROM artists AS a
                INNER JOIN (SELECT DISTINCT value FROM unnest(artist_ids)) AS ids
                    ON a.id = ids.value;
            $$;
            "#,
        )
        .await?;

        db.execute_unprepared(
            r#"
            CREATE PROCEDURE sp_create_artist(
                id uuid,
                name character varying(256),
                description character varying(2048),
                disambiguation_text character varying(2048),
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

                INSERT INTO artists (id, name, description, disambiguation_text, system_entity, enabled)
                VALUES (id, name, description, disambiguation_text, system_entity, enabled)
                RETURNING artists.id, artists.created_on, artists.updated_on
                INTO result_id, result_created_on, result_updated_on;
            END;
            $$;
            "#,
        )
        .await?;

        db.execute_unprepared(
            r#"
            CREATE PROCEDURE sp_update_artist(
                id uuid,
                name character varying(256),
                description character varying(2048),
                disambiguation_text character varying(2048),
                system_entity boolean,
                enabled boolean,
                INOUT result_rows_updated bigint
            )
            LANGUAGE plpgsql
            AS $$
            #variable_conflict use_variable
            BEGIN
                UPDATE artists
                SET name = name,
                    description = description,
                    disambiguation_text = disambiguation_text,
                    system_entity = system_entity,
                    enabled = enabled
                WHERE artists.id = id;

                GET DIAGNOSTICS result_rows_updated = ROW_COUNT;
            END;
            $$;
            "#,
        )
        .await?;

        db.execute_unprepared(
            r#"
            CREATE PROCEDURE sp_delete_artist(
                id uuid,
                INOUT result_rows_deleted bigint
            )
            LANGUAGE plpgsql
            AS $$
            #variable_conflict use_variable
            BEGIN
                DELETE FROM artists WHERE artists.id = id;

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

        db.execute_unprepared("DROP PROCEDURE IF EXISTS sp_delete_artist")
            .await?;
        db.execute_unprepared("DROP PROCEDURE IF EXISTS sp_update_artist")
            .await?;
        db.execute_unprepared("DROP PROCEDURE IF EXISTS sp_create_artist")
            .await?;
        db.execute_unprepared("DROP FUNCTION IF EXISTS ufn_get_artists")
            .await?;
        db.execute_unprepared("DROP FUNCTION IF EXISTS ufn_get_artist")
            .await?;
        db.execute_unprepared("DROP TRIGGER IF EXISTS tr_artists_set_updated_on ON artists")
            .await?;
        db.execute_unprepared("DROP FUNCTION IF EXISTS set_updated_on")
            .await?;

        manager
            .drop_table(Table::drop().table(Artists::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Artists {
    Table,
    Id,
    Name,
    Description,
    DisambiguationText,
    SystemEntity,
    Enabled,
    CreatedOn,
    UpdatedOn,
}
