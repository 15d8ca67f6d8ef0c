use sea_orm_migration::prelude::*;

/// Composite value types used as bulk-parameter containers.
///
/// The batched lookup functions accept arrays of these instead of N
/// scalar parameters, so a caller can resolve an identifier set in a
/// single round trip.
#[derive(DeriveMigrationName)]
pub struct Migration;

const VALUE_ARRAY_TYPES: [(&str, &str); 5] = [
    ("int16_array", "smallint"),
    ("int32_array", "integer"),
    ("int64_array", "bigint"),
    ("uuid_array", "uuid"),
    ("string_array", "text"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        for (name, scalar) in VALUE_ARRAY_TYPES {
            db.execute_unprepared(&format!("CREATE TYPE {name} AS (value {scalar})"))
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        for (name, _) in VALUE_ARRAY_TYPES.iter().rev() {
            db.execute_unprepared(&format!("DROP TYPE IF EXISTS {name}"))
                .await?;
        }

        Ok(())
    }
}
