pub use sea_orm_migration::prelude::*;

mod m20240601_000001_baseline;
mod m20240601_000002_create_value_array_types;
mod m20240601_000003_create_artists;
mod m20240601_000004_create_genres;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_baseline::Migration),
            Box::new(m20240601_000002_create_value_array_types::Migration),
            Box::new(m20240601_000003_create_artists::Migration),
            Box::new(m20240601_000004_create_genres::Migration),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_in_ascending_timestamp_order() {
        let names: Vec<String> = Migrator::migrations()
            .iter()
            .map(|m| m.name().to_string())
            .collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted, "migration list must be ordered by name");
    }

    #[test]
    fn test_migration_names_are_unique() {
        let mut names: Vec<String> = Migrator::migrations()
            .iter()
            .map(|m| m.name().to_string())
            .collect();
        let before = names.len();
        names.sort();
        names.dedup();
        assert_eq!(before, names.len());
    }

    #[test]
    fn test_migration_names_carry_timestamp_prefix() {
        for migration in Migrator::migrations() {
            let name = migration.name();
            assert!(
                name.starts_with('m') && name.as_bytes()[1..9].iter().all(u8::is_ascii_digit),
                "unexpected migration name: {name}"
            );
        }
    }
}
