use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A person or group credited on catalog releases.
///
/// `created_on` and `updated_on` are server-managed: the insert defaults
/// stamp both to the same instant and an update trigger refreshes
/// `updated_on` on every write.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "artists")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub disambiguation_text: Option<String>,
    pub system_entity: bool,
    pub enabled: bool,
    pub created_on: DateTimeWithTimeZone,
    pub updated_on: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn make_artist_model() -> Model {
        let now = Utc::now().fixed_offset();
        Model {
            id: Uuid::new_v4(),
            name: "Focus".into(),
            description: Some("Dutch progressive rock band".into()),
            disambiguation_text: None,
            system_entity: false,
            enabled: true,
            created_on: now,
            updated_on: now,
        }
    }

    #[test]
    fn test_artist_model_serialization() {
        let model = make_artist_model();
        let json = serde_json::to_value(&model).unwrap();
        assert_eq!(json["name"], "Focus");
        assert!(json["disambiguation_text"].is_null());
        assert!(json["created_on"].is_string());
    }

    #[test]
    fn test_fresh_artist_timestamps_coincide() {
        let model = make_artist_model();
        assert_eq!(model.created_on, model.updated_on);
    }
}
