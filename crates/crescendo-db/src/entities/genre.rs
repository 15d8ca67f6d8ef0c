use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "genres")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub system_entity: bool,
    pub enabled: bool,
    pub created_on: DateTimeWithTimeZone,
    pub updated_on: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Outgoing edges: relationships this genre owns.
    #[sea_orm(has_many = "super::genre_relationship::Entity")]
    GenreRelationship,
}

impl Related<super::genre_relationship::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GenreRelationship.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
