use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A directed, attributed edge between two genres.
///
/// The edge belongs to `genre_id` (deleting that genre cascades here);
/// `dependent_genre_id` is only referenced, so deleting it is restricted
/// while any edge still points at it. Within one owning genre, `order`
/// is unique.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "genre_relationships")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub genre_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub dependent_genre_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub order: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::genre::Entity",
        from = "Column::GenreId",
        to = "super::genre::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Genre,
    #[sea_orm(
        belongs_to = "super::genre::Entity",
        from = "Column::DependentGenreId",
        to = "super::genre::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    DependentGenre,
}

impl Related<super::genre::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Genre.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
