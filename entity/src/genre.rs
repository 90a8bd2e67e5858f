use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

// The name is a soft lookup key: handlers reuse an existing row with the
// same name instead of inserting, but the schema does not enforce it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "genres")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl Related<super::venue::Entity> for Entity {
    fn to() -> RelationDef {
        super::genre_venue::Relation::Venue.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::genre_venue::Relation::Genre.def().rev())
    }
}

impl Related<super::artist::Entity> for Entity {
    fn to() -> RelationDef {
        super::genre_artist::Relation::Artist.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::genre_artist::Relation::Genre.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
