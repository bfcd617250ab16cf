use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "shows")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub venue_id: i32,
    pub artist_id: i32,
    pub start_time: DateTimeUtc,

    /// Copied from the venue when the show is listed; never refreshed.
    pub venue_name: String,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
}

// No on_delete rule: deleting a venue or artist leaves its shows behind.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::entity::venues::Entity",
        from = "Column::VenueId",
        to = "crate::entity::venues::Column::Id"
    )]
    Venues,
    #[sea_orm(
        belongs_to = "crate::entity::artists::Entity",
        from = "Column::ArtistId",
        to = "crate::entity::artists::Column::Id"
    )]
    Artists,
}

impl Related<crate::entity::venues::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Venues.def()
    }
}

impl Related<crate::entity::artists::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Artists.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
