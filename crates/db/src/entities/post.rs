//! Post entity (restaurant updates published by owners).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// What kind of update a post announces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    #[sea_orm(string_value = "menu_update")]
    MenuUpdate,
    #[sea_orm(string_value = "announcement")]
    Announcement,
    #[sea_orm(string_value = "event")]
    Event,
    #[sea_orm(string_value = "promotion")]
    Promotion,
    #[sea_orm(string_value = "story")]
    Story,
}

impl Kind {
    /// Parse a kind from its wire representation.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "menu_update" => Some(Self::MenuUpdate),
            "announcement" => Some(Self::Announcement),
            "event" => Some(Self::Event),
            "promotion" => Some(Self::Promotion),
            "story" => Some(Self::Story),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "post")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub restaurant_id: String,

    /// Authoring user
    pub user_id: String,

    pub kind: Kind,

    #[sea_orm(nullable)]
    pub title: Option<String>,

    #[sea_orm(column_type = "Text")]
    pub content: String,

    #[sea_orm(nullable)]
    pub image_url: Option<String>,

    #[sea_orm(default_value = true)]
    pub is_published: bool,

    pub created_at: DateTimeUtc,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::restaurant::Entity",
        from = "Column::RestaurantId",
        to = "super::restaurant::Column::Id",
        on_delete = "Cascade"
    )]
    Restaurant,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::restaurant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Restaurant.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
