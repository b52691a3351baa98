//! Reservation entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reservations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub berth_number: i32,
    pub client_name: String,
    pub boat_name: String,

    pub start_date: DateTimeUtc,
    pub end_date: DateTimeUtc,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::berth::Entity",
        from = "Column::BerthNumber",
        to = "super::berth::Column::Number"
    )]
    Berth,
}

impl Related<super::berth::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Berth.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
