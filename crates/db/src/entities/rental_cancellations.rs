//! `SeaORM` Entity for the rental_cancellations table.
//!
//! Created exactly once per cancellation; terminal for the rental.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rental_cancellations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub rental_id: Uuid,
    pub motive: String,
    pub returned_amount: Decimal,
    pub penalty_amount: Decimal,
    pub return_motive: Option<String>,
    pub penalty_motive: Option<String>,
    pub cancelled_at: DateTimeWithTimeZone,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::rentals::Entity",
        from = "Column::RentalId",
        to = "super::rentals::Column::Id"
    )]
    Rentals,
}

impl Related<super::rentals::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rentals.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
