//! `SeaORM` Entity for the rentals table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::RentalState;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rentals")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub property_id: Uuid,
    pub monthly_amount: Decimal,
    pub payment_day: i16,
    pub state: RentalState,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::deposits::Entity")]
    Deposits,
    #[sea_orm(has_many = "super::monthly_installments::Entity")]
    MonthlyInstallments,
    #[sea_orm(has_one = "super::rental_cancellations::Entity")]
    RentalCancellations,
}

impl Related<super::deposits::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Deposits.def()
    }
}

impl Related<super::monthly_installments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MonthlyInstallments.def()
    }
}

impl Related<super::rental_cancellations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RentalCancellations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
