//! `SeaORM` Entity for the payments table.
//!
//! A payment targets exactly one of `deposit_id` / `installment_id`,
//! enforced by a CHECK constraint in the schema.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::PaymentState;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub amount: Decimal,
    pub payment_date: Date,
    pub state: PaymentState,
    pub method: Option<String>,
    pub account: Option<String>,
    pub bank: Option<String>,
    pub reference: Option<String>,
    pub description: Option<String>,
    pub deposit_id: Option<Uuid>,
    pub installment_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::deposits::Entity",
        from = "Column::DepositId",
        to = "super::deposits::Column::Id"
    )]
    Deposits,
    #[sea_orm(
        belongs_to = "super::monthly_installments::Entity",
        from = "Column::InstallmentId",
        to = "super::monthly_installments::Column::Id"
    )]
    MonthlyInstallments,
    #[sea_orm(has_one = "super::payment_annulments::Entity")]
    PaymentAnnulments,
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

impl Related<super::payment_annulments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaymentAnnulments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
