//! `SeaORM` Entity for the expenses table.
//!
//! Service expenses reference a contracted service, maintenance expenses
//! must not; enforced by a CHECK constraint as well as in code.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{ExpenseKind, ExpenseState};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub kind: ExpenseKind,
    pub concept: String,
    pub description: Option<String>,
    pub amount: Decimal,
    pub expense_date: Date,
    pub state: ExpenseState,
    pub service_id: Option<Uuid>,
    pub property_id: Option<Uuid>,
    pub building_id: Uuid,
    pub actor_user_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::expense_annulments::Entity")]
    ExpenseAnnulments,
}

impl Related<super::expense_annulments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExpenseAnnulments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
