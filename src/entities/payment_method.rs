use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A way of paying for purchase orders. Protected against deletion while any
/// purchase allocation references it.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payment_methods")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::purchase_payment_method::Entity")]
    PurchasePaymentMethods,
}

impl Related<super::purchase_payment_method::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PurchasePaymentMethods.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
