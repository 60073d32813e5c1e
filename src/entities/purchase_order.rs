use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Header of an acquisition. `cart` distinguishes an in-progress cart from a
/// finalized order. Owns its line items and payment allocations.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "purchase_orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub user_id: Uuid,
    pub cart: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(has_many = "super::purchase_item::Entity")]
    PurchaseItems,
    #[sea_orm(has_many = "super::purchase_payment_method::Entity")]
    PurchasePaymentMethods,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::purchase_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PurchaseItems.def()
    }
}

impl Related<super::purchase_payment_method::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PurchasePaymentMethods.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
