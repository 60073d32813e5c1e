use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::product_base::ProductBase;

/// Line item of a purchase order: a denormalized snapshot of the product
/// fields at purchase time, decoupled from the live catalog entry. Keyed by a
/// surrogate id — the same barcode recurs across orders — and has no slug,
/// since line items are never routed to by URL.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "purchase_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub purchase_order_id: Uuid,
    pub barcode: String,
    #[sea_orm(column_type = "Text")]
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub image: String,
    pub price: Decimal,
    pub category_id: Uuid,
    pub quantity: Decimal,
    pub total_price: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Model {
    /// The shared product fields this line item snapshotted.
    pub fn base(&self) -> ProductBase {
        ProductBase {
            barcode: self.barcode.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            image: self.image.clone(),
            price: self.price,
            category_id: self.category_id,
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::purchase_order::Entity",
        from = "Column::PurchaseOrderId",
        to = "super::purchase_order::Column::Id",
        on_delete = "Cascade"
    )]
    PurchaseOrder,
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_delete = "Cascade"
    )]
    Category,
}

impl Related<super::purchase_order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PurchaseOrder.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
