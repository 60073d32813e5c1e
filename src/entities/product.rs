use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, ConnectionTrait};
use serde::{Deserialize, Serialize};

use super::product_base::ProductBase;

/// Catalog product. The barcode is the natural key; the slug is assigned
/// exactly once by the catalog service before the first insert and is unique
/// across all products.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub barcode: String,
    #[sea_orm(unique)]
    pub slug: String,
    #[sea_orm(column_type = "Text")]
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub image: String,
    pub price: Decimal,
    pub category_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Model {
    /// Snapshot of the fields shared with purchase line items.
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
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_delete = "Cascade"
    )]
    Category,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(self, _db: &C, _insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        // The slug is assigned by the catalog service before the first
        // insert; an empty slug reaching the database is a programming error.
        if let ActiveValue::Set(slug) = &self.slug {
            if slug.trim().is_empty() {
                return Err(DbErr::Custom(
                    "product slug must be generated before save".to_string(),
                ));
            }
        }

        Ok(self)
    }
}
