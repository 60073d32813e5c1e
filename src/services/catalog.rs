use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::entities::{category, product, Category, CategoryModel, Product, ProductBase, ProductModel};
use crate::errors::{self, ServiceError};
use crate::events::{Event, EventSender};
use crate::slug;

const DEFAULT_LIMIT: u64 = 20;
const MAX_LIMIT: u64 = 100;

/// Write attempts before a slug collision is treated as fatal.
const MAX_SLUG_ATTEMPTS: u32 = 5;

/// Catalog service for managing categories and products.
#[derive(Clone)]
pub struct CatalogService {
    db: Arc<DatabaseConnection>,
    event_sender: Arc<EventSender>,
}

impl CatalogService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    /// Create a new category
    #[instrument(skip(self))]
    pub async fn create_category(
        &self,
        input: CreateCategoryInput,
    ) -> Result<CategoryModel, ServiceError> {
        input.validate()?;

        let category_id = Uuid::new_v4();
        let category = category::ActiveModel {
            id: Set(category_id),
            description: Set(input.description.clone()),
            created_at: Set(Utc::now()),
        };

        let category = category.insert(&*self.db).await?;

        self.event_sender
            .send_or_log(Event::CategoryCreated(category_id))
            .await;

        info!("Created category: {}", category_id);
        Ok(category)
    }

    /// Get a category by ID
    #[instrument(skip(self))]
    pub async fn get_category(&self, category_id: Uuid) -> Result<CategoryModel, ServiceError> {
        Category::find_by_id(category_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Category {} not found", category_id)))
    }

    /// List all categories
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<CategoryModel>, ServiceError> {
        Category::find()
            .order_by_asc(category::Column::Description)
            .all(&*self.db)
            .await
            .map_err(Into::into)
    }

    /// Delete a category. Dependent products and line items cascade away with
    /// it; this never fails on references.
    #[instrument(skip(self))]
    pub async fn delete_category(&self, category_id: Uuid) -> Result<(), ServiceError> {
        let category = self.get_category(category_id).await?;

        let active: category::ActiveModel = category.into();
        active.delete(&*self.db).await?;

        self.event_sender
            .send_or_log(Event::CategoryDeleted(category_id))
            .await;

        info!("Deleted category: {}", category_id);
        Ok(())
    }

    /// Create a new product.
    ///
    /// Callers never supply a slug: it is derived from the title here, before
    /// the insert. The unique index on `products.slug` is authoritative —
    /// when a concurrent creation wins the same slug, the insert is retried
    /// with a freshly disambiguated one, bounded by [`MAX_SLUG_ATTEMPTS`].
    #[instrument(skip(self))]
    pub async fn create_product(&self, input: ProductBase) -> Result<ProductModel, ServiceError> {
        input.validate()?;

        if Product::find_by_id(input.barcode.clone())
            .one(&*self.db)
            .await?
            .is_some()
        {
            return Err(ServiceError::Conflict(format!(
                "Product with barcode {} already exists",
                input.barcode
            )));
        }

        // Surface a missing category as a named validation failure instead of
        // a bare foreign-key error from the insert.
        if Category::find_by_id(input.category_id)
            .one(&*self.db)
            .await?
            .is_none()
        {
            return Err(ServiceError::Validation(format!(
                "category: {} does not exist",
                input.category_id
            )));
        }

        let now = Utc::now();
        let mut candidate = self.ensure_slug(None, &input.title).await?;

        for attempt in 1..=MAX_SLUG_ATTEMPTS {
            let product = product::ActiveModel {
                barcode: Set(input.barcode.clone()),
                slug: Set(candidate.clone()),
                title: Set(input.title.clone()),
                description: Set(input.description.clone()),
                image: Set(input.image.clone()),
                price: Set(input.price),
                category_id: Set(input.category_id),
                created_at: Set(now),
                updated_at: Set(Some(now)),
            };

            match product.insert(&*self.db).await {
                Ok(product) => {
                    self.event_sender
                        .send_or_log(Event::ProductCreated {
                            barcode: product.barcode.clone(),
                            slug: product.slug.clone(),
                        })
                        .await;

                    info!("Created product {} with slug {}", product.barcode, product.slug);
                    return Ok(product);
                }
                Err(err) if errors::is_unique_violation(&err, "slug") => {
                    // Lost a race for this slug; pick a new token and retry.
                    warn!(
                        "Slug {} already taken (attempt {}/{}), regenerating",
                        candidate, attempt, MAX_SLUG_ATTEMPTS
                    );
                    candidate = slug::disambiguate(&slug::slugify(&input.title));
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(ServiceError::Persistence(format!(
            "could not allocate a unique slug for product {} after {} attempts",
            input.barcode, MAX_SLUG_ATTEMPTS
        )))
    }

    /// Pre-write slug hook: an existing slug is never overwritten; a missing
    /// one is derived from the title. This is the only place slugs are
    /// assigned.
    pub async fn ensure_slug(
        &self,
        existing: Option<&str>,
        title: &str,
    ) -> Result<String, ServiceError> {
        match existing {
            Some(current) if !current.trim().is_empty() => Ok(current.to_string()),
            _ => Ok(slug::unique_slug(&*self.db, title).await?),
        }
    }

    /// Get a product by barcode
    #[instrument(skip(self))]
    pub async fn get_product(&self, barcode: &str) -> Result<ProductModel, ServiceError> {
        Product::find_by_id(barcode.to_string())
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", barcode)))
    }

    /// Resolve a product from the URL path segment the routing layer hands us.
    #[instrument(skip(self))]
    pub async fn get_product_by_slug(&self, slug: &str) -> Result<ProductModel, ServiceError> {
        Product::find()
            .filter(product::Column::Slug.eq(slug))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product with slug {} not found", slug)))
    }

    /// Search products
    #[instrument(skip(self))]
    pub async fn search_products(
        &self,
        query: ProductSearchQuery,
    ) -> Result<ProductSearchResult, ServiceError> {
        let mut db_query = Product::find();

        if let Some(search) = &query.search {
            let pattern = format!("%{}%", search);
            db_query = db_query.filter(
                product::Column::Title
                    .like(&pattern)
                    .or(product::Column::Barcode.like(&pattern)),
            );
        }

        if let Some(category_id) = query.category_id {
            db_query = db_query.filter(product::Column::CategoryId.eq(category_id));
        }

        let total = db_query.clone().count(&*self.db).await?;

        let limit = query.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
        let offset = query.offset.unwrap_or(0);

        let products = db_query
            .order_by_desc(product::Column::CreatedAt)
            .limit(limit)
            .offset(offset)
            .all(&*self.db)
            .await?;

        Ok(ProductSearchResult { products, total })
    }

    /// Update an existing product. The slug is immutable: it was generated at
    /// creation and stays stable for URLs even when the title changes.
    #[instrument(skip(self))]
    pub async fn update_product(
        &self,
        barcode: &str,
        input: UpdateProductInput,
    ) -> Result<ProductModel, ServiceError> {
        input.validate()?;

        if let Some(category_id) = input.category_id {
            if Category::find_by_id(category_id)
                .one(&*self.db)
                .await?
                .is_none()
            {
                return Err(ServiceError::Validation(format!(
                    "category: {} does not exist",
                    category_id
                )));
            }
        }

        let product = self.get_product(barcode).await?;
        let mut active: product::ActiveModel = product.into();

        if let Some(title) = input.title {
            active.title = Set(title);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(image) = input.image {
            active.image = Set(image);
        }
        if let Some(price) = input.price {
            active.price = Set(price);
        }
        if let Some(category_id) = input.category_id {
            active.category_id = Set(category_id);
        }

        active.updated_at = Set(Some(Utc::now()));

        let product = active.update(&*self.db).await?;

        self.event_sender
            .send_or_log(Event::ProductUpdated(product.barcode.clone()))
            .await;

        info!("Updated product: {}", barcode);
        Ok(product)
    }

    /// Delete a product by barcode
    #[instrument(skip(self))]
    pub async fn delete_product(&self, barcode: &str) -> Result<(), ServiceError> {
        let product = self.get_product(barcode).await?;

        let active: product::ActiveModel = product.into();
        active.delete(&*self.db).await?;

        self.event_sender
            .send_or_log(Event::ProductDeleted(barcode.to_string()))
            .await;

        info!("Deleted product: {}", barcode);
        Ok(())
    }
}

/// Input for creating a category
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CreateCategoryInput {
    #[validate(length(min = 1, max = 50, message = "must be 1-50 characters"))]
    pub description: String,
}

/// Input for updating a product; `None` fields are left untouched
#[derive(Debug, Default, Deserialize, Serialize, Validate)]
pub struct UpdateProductInput {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 1024, message = "must be 1-1024 characters"))]
    pub image: Option<String>,
    #[validate(custom = "crate::validation::validate_money")]
    pub price: Option<Decimal>,
    pub category_id: Option<Uuid>,
}

/// Product search query
#[derive(Debug, Clone, Deserialize)]
pub struct ProductSearchQuery {
    pub search: Option<String>,
    pub category_id: Option<Uuid>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// Product search result
#[derive(Debug, Serialize)]
pub struct ProductSearchResult {
    pub products: Vec<ProductModel>,
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation;
    use rust_decimal_macros::dec;

    #[test]
    fn category_description_bounds() {
        let too_long = CreateCategoryInput {
            description: "x".repeat(51),
        };
        assert!(too_long.validate().is_err());

        let ok = CreateCategoryInput {
            description: "Groceries".to_string(),
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn update_input_partial() {
        let input = UpdateProductInput {
            price: Some(dec!(19.99)),
            ..Default::default()
        };
        assert!(input.validate().is_ok());
        assert!(input.title.is_none());
    }

    #[test]
    fn update_input_rejects_oversized_price() {
        let input = UpdateProductInput {
            price: Some(dec!(1234567.89)),
            ..Default::default()
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn search_limit_capping() {
        let requested: u64 = 200;
        assert_eq!(requested.min(MAX_LIMIT), 100);
        assert_eq!(DEFAULT_LIMIT, 20);
    }

    #[test]
    fn validation_consts_match_schema() {
        assert_eq!(validation::MAX_DIGITS, 8);
        assert_eq!(validation::MAX_DECIMAL_PLACES, 3);
    }
}
