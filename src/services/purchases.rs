use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::entities::{
    purchase_item, purchase_order, purchase_payment_method, PaymentMethod, Product, PurchaseItem,
    PurchaseItemModel, PurchaseOrder, PurchaseOrderModel, PurchasePaymentMethod,
    PurchasePaymentMethodModel, User,
};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::validation;

/// Service for the purchase-order lifecycle: carts, line items, payment
/// allocations and finalization.
#[derive(Clone)]
pub struct PurchaseOrderService {
    db: Arc<DatabaseConnection>,
    event_sender: Arc<EventSender>,
}

impl PurchaseOrderService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    /// Create a new purchase order (an open cart unless stated otherwise)
    #[instrument(skip(self))]
    pub async fn create_order(
        &self,
        input: CreateOrderInput,
    ) -> Result<PurchaseOrderModel, ServiceError> {
        if User::find_by_id(input.user_id)
            .one(&*self.db)
            .await?
            .is_none()
        {
            return Err(ServiceError::Validation(format!(
                "user: {} does not exist",
                input.user_id
            )));
        }

        let order_id = Uuid::new_v4();
        let order = purchase_order::ActiveModel {
            id: Set(order_id),
            timestamp: Set(input.timestamp.unwrap_or_else(Utc::now)),
            user_id: Set(input.user_id),
            cart: Set(input.cart),
        };

        let order = order.insert(&*self.db).await?;

        self.event_sender
            .send_or_log(Event::PurchaseOrderCreated(order_id))
            .await;

        info!("Created purchase order: {}", order_id);
        Ok(order)
    }

    /// Get a purchase order by ID
    #[instrument(skip(self))]
    pub async fn get_order(&self, order_id: Uuid) -> Result<PurchaseOrderModel, ServiceError> {
        PurchaseOrder::find_by_id(order_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Purchase order {} not found", order_id)))
    }

    /// Get a purchase order with its line items and payment allocations
    #[instrument(skip(self))]
    pub async fn get_order_with_details(
        &self,
        order_id: Uuid,
    ) -> Result<OrderWithDetails, ServiceError> {
        let order = self.get_order(order_id).await?;
        let items = self.list_items(order_id).await?;
        let payments = PurchasePaymentMethod::find()
            .filter(purchase_payment_method::Column::PurchaseOrderId.eq(order_id))
            .all(&*self.db)
            .await?;

        Ok(OrderWithDetails {
            order,
            items,
            payments,
        })
    }

    /// List the purchase orders of one user, newest first
    #[instrument(skip(self))]
    pub async fn list_orders_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<PurchaseOrderModel>, ServiceError> {
        PurchaseOrder::find()
            .filter(purchase_order::Column::UserId.eq(user_id))
            .order_by_desc(purchase_order::Column::Timestamp)
            .all(&*self.db)
            .await
            .map_err(Into::into)
    }

    /// List the line items of a purchase order
    #[instrument(skip(self))]
    pub async fn list_items(&self, order_id: Uuid) -> Result<Vec<PurchaseItemModel>, ServiceError> {
        PurchaseItem::find()
            .filter(purchase_item::Column::PurchaseOrderId.eq(order_id))
            .order_by_asc(purchase_item::Column::CreatedAt)
            .all(&*self.db)
            .await
            .map_err(Into::into)
    }

    /// Add a line item to an open cart.
    ///
    /// The product's shared fields are copied onto the item so the order
    /// keeps its historical shape when the catalog entry later changes or
    /// disappears. `total_price` is computed from the live price here and
    /// must itself fit the 8/3 decimal shape.
    #[instrument(skip(self))]
    pub async fn add_item(
        &self,
        order_id: Uuid,
        input: AddItemInput,
    ) -> Result<PurchaseItemModel, ServiceError> {
        input.validate()?;

        let txn = self.db.begin().await?;

        let order = PurchaseOrder::find_by_id(order_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Purchase order {} not found", order_id))
            })?;

        if !order.cart {
            return Err(ServiceError::InvalidOperation(format!(
                "Purchase order {} is finalized and cannot be modified",
                order_id
            )));
        }

        let product = Product::find_by_id(input.barcode.clone())
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", input.barcode)))?;

        let base = product.base();
        let total_price = base.price * input.quantity;
        if !validation::decimal_fits(&total_price) {
            return Err(ServiceError::Validation(format!(
                "total_price: {} exceeds 8 digits with 3 decimal places",
                total_price
            )));
        }

        let item_id = Uuid::new_v4();
        let item = purchase_item::ActiveModel {
            id: Set(item_id),
            purchase_order_id: Set(order_id),
            barcode: Set(base.barcode),
            title: Set(base.title),
            description: Set(base.description),
            image: Set(base.image),
            price: Set(base.price),
            category_id: Set(base.category_id),
            quantity: Set(input.quantity),
            total_price: Set(total_price),
            created_at: Set(Utc::now()),
        };

        let item = item.insert(&txn).await?;

        txn.commit().await?;

        self.event_sender
            .send_or_log(Event::PurchaseItemAdded {
                purchase_order_id: order_id,
                item_id,
            })
            .await;

        info!(
            "Added item to purchase order {}: {} x{}",
            order_id, item.barcode, item.quantity
        );
        Ok(item)
    }

    /// Allocate an amount of the order's total to one payment method
    #[instrument(skip(self))]
    pub async fn allocate_payment(
        &self,
        order_id: Uuid,
        input: AllocatePaymentInput,
    ) -> Result<PurchasePaymentMethodModel, ServiceError> {
        input.validate()?;

        // Both ends must exist before the allocation row is written.
        self.get_order(order_id).await?;
        if PaymentMethod::find_by_id(input.payment_method_id)
            .one(&*self.db)
            .await?
            .is_none()
        {
            return Err(ServiceError::NotFound(format!(
                "Payment method {} not found",
                input.payment_method_id
            )));
        }

        let allocation_id = Uuid::new_v4();
        let allocation = purchase_payment_method::ActiveModel {
            id: Set(allocation_id),
            purchase_order_id: Set(order_id),
            payment_method_id: Set(input.payment_method_id),
            value: Set(input.value),
            created_at: Set(Utc::now()),
        };

        let allocation = allocation.insert(&*self.db).await?;

        self.event_sender
            .send_or_log(Event::PaymentAllocated {
                purchase_order_id: order_id,
                payment_method_id: input.payment_method_id,
            })
            .await;

        info!(
            "Allocated {} on purchase order {} via method {}",
            allocation.value, order_id, input.payment_method_id
        );
        Ok(allocation)
    }

    /// Turn an open cart into a finalized order
    #[instrument(skip(self))]
    pub async fn finalize_cart(&self, order_id: Uuid) -> Result<PurchaseOrderModel, ServiceError> {
        let order = self.get_order(order_id).await?;

        if !order.cart {
            return Err(ServiceError::InvalidOperation(format!(
                "Purchase order {} is already finalized",
                order_id
            )));
        }

        let mut active: purchase_order::ActiveModel = order.into();
        active.cart = Set(false);
        let order = active.update(&*self.db).await?;

        self.event_sender
            .send_or_log(Event::PurchaseOrderFinalized(order_id))
            .await;

        info!("Finalized purchase order: {}", order_id);
        Ok(order)
    }

    /// Delete a purchase order. Line items and payment allocations cascade
    /// away with it.
    #[instrument(skip(self))]
    pub async fn delete_order(&self, order_id: Uuid) -> Result<(), ServiceError> {
        let order = self.get_order(order_id).await?;

        let active: purchase_order::ActiveModel = order.into();
        active.delete(&*self.db).await?;

        self.event_sender
            .send_or_log(Event::PurchaseOrderDeleted(order_id))
            .await;

        info!("Deleted purchase order: {}", order_id);
        Ok(())
    }
}

/// Input for creating a purchase order
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateOrderInput {
    pub user_id: Uuid,
    /// true for an in-progress cart, false for an already finalized order
    pub cart: bool,
    /// Order timestamp; defaults to now
    pub timestamp: Option<DateTime<Utc>>,
}

/// Input for adding a line item
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct AddItemInput {
    #[validate(length(min = 1, max = 20, message = "must be 1-20 characters"))]
    pub barcode: String,
    #[validate(custom = "crate::validation::validate_quantity")]
    pub quantity: Decimal,
}

/// Input for allocating a payment
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct AllocatePaymentInput {
    pub payment_method_id: Uuid,
    #[validate(custom = "crate::validation::validate_money")]
    pub value: Decimal,
}

/// A purchase order with its owned records
#[derive(Debug, Serialize)]
pub struct OrderWithDetails {
    pub order: PurchaseOrderModel,
    pub items: Vec<PurchaseItemModel>,
    pub payments: Vec<PurchasePaymentMethodModel>,
}
