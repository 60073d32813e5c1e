use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::entities::{
    payment_method, purchase_payment_method, PaymentMethod, PaymentMethodModel,
    PurchasePaymentMethod,
};
use crate::errors::{self, ServiceError};
use crate::events::{Event, EventSender};

/// Service for the payment-method reference data.
#[derive(Clone)]
pub struct PaymentMethodService {
    db: Arc<DatabaseConnection>,
    event_sender: Arc<EventSender>,
}

impl PaymentMethodService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    /// Create a new payment method
    #[instrument(skip(self))]
    pub async fn create_payment_method(
        &self,
        input: CreatePaymentMethodInput,
    ) -> Result<PaymentMethodModel, ServiceError> {
        input.validate()?;

        self.ensure_unique_description(&input.description).await?;

        let method_id = Uuid::new_v4();
        let method = payment_method::ActiveModel {
            id: Set(method_id),
            description: Set(input.description.clone()),
            created_at: Set(Utc::now()),
        };

        let method = match method.insert(&*self.db).await {
            Ok(method) => method,
            // The pre-check above is only a fast path; the unique index wins races.
            Err(err) if errors::is_unique_violation(&err, "description") => {
                return Err(ServiceError::Conflict(format!(
                    "Payment method {} already exists",
                    input.description
                )));
            }
            Err(err) => return Err(err.into()),
        };

        self.event_sender
            .send_or_log(Event::PaymentMethodCreated(method_id))
            .await;

        info!("Created payment method: {}", method_id);
        Ok(method)
    }

    /// Get a payment method by ID
    #[instrument(skip(self))]
    pub async fn get_payment_method(
        &self,
        method_id: Uuid,
    ) -> Result<PaymentMethodModel, ServiceError> {
        PaymentMethod::find_by_id(method_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Payment method {} not found", method_id))
            })
    }

    /// List all payment methods
    #[instrument(skip(self))]
    pub async fn list_payment_methods(&self) -> Result<Vec<PaymentMethodModel>, ServiceError> {
        PaymentMethod::find()
            .order_by_asc(payment_method::Column::Description)
            .all(&*self.db)
            .await
            .map_err(Into::into)
    }

    /// Delete a payment method. Protected: fails while any purchase
    /// allocation still references it, leaving every record intact.
    #[instrument(skip(self))]
    pub async fn delete_payment_method(&self, method_id: Uuid) -> Result<(), ServiceError> {
        let method = self.get_payment_method(method_id).await?;

        let references = PurchasePaymentMethod::find()
            .filter(purchase_payment_method::Column::PaymentMethodId.eq(method_id))
            .count(&*self.db)
            .await?;

        if references > 0 {
            return Err(ServiceError::ReferentialIntegrity(format!(
                "Payment method {} is referenced by {} purchase allocation(s)",
                method_id, references
            )));
        }

        let active: payment_method::ActiveModel = method.into();
        match active.delete(&*self.db).await {
            Ok(_) => {}
            // Restrict on the foreign key is authoritative under races.
            Err(err) if errors::is_foreign_key_violation(&err) => {
                return Err(ServiceError::ReferentialIntegrity(format!(
                    "Payment method {} is still referenced by purchase allocations",
                    method_id
                )));
            }
            Err(err) => return Err(err.into()),
        }

        self.event_sender
            .send_or_log(Event::PaymentMethodDeleted(method_id))
            .await;

        info!("Deleted payment method: {}", method_id);
        Ok(())
    }

    async fn ensure_unique_description(&self, description: &str) -> Result<(), ServiceError> {
        let existing = PaymentMethod::find()
            .filter(payment_method::Column::Description.eq(description))
            .one(&*self.db)
            .await?;

        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Payment method {} already exists",
                description
            )));
        }

        Ok(())
    }
}

/// Input for creating a payment method
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CreatePaymentMethodInput {
    #[validate(length(min = 1, max = 50, message = "must be 1-50 characters"))]
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_bounds() {
        assert!(CreatePaymentMethodInput {
            description: String::new(),
        }
        .validate()
        .is_err());

        assert!(CreatePaymentMethodInput {
            description: "x".repeat(51),
        }
        .validate()
        .is_err());

        assert!(CreatePaymentMethodInput {
            description: "Credit card".to_string(),
        }
        .validate()
        .is_ok());
    }
}
