pub mod catalog;
pub mod payment_methods;
pub mod purchases;
pub mod users;

// Re-export services for convenience
pub use catalog::{
    CatalogService, CreateCategoryInput, ProductSearchQuery, ProductSearchResult,
    UpdateProductInput,
};
pub use payment_methods::{CreatePaymentMethodInput, PaymentMethodService};
pub use purchases::{
    AddItemInput, AllocatePaymentInput, CreateOrderInput, OrderWithDetails, PurchaseOrderService,
};
pub use users::{CreateUserInput, UserService};

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::events::EventSender;

/// Bundle of all services sharing one connection pool and event channel.
#[derive(Clone)]
pub struct AppServices {
    pub catalog: Arc<CatalogService>,
    pub payment_methods: Arc<PaymentMethodService>,
    pub purchases: Arc<PurchaseOrderService>,
    pub users: Arc<UserService>,
}

impl AppServices {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Arc<EventSender>) -> Self {
        Self {
            catalog: Arc::new(CatalogService::new(db.clone(), event_sender.clone())),
            payment_methods: Arc::new(PaymentMethodService::new(
                db.clone(),
                event_sender.clone(),
            )),
            purchases: Arc::new(PurchaseOrderService::new(db.clone(), event_sender.clone())),
            users: Arc::new(UserService::new(db, event_sender)),
        }
    }
}
