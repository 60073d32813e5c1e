use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Domain events published by the services after successful writes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // User events
    UserCreated(Uuid),
    UserDeleted(Uuid),

    // Catalog events
    CategoryCreated(Uuid),
    CategoryDeleted(Uuid),
    ProductCreated { barcode: String, slug: String },
    ProductUpdated(String),
    ProductDeleted(String),

    // Payment method events
    PaymentMethodCreated(Uuid),
    PaymentMethodDeleted(Uuid),

    // Purchase order events
    PurchaseOrderCreated(Uuid),
    PurchaseOrderFinalized(Uuid),
    PurchaseOrderDeleted(Uuid),
    PurchaseItemAdded {
        purchase_order_id: Uuid,
        item_id: Uuid,
    },
    PaymentAllocated {
        purchase_order_id: Uuid,
        payment_method_id: Uuid,
    },

    // Generic event for custom messages
    Generic {
        message: String,
        timestamp: DateTime<Utc>,
        metadata: serde_json::Value,
    },
}

impl Event {
    /// Create a generic event with string data
    pub fn with_data(data: String) -> Self {
        Event::Generic {
            message: data,
            timestamp: Utc::now(),
            metadata: serde_json::Value::Null,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }

    /// Sends an event, logging instead of failing when nobody is listening.
    pub async fn send_or_log(&self, event: Event) {
        if let Err(e) = self.send(event).await {
            error!("Event delivery failed: {}", e);
        }
    }
}

/// Trait for components that want to process events asynchronously.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle_event(&self, event: Event) -> Result<(), String>;
}

/// Process incoming events. Today this logs them; side-effectful handlers
/// hang off the match arms as they appear.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        match &event {
            Event::ProductCreated { barcode, slug } => {
                info!("Product created: {} (slug {})", barcode, slug);
            }
            Event::PurchaseOrderCreated(order_id) => {
                info!("Purchase order created: {}", order_id);
            }
            Event::PurchaseOrderFinalized(order_id) => {
                info!("Purchase order finalized: {}", order_id);
            }
            Event::PaymentAllocated {
                purchase_order_id,
                payment_method_id,
            } => {
                info!(
                    "Payment allocated on order {}: method {}",
                    purchase_order_id, payment_method_id
                );
            }
            _ => {
                info!("No specific handler for event: {:?}", event);
            }
        }
    }

    warn!("Event processing loop has ended");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_delivers_to_receiver() {
        let (tx, mut rx) = mpsc::channel(8);
        let sender = EventSender::new(tx);

        sender
            .send(Event::PurchaseOrderCreated(Uuid::new_v4()))
            .await
            .expect("send should succeed");

        match rx.recv().await {
            Some(Event::PurchaseOrderCreated(_)) => {}
            other => panic!("Unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn send_or_log_swallows_closed_channel() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let sender = EventSender::new(tx);

        // Must not panic or return an error to the caller.
        sender.send_or_log(Event::with_data("orphan".to_string())).await;
    }
}
