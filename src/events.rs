use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{error, info};
use uuid::Uuid;

/// Events emitted by the order and payment services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Order lifecycle events
    OrderCreated(Uuid),
    OrderPaid(Uuid),
    OrderDelivered(Uuid),
    OrderDeleted(Uuid),

    // Payment gateway events
    PaymentOrderCreated {
        gateway_order_id: String,
        receipt: String,
    },
    PaymentVerified {
        gateway_order_id: String,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously. Failures are reported to the caller;
    /// services treat them as non-fatal.
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Consumes events from the channel and logs them. Runs for the lifetime of
/// the process as a background task.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    while let Some(event) = receiver.recv().await {
        match &event {
            Event::OrderCreated(id) => info!(order_id = %id, "order created"),
            Event::OrderPaid(id) => info!(order_id = %id, "order paid"),
            Event::OrderDelivered(id) => info!(order_id = %id, "order delivered"),
            Event::OrderDeleted(id) => info!(order_id = %id, "order deleted"),
            Event::PaymentOrderCreated {
                gateway_order_id,
                receipt,
            } => info!(%gateway_order_id, %receipt, "payment order created"),
            Event::PaymentVerified { gateway_order_id } => {
                info!(%gateway_order_id, "payment verified")
            }
        }
    }
    error!("event channel closed; event processor exiting");
}
