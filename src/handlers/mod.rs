pub mod health;
pub mod orders;
pub mod payments;

use std::sync::Arc;

use crate::events::EventSender;
use crate::payments::{PaymentGateway, VerifySignature};
use crate::repositories::OrderRepository;
use crate::services;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub payments: Arc<services::payments::PaymentService>,
    pub orders: Arc<services::orders::OrderService>,
}

impl AppServices {
    pub fn new(
        gateway: Arc<dyn PaymentGateway>,
        verifier: Arc<dyn VerifySignature>,
        repository: Arc<dyn OrderRepository>,
        default_currency: impl Into<String>,
        event_sender: EventSender,
    ) -> Self {
        let payments = Arc::new(services::payments::PaymentService::new(
            gateway,
            verifier,
            default_currency,
            event_sender.clone(),
        ));
        let orders = Arc::new(services::orders::OrderService::new(
            repository,
            event_sender,
        ));

        Self { payments, orders }
    }
}
