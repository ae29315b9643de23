#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{header, Method, Request},
    response::Response,
    Router,
};
use serde_json::Value;
use tokio::sync::mpsc;
use tower::ServiceExt;

use storefront_api::{
    config::{AppConfig, RazorpayConfig},
    events::EventSender,
    handlers::{self, AppServices},
    payments::{HmacSignatureVerifier, RazorpayGateway},
    repositories::InMemoryOrderRepository,
    AppState,
};

pub const TEST_KEY_ID: &str = "rzp_test_key_id";
pub const TEST_KEY_SECRET: &str = "rzp_test_secret_key";

/// In-process app wired with an in-memory order store and a gateway pointed
/// at `gateway_url` (a wiremock server, or an unreachable port for tests that
/// never hit the gateway).
pub struct TestApp {
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        // Nothing listens here; tests that use this constructor never reach
        // the gateway.
        Self::with_gateway("http://127.0.0.1:9")
    }

    pub fn with_gateway(gateway_url: &str) -> Self {
        Self::with_gateway_timeout(gateway_url, 10)
    }

    pub fn with_gateway_timeout(gateway_url: &str, timeout_secs: u64) -> Self {
        let config = AppConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            environment: "test".to_string(),
            log_level: "debug".to_string(),
            log_json: false,
            razorpay: RazorpayConfig {
                key_id: TEST_KEY_ID.to_string(),
                key_secret: TEST_KEY_SECRET.to_string(),
                api_url: gateway_url.to_string(),
                timeout_secs,
                currency: "INR".to_string(),
            },
            cors_allowed_origins: None,
            cors_allow_any_origin: false,
        };

        let (event_tx, event_rx) = mpsc::channel(1024);
        let event_sender = EventSender::new(event_tx);
        tokio::spawn(storefront_api::events::process_events(event_rx));

        let gateway =
            Arc::new(RazorpayGateway::new(&config.razorpay).expect("gateway client should build"));
        let verifier = Arc::new(HmacSignatureVerifier::new(
            config.razorpay.key_secret.clone(),
        ));
        let repository = Arc::new(InMemoryOrderRepository::new());

        let services = AppServices::new(
            gateway,
            verifier,
            repository,
            config.razorpay.currency.clone(),
            event_sender.clone(),
        );

        let state = AppState {
            config,
            event_sender,
            services,
        };

        let router = Router::new()
            .merge(handlers::health::health_routes())
            .nest("/api/v1", storefront_api::api_v1_routes())
            .with_state(state);

        Self { router }
    }

    pub async fn request(&self, method: Method, path: &str, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(path);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        self.router
            .clone()
            .oneshot(builder.body(body).expect("request should build"))
            .await
            .expect("router should respond")
    }
}

pub async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}

pub async fn response_text(response: Response) -> String {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    String::from_utf8(bytes.to_vec()).expect("utf8 response")
}

/// Computes the signature the gateway would attach to a payment callback.
pub fn sign_payment(order_id: &str, payment_id: &str, key_secret: &str) -> String {
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    let mut mac = Hmac::<Sha256>::new_from_slice(key_secret.as_bytes())
        .expect("hmac accepts any key length");
    mac.update(format!("{}|{}", order_id, payment_id).as_bytes());
    hex::encode(mac.finalize().into_bytes())
}
