use async_trait::async_trait;
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::ToSchema;

use crate::config::RazorpayConfig;

/// Number of random bytes in a receipt token (80 bits of entropy, 20 hex
/// characters once encoded).
const RECEIPT_BYTES: usize = 10;

/// Failures talking to the payment gateway. Detail is for server logs only;
/// callers see a generic error.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("gateway transport error: {0}")]
    Transport(String),

    #[error("gateway rejected request with status {status}: {detail}")]
    Api { status: u16, detail: String },

    #[error("gateway response could not be decoded: {0}")]
    Decode(String),
}

/// Order creation request sent to the gateway. Amount is in minor units
/// (paise for INR).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GatewayOrderRequest {
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
}

/// Gateway-side order record, passed through to callers verbatim: known
/// fields are typed, everything else the gateway returns rides along in
/// `extra`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GatewayOrder {
    /// Gateway order identifier
    pub id: String,
    /// Amount in minor units
    pub amount: i64,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Payment gateway client interface.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_order(&self, request: &GatewayOrderRequest)
        -> Result<GatewayOrder, GatewayError>;
}

/// Generates a fresh receipt correlation token: 10 random bytes from the OS
/// CSPRNG, hex-encoded. Never reused across calls; no dedup is enforced.
pub fn generate_receipt() -> String {
    let mut bytes = [0u8; RECEIPT_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Razorpay HTTP client. Authenticates with HTTP basic auth using the key id
/// and key secret; all calls carry the configured timeout.
pub struct RazorpayGateway {
    client: reqwest::Client,
    api_url: String,
    key_id: String,
    key_secret: String,
}

impl RazorpayGateway {
    pub fn new(config: &RazorpayConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            key_id: config.key_id.clone(),
            key_secret: config.key_secret.clone(),
        })
    }
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    #[instrument(skip(self, request), fields(receipt = %request.receipt))]
    async fn create_order(
        &self,
        request: &GatewayOrderRequest,
    ) -> Result<GatewayOrder, GatewayError> {
        let url = format!("{}/v1/orders", self.api_url);

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(request)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(GatewayError::Api {
                status: status.as_u16(),
                detail,
            });
        }

        response
            .json::<GatewayOrder>()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))
    }
}
