use axum::{
    extract::{Json, State},
    http::StatusCode,
    routing::post,
    Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::ServiceError;
use crate::handlers::AppState;
use crate::payments::GatewayOrder;
use crate::services::payments::VerificationOutcome;

/// Request to initiate a payment order with the gateway.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePaymentOrderRequest {
    /// Amount in currency major units (e.g., rupees)
    #[schema(example = "628.82")]
    pub amount: Decimal,
    /// Currency code (ISO 4217); defaults to the configured currency
    #[schema(example = "INR")]
    pub currency: Option<String>,
}

/// The gateway's order record, returned verbatim.
#[derive(Debug, Serialize, ToSchema)]
pub struct CreatePaymentOrderResponse {
    pub data: GatewayOrder,
}

/// Payment callback fields supplied by the gateway's client-side checkout.
/// All fields are optional at the wire level so presence is validated
/// explicitly before any signature work.
#[derive(Debug, Deserialize, ToSchema)]
pub struct VerifyPaymentRequest {
    pub razorpay_order_id: Option<String>,
    pub razorpay_payment_id: Option<String>,
    pub razorpay_signature: Option<String>,
}

/// Create a payment order with the gateway
#[utoipa::path(
    post,
    path = "/api/v1/payments/orders",
    request_body = CreatePaymentOrderRequest,
    responses(
        (status = 200, description = "Gateway order created", body = CreatePaymentOrderResponse),
        (status = 400, description = "Invalid amount", body = crate::errors::ErrorResponse),
        (status = 500, description = "Gateway failure", body = crate::errors::ErrorResponse)
    ),
    tag = "Payments"
)]
pub async fn create_payment_order(
    State(state): State<AppState>,
    Json(request): Json<CreatePaymentOrderRequest>,
) -> Result<(StatusCode, Json<CreatePaymentOrderResponse>), ServiceError> {
    let order = state
        .payment_service()
        .create_payment_order(request.amount, request.currency)
        .await?;

    Ok((StatusCode::OK, Json(CreatePaymentOrderResponse { data: order })))
}

/// Verify a gateway payment callback signature
#[utoipa::path(
    post,
    path = "/api/v1/payments/verify",
    request_body = VerifyPaymentRequest,
    responses(
        (status = 200, description = "Signature verified", body = VerificationOutcome),
        (status = 400, description = "Invalid signature or missing fields", body = crate::errors::ErrorResponse),
        (status = 500, description = "Server error", body = crate::errors::ErrorResponse)
    ),
    tag = "Payments"
)]
pub async fn verify_payment(
    State(state): State<AppState>,
    Json(request): Json<VerifyPaymentRequest>,
) -> Result<Json<VerificationOutcome>, ServiceError> {
    let outcome = state
        .payment_service()
        .verify_payment(
            request.razorpay_order_id,
            request.razorpay_payment_id,
            request.razorpay_signature,
        )
        .await?;

    Ok(Json(outcome))
}

/// Payment routes
pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/orders", post(create_payment_order))
        .route("/verify", post(verify_payment))
}
