use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;

use crate::{
    errors::ServiceError,
    events::{Event, EventSender},
    payments::{
        generate_receipt, GatewayOrder, GatewayOrderRequest, PaymentGateway, SignatureError,
        VerifySignature,
    },
};

/// Outcome of a successful payment verification.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VerificationOutcome {
    pub success: bool,
    pub order_id: String,
}

/// Payment gateway operations: order initiation and callback signature
/// verification. The gateway client and verifier are injected so the service
/// never reads credentials from ambient state.
pub struct PaymentService {
    gateway: Arc<dyn PaymentGateway>,
    verifier: Arc<dyn VerifySignature>,
    default_currency: String,
    event_sender: EventSender,
}

impl PaymentService {
    pub fn new(
        gateway: Arc<dyn PaymentGateway>,
        verifier: Arc<dyn VerifySignature>,
        default_currency: impl Into<String>,
        event_sender: EventSender,
    ) -> Self {
        Self {
            gateway,
            verifier,
            default_currency: default_currency.into(),
            event_sender,
        }
    }

    /// Creates a gateway-side payment order for `amount` (currency major
    /// units) and returns the gateway's record verbatim.
    ///
    /// The amount is rounded half-away-from-zero to two decimal places
    /// before conversion to minor units, so `19.995` becomes `2000` paise.
    /// Sub-paise precision beyond that is rejected rather than silently
    /// dropped at the gateway.
    #[instrument(skip(self))]
    pub async fn create_payment_order(
        &self,
        amount: Decimal,
        currency: Option<String>,
    ) -> Result<GatewayOrder, ServiceError> {
        let minor_units = to_minor_units(amount)?;
        let receipt = generate_receipt();
        let currency = currency.unwrap_or_else(|| self.default_currency.clone());

        let request = GatewayOrderRequest {
            amount: minor_units,
            currency,
            receipt: receipt.clone(),
        };

        let order = self.gateway.create_order(&request).await.map_err(|e| {
            error!(error = %e, %receipt, "payment gateway order creation failed");
            ServiceError::GatewayError(e.to_string())
        })?;

        info!(gateway_order_id = %order.id, %receipt, "payment order created");

        if let Err(e) = self
            .event_sender
            .send(Event::PaymentOrderCreated {
                gateway_order_id: order.id.clone(),
                receipt,
            })
            .await
        {
            warn!(error = %e, "failed to emit payment order event");
        }

        Ok(order)
    }

    /// Verifies a gateway payment callback signature.
    ///
    /// All three fields must be present and non-empty before any hashing
    /// happens; a partial payload is never fed to the verifier.
    pub async fn verify_payment(
        &self,
        gateway_order_id: Option<String>,
        gateway_payment_id: Option<String>,
        signature: Option<String>,
    ) -> Result<VerificationOutcome, ServiceError> {
        let order_id = require_field(gateway_order_id, "razorpay_order_id")?;
        let payment_id = require_field(gateway_payment_id, "razorpay_payment_id")?;
        let signature = require_field(signature, "razorpay_signature")?;

        match self.verifier.verify(&order_id, &payment_id, &signature) {
            Ok(()) => {
                info!(gateway_order_id = %order_id, "payment signature verified");
                if let Err(e) = self
                    .event_sender
                    .send(Event::PaymentVerified {
                        gateway_order_id: order_id.clone(),
                    })
                    .await
                {
                    warn!(error = %e, "failed to emit payment verified event");
                }
                Ok(VerificationOutcome {
                    success: true,
                    order_id,
                })
            }
            Err(SignatureError::Mismatch) => {
                warn!(gateway_order_id = %order_id, "invalid signature");
                Err(ServiceError::InvalidSignature)
            }
            Err(SignatureError::Hash(detail)) => {
                error!(error = %detail, "signature computation failed");
                Err(ServiceError::InternalError(detail))
            }
        }
    }
}

fn require_field(value: Option<String>, name: &str) -> Result<String, ServiceError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ServiceError::ValidationError(format!(
            "{} is required",
            name
        ))),
    }
}

/// Converts a major-unit amount to gateway minor units (×100), rounding
/// half-away-from-zero at two decimal places.
fn to_minor_units(amount: Decimal) -> Result<i64, ServiceError> {
    if amount <= Decimal::ZERO {
        return Err(ServiceError::ValidationError(
            "Amount must be greater than 0".to_string(),
        ));
    }

    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    (rounded * Decimal::ONE_HUNDRED)
        .to_i64()
        .ok_or_else(|| ServiceError::ValidationError("Amount out of range".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payments::GatewayError;
    use async_trait::async_trait;
    use mockall::mock;
    use rust_decimal_macros::dec;
    use test_case::test_case;
    use tokio::sync::mpsc;

    mock! {
        Gateway {}

        #[async_trait]
        impl PaymentGateway for Gateway {
            async fn create_order(
                &self,
                request: &GatewayOrderRequest,
            ) -> Result<GatewayOrder, GatewayError>;
        }
    }

    mock! {
        Verifier {}

        impl VerifySignature for Verifier {
            fn verify(
                &self,
                gateway_order_id: &str,
                gateway_payment_id: &str,
                supplied_signature: &str,
            ) -> Result<(), SignatureError>;
        }
    }

    fn gateway_order(id: &str, amount: i64) -> GatewayOrder {
        GatewayOrder {
            id: id.to_string(),
            amount,
            currency: "INR".to_string(),
            receipt: None,
            status: Some("created".to_string()),
            extra: serde_json::Map::new(),
        }
    }

    fn service(
        gateway: MockGateway,
        verifier: MockVerifier,
    ) -> (PaymentService, mpsc::Receiver<Event>) {
        let (tx, rx) = mpsc::channel(16);
        (
            PaymentService::new(
                Arc::new(gateway),
                Arc::new(verifier),
                "INR",
                EventSender::new(tx),
            ),
            rx,
        )
    }

    #[test_case(dec!(19.995), 2000 ; "midpoint rounds away from zero")]
    #[test_case(dec!(99.99), 9999 ; "two decimal places pass through")]
    #[test_case(dec!(1.004), 100 ; "sub paise rounds down")]
    #[test_case(dec!(0.005), 1 ; "smallest rounded amount")]
    #[test_case(dec!(150), 15000 ; "whole amount")]
    fn minor_unit_conversion(amount: Decimal, expected: i64) {
        assert_eq!(to_minor_units(amount).unwrap(), expected);
    }

    #[test_case(dec!(0) ; "zero amount")]
    #[test_case(dec!(-10.50) ; "negative amount")]
    fn non_positive_amounts_are_rejected(amount: Decimal) {
        assert!(matches!(
            to_minor_units(amount),
            Err(ServiceError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn create_payment_order_sends_minor_units_and_fresh_receipt() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_create_order()
            .withf(|req| {
                req.amount == 2000
                    && req.currency == "INR"
                    && req.receipt.len() == 20
                    && req.receipt.chars().all(|c| c.is_ascii_hexdigit())
            })
            .times(1)
            .returning(|req| Ok(gateway_order("order_1", req.amount)));

        let (svc, mut rx) = service(gateway, MockVerifier::new());
        let order = svc
            .create_payment_order(dec!(19.995), None)
            .await
            .expect("order should be created");

        assert_eq!(order.id, "order_1");
        assert_eq!(order.amount, 2000);
        assert!(matches!(
            rx.recv().await,
            Some(Event::PaymentOrderCreated { .. })
        ));
    }

    #[tokio::test]
    async fn explicit_currency_overrides_default() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_create_order()
            .withf(|req| req.currency == "USD")
            .times(1)
            .returning(|req| Ok(gateway_order("order_2", req.amount)));

        let (svc, _rx) = service(gateway, MockVerifier::new());
        svc.create_payment_order(dec!(10), Some("USD".to_string()))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn non_positive_amount_never_reaches_gateway() {
        // No expectation set: any gateway call would panic the mock.
        let (svc, _rx) = service(MockGateway::new(), MockVerifier::new());
        let result = svc.create_payment_order(dec!(-1), None).await;
        assert!(matches!(result, Err(ServiceError::ValidationError(_))));
    }

    #[tokio::test]
    async fn gateway_failure_maps_to_generic_gateway_error() {
        let mut gateway = MockGateway::new();
        gateway.expect_create_order().times(1).returning(|_| {
            Err(GatewayError::Api {
                status: 401,
                detail: "bad credentials".to_string(),
            })
        });

        let (svc, _rx) = service(gateway, MockVerifier::new());
        let result = svc.create_payment_order(dec!(50), None).await;
        assert!(matches!(result, Err(ServiceError::GatewayError(_))));
    }

    #[tokio::test]
    async fn verify_payment_succeeds_and_echoes_order_id() {
        let mut verifier = MockVerifier::new();
        verifier
            .expect_verify()
            .withf(|order_id, payment_id, signature| {
                order_id == "order_1" && payment_id == "pay_1" && signature == "aabbcc"
            })
            .times(2)
            .returning(|_, _, _| Ok(()));

        let (svc, _rx) = service(MockGateway::new(), verifier);

        // Idempotent: the same valid callback verifies every time.
        for _ in 0..2 {
            let outcome = svc
                .verify_payment(
                    Some("order_1".to_string()),
                    Some("pay_1".to_string()),
                    Some("aabbcc".to_string()),
                )
                .await
                .unwrap();
            assert!(outcome.success);
            assert_eq!(outcome.order_id, "order_1");
        }
    }

    #[tokio::test]
    async fn signature_mismatch_maps_to_invalid_signature() {
        let mut verifier = MockVerifier::new();
        verifier
            .expect_verify()
            .times(1)
            .returning(|_, _, _| Err(SignatureError::Mismatch));

        let (svc, _rx) = service(MockGateway::new(), verifier);
        let result = svc
            .verify_payment(
                Some("order_1".to_string()),
                Some("pay_1".to_string()),
                Some("deadbeef".to_string()),
            )
            .await;
        assert!(matches!(result, Err(ServiceError::InvalidSignature)));
    }

    #[tokio::test]
    async fn missing_inputs_fail_before_any_hashing() {
        // No expectation on the verifier: invoking it would panic the mock.
        let (svc, _rx) = service(MockGateway::new(), MockVerifier::new());

        let cases: Vec<(Option<String>, Option<String>, Option<String>)> = vec![
            (None, Some("pay_1".into()), Some("sig".into())),
            (Some("order_1".into()), None, Some("sig".into())),
            (Some("order_1".into()), Some("pay_1".into()), None),
            (Some("".into()), Some("pay_1".into()), Some("sig".into())),
            (Some("order_1".into()), Some("  ".into()), Some("sig".into())),
        ];

        for (order_id, payment_id, signature) in cases {
            let result = svc.verify_payment(order_id, payment_id, signature).await;
            assert!(matches!(result, Err(ServiceError::ValidationError(_))));
        }
    }
}
