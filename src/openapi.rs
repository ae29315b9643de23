use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Storefront API",
        version = "1.0.0",
        description = r#"
# Storefront Order & Payment API

Backend for an e-commerce storefront: payment order initiation against the
Razorpay gateway, payment signature verification, and order lifecycle
management (create, list, pay, deliver, delete, sales summary).

## Error Handling

Errors use a consistent response format with appropriate HTTP status codes:

```json
{
  "error": "Bad Request",
  "message": "Invalid signature",
  "timestamp": "2024-01-01T00:00:00Z"
}
```

Gateway and internal failure detail is logged server-side and never included
in responses.
"#
    ),
    tags(
        (name = "Payments", description = "Payment gateway endpoints"),
        (name = "Orders", description = "Order lifecycle endpoints"),
        (name = "Health", description = "Health check endpoints")
    ),
    paths(
        // Payments
        crate::handlers::payments::create_payment_order,
        crate::handlers::payments::verify_payment,

        // Orders
        crate::handlers::orders::create_order,
        crate::handlers::orders::list_orders,
        crate::handlers::orders::sales_summary,
        crate::handlers::orders::list_user_orders,
        crate::handlers::orders::get_order,
        crate::handlers::orders::pay_order,
        crate::handlers::orders::deliver_order,
        crate::handlers::orders::delete_order,

        // Health
        crate::handlers::health::health,
    ),
    components(
        schemas(
            // Payments types
            crate::handlers::payments::CreatePaymentOrderRequest,
            crate::handlers::payments::CreatePaymentOrderResponse,
            crate::handlers::payments::VerifyPaymentRequest,
            crate::payments::GatewayOrder,
            crate::services::payments::VerificationOutcome,

            // Order types
            crate::models::Order,
            crate::models::OrderItem,
            crate::models::ShippingAddress,
            crate::services::orders::CreateOrder,
            crate::services::orders::SalesSummary,
            crate::services::orders::DailySales,

            // Health
            crate::handlers::health::HealthStatus,

            // Error types
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}
