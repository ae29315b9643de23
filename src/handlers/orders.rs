use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Router,
};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::handlers::AppState;
use crate::models::Order;
use crate::services::orders::{CreateOrder, SalesSummary};
use crate::ApiResponse;

/// Record a new customer order
#[utoipa::path(
    post,
    path = "/api/v1/orders",
    request_body = CreateOrder,
    responses(
        (status = 201, description = "Order created", body = Order),
        (status = 400, description = "Validation failed", body = crate::errors::ErrorResponse)
    ),
    tag = "Orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    Json(request): Json<CreateOrder>,
) -> Result<(StatusCode, Json<ApiResponse<Order>>), ServiceError> {
    let order = state.order_service().create_order(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            order,
            "New Order Created".to_string(),
        )),
    ))
}

/// List all orders
#[utoipa::path(
    get,
    path = "/api/v1/orders",
    responses(
        (status = 200, description = "All orders")
    ),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Order>>>, ServiceError> {
    let orders = state.order_service().list_orders().await?;
    Ok(Json(ApiResponse::success(orders)))
}

/// Sales summary across all orders
#[utoipa::path(
    get,
    path = "/api/v1/orders/summary",
    responses(
        (status = 200, description = "Aggregated sales totals", body = SalesSummary)
    ),
    tag = "Orders"
)]
pub async fn sales_summary(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<SalesSummary>>, ServiceError> {
    let summary = state.order_service().sales_summary().await?;
    Ok(Json(ApiResponse::success(summary)))
}

/// List a user's orders
#[utoipa::path(
    get,
    path = "/api/v1/orders/user/{user_id}",
    params(
        ("user_id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Orders for the user")
    ),
    tag = "Orders"
)]
pub async fn list_user_orders(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<Order>>>, ServiceError> {
    let orders = state.order_service().list_user_orders(user_id).await?;
    Ok(Json(ApiResponse::success(orders)))
}

/// Get order by ID
#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order details", body = Order),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Order>>, ServiceError> {
    let order = state.order_service().get_order(id).await?;
    Ok(Json(ApiResponse::success(order)))
}

/// Mark an order paid
#[utoipa::path(
    put,
    path = "/api/v1/orders/{id}/pay",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order marked paid", body = Order),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Orders"
)]
pub async fn pay_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Order>>, ServiceError> {
    let order = state.order_service().mark_paid(id).await?;
    Ok(Json(ApiResponse::success_with_message(
        order,
        "Order Paid".to_string(),
    )))
}

/// Mark an order delivered
#[utoipa::path(
    put,
    path = "/api/v1/orders/{id}/deliver",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order marked delivered", body = Order),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Orders"
)]
pub async fn deliver_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Order>>, ServiceError> {
    let order = state.order_service().mark_delivered(id).await?;
    Ok(Json(ApiResponse::success_with_message(
        order,
        "Order Delivered".to_string(),
    )))
}

/// Delete an order
#[utoipa::path(
    delete,
    path = "/api/v1/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order deleted"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Orders"
)]
pub async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, ServiceError> {
    state.order_service().delete_order(id).await?;
    Ok(Json(ApiResponse::success_with_message(
        (),
        "Order Deleted".to_string(),
    )))
}

/// Order routes
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_order))
        .route("/", get(list_orders))
        .route("/summary", get(sales_summary))
        .route("/user/:user_id", get(list_user_orders))
        .route("/:id", get(get_order))
        .route("/:id", delete(delete_order))
        .route("/:id/pay", put(pay_order))
        .route("/:id/deliver", put(deliver_order))
}
