//! Storefront API Library
//!
//! This crate provides the core functionality for the storefront order and
//! payment API: payment order initiation against the Razorpay gateway,
//! payment signature verification, and order lifecycle management.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod config;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod models;
pub mod openapi;
pub mod payments;
pub mod repositories;
pub mod services;

use axum::Router;
use serde::Serialize;
use utoipa::ToSchema;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: handlers::AppServices,
}

impl AppState {
    pub fn payment_service(&self) -> std::sync::Arc<services::payments::PaymentService> {
        self.services.payments.clone()
    }

    pub fn order_service(&self) -> std::sync::Arc<services::orders::OrderService> {
        self.services.orders.clone()
    }
}

// Common response wrapper
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub errors: Option<Vec<String>>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            errors: None,
        }
    }

    pub fn success_with_message(data: T, message: String) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message),
            errors: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
            errors: None,
        }
    }
}

/// Versioned API routes mounted under `/api/v1`
pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .nest("/payments", handlers::payments::payment_routes())
        .nest("/orders", handlers::orders::order_routes())
}
