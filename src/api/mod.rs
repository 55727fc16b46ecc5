//! API routes and handlers
//!
//! This module defines all API endpoints and their routing.

use axum::{routing::get, Router};

use crate::AppState;

mod benefits;
mod health;
mod rates;

pub use health::*;

/// API routes mounted under `/api/v1`
pub fn routes() -> Router<AppState> {
    Router::new()
        // Health check endpoints
        .route("/health", get(health::health_check))
        .route("/health/detailed", get(health::health_check_detailed))
        // Benefit endpoints
        .nest("/benefits", benefits::routes())
        .nest("/rates", rates::routes())
}
