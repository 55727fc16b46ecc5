//! Rate table endpoint

use axum::{extract::State, routing::get, Json, Router};

use crate::{services::rates::RateEntry, utils::error::AppResult, AppState};

/// Create routes for rate endpoints
pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(list_rates))
}

/// Effective unit rates, catalog order
///
/// GET /api/v1/rates
async fn list_rates(State(state): State<AppState>) -> AppResult<Json<Vec<RateEntry>>> {
    Ok(Json(state.benefits.rates().entries()))
}
