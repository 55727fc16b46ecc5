//! Benefits API endpoints
//!
//! Serves the current benefit view and the reports derived from it.

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{
    models::{Benefit, BenefitCategory, BenefitReport, BenefitSummary, BenefitsView, DataSource, SavingsBreakdown},
    services::reporting::{self, BenefitFilter, StatusFilter, DEFAULT_RECOMMENDATIONS},
    utils::{
        error::{AppError, AppResult},
        validation::validate_benefit_id,
    },
    AppState,
};

/// Create routes for benefit endpoints
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_benefits))
        .route("/summary", get(get_summary))
        .route("/savings", get(get_savings))
        .route("/recommendations", get(get_recommendations))
        .route("/export", get(export_report))
        .route("/{id}", get(get_benefit))
}

/// Query parameters for the benefit list
#[derive(Debug, Deserialize, Default)]
pub struct BenefitsQuery {
    /// Filter by category (`free` also matches free-tier benefits)
    pub category: Option<String>,
    /// Filter by status (active, unused)
    pub status: Option<String>,
    /// Recompute instead of serving the cached view
    #[serde(default)]
    pub refresh: bool,
}

impl BenefitsQuery {
    fn filter(&self) -> AppResult<BenefitFilter> {
        let category = match self.category.as_deref() {
            None | Some("") | Some("all") => None,
            Some(c) => Some(
                BenefitCategory::from_str(&c.to_lowercase())
                    .ok_or_else(|| AppError::bad_request(format!("Unknown category: {}", c)))?,
            ),
        };
        let status = match self.status.as_deref() {
            None | Some("") | Some("all") => None,
            Some(s) => Some(
                StatusFilter::from_str(s)
                    .ok_or_else(|| AppError::bad_request(format!("Unknown status: {}", s)))?,
            ),
        };
        Ok(BenefitFilter { category, status })
    }
}

/// Query parameters for recommendations
#[derive(Debug, Deserialize)]
pub struct RecommendationsQuery {
    pub limit: Option<usize>,
}

/// Summary response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub data_source: DataSource,
    #[serde(flatten)]
    pub summary: BenefitSummary,
}

/// List benefits
///
/// GET /api/v1/benefits
///
/// Query parameters:
/// - `category`: security, free, deployment, support, training, licensing
/// - `status`: active or unused
/// - `refresh`: recompute the view
async fn list_benefits(
    State(state): State<AppState>,
    Query(query): Query<BenefitsQuery>,
) -> AppResult<Json<BenefitsView>> {
    let filter = query.filter()?;
    let view = if query.refresh {
        state.benefits.refresh().await
    } else {
        state.benefits.current_benefits().await
    };

    Ok(Json(BenefitsView {
        data_source: view.data_source,
        benefits: filter.apply(&view.benefits),
    }))
}

/// Get a benefit by id
///
/// GET /api/v1/benefits/{id}
async fn get_benefit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Benefit>> {
    if !validate_benefit_id(&id) {
        return Err(AppError::bad_request(format!("Invalid benefit id: {}", id)));
    }

    state
        .benefits
        .benefit(&id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("Benefit '{}' not found", id)))
}

/// GET /api/v1/benefits/summary
async fn get_summary(State(state): State<AppState>) -> AppResult<Json<SummaryResponse>> {
    let view = state.benefits.current_benefits().await;
    Ok(Json(SummaryResponse {
        data_source: view.data_source,
        summary: reporting::summarize(&view.benefits),
    }))
}

/// GET /api/v1/benefits/savings
async fn get_savings(State(state): State<AppState>) -> AppResult<Json<SavingsBreakdown>> {
    let view = state.benefits.current_benefits().await;
    Ok(Json(reporting::savings_breakdown(
        &view.benefits,
        state.benefits.rates(),
    )))
}

/// GET /api/v1/benefits/recommendations
async fn get_recommendations(
    State(state): State<AppState>,
    Query(query): Query<RecommendationsQuery>,
) -> AppResult<Json<Vec<Benefit>>> {
    let limit = query.limit.unwrap_or(DEFAULT_RECOMMENDATIONS);
    if limit == 0 || limit > 100 {
        return Err(AppError::bad_request("limit must be between 1 and 100"));
    }

    let view = state.benefits.current_benefits().await;
    Ok(Json(reporting::recommendations(&view.benefits, limit)))
}

/// Download the export report
///
/// GET /api/v1/benefits/export
async fn export_report(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let view = state.benefits.current_benefits().await;
    let report: BenefitReport = reporting::export_report(&view, Utc::now());
    let disposition = format!("attachment; filename=\"{}\"", report.file_name());

    Ok(([(header::CONTENT_DISPOSITION, disposition)], Json(report)))
}
