use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;

use super::domain::AnalyzeRequest;
use super::memo::TextGenerator;
use super::pipeline::{PipelineMode, UnderwritingPipeline};
use super::views::{AnalysisResponse, HealthView, QuickScoreResponse};
use crate::error::AppError;

/// Router builder exposing the analysis, quick-score, and health endpoints.
pub fn underwriting_router<G>(pipeline: Arc<UnderwritingPipeline<G>>) -> Router
where
    G: TextGenerator + ?Sized + 'static,
{
    Router::new()
        .route("/api/analyze", post(analyze_handler::<G>))
        .route("/api/quick-score", post(quick_score_handler::<G>))
        .route("/api/health", get(health_handler))
        .with_state(pipeline)
}

pub(crate) async fn analyze_handler<G>(
    State(pipeline): State<Arc<UnderwritingPipeline<G>>>,
    axum::Json(request): axum::Json<AnalyzeRequest>,
) -> Result<Response, AppError>
where
    G: TextGenerator + ?Sized + 'static,
{
    let business_name = request.business_name.clone();
    let report = pipeline
        .analyze_request(request, PipelineMode::Full)
        .await
        .map_err(|err| AppError::underwriting(business_name, err))?;

    let view = AnalysisResponse::from_report(report, Utc::now());
    Ok((StatusCode::OK, axum::Json(view)).into_response())
}

pub(crate) async fn quick_score_handler<G>(
    State(pipeline): State<Arc<UnderwritingPipeline<G>>>,
    axum::Json(request): axum::Json<AnalyzeRequest>,
) -> Result<Response, AppError>
where
    G: TextGenerator + ?Sized + 'static,
{
    let business_name = request.business_name.clone();
    let report = pipeline
        .analyze_request(request, PipelineMode::ScoreOnly)
        .await
        .map_err(|err| AppError::underwriting(business_name, err))?;

    let view = QuickScoreResponse::from(&report);
    Ok((StatusCode::OK, axum::Json(view)).into_response())
}

pub(crate) async fn health_handler() -> axum::Json<HealthView> {
    axum::Json(HealthView::current())
}
