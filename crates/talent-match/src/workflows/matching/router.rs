use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::report::AnalysisReport;
use super::service::{AnalysisRequest, TalentMatchService};
use super::source::TalentDataSource;
use super::MatchingError;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct HighPerformersQuery {
    pub year: Option<i32>,
    pub rating: Option<u8>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnalysisBody {
    #[serde(flatten)]
    pub request: AnalysisRequest,
    /// Caps the ranking rows returned; the report is computed over everyone.
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Router builder exposing benchmark discovery and analysis runs.
pub fn talent_router<S>(service: Arc<TalentMatchService<S>>) -> Router
where
    S: TalentDataSource + 'static,
{
    Router::new()
        .route(
            "/api/v1/talent/high-performers",
            get(high_performers_handler::<S>),
        )
        .route("/api/v1/talent/analysis", post(analysis_handler::<S>))
        .route(
            "/api/v1/talent/analysis/export",
            post(export_handler::<S>),
        )
        .with_state(service)
}

pub(crate) async fn high_performers_handler<S>(
    State(service): State<Arc<TalentMatchService<S>>>,
    Query(query): Query<HighPerformersQuery>,
) -> Response
where
    S: TalentDataSource + 'static,
{
    match service.high_performers(query.year, query.rating) {
        Ok(benchmarks) => (StatusCode::OK, axum::Json(benchmarks)).into_response(),
        Err(err) => matching_error_response(err),
    }
}

pub(crate) async fn analysis_handler<S>(
    State(service): State<Arc<TalentMatchService<S>>>,
    axum::Json(body): axum::Json<AnalysisBody>,
) -> Response
where
    S: TalentDataSource + 'static,
{
    let AnalysisBody { request, limit } = body;
    match run_analysis(service, request).await {
        Ok(mut report) => {
            if let Some(limit) = limit {
                report.ranking.truncate(limit);
            }
            (StatusCode::OK, axum::Json(report)).into_response()
        }
        Err(response) => response,
    }
}

pub(crate) async fn export_handler<S>(
    State(service): State<Arc<TalentMatchService<S>>>,
    axum::Json(request): axum::Json<AnalysisRequest>,
) -> Response
where
    S: TalentDataSource + 'static,
{
    let report = match run_analysis(service, request).await {
        Ok(report) => report,
        Err(response) => return response,
    };

    match report.ranking_csv() {
        Ok(body) => {
            let disposition = format!("attachment; filename=\"{}\"", report.export_file_name());
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                body,
            )
                .into_response()
        }
        Err(err) => internal_error(err.to_string()),
    }
}

/// Analysis may block on profile generation, so it leaves the async executor.
async fn run_analysis<S>(
    service: Arc<TalentMatchService<S>>,
    request: AnalysisRequest,
) -> Result<AnalysisReport, Response>
where
    S: TalentDataSource + 'static,
{
    match tokio::task::spawn_blocking(move || service.analyze(request, None)).await {
        Ok(Ok(report)) => Ok(report),
        Ok(Err(err)) => Err(matching_error_response(err)),
        Err(join_error) => {
            error!(error = %join_error, "analysis task failed");
            Err(internal_error("analysis task failed".to_string()))
        }
    }
}

pub(crate) fn matching_error_response(err: MatchingError) -> Response {
    match err {
        MatchingError::DataUnavailable(_) | MatchingError::InsufficientBenchmarks { .. } => {
            let payload = json!({
                "error": err.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        MatchingError::Source(_) => {
            error!(error = %err, "talent data source failed");
            internal_error(err.to_string())
        }
    }
}

fn internal_error(message: String) -> Response {
    let payload = json!({
        "error": message,
    });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}
