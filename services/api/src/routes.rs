use crate::infra::{AppState, SharedService};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use talent_match::workflows::matching::talent_router;

pub(crate) fn with_talent_routes(service: SharedService) -> axum::Router {
    talent_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use talent_match::workflows::matching::{
        CompetencyRecord, EmployeeId, EmployeeSummary, InMemoryTalentStore, MatchingConfig,
        PerformanceRecord, TalentMatchService,
    };
    use talent_match::workflows::profile::FallbackProfileGenerator;
    use tower::ServiceExt;

    fn store() -> InMemoryTalentStore {
        let performance = ["EMP100001", "EMP100002", "EMP100003"]
            .into_iter()
            .map(|id| PerformanceRecord {
                employee_id: EmployeeId::new(id),
                year: 2025,
                rating: 5,
            })
            .collect();
        let competencies = [("EMP100001", 4.0), ("EMP100002", 5.0), ("EMP100003", 3.0)]
            .into_iter()
            .map(|(id, score)| CompetencyRecord {
                employee_id: EmployeeId::new(id),
                pillar_code: "GDR".to_string(),
                score,
                year: 2025,
            })
            .collect();
        let employees = vec![EmployeeSummary {
            employee_id: EmployeeId::new("EMP100001"),
            fullname: "Rani Wulandari".to_string(),
        }];

        InMemoryTalentStore::new(performance, competencies, Vec::new(), employees)
    }

    fn app(ready: bool) -> axum::Router {
        let service = Arc::new(TalentMatchService::new(
            Arc::new(store()),
            Arc::new(FallbackProfileGenerator),
            MatchingConfig::default(),
        ));
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(false)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        state.readiness.store(ready, Ordering::Release);

        with_talent_routes(service).layer(Extension(state))
    }

    async fn get(router: axum::Router, uri: &str) -> axum::response::Response {
        router
            .oneshot(
                Request::get(uri)
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("route executes")
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let response = get(app(false), "/health").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn readiness_tracks_the_flag() {
        let response = get(app(false), "/ready").await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = get(app(true), "/ready").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), 1024)
            .await
            .expect("read body");
        let payload: serde_json::Value = serde_json::from_slice(&body).expect("json payload");
        assert_eq!(payload["status"], "ready");
    }

    #[tokio::test]
    async fn metrics_render_prometheus_text() {
        let response = get(app(true), "/metrics").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE),
            Some(&header::HeaderValue::from_static("text/plain; version=0.0.4"))
        );
    }

    #[tokio::test]
    async fn talent_routes_are_mounted() {
        let response = get(app(true), "/api/v1/talent/high-performers").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), 4096)
            .await
            .expect("read body");
        let payload: serde_json::Value = serde_json::from_slice(&body).expect("json payload");
        assert_eq!(payload["employees"][0]["fullname"], "Rani Wulandari");
        assert_eq!(payload["employees"][1]["fullname"], "EMP100002");
    }
}
