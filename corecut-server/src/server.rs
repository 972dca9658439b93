//! HTTP server for the savings dashboard.
//!
//! Reports are uploaded as raw JSON, validated, and kept in the shared
//! dashboard state. Savings endpoints recompute their figures from the
//! current state and cost parameters on every request.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use corecut_core::protocol::{ErrorResponse, HealthResponse, LoadResponse};
use corecut_core::{parse_aggregate, parse_report, sample_report, CostParameters, ReportDocument};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::DashboardState;

/// Shared state for the HTTP server.
struct AppState {
    dashboard: RwLock<DashboardState>,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorResponse::new(message))).into_response()
}

/// Health check endpoint.
///
/// GET /health
/// Returns: { "status": "healthy" }
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// GET /params
async fn get_params(State(state): State<Arc<AppState>>) -> Json<CostParameters> {
    Json(state.dashboard.read().await.params)
}

/// Replace the cost parameters.
///
/// PUT /params
/// Body: { "hourlyRate": ..., "electricityPrice": ..., "serverWatts": ...,
///         "executionsPerDay": ..., "workingDaysPerYear": ... }
async fn put_params(
    State(state): State<Arc<AppState>>,
    Json(params): Json<CostParameters>,
) -> Json<CostParameters> {
    debug!(?params, "cost parameters updated");
    state.dashboard.write().await.params = params;
    Json(params)
}

async fn load_document(state: &AppState, document: ReportDocument) -> Response {
    let mut dashboard = state.dashboard.write().await;
    let machine_count = dashboard.load(document);
    let view = dashboard.active_view;
    info!(?view, machine_count, "report loaded");
    (StatusCode::OK, Json(LoadResponse { view, machine_count })).into_response()
}

/// Upload a single-machine report.
///
/// POST /reports/single
/// Body: report JSON as produced by the benchmarking tool
async fn load_single(State(state): State<Arc<AppState>>, body: String) -> Response {
    match parse_report(&body) {
        Ok(report) => load_document(&state, ReportDocument::Single(report)).await,
        Err(e) => {
            warn!(error = %e, "rejected single report");
            error_response(StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
        }
    }
}

/// Upload a multi-machine aggregate report.
///
/// POST /reports/aggregate
async fn load_aggregate(State(state): State<Arc<AppState>>, body: String) -> Response {
    match parse_aggregate(&body) {
        Ok(aggregate) => load_document(&state, ReportDocument::Aggregate(aggregate)).await,
        Err(e) => {
            warn!(error = %e, "rejected aggregate report");
            error_response(StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
        }
    }
}

/// Load the built-in demo report.
///
/// POST /sample
async fn load_sample(State(state): State<Arc<AppState>>) -> Response {
    load_document(&state, ReportDocument::Single(sample_report())).await
}

/// GET /savings
async fn single_savings(State(state): State<Arc<AppState>>) -> Response {
    match state.dashboard.read().await.single_savings() {
        Some(savings) => (StatusCode::OK, Json(savings)).into_response(),
        None => error_response(StatusCode::NOT_FOUND, "No single report loaded"),
    }
}

/// GET /savings/aggregate
async fn aggregate_savings(State(state): State<Arc<AppState>>) -> Response {
    match state.dashboard.read().await.aggregate_savings() {
        Some(savings) => (StatusCode::OK, Json(savings)).into_response(),
        None => error_response(StatusCode::NOT_FOUND, "No aggregate report loaded"),
    }
}

/// GET /state
async fn get_state(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.dashboard.read().await.snapshot())
}

/// Build the router with all endpoints.
pub fn build_router(dashboard: DashboardState) -> Router {
    let state = Arc::new(AppState {
        dashboard: RwLock::new(dashboard),
    });

    Router::new()
        .route("/health", get(health))
        .route("/params", get(get_params).put(put_params))
        .route("/reports/single", post(load_single))
        .route("/reports/aggregate", post(load_aggregate))
        .route("/sample", post(load_sample))
        .route("/savings", get(single_savings))
        .route("/savings/aggregate", get(aggregate_savings))
        .route("/state", get(get_state))
        .with_state(state)
}

/// Run the dashboard server until interrupted with ctrl-c.
///
/// Creates its own tokio runtime; use [`run_server_async`] from async code.
pub fn run_server(dashboard: DashboardState, addr: SocketAddr) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;

    runtime.block_on(async { run_server_async(dashboard, addr).await })
}

/// Async implementation of the dashboard server.
pub async fn run_server_async(dashboard: DashboardState, addr: SocketAddr) -> anyhow::Result<()> {
    let app = build_router(dashboard);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(%addr, "dashboard server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            info!("shutting down dashboard server");
        })
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use corecut_core::protocol::{AggregateSavingsResponse, SavingsResponse, StateResponse, View};
    use corecut_core::{compute_savings, AggregateReport};
    use tower::ServiceExt;

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: String) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = build_router(DashboardState::default());

        let response = app.oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let health: HealthResponse = body_json(response).await;
        assert_eq!(health.status, "healthy");
    }

    #[tokio::test]
    async fn test_savings_without_report_is_not_found() {
        let app = build_router(DashboardState::default());

        let response = app.clone().oneshot(get("/savings")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let error: ErrorResponse = body_json(response).await;
        assert!(error.error.contains("No single report"));

        let response = app.oneshot(get("/savings/aggregate")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_upload_single_then_savings() {
        let app = build_router(DashboardState::default());
        let json = serde_json::to_string(&sample_report()).unwrap();

        let response = app
            .clone()
            .oneshot(post_json("/reports/single", json))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let loaded: LoadResponse = body_json(response).await;
        assert_eq!(loaded.view, View::Single);
        assert_eq!(loaded.machine_count, 1);

        let response = app.oneshot(get("/savings")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let savings: SavingsResponse = body_json(response).await;
        assert_eq!(savings.machine, "demo-machine");
        assert_eq!(
            savings.savings,
            compute_savings(&sample_report(), &CostParameters::default())
        );
    }

    #[tokio::test]
    async fn test_upload_invalid_report_is_rejected() {
        let app = build_router(DashboardState::default());
        let body = r#"{ "machine": "m", "baseline": { "stats": { "median": 10 } } }"#.to_string();

        let response = app
            .clone()
            .oneshot(post_json("/reports/single", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let error: ErrorResponse = body_json(response).await;
        assert!(error.error.contains("Invalid report JSON"));

        // Nothing was loaded
        let response = app.oneshot(get("/state")).await.unwrap();
        let state: StateResponse = body_json(response).await;
        assert_eq!(state.active_view, View::Upload);
        assert!(state.single_machine.is_none());
    }

    #[tokio::test]
    async fn test_put_params_changes_savings() {
        let app = build_router(DashboardState::default());
        app.clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/sample")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let params = CostParameters {
            executions_per_day: 0.0,
            ..CostParameters::default()
        };
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/params")
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_string(&params).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app.clone().oneshot(get("/params")).await.unwrap();
        let stored: CostParameters = body_json(response).await;
        assert_eq!(stored, params);

        let response = app.oneshot(get("/savings")).await.unwrap();
        let savings: SavingsResponse = body_json(response).await;
        assert_eq!(savings.savings.total, 0.0);
    }

    #[tokio::test]
    async fn test_upload_aggregate_then_savings() {
        let app = build_router(DashboardState::default());
        let mut second = sample_report();
        second.machine = "second".to_string();
        let aggregate = AggregateReport::from_reports(vec![sample_report(), second], None);
        let json = serde_json::to_string(&aggregate).unwrap();

        let response = app
            .clone()
            .oneshot(post_json("/reports/aggregate", json))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app.oneshot(get("/savings/aggregate")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let savings: AggregateSavingsResponse = body_json(response).await;
        let single = compute_savings(&sample_report(), &CostParameters::default());

        assert_eq!(savings.machine_count, 2);
        assert_eq!(savings.machines[1].machine, "second");
        assert!((savings.total.total - single.total * 2.0).abs() < 1e-6);
    }
}
