//! Attrition Prediction Server
//!
//! HTTP front end for the attrition pipeline: validates the employee form,
//! hands it to the core orchestrator and returns the verdict.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    ATTRITION SERVER                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌───────────────┐  ┌─────────────────────┐ │
//! │  │  API      │  │  Form         │  │  Blocking pool      │ │
//! │  │  (Axum)   │─▶│  validation   │─▶│  (orchestrator.run) │ │
//! │  └───────────┘  └───────────────┘  └──────────┬──────────┘ │
//! │                                               ▼            │
//! │                          ┌───────────────────────────────┐ │
//! │                          │ Classifier + role rate table  │ │
//! │                          │ (loaded once at startup)      │ │
//! │                          └───────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod models;
mod handlers;
mod error;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use attrition_core::{InferenceOrchestrator, ReferenceProvider};

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "attrition_server=debug,attrition_core=info,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    tracing::info!("Attrition server starting ({})...", config.environment);
    tracing::info!("Model: {}", config.artifacts.model.display());
    tracing::info!("Role rates: {}", config.artifacts.role_rates.display());

    // Load reference data once; a broken model stops the server here
    let provider = ReferenceProvider::new(config.artifacts.clone());
    let orchestrator = tokio::task::spawn_blocking(move || InferenceOrchestrator::from_provider(&provider))
        .await
        .context("startup task panicked")?
        .context("failed to load reference data")?;

    // Build application state
    let state = AppState {
        orchestrator: Arc::new(orchestrator),
        config: config.clone(),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<InferenceOrchestrator>,
    pub config: config::Config,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    let cors = if state.config.cors_allow_any || !state.config.is_production() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
    };

    Router::new()
        .route("/health", get(handlers::health::check))
        .route("/api/v1/status", get(handlers::status::get))
        .route("/api/v1/predict", post(handlers::predict::predict))
        .route("/api/v1/presets", get(handlers::presets::list))
        .route("/api/v1/presets/:name/predict", post(handlers::presets::predict))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use attrition_core::logic::features::presets::find_preset;
    use attrition_core::ArtifactPaths;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    fn test_state() -> AppState {
        let models = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../core-service/models");
        let artifacts = ArtifactPaths::new(
            models.join("attrition_naive_bayes.json"),
            models.join("monthly_rate_by_job_role.json"),
        );
        let provider = ReferenceProvider::new(artifacts.clone());
        let orchestrator = InferenceOrchestrator::from_provider(&provider).unwrap();

        AppState {
            orchestrator: Arc::new(orchestrator),
            config: config::Config {
                port: 0,
                environment: "test".to_string(),
                artifacts,
                cors_allow_any: false,
            },
        }
    }

    fn claudio_json() -> Value {
        serde_json::to_value(&find_preset("Claudio").unwrap().attributes).unwrap()
    }

    fn post_json(uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = create_router(test_state());
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

        let response = tokio_test::assert_ok!(app.oneshot(request).await);
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["model"], "naive_bayes");
    }

    #[tokio::test]
    async fn test_predict_complete_form() {
        let app = create_router(test_state());

        let response = tokio_test::assert_ok!(app.oneshot(post_json("/api/v1/predict", &claudio_json())).await);
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["attrition"], "No");
        assert_eq!(body["verdict"], "attrition unlikely");
        assert_eq!(body["features"]["feature_count"], 34);
        assert_eq!(body["features"]["named_values"]["MonthlyRate"], 1450.0);
        assert_eq!(body["monthly_rate"]["tier"], "role_average");
    }

    #[tokio::test]
    async fn test_blank_field_is_unprocessable() {
        let app = create_router(test_state());
        let mut form = claudio_json();
        form["job_satisfaction"] = Value::Null;

        let response = tokio_test::assert_ok!(app.oneshot(post_json("/api/v1/predict", &form)).await);
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = body_json(response).await;
        assert_eq!(body["details"]["fields"], serde_json::json!(["JobSatisfaction"]));
    }

    #[tokio::test]
    async fn test_out_of_range_is_bad_request() {
        let state = test_state();
        let app = create_router(state.clone());
        let mut form = claudio_json();
        form["age"] = Value::from(12);
        form["gender"] = Value::from("Robot");

        let response = tokio_test::assert_ok!(app.oneshot(post_json("/api/v1/predict", &form)).await);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert!(body["details"].get("age").is_some());
        assert!(body["details"].get("gender").is_some());
        // Rejected before reaching the pipeline
        assert_eq!(state.orchestrator.status().prediction_count, 0);
        assert_eq!(state.orchestrator.status().rejection_count, 0);
    }

    #[tokio::test]
    async fn test_mistyped_field_is_bad_request() {
        let state = test_state();
        let app = create_router(state.clone());
        let mut form = claudio_json();
        form["age"] = Value::from("52");

        let response = tokio_test::assert_ok!(app.oneshot(post_json("/api/v1/predict", &form)).await);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["status"], 400);
        assert_eq!(body["error"], "Malformed form body");
        assert!(body["details"]["reason"].as_str().unwrap().contains("age"));
        assert_eq!(state.orchestrator.status().rejection_count, 0);
    }

    #[tokio::test]
    async fn test_unparseable_body_is_bad_request() {
        let app = create_router(test_state());
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/predict")
            .header("content-type", "application/json")
            .body(Body::from("{ not json"))
            .unwrap();

        let response = tokio_test::assert_ok!(app.oneshot(request).await);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["status"], 400);
    }

    #[tokio::test]
    async fn test_cors_any_origin_only_when_allowed() {
        fn preflight() -> Request<Body> {
            Request::builder()
                .uri("/health")
                .header("origin", "https://forms.example.org")
                .body(Body::empty())
                .unwrap()
        }

        let mut state = test_state();
        state.config.environment = "production".to_string();
        state.config.cors_allow_any = false;
        let response = tokio_test::assert_ok!(create_router(state.clone()).oneshot(preflight()).await);
        assert!(response.headers().get("access-control-allow-origin").is_none());

        state.config.cors_allow_any = true;
        let response = tokio_test::assert_ok!(create_router(state.clone()).oneshot(preflight()).await);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");

        state.config.environment = "development".to_string();
        state.config.cors_allow_any = false;
        let response = tokio_test::assert_ok!(create_router(state).oneshot(preflight()).await);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
    }

    #[tokio::test]
    async fn test_presets() {
        let state = test_state();

        let request = Request::builder().uri("/api/v1/presets").body(Body::empty()).unwrap();
        let response = tokio_test::assert_ok!(create_router(state.clone()).oneshot(request).await);
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body.as_array().map(|a| a.len()), Some(10));

        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/presets/julia/predict")
            .body(Body::empty())
            .unwrap();
        let response = tokio_test::assert_ok!(create_router(state.clone()).oneshot(request).await);
        assert_eq!(response.status(), StatusCode::OK);

        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/presets/nobody/predict")
            .body(Body::empty())
            .unwrap();
        let response = tokio_test::assert_ok!(create_router(state.clone()).oneshot(request).await);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        assert_eq!(state.orchestrator.status().prediction_count, 1);
    }

    #[tokio::test]
    async fn test_status_reports_model() {
        let app = create_router(test_state());
        let request = Request::builder().uri("/api/v1/status").body(Body::empty()).unwrap();

        let response = tokio_test::assert_ok!(app.oneshot(request).await);
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["schema_size"], 34);
        assert_eq!(body["role_rate_count"], 9);
        assert_eq!(body["model"]["model_kind"], "naive_bayes");
        assert!(body["role_table_degraded"].is_null());
    }
}
