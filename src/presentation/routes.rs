// Router - Maps HTTP routes to handlers
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    delete_inputs, get_chart, get_inputs, get_maintenance, get_predictions, get_priorities,
    get_whatif, health_check, put_inputs, reorder_priorities, reset_whatif, run_optimization,
    simulate_whatif, update_parameters,
};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

// Responses are compressed in the handlers that support it, so there is no
// CompressionLayer here.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/inputs", get(get_inputs).put(put_inputs).delete(delete_inputs))
        .route("/priorities", get(get_priorities))
        .route("/priorities/reorder", post(reorder_priorities))
        .route("/whatif", get(get_whatif))
        .route("/whatif/parameters", post(update_parameters))
        .route("/whatif/reset", post(reset_whatif))
        .route("/whatif/simulate", post(simulate_whatif))
        .route("/whatif/charts/:metric", get(get_chart))
        .route("/predictions", get(get_predictions))
        .route("/maintenance", get(get_maintenance))
        .route("/optimization/run", post(run_optimization))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::drawing_surface::Surfaces;
    use crate::application::input_service::InputService;
    use crate::application::monitoring_service::MonitoringService;
    use crate::application::optimization_service::OptimizationService;
    use crate::application::whatif_service::{surface_id, WhatIfController};
    use crate::domain::inputs::OperatingPoint;
    use crate::domain::sensitivity::Metric;
    use crate::domain::series::Silent;
    use crate::infrastructure::file_store::MemoryStore;
    use crate::infrastructure::svg_canvas::SvgCanvas;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use std::time::Duration;
    use tokio::sync::Mutex;
    use tower::ServiceExt;

    fn app() -> Router {
        let input_service = InputService::new(Arc::new(MemoryStore::new()));
        let mut surfaces = Surfaces::new();
        for metric in Metric::ALL {
            surfaces.insert(surface_id(metric), Box::new(SvgCanvas::new(800.0, 400.0)));
        }
        let controller =
            WhatIfController::new(OperatingPoint::default(), Box::new(Silent), surfaces);

        router(Arc::new(AppState {
            optimization_service: OptimizationService::new(
                input_service.clone(),
                Duration::ZERO,
                Some(3),
            ),
            input_service,
            monitoring_service: MonitoringService::new(),
            whatif: Arc::new(Mutex::new(controller)),
        }))
    }

    fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let response = app()
            .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"ok");
    }

    #[tokio::test]
    async fn test_update_parameters_returns_view() {
        let response = app()
            .oneshot(json_request(
                Method::POST,
                "/whatif/parameters",
                serde_json::json!({"wash_percent": 4.0, "voltage_kv": "n/a"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let view = body_json(response).await;
        assert_eq!(view["scenario"]["wash_percent"], 4.0);
        assert_eq!(view["scenario"]["voltage_kv"], 28.0);
        assert!((view["bsw"]["impact"].as_f64().unwrap() + 0.08).abs() < 1e-9);
        assert_eq!(view["status"], "Parameters changed - ready to simulate");
    }

    #[tokio::test]
    async fn test_unknown_parameter_is_rejected() {
        let response = app()
            .oneshot(json_request(
                Method::POST,
                "/whatif/parameters",
                serde_json::json!({"pressure": 3.0}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("pressure"));
    }

    #[tokio::test]
    async fn test_chart_endpoint() {
        let response = app()
            .oneshot(Request::get("/whatif/charts/salt").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/svg+xml");
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let svg = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(svg.contains("Salt (PTB)"));

        let missing = app()
            .oneshot(Request::get("/whatif/charts/pressure").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_inputs_are_unprocessable() {
        let response = app()
            .oneshot(json_request(
                Method::PUT,
                "/inputs",
                serde_json::json!({"T_min": 140.0, "T_max": 130.0}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Temperature min must be less than max.");
    }

    #[tokio::test]
    async fn test_optimization_run_streams_ndjson() {
        let response = app()
            .oneshot(json_request(
                Method::POST,
                "/optimization/run",
                serde_json::json!({"n_samples": 500}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        let messages: Vec<serde_json::Value> =
            text.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
        assert_eq!(messages.len(), 6);
        assert_eq!(messages[0]["title"], "Optimizing Process");
        assert_eq!(messages[5]["type"], "result");
        assert_eq!(messages[5]["optimizer"]["samples"], 500);
    }

    #[tokio::test]
    async fn test_maintenance_filter() {
        let response = app()
            .oneshot(Request::get("/maintenance?filter=critical").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["filter"], "critical");
        assert_eq!(body["components"].as_array().unwrap().len(), 3);
    }
}
