// HTTP request handlers
use crate::application::input_service::SubmitError;
use crate::application::monitoring_service::{MaintenanceView, PredictionsView};
use crate::domain::inputs::DesalterInputs;
use crate::domain::monitoring::AssetFilter;
use crate::domain::parameters::{parse_numeric, Parameter, UnknownParameter};
use crate::domain::priority::PriorityList;
use crate::domain::sensitivity::Metric;
use crate::infrastructure::chunked_ndjson::stream_from_receiver;
use crate::infrastructure::http_response::{accepts_brotli, json_response, svg_response};
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Error status plus a JSON `{"error": ...}` body
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { error: self.message })).into_response()
    }
}

impl From<SubmitError> for ApiError {
    fn from(e: SubmitError) -> Self {
        match e {
            SubmitError::Invalid(_) | SubmitError::Reorder(_) => {
                ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
            }
            SubmitError::Storage(err) => {
                tracing::error!("Storage error: {:#}", err);
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "failed to persist state")
            }
        }
    }
}

#[derive(Deserialize)]
pub struct ReorderRequest {
    pub from: usize,
    pub to: usize,
}

#[derive(Deserialize)]
pub struct MaintenanceQuery {
    #[serde(default)]
    pub filter: AssetFilter,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn get_inputs(State(state): State<Arc<AppState>>) -> Json<DesalterInputs> {
    Json(state.input_service.load_form().await)
}

/// Store the form and point the what-if panel at the new baseline
pub async fn put_inputs(
    State(state): State<Arc<AppState>>,
    Json(form): Json<DesalterInputs>,
) -> Result<Json<DesalterInputs>, ApiError> {
    state.input_service.submit(&form).await?;
    let point = state.input_service.load_operating_point().await;
    state.whatif.lock().await.reseed(point);
    Ok(Json(form))
}

pub async fn delete_inputs(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DesalterInputs>, ApiError> {
    let defaults = state.input_service.reset().await?;
    let point = state.input_service.load_operating_point().await;
    state.whatif.lock().await.reseed(point);
    Ok(Json(defaults))
}

pub async fn get_priorities(State(state): State<Arc<AppState>>) -> Json<PriorityList> {
    Json(state.input_service.load_priorities().await)
}

pub async fn reorder_priorities(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ReorderRequest>,
) -> Result<Json<PriorityList>, ApiError> {
    let list = state
        .input_service
        .reorder_priorities(request.from, request.to)
        .await?;
    Ok(Json(list))
}

/// Current what-if view as JSON
pub async fn get_whatif(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let view = state.whatif.lock().await.view().clone();
    match json_response(&view, accepts_brotli(&headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Apply slider changes, e.g. `{"wash_percent": 4.0, "voltage_kv": "30"}`.
///
/// Values that are not finite numbers keep the parameter's last value.
pub async fn update_parameters(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(changes): Json<BTreeMap<String, serde_json::Value>>,
) -> Result<Response, ApiError> {
    let parsed = changes
        .iter()
        .map(|(name, raw)| {
            let parameter: Parameter = name.parse().map_err(|e: UnknownParameter| {
                ApiError::new(StatusCode::BAD_REQUEST, e.to_string())
            })?;
            Ok((parameter, parse_numeric(raw)))
        })
        .collect::<Result<Vec<_>, ApiError>>()?;

    let view = {
        let mut controller = state.whatif.lock().await;
        for (parameter, value) in parsed {
            controller.apply_change(parameter, value);
        }
        controller.view().clone()
    };

    Ok(json_response(&view, accepts_brotli(&headers))
        .await
        .into_response())
}

pub async fn reset_whatif(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let view = state.whatif.lock().await.reset().clone();
    json_response(&view, accepts_brotli(&headers)).await.into_response()
}

pub async fn simulate_whatif(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let view = state.whatif.lock().await.simulate().clone();
    json_response(&view, accepts_brotli(&headers)).await.into_response()
}

/// Latest rendered chart for `bsw` or `salt` as SVG
pub async fn get_chart(
    Path(metric): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let metric: Metric = metric
        .parse()
        .map_err(|_| ApiError::new(StatusCode::NOT_FOUND, format!("unknown metric `{}`", metric)))?;

    let Some(svg) = state.whatif.lock().await.chart(metric) else {
        return Err(ApiError::new(
            StatusCode::NOT_FOUND,
            format!("no chart surface for {}", metric),
        ));
    };
    Ok(svg_response(svg, accepts_brotli(&headers)).await.into_response())
}

pub async fn get_predictions(State(state): State<Arc<AppState>>) -> Json<PredictionsView> {
    Json(state.monitoring_service.predictions().await)
}

pub async fn get_maintenance(
    Query(query): Query<MaintenanceQuery>,
    State(state): State<Arc<AppState>>,
) -> Json<MaintenanceView> {
    Json(state.monitoring_service.maintenance(query.filter).await)
}

/// Validate, store and optimize the form, streaming progress as NDJSON
pub async fn run_optimization(
    State(state): State<Arc<AppState>>,
    Json(form): Json<DesalterInputs>,
) -> Result<Response, ApiError> {
    let (point, rx) = state.optimization_service.start(&form).await?;
    state.whatif.lock().await.reseed(point);
    Ok(stream_from_receiver(rx).into_response())
}
