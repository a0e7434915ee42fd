pub mod config;
pub mod error;
pub mod models;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use shared::{
    DeliveryStage, EstimateRequest, Tariff,
    assistant::respond,
    cities::cities,
    estimate,
    format::{format_currency, format_distance, format_duration},
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::error::ApiError;
use crate::models::{
    AssistantRequest, AssistantResponse, CityEntry, EstimatePayload, EstimateResponse,
    FormattedEstimate,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    fn default_tariff(&self) -> Tariff {
        self.config.default_tariff()
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/estimate", post(estimate_handler))
        .route("/api/assistant", post(assistant_handler))
        .route("/api/cities", get(cities_handler))
        .with_state(state)
        .fallback_service(static_files)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

async fn estimate_handler(
    State(state): State<AppState>,
    Json(payload): Json<EstimatePayload>,
) -> Result<Json<EstimateResponse>, ApiError> {
    let request = EstimateRequest::resolve(
        &payload.pickup,
        &payload.dropoff,
        payload.fallback_km.unwrap_or(0.0),
        payload.tariff(state.default_tariff()),
        payload.payment,
    )?;
    let result = estimate(&request);
    tracing::info!(
        "estimate {} -> {}: {:.1} km via {:?}",
        result.start_label,
        result.end_label,
        result.distance_km,
        result.source
    );

    let display = FormattedEstimate {
        price: format_currency(result.price),
        eta: format_duration(result.time_minutes),
        distance: format_distance(result.distance_km),
    };

    Ok(Json(EstimateResponse {
        result,
        display,
        stages: DeliveryStage::SEQUENCE.to_vec(),
    }))
}

async fn assistant_handler(
    Json(req): Json<AssistantRequest>,
) -> Result<Json<AssistantResponse>, ApiError> {
    let question = req.question.trim();
    if question.is_empty() {
        return Err(ApiError::EmptyQuestion);
    }
    Ok(Json(AssistantResponse {
        reply: respond(question, req.last.as_ref()),
    }))
}

async fn cities_handler() -> Json<Vec<CityEntry>> {
    Json(
        cities()
            .map(|(name, coord)| CityEntry {
                name: name.to_string(),
                coord,
            })
            .collect(),
    )
}
