use axum::{
    Json, Router,
    extract::{Query, State, rejection::JsonRejection},
    http::{HeaderValue, Method, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::error;

use common::errors::AdviceError;
use common::models::{AdviceOutcome, AdviceQuery, PricePoint, Symbol};

use crate::state::AppState;

pub fn create_router(state: AppState, cors_origin: &str) -> anyhow::Result<Router> {
    let cors = CorsLayer::new()
        .allow_origin(cors_origin.parse::<HeaderValue>()?)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);

    Ok(Router::new()
        .nest("/api", api_routes())
        .layer(cors)
        .with_state(state))
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/schema", get(get_schema))
        .route("/symbols", get(get_symbols))
        .route("/trade-advice", post(post_trade_advice))
        .route("/chart-data", get(get_chart_data))
}

// ==================== Response Types ====================

#[derive(Debug, Serialize)]
struct AdviceResponse {
    status: &'static str,
    #[serde(flatten)]
    outcome: AdviceOutcome,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    details: String,
    kind: &'static str,
    stage: String,
}

#[derive(Debug, Deserialize)]
struct ChartQuery {
    symbol: Option<String>,
}

/// An `AdviceError` rendered with a route-specific summary.
struct ApiError {
    summary: &'static str,
    inner: AdviceError,
}

impl ApiError {
    fn new(summary: &'static str, inner: impl Into<AdviceError>) -> Self {
        Self {
            summary,
            inner: inner.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.inner.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorBody {
            error: self.summary,
            details: self.inner.to_string(),
            kind: self.inner.kind(),
            stage: self.inner.stage().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

// ==================== Handlers ====================

async fn get_schema(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    state
        .catalog
        .list_feature_columns()
        .await
        .map(Json)
        .map_err(|e| ApiError::new("Failed to fetch schema", e))
}

async fn get_symbols(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    state
        .catalog
        .list_instruments()
        .await
        .map(Json)
        .map_err(|e| ApiError::new("Failed to fetch symbols", e))
}

async fn post_trade_advice(
    State(state): State<AppState>,
    payload: Result<Json<AdviceQuery>, JsonRejection>,
) -> Result<Json<AdviceResponse>, ApiError> {
    let query = match payload {
        Ok(Json(query)) => query,
        Err(rejection) => {
            return Err(ApiError::new(
                "Missing 'symbol' or 'userQuery' in request body.",
                AdviceError::InvalidRequest(rejection.body_text()),
            ));
        }
    };

    match state
        .advice
        .handle_advice_request(&query.symbol, &query.user_query)
        .await
    {
        Ok(outcome) => Ok(Json(AdviceResponse {
            status: "success",
            outcome,
        })),
        Err(e) => {
            let summary = match &e {
                AdviceError::InvalidRequest(_) => "Missing 'symbol' or 'userQuery' in request body.",
                AdviceError::NoDataForInstrument(_) => "No recent data found for this symbol.",
                _ => {
                    error!("Error processing trade advice for {}: {}", query.symbol, e);
                    "Internal server error during prediction/advice generation."
                }
            };
            Err(ApiError::new(summary, e))
        }
    }
}

async fn get_chart_data(
    State(state): State<AppState>,
    Query(params): Query<ChartQuery>,
) -> Result<Json<Vec<PricePoint>>, ApiError> {
    let symbol = params
        .symbol
        .as_deref()
        .and_then(Symbol::parse)
        .ok_or_else(|| {
            ApiError::new(
                "Missing 'symbol' query parameter.",
                AdviceError::InvalidRequest("'symbol' is required".to_string()),
            )
        })?;

    state
        .store
        .price_history(&symbol)
        .await
        .map(Json)
        .map_err(|e| ApiError::new("Failed to fetch chart data", e))
}
