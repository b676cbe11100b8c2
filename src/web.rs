//! Inbound HTTP surface: the `/weather` route and its request pipeline.
//!
//! A request runs validation, then both upstream resolution steps under
//! one wall-clock budget, then renders the plain-text summary. The first
//! failure terminates the request; there is no retry at any stage.

use std::time::Duration;

use axum::{
    Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use tokio::time::timeout;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::error::UpstreamError;
use crate::forecast::ForecastClient;
use crate::models::Comfort;

/// Shared per-process state, cloned into each request task. Read-only at
/// request time, so no locking.
#[derive(Clone)]
pub struct AppState {
    pub forecast: ForecastClient,
    pub request_budget: Duration,
}

/// Accept values we are willing to answer with a plain-text body. An
/// absent accept header counts as accepting anything.
const ACCEPTED_TYPES: [&str; 3] = ["*/*", "text/*", "text/plain"];

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/weather", get(weather).fallback(method_not_allowed))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct WeatherQuery {
    lat: Option<String>,
    lon: Option<String>,
}

/// Which resolution step failed, for the step-specific error prefix.
enum Step {
    Points(UpstreamError),
    Forecast(UpstreamError),
}

async fn weather(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<WeatherQuery>,
) -> Response {
    if let Err(rejection) = check_accept(&headers) {
        return rejection;
    }

    let (lat, lon) = match parse_coordinates(&query) {
        Ok(coordinates) => coordinates,
        Err(rejection) => return rejection,
    };

    // One budget for both chained upstream calls. A slow points lookup
    // leaves correspondingly less time for the forecast fetch, and running
    // out aborts whichever call is in flight.
    let outcome = timeout(state.request_budget, async {
        let endpoint = state
            .forecast
            .resolve_endpoint(lat, lon)
            .await
            .map_err(Step::Points)?;
        state
            .forecast
            .resolve_forecast(&endpoint)
            .await
            .map_err(Step::Forecast)
    })
    .await;

    let summary = match outcome {
        Ok(Ok(summary)) => summary,
        Ok(Err(step)) => return upstream_failure(step),
        Err(_) => {
            let message = UpstreamError::DeadlineExceeded.to_string();
            warn!(%message, "request budget exhausted");
            return plain_error(StatusCode::INTERNAL_SERVER_ERROR, &message);
        }
    };

    let comfort = Comfort::from_fahrenheit(summary.temperature);
    let body = format!("{}, {}\n", summary.short_forecast, comfort);
    (
        [
            (header::CONTENT_TYPE, "text/plain".to_string()),
            (header::CONTENT_LENGTH, body.len().to_string()),
        ],
        body,
    )
        .into_response()
}

async fn not_found() -> Response {
    plain_error(StatusCode::NOT_FOUND, "only /weather allowed")
}

async fn method_not_allowed() -> Response {
    plain_error(StatusCode::METHOD_NOT_ALLOWED, "only GET allowed")
}

fn check_accept(headers: &HeaderMap) -> Result<(), Response> {
    let accept = match headers.get(header::ACCEPT) {
        None => return Ok(()),
        Some(value) => value.to_str().unwrap_or_default(),
    };

    if ACCEPTED_TYPES.contains(&accept) {
        Ok(())
    } else {
        Err(plain_error(
            StatusCode::NOT_ACCEPTABLE,
            "must accept text/plain",
        ))
    }
}

fn parse_coordinates(query: &WeatherQuery) -> Result<(f64, f64), Response> {
    let (Some(lat), Some(lon)) = (&query.lat, &query.lon) else {
        return Err(missing_params());
    };
    if lat.is_empty() || lon.is_empty() {
        return Err(missing_params());
    }

    let lat = lat.parse::<f64>().map_err(|e| {
        plain_error(
            StatusCode::BAD_REQUEST,
            &format!("invalid 'lat' query param: {e}"),
        )
    })?;
    let lon = lon.parse::<f64>().map_err(|e| {
        plain_error(
            StatusCode::BAD_REQUEST,
            &format!("invalid 'lon' query param: {e}"),
        )
    })?;

    Ok((lat, lon))
}

fn missing_params() -> Response {
    plain_error(
        StatusCode::BAD_REQUEST,
        "query params 'lat' and 'lon' are required",
    )
}

/// Map a failed resolution step to a 500 with the underlying message in
/// the body. Surfacing the upstream error text is a deliberate
/// diagnosability tradeoff over masking it.
fn upstream_failure(step: Step) -> Response {
    let message = match step {
        Step::Points(e) => format!("failed to fetch points: {e}"),
        Step::Forecast(e) => format!("failed to fetch forecast: {e}"),
    };
    warn!(%message, "upstream resolution failed");
    plain_error(StatusCode::INTERNAL_SERVER_ERROR, &message)
}

fn plain_error(status: StatusCode, message: &str) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "text/plain")],
        format!("{message}\n"),
    )
        .into_response()
}
