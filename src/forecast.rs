//! Two-step forecast resolution against the NWS grid API.
//!
//! A coordinate pair first resolves to a gridpoint forecast endpoint via
//! the points lookup, then that endpoint is fetched and reduced to the
//! first forecast period. Both calls draw from the caller's single
//! remaining time budget; nothing here renews a deadline.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::UpstreamConfig;
use crate::error::UpstreamError;
use crate::fetch;
use crate::models::ForecastSummary;

/// Client for the points lookup and the gridpoint forecast it refers to.
///
/// Cheap to clone; all clones share one connection pool and are read-only
/// at request time.
#[derive(Debug, Clone)]
pub struct ForecastClient {
    http: Client,
    points_base_url: String,
}

#[derive(Debug, Deserialize)]
struct PointsResponse {
    #[serde(default)]
    forecast: String,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    periods: Vec<Period>,
}

#[derive(Debug, Deserialize)]
struct Period {
    #[serde(default)]
    temperature: f64,
    #[serde(rename = "shortForecast", default)]
    short_forecast: String,
}

impl ForecastClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        Ok(Self {
            http,
            points_base_url: config.points_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Resolve coordinates to the gridpoint forecast endpoint URL.
    ///
    /// A payload without a forecast endpoint fails with
    /// [`UpstreamError::MissingForecast`] rather than defaulting.
    pub async fn resolve_endpoint(&self, lat: f64, lon: f64) -> Result<String, UpstreamError> {
        let url = format!("{}/points/{},{}", self.points_base_url, lat, lon);
        debug!(%url, "resolving forecast endpoint");

        let points: PointsResponse = fetch::get_json(&self.http, &url).await?;
        if points.forecast.is_empty() {
            return Err(UpstreamError::MissingForecast);
        }

        Ok(points.forecast)
    }

    /// Fetch the forecast endpoint and reduce it to the first period.
    ///
    /// Temperatures are taken as Fahrenheit; the API's `temperatureUnit`
    /// field is not consulted. Celsius gridpoints are unsupported.
    pub async fn resolve_forecast(&self, endpoint: &str) -> Result<ForecastSummary, UpstreamError> {
        debug!(endpoint, "fetching forecast");

        let forecast: ForecastResponse = fetch::get_json(&self.http, endpoint).await?;
        let first = forecast
            .periods
            .into_iter()
            .next()
            .ok_or(UpstreamError::NoPeriods)?;

        Ok(ForecastSummary {
            short_forecast: first.short_forecast,
            temperature: first.temperature,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> ForecastClient {
        let config = UpstreamConfig {
            points_base_url: base_url.to_string(),
            ..UpstreamConfig::default()
        };
        ForecastClient::new(&config).expect("client should build")
    }

    #[tokio::test]
    async fn test_resolve_endpoint_returns_stubbed_url() {
        let server = MockServer::start().await;
        let endpoint = "https://api.weather.gov/gridpoints/EAX/44,51/forecast";
        Mock::given(method("GET"))
            .and(path("/points/39.0997,-94.5786"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "forecast": endpoint })),
            )
            .mount(&server)
            .await;

        let resolved = test_client(&server.uri())
            .resolve_endpoint(39.0997, -94.5786)
            .await
            .expect("resolution should succeed");
        assert_eq!(resolved, endpoint);
    }

    #[tokio::test]
    async fn test_resolve_endpoint_fails_when_field_missing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "other": "field" })),
            )
            .mount(&server)
            .await;

        let result = test_client(&server.uri()).resolve_endpoint(1.0, 2.0).await;
        assert!(matches!(result, Err(UpstreamError::MissingForecast)));
    }

    #[tokio::test]
    async fn test_resolve_endpoint_propagates_fetch_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let result = test_client(&server.uri()).resolve_endpoint(1.0, 2.0).await;
        assert!(matches!(result, Err(UpstreamError::Status(404))));
    }

    #[tokio::test]
    async fn test_resolve_forecast_takes_first_period_only() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "periods": [
                    { "temperature": 72, "shortForecast": "Sunny" },
                    { "temperature": 55, "shortForecast": "Clear" },
                ],
            })))
            .mount(&server)
            .await;

        let summary = test_client(&server.uri())
            .resolve_forecast(&format!("{}/forecast", server.uri()))
            .await
            .expect("resolution should succeed");
        assert_eq!(
            summary,
            ForecastSummary {
                short_forecast: "Sunny".to_string(),
                temperature: 72.0,
            }
        );
    }

    #[tokio::test]
    async fn test_resolve_forecast_fails_on_empty_periods() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "periods": [] })),
            )
            .mount(&server)
            .await;

        let result = test_client(&server.uri())
            .resolve_forecast(&server.uri())
            .await;
        assert!(matches!(result, Err(UpstreamError::NoPeriods)));
    }

    #[tokio::test]
    async fn test_resolve_forecast_fails_when_periods_absent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let result = test_client(&server.uri())
            .resolve_forecast(&server.uri())
            .await;
        assert!(matches!(result, Err(UpstreamError::NoPeriods)));
    }
}
