//! Generic JSON-over-HTTPS fetch against the weather API.

use reqwest::{Client, StatusCode, header};
use serde::de::DeserializeOwned;

use crate::error::UpstreamError;

/// Media type the weather API serves for linked-data JSON.
pub const ACCEPT_LD_JSON: &str = "application/ld+json";

/// GET `url` with an `application/ld+json` accept header and decode the
/// body into `T`. One request, no retries; the first failure is final.
///
/// The body is fully read before decoding so a truncated read and a
/// malformed payload surface as different errors. Unknown fields are
/// ignored and missing fields take their serde defaults. On every exit
/// path the response is dropped, which releases the connection back to
/// the pool.
pub async fn get_json<T: DeserializeOwned>(client: &Client, url: &str) -> Result<T, UpstreamError> {
    let response = client
        .get(url)
        .header(header::ACCEPT, ACCEPT_LD_JSON)
        .send()
        .await
        .map_err(UpstreamError::Transport)?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(UpstreamError::Status(status.as_u16()));
    }

    let body = response.bytes().await.map_err(UpstreamError::Body)?;

    Ok(serde_json::from_slice(&body)?)
}
