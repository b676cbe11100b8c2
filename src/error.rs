//! Error types for upstream weather resolution.

use thiserror::Error;

/// Failure of an upstream fetch, or of the resolution layered on top of it.
///
/// The first four variants come out of the HTTP layer. `MissingForecast`
/// and `NoPeriods` are structurally valid but semantically empty payloads;
/// they propagate instead of silently defaulting. `DeadlineExceeded` is the
/// shared per-request budget running out, covering both chained calls.
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// Connection or send failure, including a timed-out or aborted request
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// Upstream answered with something other than 200
    #[error("unexpected status code: {0}")]
    Status(u16),

    /// The response body could not be read to completion
    #[error("failed to read body: {0}")]
    Body(#[source] reqwest::Error),

    /// The body was not valid JSON of the expected shape
    #[error("failed to decode body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Points payload decoded fine but carried no forecast endpoint
    #[error("no forecast endpoint in points response")]
    MissingForecast,

    /// Forecast payload decoded fine but its periods sequence was empty
    #[error("no periods found")]
    NoPeriods,

    /// The per-request wall-clock budget ran out
    #[error("deadline exceeded while fetching upstream data")]
    DeadlineExceeded,
}

impl From<tokio::time::error::Elapsed> for UpstreamError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        UpstreamError::DeadlineExceeded
    }
}

impl UpstreamError {
    /// Whether the failure is a data problem (payload decoded but unusable)
    /// rather than a transport one.
    #[must_use]
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            UpstreamError::Decode(_) | UpstreamError::MissingForecast | UpstreamError::NoPeriods
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message_carries_code() {
        let err = UpstreamError::Status(503);
        assert_eq!(err.to_string(), "unexpected status code: 503");
    }

    #[test]
    fn test_empty_payload_messages() {
        assert_eq!(
            UpstreamError::MissingForecast.to_string(),
            "no forecast endpoint in points response"
        );
        assert_eq!(UpstreamError::NoPeriods.to_string(), "no periods found");
    }

    #[tokio::test]
    async fn test_elapsed_converts_to_deadline_exceeded() {
        let elapsed = tokio::time::timeout(
            std::time::Duration::from_millis(1),
            std::future::pending::<()>(),
        )
        .await
        .expect_err("pending future should time out");
        let err: UpstreamError = elapsed.into();
        assert!(matches!(err, UpstreamError::DeadlineExceeded));
    }

    #[test]
    fn test_data_error_classification() {
        assert!(UpstreamError::NoPeriods.is_data_error());
        assert!(UpstreamError::MissingForecast.is_data_error());
        assert!(!UpstreamError::Status(500).is_data_error());
        assert!(!UpstreamError::DeadlineExceeded.is_data_error());
    }
}
