//! Shared HTTP response helpers.
//!
//! Centralizes status-code checks (429 rate limiting with `Retry-After`
//! parsing, non-success → [`RemoteError::Api`]) so the schema source stays
//! focused on request construction.

use crate::error::RemoteError;

/// Seconds to wait when a 429 carries no usable `Retry-After`.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Check an HTTP response for common error conditions.
///
/// Returns the response unchanged on success. Handles:
/// - **429 Too Many Requests** → [`RemoteError::RateLimited`]
/// - **Non-success status** → [`RemoteError::Api`] with status code and
///   response body.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, RemoteError> {
    if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(RemoteError::RateLimited {
            retry_after_secs: parse_retry_after(&resp),
        });
    }
    if !resp.status().is_success() {
        return Err(RemoteError::Api {
            status: resp.status().as_u16(),
            message: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp)
}

/// Parse the `Retry-After` header as seconds.
fn parse_retry_after(resp: &reqwest::Response) -> u64 {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_response(status: u16, retry_after: Option<&str>, body: &'static str) -> reqwest::Response {
        let mut builder = ::http::Response::builder().status(status);
        if let Some(value) = retry_after {
            builder = builder.header("Retry-After", value);
        }
        reqwest::Response::from(builder.body(body).unwrap())
    }

    #[test]
    fn retry_after_header_is_seconds() {
        assert_eq!(parse_retry_after(&mock_response(429, Some("120"), "")), 120);
    }

    #[test]
    fn retry_after_falls_back_when_missing_or_http_date() {
        assert_eq!(parse_retry_after(&mock_response(429, None, "")), 60);
        assert_eq!(
            parse_retry_after(&mock_response(429, Some("Wed, 21 Oct 2015 07:28:00 GMT"), "")),
            60
        );
    }

    #[tokio::test]
    async fn rate_limited_response() {
        let err = check_response(mock_response(429, Some("30"), "")).await.unwrap_err();
        assert!(matches!(err, RemoteError::RateLimited { retry_after_secs: 30 }));
    }

    #[tokio::test]
    async fn not_found_keeps_body() {
        let err = check_response(mock_response(404, None, "404: Not Found"))
            .await
            .unwrap_err();
        match err {
            RemoteError::Api { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "404: Not Found");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn success_passes_through() {
        assert!(check_response(mock_response(200, None, "{}")).await.is_ok());
    }
}
