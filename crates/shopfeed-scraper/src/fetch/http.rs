//! Shared HTTP plumbing for the static fetcher and API sources.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Response, StatusCode};

use crate::error::ScraperError;
use crate::urls::extract_domain;

/// Builds a client with the given timeout and default headers.
///
/// Header pairs that are not valid HTTP header names or values are skipped
/// with a warning.
pub(crate) fn build_client(
    timeout_secs: u64,
    headers: &[(&str, &str)],
) -> Result<Client, ScraperError> {
    let mut default_headers = HeaderMap::new();
    for (name, value) in headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                default_headers.insert(name, value);
            }
            _ => tracing::warn!(header = *name, "skipping invalid default header"),
        }
    }

    Ok(Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .default_headers(default_headers)
        .build()?)
}

/// Maps non-success statuses to typed errors.
///
/// 429 carries the `Retry-After` seconds (60 when absent or unparseable).
pub(crate) fn check_status(response: Response, url: &str) -> Result<Response, ScraperError> {
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after_secs = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(60);
        return Err(ScraperError::RateLimited {
            domain: extract_domain(url),
            retry_after_secs,
        });
    }

    if status == StatusCode::NOT_FOUND {
        return Err(ScraperError::NotFound {
            url: url.to_owned(),
        });
    }

    if !status.is_success() {
        return Err(ScraperError::UnexpectedStatus {
            status: status.as_u16(),
            url: url.to_owned(),
        });
    }

    Ok(response)
}
