//! Batched POSTs to `<base>/api/products/import`.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use shopfeed_core::{CanonicalProduct, ImportPayload};

use crate::error::ImportError;
use crate::types::{BatchResponse, ImportOptions, ImportRequest, ImportSummary};

pub const DEFAULT_BATCH_SIZE: usize = 50;

const IMPORT_PATH: &str = "api/products/import";

/// Client for the catalog service's bulk import endpoint.
///
/// Use [`ImportClient::new`] with the service's base URL; tests point it at a
/// `wiremock` server.
pub struct ImportClient {
    client: Client,
    endpoint: Url,
    batch_size: usize,
}

impl ImportClient {
    /// # Errors
    ///
    /// - [`ImportError::InvalidBaseUrl`] if `base_url` does not parse.
    /// - [`ImportError::Http`] if the underlying `reqwest::Client` cannot be
    ///   constructed.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, ImportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("shopfeed/0.1 (catalog-import)")
            .build()?;

        // A trailing slash makes `join` append to the base path instead of
        // replacing its last segment.
        let normalised = format!("{}/", base_url.trim().trim_end_matches('/'));
        let endpoint = Url::parse(&normalised)
            .and_then(|base| base.join(IMPORT_PATH))
            .map_err(|e| ImportError::InvalidBaseUrl {
                url: base_url.to_owned(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            endpoint,
            batch_size: DEFAULT_BATCH_SIZE,
        })
    }

    /// Sets the number of products per request. Zero is raised to one.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    /// Converts `products` to import payloads and posts them in batches.
    ///
    /// Never fails as a whole. A batch answered with anything but 200 is
    /// recorded as `{"batch": i, "error": "HTTP <status>"}` and the run
    /// continues. A refused connection is recorded and ends the run.
    pub async fn import(
        &self,
        products: &[CanonicalProduct],
        options: &ImportOptions,
    ) -> ImportSummary {
        let payloads: Vec<ImportPayload> = products
            .iter()
            .map(CanonicalProduct::to_import_payload)
            .collect();
        let batches = payloads.len().div_ceil(self.batch_size);
        tracing::info!(
            endpoint = self.endpoint.as_str(),
            products = payloads.len(),
            batches,
            "sending products to import endpoint"
        );

        let mut summary = ImportSummary::default();
        for (index, batch) in payloads.chunks(self.batch_size).enumerate() {
            tracing::info!(batch = index + 1, of = batches, items = batch.len(), "posting batch");
            let request = ImportRequest {
                products: batch,
                skip_duplicates: options.skip_duplicates,
                match_by: options.match_by,
            };

            let response = match self.client.post(self.endpoint.clone()).json(&request).send().await {
                Ok(response) => response,
                Err(e) if e.is_connect() => {
                    tracing::error!(
                        endpoint = self.endpoint.as_str(),
                        error = %e,
                        "cannot connect to import endpoint, stopping"
                    );
                    summary.record_failure(index, "Connection refused");
                    break;
                }
                Err(e) => {
                    tracing::error!(batch = index, error = %e, "batch request failed");
                    summary.record_failure(index, e.to_string());
                    continue;
                }
            };

            let status = response.status();
            if status != StatusCode::OK {
                let body = response.text().await.unwrap_or_default();
                let excerpt: String = body.chars().take(200).collect();
                tracing::error!(batch = index, status = status.as_u16(), body = %excerpt, "batch rejected");
                summary.record_failure(index, format!("HTTP {}", status.as_u16()));
                continue;
            }

            match response.json::<BatchResponse>().await {
                Ok(counts) => {
                    tracing::info!(
                        batch = index + 1,
                        imported = counts.imported,
                        skipped = counts.skipped,
                        updated = counts.updated,
                        "batch accepted"
                    );
                    summary.absorb(counts);
                }
                Err(e) => {
                    tracing::error!(batch = index, error = %e, "unreadable batch response");
                    summary.record_failure(index, e.to_string());
                }
            }
        }

        summary
    }
}
