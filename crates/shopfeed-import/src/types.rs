use serde::{Deserialize, Serialize};
use serde_json::Value;
use shopfeed_core::ImportPayload;

/// Field the catalog service uses to detect an existing product.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchBy {
    #[default]
    Name,
    Sku,
}

impl std::fmt::Display for MatchBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchBy::Name => write!(f, "name"),
            MatchBy::Sku => write!(f, "sku"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOptions {
    /// Leave existing products untouched instead of updating them.
    pub skip_duplicates: bool,
    pub match_by: MatchBy,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            skip_duplicates: true,
            match_by: MatchBy::Name,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ImportRequest<'a> {
    pub products: &'a [ImportPayload],
    pub skip_duplicates: bool,
    pub match_by: MatchBy,
}

/// Per-batch counts reported by the catalog service.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct BatchResponse {
    #[serde(default)]
    pub imported: u64,
    #[serde(default)]
    pub skipped: u64,
    #[serde(default)]
    pub updated: u64,
    #[serde(default)]
    pub errors: Vec<Value>,
}

/// Totals across every batch of one import run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportSummary {
    pub imported: u64,
    pub skipped: u64,
    pub updated: u64,
    /// Errors reported by the service plus one entry per failed batch.
    pub errors: Vec<Value>,
}

impl ImportSummary {
    pub(crate) fn absorb(&mut self, batch: BatchResponse) {
        self.imported += batch.imported;
        self.skipped += batch.skipped;
        self.updated += batch.updated;
        self.errors.extend(batch.errors);
    }

    pub(crate) fn record_failure(&mut self, batch: usize, error: impl Into<String>) {
        self.errors
            .push(serde_json::json!({ "batch": batch, "error": error.into() }));
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn match_by_serializes_lowercase() {
        assert_eq!(serde_json::to_value(MatchBy::Name).unwrap(), json!("name"));
        assert_eq!(serde_json::to_value(MatchBy::Sku).unwrap(), json!("sku"));
    }

    #[test]
    fn request_uses_camel_case_keys() {
        let request = ImportRequest {
            products: &[],
            skip_duplicates: false,
            match_by: MatchBy::Sku,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"products": [], "skipDuplicates": false, "matchBy": "sku"})
        );
    }

    #[test]
    fn batch_response_tolerates_missing_counts() {
        let batch: BatchResponse = serde_json::from_str(r#"{"imported": 3}"#).unwrap();
        assert_eq!(batch.imported, 3);
        assert_eq!(batch.skipped, 0);
        assert!(batch.errors.is_empty());
    }

    #[test]
    fn summary_accumulates_batches() {
        let mut summary = ImportSummary::default();
        summary.absorb(BatchResponse {
            imported: 2,
            skipped: 1,
            updated: 0,
            errors: vec![json!({"row": 3, "error": "duplicate"})],
        });
        summary.absorb(BatchResponse {
            imported: 4,
            ..BatchResponse::default()
        });
        summary.record_failure(2, "HTTP 500");

        assert_eq!(summary.imported, 6);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.errors.len(), 2);
        assert_eq!(summary.errors[1], json!({"batch": 2, "error": "HTTP 500"}));
    }
}
