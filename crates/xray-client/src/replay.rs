use std::path::Path;
use std::sync::Arc;

use xray_core::error::AppError;
use xray_core::models::RawHit;
use xray_core::traits::SearchProvider;

/// Provider that answers every query with hits captured earlier.
///
/// Reads a JSON array of `{"href", "title", "body"}` objects (`url` and
/// `snippet` are accepted too). Useful for replaying a real search offline
/// while tuning the classifier.
#[derive(Debug, Clone)]
pub struct ReplayProvider {
    hits: Arc<Vec<RawHit>>,
}

impl ReplayProvider {
    pub fn new(hits: Vec<RawHit>) -> Self {
        Self {
            hits: Arc::new(hits),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, AppError> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        let items = value.as_array().ok_or_else(|| {
            AppError::ParseError("replay file must contain a JSON array of hits".into())
        })?;

        Ok(Self::new(items.iter().map(RawHit::from_json).collect()))
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

impl SearchProvider for ReplayProvider {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<RawHit>, AppError> {
        tracing::debug!(query, available = self.hits.len(), "Replaying saved hits");
        Ok(self.hits.iter().take(max_results).cloned().collect())
    }
}
