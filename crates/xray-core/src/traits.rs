use std::future::Future;

use crate::error::AppError;
use crate::models::RawHit;

/// A general-purpose web search backend.
///
/// Stateless per call. Implementations map whatever the backend returns into
/// [`RawHit`] at this boundary, defaulting missing fields to empty strings.
pub trait SearchProvider: Send + Sync + Clone {
    /// Run `query` and return up to `max_results` hits in provider order.
    fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> impl Future<Output = Result<Vec<RawHit>, AppError>> + Send;
}
