//! Test utilities: a scripted search provider.
//!
//! Handwritten mock for dependency injection in unit tests. Uses
//! `Arc<Mutex<_>>` so tests can assert on the queries that were issued.

use std::sync::{Arc, Mutex};

use crate::error::AppError;
use crate::models::RawHit;
use crate::traits::SearchProvider;

/// A search call as the provider saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedSearch {
    pub query: String,
    pub max_results: usize,
}

/// Mock provider that replays a queue of responses.
///
/// Each call pops the first response. Once the queue is empty, every call
/// returns no hits.
#[derive(Clone, Default)]
pub struct MockProvider {
    responses: Arc<Mutex<Vec<Result<Vec<RawHit>, AppError>>>>,
    pub calls: Arc<Mutex<Vec<RecordedSearch>>>,
}

impl MockProvider {
    pub fn new(hits: Vec<RawHit>) -> Self {
        Self::with_responses(vec![Ok(hits)])
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_error(error: AppError) -> Self {
        Self::with_responses(vec![Err(error)])
    }

    pub fn with_responses(responses: Vec<Result<Vec<RawHit>, AppError>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.query.clone())
            .collect()
    }
}

impl SearchProvider for MockProvider {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<RawHit>, AppError> {
        self.calls.lock().unwrap().push(RecordedSearch {
            query: query.to_string(),
            max_results,
        });

        let next = {
            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                None
            } else {
                Some(responses.remove(0))
            }
        };

        match next {
            Some(Ok(mut hits)) => {
                hits.truncate(max_results);
                Ok(hits)
            }
            Some(Err(e)) => Err(e),
            None => Ok(vec![]),
        }
    }
}

/// A LinkedIn profile hit whose title and snippet mention `location`.
pub fn linkedin_hit(slug: &str, name: &str, location: &str) -> RawHit {
    RawHit::new(
        format!("https://br.linkedin.com/in/{slug}"),
        format!("{name} - LinkedIn"),
        format!("{name} · Desenvolvedor · {location}"),
    )
}
