pub mod classify;
pub mod error;
pub mod mode;
pub mod models;
pub mod query;
pub mod search;
pub mod traits;

#[cfg(test)]
pub(crate) mod testutil;

pub use classify::{RejectReason, Verdict, accept, classify};
pub use error::AppError;
pub use mode::{MODE_REGISTRY, SearchMode, SearchModeConfig};
pub use models::{CandidateResult, NO_EMAIL, RawHit, ResultSet};
pub use query::{CandidateProfile, build_query};
pub use search::{SearchService, SearchSettings, simplify_query};
pub use traits::SearchProvider;
