use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

use crate::classify::{Verdict, classify, to_candidate};
use crate::error::AppError;
use crate::mode::{MODE_REGISTRY, SearchMode};
use crate::models::{CandidateResult, ResultSet};
use crate::query::TITLE_OPERATOR;
use crate::traits::SearchProvider;

/// Tuning knobs for [`SearchService`].
#[derive(Debug, Clone)]
pub struct SearchSettings {
    /// Raw hits requested per wanted result, to absorb classifier rejections.
    pub overfetch_ratio: usize,
    /// Upper bound on raw hits requested in one pass.
    pub max_raw_hits: usize,
    /// Pause before issuing the fallback query.
    pub fallback_delay: Duration,
}

impl SearchSettings {
    pub fn with_fallback_delay(mut self, delay: Duration) -> Self {
        self.fallback_delay = delay;
        self
    }

    /// Number of raw hits to request for `limit` results.
    pub fn raw_hit_budget(&self, limit: usize) -> usize {
        limit
            .saturating_mul(self.overfetch_ratio)
            .min(self.max_raw_hits)
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            overfetch_ratio: 5,
            max_raw_hits: 60,
            fallback_delay: Duration::from_millis(1500),
        }
    }
}

/// Runs a dork query against a provider and turns the hits into candidates.
///
/// A primary pass runs the query as given. If it produces no candidates the
/// service waits [`SearchSettings::fallback_delay`] and runs one relaxed
/// query (see [`simplify_query`]). Provider failures are logged and count as
/// an empty pass. Holds no mutable state, so one service can serve
/// concurrent searches.
pub struct SearchService<P: SearchProvider> {
    provider: P,
    settings: SearchSettings,
}

impl<P: SearchProvider> SearchService<P> {
    pub fn new(provider: P) -> Self {
        Self::with_settings(provider, SearchSettings::default())
    }

    pub fn with_settings(provider: P, settings: SearchSettings) -> Self {
        Self { provider, settings }
    }

    /// Search for up to `limit` candidates.
    ///
    /// Never fails: an empty [`ResultSet`] is the answer when both passes
    /// come back empty.
    pub async fn run(
        &self,
        query: &str,
        mode: SearchMode,
        limit: usize,
        expected_location: Option<&str>,
    ) -> ResultSet {
        if limit == 0 {
            return ResultSet::default();
        }

        let mut results = self.pass(query, mode, limit, expected_location).await;

        if results.is_empty() {
            tracing::info!(mode = %mode, "No candidates, trying simplified query");
            tokio::time::sleep(self.settings.fallback_delay).await;

            let simplified = simplify_query(query, mode);
            if simplified != query {
                tracing::info!(mode = %mode, query = %simplified, "Fallback query");
                results = self.pass(&simplified, mode, limit, expected_location).await;
            } else {
                tracing::info!(mode = %mode, "Simplified query unchanged, skipping fallback");
            }
        }

        let set = ResultSet::dedup_from(results);
        tracing::info!(mode = %mode, total = set.len(), "Search finished");
        set
    }

    /// One provider call plus classification, stopping at `limit` accepts.
    async fn pass(
        &self,
        query: &str,
        mode: SearchMode,
        limit: usize,
        expected_location: Option<&str>,
    ) -> Vec<CandidateResult> {
        let budget = self.settings.raw_hit_budget(limit);
        tracing::info!(mode = %mode, budget, query = %query, "Searching");

        let hits = match self.provider.search(query, budget).await {
            Ok(hits) => hits,
            Err(e) => {
                log_provider_error(&e, mode);
                return Vec::new();
            }
        };
        tracing::info!(mode = %mode, raw = hits.len(), "Provider returned hits");

        let mut accepted = Vec::new();
        for hit in &hits {
            match classify(hit, mode, expected_location) {
                Verdict::Accept => accepted.push(to_candidate(hit, mode)),
                Verdict::Reject(reason) => {
                    tracing::debug!(url = %hit.url, reason = reason.as_str(), "Rejected hit");
                }
            }
            if accepted.len() >= limit {
                break;
            }
        }

        tracing::info!(mode = %mode, accepted = accepted.len(), "Pass complete");
        accepted
    }
}

fn log_provider_error(error: &AppError, mode: SearchMode) {
    if error.is_provider_failure() {
        tracing::warn!(mode = %mode, error = %error, "Search provider failed, treating as empty");
    } else {
        tracing::error!(mode = %mode, error = %error, "Search failed, treating as empty");
    }
}

/// Relaxed restriction appended to a fallback query.
fn fallback_restriction(mode: SearchMode) -> &'static str {
    match mode {
        SearchMode::LinkedIn => "LinkedIn perfil",
        SearchMode::JobPortals => {
            "(site:trabalhabrasil.com.br OR site:infojobs.com.br OR site:vagas.com.br) curriculo"
        }
        SearchMode::DocumentFiles => "(filetype:pdf OR filetype:docx) curriculo",
        SearchMode::SocialMedia => "(site:instagram.com OR site:facebook.com)",
        SearchMode::HrSpreadsheets => "(filetype:xls OR filetype:csv) lista candidatos",
    }
}

/// Every literal fragment of every base dork, longest first so that
/// `filetype:xlsx` goes before `filetype:xls`.
static DORK_FRAGMENTS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    let mut fragments: Vec<&'static str> = MODE_REGISTRY
        .iter()
        .flat_map(|c| c.base_dork.split(['(', ')']))
        .flat_map(|group| group.split(" OR "))
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .collect();
    fragments.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
    fragments.dedup();
    fragments
});

/// Stands in for a removed fragment until the groups around it are tidied.
const REMOVED: &str = "\u{1}";

/// Patterns that tidy OR-groups emptied by fragment removal. Every pattern
/// is anchored on a [`REMOVED`] marker, so `OR` tokens typed by the user
/// are left alone.
static GROUP_CLEANUP: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"\x01\s+OR\s+\x01", "\x01 \x01"),
        (r"\(\s*(?:\x01\s*)+\)", "\x01"),
        (r"\(\s*\x01\s+OR\s+", "("),
        (r"\s+OR\s+\x01\s*\)", ")"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| {
        (
            Regex::new(pattern).expect("cleanup pattern is valid"),
            replacement,
        )
    })
    .collect()
});

/// Derive the relaxed fallback query.
///
/// Removes every base-dork fragment of every mode found verbatim in `query`
/// along with the OR-groups that leaves empty, appends the mode's relaxed
/// restriction, then drops `intitle:` and empty quote pairs.
pub fn simplify_query(query: &str, mode: SearchMode) -> String {
    let mut simplified = query.to_string();
    for fragment in DORK_FRAGMENTS.iter() {
        if simplified.contains(*fragment) {
            simplified = simplified.replace(*fragment, REMOVED);
        }
    }

    let simplified = format!(
        "{} {}",
        strip_empty_groups(&simplified),
        fallback_restriction(mode)
    )
    .replace(TITLE_OPERATOR, "")
    .replace("\"\"", "");

    simplified.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn strip_empty_groups(query: &str) -> String {
    let mut current = query.to_string();
    loop {
        let mut next = current.clone();
        for (re, replacement) in GROUP_CLEANUP.iter() {
            next = re.replace_all(&next, *replacement).into_owned();
        }
        if next == current {
            return current.replace(REMOVED, " ");
        }
        current = next;
    }
}
