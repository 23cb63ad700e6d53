//! Dork query composition.
//!
//! A query is a sequence of term groups appended in a fixed order:
//! base dork, role + location, seniority, skills, companies, exclusions,
//! availability. Later groups never reorder earlier ones and identical
//! terms in different groups are emitted twice.

use serde::{Deserialize, Serialize};

use crate::mode::{SearchMode, SearchModeConfig};

/// Words that show up in résumés but rarely in price lists or reports.
const RESUME_INDICATORS: &str = "(\"experiência\" OR \"formação\" OR \"educação\" OR \"contato\")";

/// Phrases people use to signal immediate availability.
const OPEN_TO_WORK: &str =
    "(\"open to work\" OR \"aberto a propostas\" OR \"disponível\" OR \"imediato\" OR \"cv\")";

pub const TITLE_OPERATOR: &str = "intitle:";

/// User-supplied attributes for one search request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub role: String,
    pub location: String,
    #[serde(default)]
    pub seniority: Option<String>,
    /// Comma-separated.
    #[serde(default)]
    pub skills: Option<String>,
    #[serde(default)]
    pub exact_match: bool,
    /// Comma-separated terms to exclude with `-term`.
    #[serde(default)]
    pub exclude_terms: Option<String>,
    /// Comma-separated.
    #[serde(default)]
    pub target_companies: Option<String>,
    /// Accepted for compatibility. Only the mode's `force_title_match`
    /// decides whether the role gets `intitle:`.
    #[serde(default)]
    pub use_title_operator: bool,
    #[serde(default)]
    pub open_to_work: bool,
    #[serde(default)]
    pub mode: SearchMode,
}

impl CandidateProfile {
    pub fn new(role: impl Into<String>, location: impl Into<String>, mode: SearchMode) -> Self {
        Self {
            role: role.into(),
            location: location.into(),
            mode,
            ..Default::default()
        }
    }
}

/// Build the full dork query for a profile.
///
/// Deterministic: the same profile always yields the same string.
pub fn build_query(profile: &CandidateProfile) -> String {
    let config = profile.mode.config();
    let mut parts: Vec<String> = vec![config.base_dork.to_string()];

    push_role_and_location(&mut parts, profile, config);

    if let Some(seniority) = non_blank(&profile.seniority) {
        parts.push(quote(seniority));
    }

    if let Some(group) = profile.skills.as_deref().and_then(or_group) {
        parts.push(group);
    }

    if let Some(group) = profile.target_companies.as_deref().and_then(or_group) {
        parts.push(group);
    }

    if let Some(excludes) = profile.exclude_terms.as_deref() {
        parts.extend(split_list(excludes).map(|term| format!("-{term}")));
    }

    if profile.open_to_work {
        parts.push(OPEN_TO_WORK.to_string());
    }

    parts.join(" ").trim().to_string()
}

fn push_role_and_location(
    parts: &mut Vec<String>,
    profile: &CandidateProfile,
    config: &SearchModeConfig,
) {
    match config.mode {
        SearchMode::DocumentFiles => {
            parts.push(quote(&profile.role));
            parts.push(quote(&profile.location));
            parts.push(RESUME_INDICATORS.to_string());
        }
        SearchMode::LinkedIn
        | SearchMode::JobPortals
        | SearchMode::SocialMedia
        | SearchMode::HrSpreadsheets => {
            if profile.exact_match || config.force_title_match {
                if config.force_title_match {
                    parts.push(format!("{TITLE_OPERATOR}{}", quote(&profile.role)));
                } else {
                    parts.push(quote(&profile.role));
                }
            } else {
                parts.push(profile.role.clone());
            }
            parts.push(quote(&profile.location));
        }
    }
}

fn quote(term: &str) -> String {
    format!("\"{}\"", term.trim())
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|t| !t.is_empty())
}

/// One quoted term, or a parenthesized OR-group when the list has several.
fn or_group(raw: &str) -> Option<String> {
    let terms: Vec<String> = split_list(raw).map(quote).collect();
    match terms.len() {
        0 => None,
        1 => terms.into_iter().next(),
        _ => Some(format!("({})", terms.join(" OR "))),
    }
}
