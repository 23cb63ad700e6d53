//! Candidate-vs-noise classification of raw search hits.
//!
//! [`classify`] runs four checks in order: URL shape, job-posting override,
//! noise title (file modes only), and location containment. A hit is a
//! candidate only if the URL shape passes and none of the later checks fire.
//! All functions here are pure.

use std::sync::LazyLock;

use regex::Regex;

use crate::mode::SearchMode;
use crate::models::{CandidateResult, NO_EMAIL, RawHit};

/// Extensions accepted by the document and spreadsheet modes.
const DOCUMENT_EXTENSIONS: &[&str] = &[
    ".pdf", ".doc", ".docx", ".txt", ".rtf", ".xls", ".xlsx", ".csv",
];

const SOCIAL_DOMAINS: &[&str] = &["instagram.com", "facebook.com"];

/// Path markers of listings, company pages, logins, searches and articles.
const JOB_PATHS: &[&str] = &[
    "/vaga/",
    "/vagas/",
    "/job/",
    "/jobs/",
    "/oportunidade/",
    "/oportunidades/",
    "/empresa/",
    "/empresas/",
    "/company/",
    "/companies/",
    "/login",
    "/signin",
    "/cadastro",
    "/home",
    "/search",
    "/busca",
    "/trabalhe-conosco",
    "/carreiras",
    "/blog/",
    "/artigo/",
    "/noticia/",
];

const NON_CANDIDATE_HOSTS: &[&str] = &["profissoes.vagas.com.br", "blog."];

const LISTING_TITLE_PREFIXES: &[&str] = &[
    "vaga de",
    "vagas de",
    "oportunidade de",
    "estágio em",
    "trabalhe conosco",
    "como criar",
    "modelo de",
    "dicas para",
    "o que faz",
    "quanto ganha",
];

const NOISE_TITLES: &[&str] = &[
    "relatório",
    "report",
    "ata de",
    "diário oficial",
    "edital",
    "manual",
    "preço",
    "cotação",
    "boleto",
    "invoice",
    "nota fiscal",
];

const LINKEDIN_PROFILE_PATH: &str = "linkedin.com/in/";

const LINKEDIN_TITLE_NOISE: &[&str] = &[" - LinkedIn", " | LinkedIn", " - Brasil", " - Brazil"];

const PORTAL_TITLE_NOISE: &[&str] = &[
    " | Vagas.com.br",
    "Curriculum de ",
    " - Vagas.com.br",
    " | InfoJobs",
    "CV de ",
    " - InfoJobs",
    " | Catho",
    " - Catho",
];

/// A job portal: the brand key that identifies its URLs and the path
/// pattern of its candidate pages.
struct Portal {
    key: &'static str,
    candidate_path: Regex,
}

static PORTALS: LazyLock<Vec<Portal>> = LazyLock::new(|| {
    [
        ("trabalhabrasil", r"trabalhabrasil\.com\.br/curriculo"),
        ("bne", r"bne\.com\.br/(curriculo|vagas-de-emprego)"),
        ("catho", r"catho\.com\.br/(perfil|curriculo|profissional)"),
        ("infojobs", r"infojobs\.com\.br/(candidato|cv|curriculo)"),
        ("vagas", r"vagas\.com\.br/(perfil-de|curriculo/|profissionais)"),
    ]
    .into_iter()
    .map(|(key, pattern)| Portal {
        key,
        candidate_path: Regex::new(&format!("(?i){pattern}")).expect("portal pattern is valid"),
    })
    .collect()
});

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\w.-]+@[\w.-]+\.\w+").expect("email pattern is valid"));

/// Why a hit was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    InvalidUrl,
    JobPosting,
    NoiseTitle,
    LocationMismatch,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::InvalidUrl => "invalid_url",
            RejectReason::JobPosting => "job_posting",
            RejectReason::NoiseTitle => "noise_title",
            RejectReason::LocationMismatch => "location_mismatch",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    Reject(RejectReason),
}

impl Verdict {
    pub fn is_accept(&self) -> bool {
        matches!(self, Verdict::Accept)
    }
}

/// Classify a hit, reporting the first check that rejected it.
pub fn classify(hit: &RawHit, mode: SearchMode, expected_location: Option<&str>) -> Verdict {
    if !is_valid_result(&hit.url, mode) {
        return Verdict::Reject(RejectReason::InvalidUrl);
    }
    if is_job_posting(&hit.url, &hit.title) {
        return Verdict::Reject(RejectReason::JobPosting);
    }
    if mode.is_file_mode() && is_noise_title(&hit.title) {
        return Verdict::Reject(RejectReason::NoiseTitle);
    }
    if let Some(location) = expected_location {
        if !mentions_location(hit, location) {
            return Verdict::Reject(RejectReason::LocationMismatch);
        }
    }
    Verdict::Accept
}

/// Whether a hit is a candidate profile for `mode`.
pub fn accept(hit: &RawHit, mode: SearchMode, expected_location: Option<&str>) -> bool {
    classify(hit, mode, expected_location).is_accept()
}

/// Mode-specific URL-shape check. An empty URL never passes.
pub fn is_valid_result(url: &str, mode: SearchMode) -> bool {
    if url.is_empty() {
        return false;
    }
    let url = url.to_lowercase();

    match mode {
        SearchMode::LinkedIn => url.contains(LINKEDIN_PROFILE_PATH),
        SearchMode::DocumentFiles | SearchMode::HrSpreadsheets => {
            DOCUMENT_EXTENSIONS.iter().any(|ext| url.ends_with(ext))
        }
        SearchMode::JobPortals => is_portal_candidate(&url),
        SearchMode::SocialMedia => SOCIAL_DOMAINS.iter().any(|d| url.contains(d)),
    }
}

/// `url` must already be lower-cased.
fn is_portal_candidate(url: &str) -> bool {
    // BNE keeps candidate pages under two fixed folders only.
    if url.contains("bne.com.br") {
        return url.contains("/curriculo/") || url.contains("/vip/");
    }

    let Some(portal) = PORTALS.iter().find(|p| url.contains(p.key)) else {
        return false;
    };
    if !portal.candidate_path.is_match(url) {
        return false;
    }

    // "curriculo-de-vendedor" is an article slug, "curriculo/123" a résumé.
    if url.contains("vagas.com.br") && url.contains("curriculo") && !url.contains("/curriculo/") {
        return false;
    }
    true
}

/// Whether a hit looks like a job listing, company page, login or article.
///
/// Independent of the mode: it can only ever turn an accept into a reject.
pub fn is_job_posting(url: &str, title: &str) -> bool {
    let url = url.to_lowercase();
    if NON_CANDIDATE_HOSTS.iter().any(|h| url.contains(h)) {
        return true;
    }
    if JOB_PATHS.iter().any(|p| url.contains(p)) {
        return true;
    }

    let title = title.to_lowercase();
    if LISTING_TITLE_PREFIXES.iter().any(|p| title.starts_with(p)) {
        return true;
    }

    url.contains("vagas.com.br")
        && (title.contains("| vagas.com") || title.contains("- vagas.com"))
        && (title.contains("vaga de") || title.contains("oportunidade"))
}

/// Titles of reports, gazettes, invoices and the like.
pub fn is_noise_title(title: &str) -> bool {
    let title = title.to_lowercase();
    NOISE_TITLES.iter().any(|n| title.contains(n))
}

/// Strict, case-insensitive substring match against title + snippet.
///
/// No diacritic or abbreviation folding: "S.J. do Rio Preto" does not
/// match "São José do Rio Preto". A blank location matches everything.
pub fn mentions_location(hit: &RawHit, location: &str) -> bool {
    let wanted = location.trim().to_lowercase();
    if wanted.is_empty() {
        return true;
    }
    let haystack = format!("{} {}", hit.title, hit.snippet).to_lowercase();
    haystack.contains(&wanted)
}

/// Strip the brand suffixes/prefixes a mode's sites add to page titles.
pub fn clean_title(title: &str, mode: SearchMode) -> String {
    let noise: &[&str] = match mode {
        SearchMode::LinkedIn => LINKEDIN_TITLE_NOISE,
        SearchMode::JobPortals => PORTAL_TITLE_NOISE,
        SearchMode::DocumentFiles | SearchMode::SocialMedia | SearchMode::HrSpreadsheets => &[],
    };

    let mut cleaned = title.trim().to_string();
    for fragment in noise {
        cleaned = cleaned.replace(fragment, "");
    }
    cleaned.trim().to_string()
}

/// First email-looking token in `text`, or [`NO_EMAIL`].
pub fn extract_email(text: &str) -> String {
    EMAIL_RE
        .find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| NO_EMAIL.to_string())
}

/// Map an accepted hit to its presentation record.
pub fn to_candidate(hit: &RawHit, mode: SearchMode) -> CandidateResult {
    CandidateResult {
        display_name: clean_title(&hit.title, mode),
        profile_url: hit.url.clone(),
        summary: hit.snippet.clone(),
        email: extract_email(&hit.snippet),
        source_mode: mode,
    }
}
