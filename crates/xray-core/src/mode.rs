//! Search modes and their static dork configuration.
//!
//! Every mode owns exactly one [`SearchModeConfig`] in [`MODE_REGISTRY`].
//! The table is a `static` and never mutated, so any number of concurrent
//! searches can read it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The source category an X-Ray search targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchMode {
    /// LinkedIn public profiles.
    #[serde(rename = "linkedin")]
    LinkedIn,
    /// Brazilian job portals (TrabalhaBrasil, BNE, Catho, InfoJobs, Vagas).
    #[serde(rename = "job-portals")]
    JobPortals,
    /// Résumé documents (PDF/DOC/DOCX).
    #[serde(rename = "documents")]
    DocumentFiles,
    /// Instagram and Facebook pages.
    #[serde(rename = "social")]
    SocialMedia,
    /// HR candidate lists published as spreadsheets.
    #[serde(rename = "hr-lists")]
    HrSpreadsheets,
}

/// Immutable configuration record for one search mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchModeConfig {
    pub mode: SearchMode,
    /// Site/filetype fragment that opens every query in this mode.
    pub base_dork: &'static str,
    /// Wrap the role in `intitle:` regardless of the profile's exact-match flag.
    pub force_title_match: bool,
    pub display_name: &'static str,
}

/// All modes, in display order. The first entry is the default.
pub static MODE_REGISTRY: [SearchModeConfig; 5] = [
    SearchModeConfig {
        mode: SearchMode::LinkedIn,
        base_dork: "site:linkedin.com/in",
        force_title_match: true,
        display_name: "Perfil LinkedIn",
    },
    SearchModeConfig {
        mode: SearchMode::DocumentFiles,
        base_dork: "(\"curriculum\" OR \"cv\") (filetype:pdf OR filetype:docx OR filetype:doc) -relatório -edital -manual -ementa -diário",
        force_title_match: false,
        display_name: "Arquivos (PDF/DOC)",
    },
    SearchModeConfig {
        mode: SearchMode::JobPortals,
        base_dork: "(site:trabalhabrasil.com.br OR site:bne.com.br OR site:catho.com.br OR site:infojobs.com.br OR site:vagas.com.br) (inurl:curriculo OR inurl:perfil OR inurl:candidato)",
        force_title_match: false,
        display_name: "Portais (TrabalhaBrasil, BNE, etc)",
    },
    SearchModeConfig {
        mode: SearchMode::SocialMedia,
        base_dork: "site:instagram.com OR site:facebook.com",
        force_title_match: false,
        display_name: "Redes Sociais (Instagram/Facebook)",
    },
    SearchModeConfig {
        mode: SearchMode::HrSpreadsheets,
        base_dork: "(filetype:xls OR filetype:xlsx OR filetype:csv) (\"lista de candidatos\" OR \"banco de talentos\")",
        force_title_match: false,
        display_name: "Planilhas de RH",
    },
];

impl SearchMode {
    pub const ALL: [SearchMode; 5] = [
        SearchMode::LinkedIn,
        SearchMode::DocumentFiles,
        SearchMode::JobPortals,
        SearchMode::SocialMedia,
        SearchMode::HrSpreadsheets,
    ];

    /// Stable identifier used on the command line and in result records.
    pub fn id(&self) -> &'static str {
        match self {
            SearchMode::LinkedIn => "linkedin",
            SearchMode::JobPortals => "job-portals",
            SearchMode::DocumentFiles => "documents",
            SearchMode::SocialMedia => "social",
            SearchMode::HrSpreadsheets => "hr-lists",
        }
    }

    /// Look up this mode's configuration record.
    pub fn config(&self) -> &'static SearchModeConfig {
        MODE_REGISTRY
            .iter()
            .find(|c| c.mode == *self)
            .unwrap_or(&MODE_REGISTRY[0])
    }

    /// Resolve a mode id, falling back to the first registry mode for
    /// anything unknown.
    pub fn from_id_or_default(id: &str) -> SearchMode {
        id.parse().unwrap_or(MODE_REGISTRY[0].mode)
    }

    /// Modes whose results are downloadable documents rather than pages.
    pub fn is_file_mode(&self) -> bool {
        match self {
            SearchMode::DocumentFiles | SearchMode::HrSpreadsheets => true,
            SearchMode::LinkedIn | SearchMode::JobPortals | SearchMode::SocialMedia => false,
        }
    }
}

impl Default for SearchMode {
    fn default() -> Self {
        MODE_REGISTRY[0].mode
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        SearchMode::ALL
            .into_iter()
            .find(|m| m.id() == wanted)
            .ok_or_else(|| format!("Unknown search mode: {}", s))
    }
}
