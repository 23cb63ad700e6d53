use std::time::Duration;

use xray_core::AppError;

pub const DEFAULT_ENDPOINT: &str = "https://html.duckduckgo.com/html/";
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_MAX_PAGES: usize = 3;

/// Settings for the HTTP search provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// HTML search endpoint.
    pub endpoint: String,
    pub timeout: Duration,
    pub user_agent: String,
    /// DuckDuckGo region code (`kl`), e.g. `br-pt`.
    pub region: Option<String>,
    /// Result pages to walk before giving up on reaching `max_results`.
    pub max_pages: usize,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            region: None,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

impl ProviderConfig {
    /// Read configuration from environment variables.
    ///
    /// - `XRAY_ENDPOINT` (optional)
    /// - `XRAY_TIMEOUT_SECS` (optional, defaults to 30)
    /// - `XRAY_USER_AGENT` (optional)
    /// - `XRAY_REGION` (optional)
    /// - `XRAY_MAX_PAGES` (optional, defaults to 3)
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(get: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let defaults = Self::default();

        let timeout = match get("XRAY_TIMEOUT_SECS") {
            None => defaults.timeout,
            Some(raw) => Duration::from_secs(positive("XRAY_TIMEOUT_SECS", &raw)?),
        };

        let max_pages = match get("XRAY_MAX_PAGES") {
            None => defaults.max_pages,
            Some(raw) => positive("XRAY_MAX_PAGES", &raw)? as usize,
        };

        Ok(Self {
            endpoint: get("XRAY_ENDPOINT").unwrap_or(defaults.endpoint),
            timeout,
            user_agent: get("XRAY_USER_AGENT").unwrap_or(defaults.user_agent),
            region: get("XRAY_REGION").filter(|r| !r.trim().is_empty()),
            max_pages,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }
}

fn positive(key: &str, raw: &str) -> Result<u64, AppError> {
    let parsed: u64 = raw.trim().parse().map_err(|_| {
        AppError::ConfigError(format!("Invalid {key} '{raw}': must be a positive integer"))
    })?;
    if parsed == 0 {
        return Err(AppError::ConfigError(format!("{key} must be at least 1")));
    }
    Ok(parsed)
}
