use std::collections::HashSet;

use reqwest::{Client, StatusCode};
use scraper::{Html, Selector};
use url::Url;
use xray_core::error::AppError;
use xray_core::models::RawHit;
use xray_core::traits::SearchProvider;

use crate::config::ProviderConfig;

/// Search provider backed by DuckDuckGo's JavaScript-free HTML endpoint.
///
/// Walks result pages until `max_results` hits are collected, a page adds
/// nothing new, or `max_pages` is reached. The `s` offset counts every
/// organic result served, so dropping a repeated URL does not shift it.
#[derive(Clone)]
pub struct DuckDuckGoProvider {
    client: Client,
    config: ProviderConfig,
}

impl DuckDuckGoProvider {
    pub fn new() -> Result<Self, AppError> {
        Self::with_config(ProviderConfig::default())
    }

    pub fn with_config(config: ProviderConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::HttpError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn page_url(&self, query: &str, offset: usize) -> Result<Url, AppError> {
        let mut params = vec![("q", query.to_string())];
        if offset > 0 {
            params.push(("s", offset.to_string()));
            params.push(("dc", (offset + 1).to_string()));
        }
        if let Some(region) = &self.config.region {
            params.push(("kl", region.clone()));
        }

        Url::parse_with_params(&self.config.endpoint, &params)
            .map_err(|e| AppError::ConfigError(format!("Invalid search endpoint: {e}")))
    }

    async fn fetch_page(&self, url: Url) -> Result<String, AppError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                AppError::Timeout(self.config.timeout.as_secs())
            } else if e.is_connect() {
                AppError::NetworkError(format!("Connection failed: {e}"))
            } else {
                AppError::HttpError(e.to_string())
            }
        })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(AppError::RateLimitExceeded);
        }
        if !status.is_success() {
            return Err(AppError::HttpError(format!(
                "HTTP {} from search endpoint",
                status.as_u16()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| AppError::HttpError(format!("Failed to read response body: {e}")))
    }
}

impl SearchProvider for DuckDuckGoProvider {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<RawHit>, AppError> {
        let mut hits: Vec<RawHit> = Vec::new();
        let mut seen = HashSet::new();
        // Organic results served so far, duplicates included.
        let mut offset = 0;

        for page in 0..self.config.max_pages {
            if hits.len() >= max_results {
                break;
            }

            let html = self.fetch_page(self.page_url(query, offset)?).await?;
            let page_hits = parse_results(&html)?;
            tracing::debug!(page, offset, count = page_hits.len(), "Parsed result page");
            if page_hits.is_empty() {
                break;
            }
            offset += page_hits.len();

            let before = hits.len();
            hits.extend(
                page_hits
                    .into_iter()
                    .filter(|h| seen.insert(h.url.clone())),
            );
            if hits.len() == before {
                break;
            }
        }

        hits.truncate(max_results);
        Ok(hits)
    }
}

/// Parse one DuckDuckGo HTML result page into hits, skipping ads.
pub(crate) fn parse_results(html: &str) -> Result<Vec<RawHit>, AppError> {
    if html.contains("anomaly-modal") {
        return Err(AppError::RateLimitExceeded);
    }

    let document = Html::parse_document(html);
    let result_sel = selector(".result:not(.result--ad)")?;
    let title_sel = selector(".result__a")?;
    let snippet_sel = selector(".result__snippet")?;

    let mut hits = Vec::new();
    for element in document.select(&result_sel) {
        let Some(link) = element.select(&title_sel).next() else {
            continue;
        };
        let Some(url) = link.value().attr("href").and_then(unwrap_redirect) else {
            continue;
        };

        let title = collapse(link.text());
        let snippet = element
            .select(&snippet_sel)
            .next()
            .map(|el| collapse(el.text()))
            .unwrap_or_default();

        hits.push(RawHit { url, title, snippet });
    }

    Ok(hits)
}

fn selector(css: &str) -> Result<Selector, AppError> {
    Selector::parse(css).map_err(|e| AppError::ParseError(format!("invalid selector {css}: {e:?}")))
}

fn collapse<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolve DuckDuckGo's `//duckduckgo.com/l/?uddg=<target>` redirect links.
fn unwrap_redirect(href: &str) -> Option<String> {
    let full = if href.starts_with("//") {
        format!("https:{href}")
    } else {
        href.to_string()
    };

    let parsed = Url::parse(&full).ok()?;
    let is_redirect = parsed
        .host_str()
        .is_some_and(|h| h.ends_with("duckduckgo.com"))
        && parsed.path().starts_with("/l/");

    if is_redirect {
        parsed
            .query_pairs()
            .find(|(key, _)| key == "uddg")
            .map(|(_, value)| value.into_owned())
    } else {
        Some(full)
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    const RESULTS_PAGE: &str = r##"<!DOCTYPE html>
<html><body>
<div class="result results_links results_links_deep result--ad">
  <a class="result__a" href="https://ads.example.com/x">Cursos de Programação (Ad)</a>
  <a class="result__snippet">Matricule-se já</a>
</div>
<div class="result results_links results_links_deep web-result">
  <h2 class="result__title">
    <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fbr.linkedin.com%2Fin%2Fana-souza&amp;rut=abc">
      Ana Souza - Desenvolvedora - LinkedIn
    </a>
  </h2>
  <a class="result__snippet" href="#">Campinas, São Paulo · <b>Desenvolvedora</b> Full Stack</a>
</div>
<div class="result results_links results_links_deep web-result">
  <h2 class="result__title">
    <a class="result__a" href="https://www.vagas.com.br/perfil-de/maria-123">Curriculum de Maria | Vagas.com.br</a>
  </h2>
</div>
<div class="result results_links results_links_deep web-result">
  <h2 class="result__title"><span>no link here</span></h2>
</div>
</body></html>"##;

    #[test]
    fn parses_organic_results() {
        let hits = parse_results(RESULTS_PAGE).unwrap();
        assert_eq!(hits.len(), 2);

        assert_eq!(hits[0].url, "https://br.linkedin.com/in/ana-souza");
        assert_eq!(hits[0].title, "Ana Souza - Desenvolvedora - LinkedIn");
        assert_eq!(hits[0].snippet, "Campinas, São Paulo · Desenvolvedora Full Stack");

        assert_eq!(hits[1].url, "https://www.vagas.com.br/perfil-de/maria-123");
        assert!(hits[1].snippet.is_empty());
    }

    #[test]
    fn empty_page_has_no_hits() {
        let hits = parse_results("<html><body><div class=\"no-results\"></div></body></html>");
        assert!(hits.unwrap().is_empty());
    }

    #[test]
    fn bot_challenge_is_rate_limit() {
        let html = r#"<html><body><div class="anomaly-modal__title">Unfortunately, bots use DuckDuckGo too.</div></body></html>"#;
        assert!(matches!(parse_results(html), Err(AppError::RateLimitExceeded)));
    }

    #[test]
    fn unwraps_redirects() {
        assert_eq!(
            unwrap_redirect("//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com%2Fcv.pdf&rut=1"),
            Some("https://example.com/cv.pdf".to_string())
        );
        assert_eq!(
            unwrap_redirect("https://example.com/direct"),
            Some("https://example.com/direct".to_string())
        );
        assert_eq!(unwrap_redirect("not a url"), None);
    }

    #[test]
    fn page_url_carries_offset_and_region() {
        let provider =
            DuckDuckGoProvider::with_config(ProviderConfig::default().with_region("br-pt")).unwrap();

        let first = provider.page_url("site:linkedin.com/in \"Dev\"", 0).unwrap();
        let pairs: Vec<_> = first.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("q".into(), "site:linkedin.com/in \"Dev\"".into())));
        assert!(pairs.contains(&("kl".into(), "br-pt".into())));
        assert!(!pairs.iter().any(|(k, _)| k == "s"));

        let second = provider.page_url("dev", 30).unwrap();
        let pairs: Vec<_> = second.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("s".into(), "30".into())));
        assert!(pairs.contains(&("dc".into(), "31".into())));
    }

    #[test]
    fn invalid_endpoint_is_config_error() {
        let config = ProviderConfig {
            endpoint: "not a url".into(),
            ..Default::default()
        };
        let provider = DuckDuckGoProvider::with_config(config).unwrap();
        assert!(matches!(
            provider.page_url("dev", 0),
            Err(AppError::ConfigError(_))
        ));
    }

    fn result_page(urls: &[&str]) -> String {
        let blocks: String = urls
            .iter()
            .map(|url| {
                format!(
                    r#"<div class="result web-result"><a class="result__a" href="{url}">{url}</a></div>"#
                )
            })
            .collect();
        format!("<html><body>{blocks}</body></html>")
    }

    #[tokio::test]
    async fn next_page_offset_counts_repeated_results() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/html/"))
            .and(query_param("s", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_string(result_page(&[
                "https://br.linkedin.com/in/c",
                "https://br.linkedin.com/in/d",
            ])))
            .with_priority(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/html/"))
            .and(query_param("s", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_string(result_page(&[
                "https://br.linkedin.com/in/a",
                "https://br.linkedin.com/in/b",
            ])))
            .with_priority(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/html/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(result_page(&[
                "https://br.linkedin.com/in/a",
                "https://br.linkedin.com/in/b",
                "https://br.linkedin.com/in/a",
            ])))
            .mount(&server)
            .await;

        let config = ProviderConfig {
            endpoint: format!("{}/html/", server.uri()),
            ..Default::default()
        };
        let provider = DuckDuckGoProvider::with_config(config).unwrap();

        let hits = provider.search("dev", 10).await.unwrap();
        let urls: Vec<_> = hits.iter().map(|h| h.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://br.linkedin.com/in/a",
                "https://br.linkedin.com/in/b",
                "https://br.linkedin.com/in/c",
                "https://br.linkedin.com/in/d",
            ]
        );
    }

    #[tokio::test]
    async fn empty_page_stops_paging() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/html/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(result_page(&[])))
            .expect(1)
            .mount(&server)
            .await;

        let config = ProviderConfig {
            endpoint: format!("{}/html/", server.uri()),
            ..Default::default()
        };
        let provider = DuckDuckGoProvider::with_config(config).unwrap();

        assert!(provider.search("dev", 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_provider_failure() {
        let config = ProviderConfig {
            endpoint: "http://127.0.0.1:9/html/".into(),
            ..Default::default()
        }
        .with_timeout(std::time::Duration::from_secs(2));
        let provider = DuckDuckGoProvider::with_config(config).unwrap();

        let err = provider.search("dev", 10).await.unwrap_err();
        assert!(err.is_provider_failure());
    }

    #[tokio::test]
    #[ignore] // Live test — run with `cargo test -- --ignored`
    async fn live_duckduckgo_search() {
        let provider = DuckDuckGoProvider::new().unwrap();
        let hits = provider.search("site:linkedin.com/in rust developer", 10).await.unwrap();
        assert!(!hits.is_empty());
        assert!(hits.len() <= 10);
    }
}
