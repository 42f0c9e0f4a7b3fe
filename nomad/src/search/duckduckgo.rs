//! DuckDuckGo backend: scrapes the key-less HTML endpoint

use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::{SearchError, SearchHit, SearchProvider};

const PROVIDER: &str = "duckduckgo";
const ENDPOINT: &str = "https://html.duckduckgo.com/html/";

// The HTML endpoint answers bare clients with a captcha page
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

/// Search through DuckDuckGo's HTML results page
pub struct DuckDuckGoProvider {
    http: Client,
}

impl DuckDuckGoProvider {
    pub fn new(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoProvider {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn text(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, SearchError> {
        debug!(%query, max_results, "DuckDuckGoProvider::text: called");
        let response = self
            .http
            .get(ENDPOINT)
            .header("User-Agent", USER_AGENT)
            .query(&[("q", query)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SearchError::Api {
                provider: PROVIDER,
                status: status.as_u16(),
                message: truncate(&message, 200),
            });
        }

        let body = response.text().await?;
        let mut hits = parse_results(&body)?;
        hits.truncate(max_results);
        debug!(count = hits.len(), "DuckDuckGoProvider::text: parsed");
        Ok(hits)
    }
}

fn selector(css: &str) -> Result<Selector, SearchError> {
    Selector::parse(css).map_err(|e| SearchError::Parse {
        provider: PROVIDER,
        message: format!("bad selector {}: {:?}", css, e),
    })
}

/// Pull organic results out of the HTML page, skipping sponsored entries
///
/// Throttled clients get a 2xx captcha page instead of results; that page is
/// an error, not an empty result set.
fn parse_results(html: &str) -> Result<Vec<SearchHit>, SearchError> {
    let document = Html::parse_document(html);
    let anomaly_sel = selector(".anomaly-modal, #challenge-form")?;
    let container_sel = selector("div.results, #links")?;
    if document.select(&anomaly_sel).next().is_some() {
        return Err(SearchError::Parse {
            provider: PROVIDER,
            message: "blocked by a bot check (anomaly page)".to_string(),
        });
    }
    if document.select(&container_sel).next().is_none() {
        return Err(SearchError::Parse {
            provider: PROVIDER,
            message: "page has no results container".to_string(),
        });
    }

    let result_sel = selector("div.result")?;
    let title_sel = selector("a.result__a")?;
    let snippet_sel = selector(".result__snippet")?;

    let hits = document
        .select(&result_sel)
        .filter(|el| !el.value().classes().any(|c| c == "result--ad"))
        .filter_map(|el| {
            let anchor = el.select(&title_sel).next()?;
            let title = element_text(&anchor);
            let body = el.select(&snippet_sel).next().map(|s| element_text(&s)).unwrap_or_default();
            if title.is_empty() && body.is_empty() {
                return None;
            }
            Some(SearchHit {
                title: Some(title).filter(|t| !t.is_empty()),
                body: Some(body).filter(|b| !b.is_empty()),
                url: anchor.value().attr("href").map(str::to_string),
            })
        })
        .collect();

    Ok(hits)
}

/// Text content with runs of whitespace collapsed
fn element_text(el: &ElementRef<'_>) -> String {
    el.text().flat_map(str::split_whitespace).collect::<Vec<_>>().join(" ")
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        format!("{}...", s.chars().take(max_chars).collect::<String>())
    }
}
