//! DuckDuckGo text search.
//!
//! * `api` mode fetches a `vqd` token from the home page, then reads the
//!   `links.duckduckgo.com/d.js` payload.
//! * `html` mode posts the query to the no-JavaScript results page and scrapes
//!   it.
//!
//! Both produce records with the keys `title`, `href` and `body`.

use crate::search::backend::SearchBackend;
use crate::search::types::{BackendMode, SearchError, SearchRecord, SearchRequest};
use futures::future::BoxFuture;
use regex::Regex;
use reqwest::header::{REFERER, USER_AGENT};
use reqwest::redirect::Policy;
use reqwest::{Client, Response, StatusCode};
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::debug;

const HOME_URL: &str = "https://duckduckgo.com";
const LINKS_URL: &str = "https://links.duckduckgo.com/d.js";
const HTML_URL: &str = "https://html.duckduckgo.com/html";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const PAYLOAD_START: &str = "DDG.pageLayout.load('d',";
const PAYLOAD_END: &str = ");DDG.duckbar.load(";

static VQD_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#"vqd=["']?([0-9-]+)"#).ok());

pub struct DuckDuckGo {
    http: Client,
    region: String,
}

impl DuckDuckGo {
    pub fn new(region: &str) -> Result<Self, SearchError> {
        // Redirects are reported as rate limiting, so they must not be followed
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .redirect(Policy::none())
            .build()
            .map_err(|e| SearchError::Client(e.to_string()))?;

        Ok(Self {
            http,
            region: region.to_string(),
        })
    }

    /// `wt-wt` -> `wt-WT`, `us-en` -> `en-US`
    fn bing_market(&self) -> String {
        match self.region.split_once('-') {
            Some((country, lang)) => format!("{}-{}", lang, country.to_uppercase()),
            None => self.region.clone(),
        }
    }

    async fn get_vqd(&self, request: &SearchRequest<'_>) -> Result<String, SearchError> {
        let response = self
            .http
            .get(HOME_URL)
            .header(USER_AGENT, request.user_agent)
            .header(REFERER, HOME_URL)
            .query(&[("q", request.query)])
            .send()
            .await
            .map_err(|e| SearchError::from_reqwest(BackendMode::Api, e))?;

        let body = check_status(BackendMode::Api, response)
            .await?
            .text()
            .await
            .map_err(|e| SearchError::from_reqwest(BackendMode::Api, e))?;

        extract_vqd(&body).ok_or_else(|| SearchError::Backend {
            backend: BackendMode::Api,
            message: format!("could not extract vqd for query '{}'", request.query),
        })
    }

    async fn text_api(
        &self,
        request: &SearchRequest<'_>,
    ) -> Result<Vec<SearchRecord>, SearchError> {
        let vqd = self.get_vqd(request).await?;
        debug!(query = %request.query, "Obtained vqd token");

        let bing_market = self.bing_market();
        let params = [
            ("q", request.query),
            ("kl", self.region.as_str()),
            ("l", self.region.as_str()),
            ("p", ""),
            ("s", "0"),
            ("df", ""),
            ("vqd", vqd.as_str()),
            ("bing_market", bing_market.as_str()),
            ("ex", "-1"),
        ];

        let response = self
            .http
            .get(LINKS_URL)
            .header(USER_AGENT, request.user_agent)
            .header(REFERER, HOME_URL)
            .query(&params)
            .send()
            .await
            .map_err(|e| SearchError::from_reqwest(BackendMode::Api, e))?;

        let body = check_status(BackendMode::Api, response)
            .await?
            .text()
            .await
            .map_err(|e| SearchError::from_reqwest(BackendMode::Api, e))?;

        parse_api_payload(&body, request.query, request.max_results).map_err(|message| {
            SearchError::Backend {
                backend: BackendMode::Api,
                message,
            }
        })
    }

    async fn text_html(
        &self,
        request: &SearchRequest<'_>,
    ) -> Result<Vec<SearchRecord>, SearchError> {
        let bing_market = self.bing_market();
        let form = [
            ("q", request.query),
            ("s", "0"),
            ("o", "json"),
            ("api", "d.js"),
            ("vqd", ""),
            ("kl", self.region.as_str()),
            ("bing_market", bing_market.as_str()),
        ];

        let response = self
            .http
            .post(HTML_URL)
            .header(USER_AGENT, request.user_agent)
            .header(REFERER, "https://html.duckduckgo.com/")
            .form(&form)
            .send()
            .await
            .map_err(|e| SearchError::from_reqwest(BackendMode::Html, e))?;

        let html = check_status(BackendMode::Html, response)
            .await?
            .text()
            .await
            .map_err(|e| SearchError::from_reqwest(BackendMode::Html, e))?;

        parse_html_results(&html, request.max_results)
    }
}

impl SearchBackend for DuckDuckGo {
    fn text<'a>(
        &'a self,
        request: &'a SearchRequest<'a>,
        mode: BackendMode,
    ) -> BoxFuture<'a, Result<Vec<SearchRecord>, SearchError>> {
        Box::pin(async move {
            debug!(
                %mode,
                query = %request.query,
                max_results = request.max_results,
                "DuckDuckGo text search"
            );
            match mode {
                BackendMode::Api => self.text_api(request).await,
                BackendMode::Html => self.text_html(request).await,
            }
        })
    }

    fn name(&self) -> &'static str {
        "duckduckgo"
    }
}

/// Map rate-limit and error statuses to backend errors.
async fn check_status(backend: BackendMode, response: Response) -> Result<Response, SearchError> {
    let status = response.status();
    if is_rate_limit_status(status) {
        return Err(SearchError::RateLimited {
            backend,
            message: format!("{} returned {}", response.url(), status),
        });
    }
    if !status.is_success() {
        return Err(SearchError::Backend {
            backend,
            message: format!("{} returned {}", response.url(), status),
        });
    }
    Ok(response)
}

fn is_rate_limit_status(status: StatusCode) -> bool {
    matches!(status.as_u16(), 202 | 301 | 403 | 418 | 429)
}

fn extract_vqd(html: &str) -> Option<String> {
    VQD_RE
        .as_ref()?
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Parse the `d.js` script body into records.
fn parse_api_payload(
    body: &str,
    query: &str,
    max_results: usize,
) -> Result<Vec<SearchRecord>, String> {
    let start = body
        .find(PAYLOAD_START)
        .map(|idx| idx + PAYLOAD_START.len())
        .ok_or_else(|| "api payload has no result block".to_string())?;
    let end = body[start..]
        .find(PAYLOAD_END)
        .map(|idx| start + idx)
        .ok_or_else(|| "api payload result block is not terminated".to_string())?;

    let rows: Vec<serde_json::Value> = serde_json::from_str(&body[start..end])
        .map_err(|e| format!("api payload is not valid JSON: {}", e))?;

    let google_fallback = format!("http://www.google.com/search?q={}", query);
    let mut seen = HashSet::new();
    let mut results = Vec::new();

    for row in rows {
        if results.len() >= max_results {
            break;
        }
        let Some(href) = row.get("u").and_then(|v| v.as_str()) else {
            continue;
        };
        if href == google_fallback || !seen.insert(href.to_string()) {
            continue;
        }

        let snippet = normalize(row.get("a").and_then(|v| v.as_str()).unwrap_or_default());
        if snippet.is_empty() {
            continue;
        }
        let title = normalize(row.get("t").and_then(|v| v.as_str()).unwrap_or_default());

        results.push(SearchRecord::from([
            ("title", title),
            ("href", normalize_url(href)),
            ("body", snippet),
        ]));
    }

    Ok(results)
}

fn selector(css: &'static str) -> Result<Selector, SearchError> {
    Selector::parse(css).map_err(|e| SearchError::Client(format!("bad selector '{}': {}", css, e)))
}

/// Scrape the no-JavaScript results page.
fn parse_html_results(html: &str, max_results: usize) -> Result<Vec<SearchRecord>, SearchError> {
    let document = Html::parse_document(html);

    let result_selector = selector("div.result")?;
    let title_selector = selector(".result__a")?;
    let snippet_selector = selector(".result__snippet")?;

    let mut seen = HashSet::new();
    let mut results = Vec::new();

    for element in document.select(&result_selector) {
        if results.len() >= max_results {
            break;
        }
        if element.value().classes().any(|class| class == "result--ad") {
            continue;
        }

        let Some(anchor) = element.select(&title_selector).next() else {
            continue;
        };
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let href = decode_redirect(href);
        if href.is_empty()
            || href.starts_with("http://www.google.com/search?q=")
            || href.starts_with("https://duckduckgo.com/y.js?ad_domain")
            || !seen.insert(href.clone())
        {
            continue;
        }

        let title = collapse_whitespace(&anchor.text().collect::<String>());
        let body = element
            .select(&snippet_selector)
            .next()
            .map(|e| collapse_whitespace(&e.text().collect::<String>()))
            .unwrap_or_default();

        results.push(SearchRecord::from([
            ("title", title),
            ("href", href),
            ("body", body),
        ]));
    }

    Ok(results)
}

/// Unwrap `//duckduckgo.com/l/?uddg=<encoded>&rut=..` redirect links.
fn decode_redirect(href: &str) -> String {
    match href.split_once("uddg=") {
        Some((_, rest)) => {
            let encoded = rest.split('&').next().unwrap_or_default();
            urlencoding::decode(encoded)
                .map(|s| s.into_owned())
                .unwrap_or_else(|_| href.to_string())
        }
        None => href.to_string(),
    }
}

/// Strip markup and decode entities.
fn normalize(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    let fragment = Html::parse_fragment(raw);
    collapse_whitespace(&fragment.root_element().text().collect::<String>())
}

fn normalize_url(url: &str) -> String {
    urlencoding::decode(url)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| url.to_string())
        .replace(' ', "+")
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
