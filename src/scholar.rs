//! Google Scholar profile client.
//!
//! Implements the three operations the pipeline consumes: author search by
//! name, author lookup by scholar id, and expansion of a profile's co-author
//! section. Everything else about the citations pages is ignored.

use crate::error::{CoauthorsError, Result};
use regex::Regex;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Default Google Scholar URL
pub const DEFAULT_SCHOLAR_URL: &str = "https://scholar.google.com";

/// User agent string for requests
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// An author profile as returned by search or id lookup
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AuthorRecord {
    /// Display name
    pub name: String,
    /// Affiliation line from the profile
    pub affiliation: String,
    /// Verified email domain (e.g. "@ucsd.edu"), empty if unverified
    pub email_domain: String,
    /// Stable scholar id (the `user=` value in a citations URL)
    pub scholar_id: String,
}

/// One co-author from a profile's co-author section
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CoauthorEntry {
    /// Co-author display name
    pub name: String,
    /// Co-author affiliation line
    pub affiliation: String,
}

/// Client configuration, scoped to a single invocation
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    /// Proxy URL (e.g., "http://127.0.0.1:7890")
    pub proxy: Option<String>,
    /// Custom base URL for mirror sites
    pub base_url: Option<String>,
}

/// HTTP client over the Google Scholar citations pages
pub struct ScholarClient {
    http: reqwest::Client,
    base_url: String,
}

impl ScholarClient {
    /// Build a client from explicit options.
    ///
    /// # Errors
    ///
    /// Returns error if the proxy URL is invalid or the HTTP client cannot
    /// be constructed
    pub fn new(options: &ClientOptions) -> Result<Self> {
        let base_url = options
            .base_url
            .as_ref()
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_SCHOLAR_URL.to_string());

        let mut builder = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .cookie_store(true);

        if let Some(proxy_url) = &options.proxy {
            let proxy = reqwest::Proxy::all(proxy_url).map_err(|e| {
                CoauthorsError::Config(format!("Invalid proxy URL '{}': {}", proxy_url, e))
            })?;
            builder = builder.proxy(proxy);
        }

        let http = builder
            .build()
            .map_err(|e| CoauthorsError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { http, base_url })
    }

    /// Search author profiles matching a name query.
    ///
    /// Returns the candidates from the first results page in page order. An
    /// empty vector means no profile matched.
    pub async fn search_authors(&self, query: &str) -> Result<Vec<AuthorRecord>> {
        let url = build_author_search_url(&self.base_url, query)?;
        debug!(query = query, url = %url, "Searching author profiles");

        let html = self.fetch_page(&url).await?;
        let candidates = parse_author_cards(&html)?;

        info!(query = query, count = candidates.len(), "Author search complete");
        Ok(candidates)
    }

    /// Look up a single author profile by scholar id.
    ///
    /// # Errors
    ///
    /// Returns [`CoauthorsError::AuthorNotFound`] if the page carries no
    /// profile header
    pub async fn search_author_id(&self, scholar_id: &str) -> Result<AuthorRecord> {
        let url = build_profile_url(&self.base_url, scholar_id)?;
        debug!(scholar_id = scholar_id, url = %url, "Fetching author profile");

        let html = self.fetch_page(&url).await?;
        parse_profile(&html, scholar_id)
    }

    /// Expand an author's co-author section.
    ///
    /// Uses the full co-author listing rather than the profile sidebar, which
    /// truncates at 20 entries.
    pub async fn fetch_coauthors(&self, author: &AuthorRecord) -> Result<Vec<CoauthorEntry>> {
        let url = build_colleagues_url(&self.base_url, &author.scholar_id)?;
        debug!(scholar_id = %author.scholar_id, url = %url, "Fetching co-author list");

        let html = self.fetch_page(&url).await?;
        let coauthors: Vec<CoauthorEntry> = parse_author_cards(&html)?
            .into_iter()
            .map(|c| CoauthorEntry {
                name: c.name,
                affiliation: c.affiliation,
            })
            .collect();

        info!(
            scholar_id = %author.scholar_id,
            count = coauthors.len(),
            "Co-author list complete"
        );
        Ok(coauthors)
    }

    /// Fetch page content, checking for rate limiting and CAPTCHA walls.
    async fn fetch_page(&self, url: &Url) -> Result<String> {
        // Random delay between requests to avoid detection
        let delay = rand::random::<u64>() % 1500 + 500;
        tokio::time::sleep(Duration::from_millis(delay)).await;

        let response = self
            .http
            .get(url.as_str())
            .header(
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            )
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(CoauthorsError::RateLimited(60));
        }

        if !status.is_success() {
            return Err(CoauthorsError::Api {
                code: status.as_u16() as i32,
                message: format!("HTTP error: {}", status),
            });
        }

        let html = response.text().await.map_err(CoauthorsError::Network)?;

        if html.contains("Solving the above CAPTCHA") || html.contains("unusual traffic") {
            warn!(url = %url, "CAPTCHA detected");
            return Err(CoauthorsError::Captcha);
        }

        Ok(html)
    }
}

/// Build the author search URL (`view_op=search_authors`)
fn build_author_search_url(base_url: &str, query: &str) -> Result<Url> {
    let mut url = parse_citations_url(base_url)?;

    {
        let mut params = url.query_pairs_mut();
        params.append_pair("view_op", "search_authors");
        params.append_pair("mauthors", query);
        params.append_pair("hl", "en");
    }

    Ok(url)
}

/// Build an author profile URL (`citations?user=...`)
fn build_profile_url(base_url: &str, scholar_id: &str) -> Result<Url> {
    let mut url = parse_citations_url(base_url)?;

    {
        let mut params = url.query_pairs_mut();
        params.append_pair("user", scholar_id);
        params.append_pair("hl", "en");
    }

    Ok(url)
}

/// Build the full co-author listing URL (`view_op=list_colleagues`)
fn build_colleagues_url(base_url: &str, scholar_id: &str) -> Result<Url> {
    let mut url = parse_citations_url(base_url)?;

    {
        let mut params = url.query_pairs_mut();
        params.append_pair("view_op", "list_colleagues");
        params.append_pair("user", scholar_id);
        params.append_pair("hl", "en");
    }

    Ok(url)
}

fn parse_citations_url(base_url: &str) -> Result<Url> {
    Url::parse(&format!("{}/citations", base_url))
        .map_err(|e| CoauthorsError::Config(format!("Invalid base URL: {}", e)))
}

/// Parse author profile cards from a citations listing page.
///
/// Author search results and the co-author listing share the same card
/// markup, so both go through here.
pub fn parse_author_cards(html: &str) -> Result<Vec<AuthorRecord>> {
    let document = Html::parse_document(html);

    let card_selector =
        Selector::parse("div.gsc_1usr").map_err(|e| CoauthorsError::Parse(e.to_string()))?;
    let name_selector =
        Selector::parse("h3.gs_ai_name a").map_err(|e| CoauthorsError::Parse(e.to_string()))?;
    let aff_selector =
        Selector::parse("div.gs_ai_aff").map_err(|e| CoauthorsError::Parse(e.to_string()))?;
    let email_selector =
        Selector::parse("div.gs_ai_eml").map_err(|e| CoauthorsError::Parse(e.to_string()))?;

    let id_regex =
        Regex::new(r"user=([^&]+)").map_err(|e| CoauthorsError::Parse(e.to_string()))?;

    let mut records = Vec::new();

    for card in document.select(&card_selector) {
        let mut record = AuthorRecord::default();

        if let Some(link) = card.select(&name_selector).next() {
            record.name = link.text().collect::<String>().trim().to_string();
            let href = link.value().attr("href").unwrap_or("");
            record.scholar_id = id_regex
                .captures(href)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();
        }

        if let Some(aff) = card.select(&aff_selector).next() {
            record.affiliation = aff.text().collect::<String>().trim().to_string();
        }

        if let Some(email) = card.select(&email_selector).next() {
            record.email_domain = email_domain_from_label(&email.text().collect::<String>());
        }

        // Cards without a name link are ads or layout noise
        if !record.name.is_empty() {
            records.push(record);
        }
    }

    Ok(records)
}

/// Parse the profile header of a `citations?user=...` page.
fn parse_profile(html: &str, scholar_id: &str) -> Result<AuthorRecord> {
    let document = Html::parse_document(html);

    let name_selector =
        Selector::parse("div#gsc_prf_in").map_err(|e| CoauthorsError::Parse(e.to_string()))?;
    let aff_selector =
        Selector::parse("div.gsc_prf_il").map_err(|e| CoauthorsError::Parse(e.to_string()))?;
    let email_selector =
        Selector::parse("div#gsc_prf_ivh").map_err(|e| CoauthorsError::Parse(e.to_string()))?;

    let name = document
        .select(&name_selector)
        .next()
        .map(|e| e.text().collect::<String>().trim().to_string())
        .filter(|n| !n.is_empty())
        .ok_or_else(|| CoauthorsError::AuthorNotFound(scholar_id.to_string()))?;

    // First .gsc_prf_il div is the affiliation; the verified-email and
    // interests rows carry ids of their own
    let affiliation = document
        .select(&aff_selector)
        .next()
        .map(|e| e.text().collect::<String>().trim().to_string())
        .unwrap_or_default();

    let email_domain = document
        .select(&email_selector)
        .next()
        .map(|e| email_domain_from_label(&e.text().collect::<String>()))
        .unwrap_or_default();

    Ok(AuthorRecord {
        name,
        affiliation,
        email_domain,
        scholar_id: scholar_id.to_string(),
    })
}

/// Turn a "Verified email at ucsd.edu" label into "@ucsd.edu".
///
/// Profile pages append " - Homepage" after the domain; anything past the
/// first whitespace is dropped.
fn email_domain_from_label(label: &str) -> String {
    match label.trim().strip_prefix("Verified email at ") {
        Some(rest) => rest
            .split_whitespace()
            .next()
            .map(|domain| format!("@{}", domain))
            .unwrap_or_default(),
        None => String::new(),
    }
}
