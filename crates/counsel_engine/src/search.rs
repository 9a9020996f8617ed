use std::sync::LazyLock;
use std::time::Duration;

use engine_logging::{engine_debug, engine_info, engine_warn, redact_query_secret};
use regex::Regex;
use serde::Deserialize;

pub const SERPAPI_ENDPOINT: &str = "https://serpapi.com/search";
/// Appended to every question so results stay within Indian law.
pub const JURISDICTION_QUALIFIER: &str = "Indian law";

static PDF_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bpdf\b").expect("valid pdf pattern"));

#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub endpoint: String,
    pub api_key: String,
    pub engine: String,
    pub timeout: Duration,
}

impl SearchSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            endpoint: SERPAPI_ENDPOINT.to_string(),
            api_key: api_key.into(),
            engine: "google".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    organic_results: Vec<OrganicResult>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    link: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("search request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("search returned status {0}")]
    Status(u16),
}

/// Finds one article for a legal question via SerpApi.
#[derive(Debug, Clone)]
pub struct ArticleFinder {
    settings: SearchSettings,
    client: reqwest::Client,
}

impl ArticleFinder {
    pub fn new(settings: SearchSettings) -> Self {
        Self {
            settings,
            client: reqwest::Client::new(),
        }
    }

    /// Returns the first non-PDF organic link, or `None` on any failure.
    pub async fn find_article(&self, question: &str) -> Option<String> {
        let query = format!("{question} {JURISDICTION_QUALIFIER}");
        match self.search(&query).await {
            Ok(links) => {
                let picked = first_non_pdf_link(&links).map(ToOwned::to_owned);
                engine_info!(
                    "Search for {:?} returned {} link(s), picked {:?}",
                    query,
                    links.len(),
                    picked
                );
                picked
            }
            Err(err) => {
                engine_warn!("Error fetching article: {}", err);
                None
            }
        }
    }

    async fn search(&self, query: &str) -> Result<Vec<String>, SearchError> {
        let request = self
            .client
            .get(&self.settings.endpoint)
            .query(&[
                ("engine", self.settings.engine.as_str()),
                ("q", query),
                ("api_key", self.settings.api_key.as_str()),
            ])
            .timeout(self.settings.timeout)
            .build()?;
        engine_debug!("Search request {}", redact_query_secret(request.url().as_str()));

        let response = self.client.execute(request).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status(status.as_u16()));
        }

        let body: SearchResponse = response.json().await?;
        Ok(body
            .organic_results
            .into_iter()
            .filter_map(|result| result.link)
            .collect())
    }
}

/// Returns the first link that does not mention `pdf` as a whole word.
pub fn first_non_pdf_link<S: AsRef<str>>(links: &[S]) -> Option<&str> {
    links
        .iter()
        .map(AsRef::as_ref)
        .find(|link| !PDF_TOKEN.is_match(link))
}
