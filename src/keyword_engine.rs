use anyhow::Result;
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;
use url::{ParseError, Url};

use crate::analyzer::KeywordExtractor;
use crate::config::Config;
use crate::data_models::{AnalysisResult, SearchResult};
use crate::scorer::{RandomMetrics, Scorer};
use crate::search::{SearchError, SearchProvider, SerpstackClient};

#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("URL is required")]
    MissingUrl,

    #[error("Invalid URL")]
    InvalidUrl(String),

    #[error("Invalid request body")]
    InvalidBody(String),

    #[error("SERPSTACK_API_KEY is not configured")]
    MissingApiKey,

    #[error(transparent)]
    Search(#[from] SearchError),
}

/// Parses the URL a user typed. "example.com/blog" is accepted as "https://example.com/blog"
/// and "localhost:3000" as "https://localhost:3000".
pub fn parse_target_url(raw: &str) -> Result<Url, AnalyzeError> {
    let parsed = match Url::parse(raw) {
        Err(ParseError::RelativeUrlWithoutBase) => Url::parse(&format!("https://{raw}")),
        // "host:port" parses as scheme "host" with no authority
        Ok(url) if url.host_str().is_none() && is_host_and_port(raw) => {
            Url::parse(&format!("https://{raw}"))
        }
        other => other,
    }
    .map_err(|e| AnalyzeError::InvalidUrl(format!("{raw}: {e}")))?;

    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(parsed),
        _ => Err(AnalyzeError::InvalidUrl(format!("{raw}: no host"))),
    }
}

fn is_host_and_port(raw: &str) -> bool {
    !raw.contains("://")
        && raw
            .split_once(':')
            .is_some_and(|(_, rest)| rest.starts_with(|c: char| c.is_ascii_digit()))
}

/// First label of the hostname with any leading "www." removed: "www.example.co.uk" -> "example".
pub fn domain_token(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    let host = host.strip_prefix("www.").unwrap_or(host);
    host.split('.').next().unwrap_or_default().to_string()
}

/// Words of a result URL's path, "/blog/rust-async_guide" -> " blog rust async guide".
pub fn path_text(result_url: &str) -> Option<String> {
    let url = Url::parse(result_url).ok()?;
    Some(url.path().replace(['/', '-', '_'], " "))
}

pub struct KeywordEngine {
    search: Option<Arc<dyn SearchProvider>>,
    extractor: KeywordExtractor,
    scorer: Scorer,
}

impl KeywordEngine {
    /// `search` is `None` when no provider credential is configured; analyses then fail
    /// with [`AnalyzeError::MissingApiKey`].
    pub fn new(
        search: Option<Arc<dyn SearchProvider>>,
        extractor: KeywordExtractor,
        scorer: Scorer,
    ) -> Self {
        Self {
            search,
            extractor,
            scorer,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.search_timeout)
            .build()?;

        let search = config.serpstack_api_key.as_deref().map(|key| {
            Arc::new(SerpstackClient::new(
                client,
                &config.serpstack_base_url,
                key,
                config.search_result_count,
            )) as Arc<dyn SearchProvider>
        });

        Ok(Self::new(
            search,
            KeywordExtractor::default(),
            Scorer::new(Box::new(RandomMetrics::new(config.metrics_seed))),
        ))
    }

    pub fn is_configured(&self) -> bool {
        self.search.is_some()
    }

    /// Runs one `site:` search for `url` and turns the organic results into a ranked
    /// keyword list. No results is not an error: the list is simply empty.
    pub async fn analyze(&self, url: Option<&str>) -> Result<AnalysisResult, AnalyzeError> {
        let url = url
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or(AnalyzeError::MissingUrl)?;
        let search = self.search.as_ref().ok_or(AnalyzeError::MissingApiKey)?;
        let target = parse_target_url(url)?;

        let results = search.search(&format!("site:{url}")).await?;

        let domain = domain_token(&target);
        let keywords = self.collect_keywords(&results);
        tracing::debug!(
            url,
            domain = domain.as_str(),
            results = results.len(),
            candidates = keywords.len(),
            "extracted keyword candidates"
        );

        let scored = self.scorer.score(&keywords, &results, &domain);
        Ok(AnalysisResult::new(url.to_string(), scored))
    }

    /// Union of the candidates from every result's title, snippet and URL path.
    pub fn collect_keywords(&self, results: &[SearchResult]) -> BTreeSet<String> {
        let mut keywords = BTreeSet::new();
        for result in results {
            self.extractor.extract_into(&result.title, &mut keywords);
            self.extractor.extract_into(&result.snippet, &mut keywords);
            match path_text(&result.url) {
                Some(path) => self.extractor.extract_into(&path, &mut keywords),
                None => {
                    tracing::warn!(url = result.url.as_str(), "skipping unparseable result url")
                }
            }
        }
        keywords
    }
}
