use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// One organic entry returned by the search provider.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResult {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub snippet: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub url: String,
}

impl SearchResult {
    pub fn new(title: &str, snippet: &str, url: &str) -> SearchResult {
        SearchResult {
            title: title.to_string(),
            snippet: snippet.to_string(),
            url: url.to_string(),
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoredKeyword {
    pub keyword: String,
    pub search_volume: u32,
    pub difficulty: u32,
    pub competition: f64,
    pub priority_score: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub url: String,
    pub timestamp: String,
    pub keywords: Vec<ScoredKeyword>,
}

impl AnalysisResult {
    /// Stamps the result with the current UTC time, e.g. `2025-01-31T09:15:02.117Z`.
    pub fn new(url: String, keywords: Vec<ScoredKeyword>) -> AnalysisResult {
        AnalysisResult {
            url,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            keywords,
        }
    }
}
