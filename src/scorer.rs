use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::ops::Range;

use crate::data_models::{ScoredKeyword, SearchResult};

/// Upper bound on the number of keywords in one analysis.
pub const MAX_KEYWORDS: usize = 100;

pub const SEARCH_VOLUME_RANGE: Range<u32> = 10_000..50_000;
pub const DIFFICULTY_RANGE: Range<u32> = 60..100;
pub const COMPETITION_MIN: f64 = 0.60;
pub const COMPETITION_MAX: f64 = 1.00;

/// Placeholder traffic numbers attached to a keyword. They carry no real signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticMetrics {
    pub search_volume: u32,
    pub difficulty: u32,
    pub competition: f64,
}

/// Produces the synthetic metrics for one analysis. `generator` is called once per
/// analysis and the returned closure once per keyword, in ascending keyword order.
pub trait MetricsSource: Send + Sync {
    fn generator(&self) -> Box<dyn FnMut(&str) -> SyntheticMetrics + Send>;
}

/// Uniformly random metrics. With a seed every analysis draws the same sequence.
#[derive(Debug, Clone, Default)]
pub struct RandomMetrics {
    seed: Option<u64>,
}

impl RandomMetrics {
    pub fn new(seed: Option<u64>) -> Self {
        Self { seed }
    }

    pub fn seeded(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    fn draw(rng: &mut StdRng) -> SyntheticMetrics {
        let competition = rng.gen_range(COMPETITION_MIN..COMPETITION_MAX);
        SyntheticMetrics {
            search_volume: rng.gen_range(SEARCH_VOLUME_RANGE),
            difficulty: rng.gen_range(DIFFICULTY_RANGE),
            competition: (competition * 100.0).round() / 100.0,
        }
    }
}

impl MetricsSource for RandomMetrics {
    fn generator(&self) -> Box<dyn FnMut(&str) -> SyntheticMetrics + Send> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Box::new(move |_keyword: &str| Self::draw(&mut rng))
    }
}

/// 10 for a single word, 20 for two, 30 for three or more.
pub fn length_score(keyword: &str) -> u32 {
    match keyword.split(' ').count() {
        n if n > 2 => 30,
        n if n > 1 => 20,
        _ => 10,
    }
}

pub fn relevance_score(keyword: &str, domain: &str) -> u32 {
    if !domain.is_empty() && keyword.contains(domain) {
        20
    } else {
        0
    }
}

/// Number of results whose title or snippet mentions the keyword, ignoring case.
pub fn appearance_count(keyword: &str, results: &[LoweredResult]) -> usize {
    results
        .iter()
        .filter(|r| r.title.contains(keyword) || r.snippet.contains(keyword))
        .count()
}

pub fn popularity_score(appearances: usize) -> u32 {
    (appearances.min(5) * 10) as u32
}

/// Lowercased copy of the searchable fields of a [`SearchResult`], built once per analysis.
#[derive(Debug, Clone)]
pub struct LoweredResult {
    title: String,
    snippet: String,
}

impl From<&SearchResult> for LoweredResult {
    fn from(result: &SearchResult) -> Self {
        Self {
            title: result.title.to_lowercase(),
            snippet: result.snippet.to_lowercase(),
        }
    }
}

/// Descending priority, then ascending keyword.
pub fn rank_order(a: &ScoredKeyword, b: &ScoredKeyword) -> Ordering {
    b.priority_score
        .cmp(&a.priority_score)
        .then_with(|| a.keyword.cmp(&b.keyword))
}

pub struct Scorer {
    metrics: Box<dyn MetricsSource>,
    max_keywords: usize,
}

impl Scorer {
    pub fn new(metrics: Box<dyn MetricsSource>) -> Self {
        Self {
            metrics,
            max_keywords: MAX_KEYWORDS,
        }
    }

    pub fn with_max_keywords(mut self, max_keywords: usize) -> Self {
        self.max_keywords = max_keywords;
        self
    }

    pub fn priority_score(keyword: &str, domain: &str, results: &[LoweredResult]) -> u32 {
        length_score(keyword)
            + relevance_score(keyword, domain)
            + popularity_score(appearance_count(keyword, results))
    }

    /// Scores every keyword against the results it was extracted from and returns the
    /// best `max_keywords`, highest priority first.
    pub fn score(
        &self,
        keywords: &BTreeSet<String>,
        results: &[SearchResult],
        domain: &str,
    ) -> Vec<ScoredKeyword> {
        let lowered: Vec<LoweredResult> = results.iter().map(LoweredResult::from).collect();
        let mut next_metrics = self.metrics.generator();

        let mut scored: Vec<ScoredKeyword> = keywords
            .iter()
            .map(|keyword| {
                let metrics = next_metrics(keyword.as_str());
                ScoredKeyword {
                    keyword: keyword.clone(),
                    search_volume: metrics.search_volume,
                    difficulty: metrics.difficulty,
                    competition: metrics.competition,
                    priority_score: Self::priority_score(keyword, domain, &lowered),
                }
            })
            .collect();

        scored.sort_by(rank_order);
        scored.truncate(self.max_keywords);
        scored
    }
}

impl Default for Scorer {
    fn default() -> Self {
        Scorer::new(Box::new(RandomMetrics::default()))
    }
}
