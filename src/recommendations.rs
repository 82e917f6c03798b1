use crate::data_models::ScoredKeyword;
use crate::scorer::rank_order;

/// Keywords shown per strategy.
pub const RECOMMENDATIONS_PER_STRATEGY: usize = 3;

/// Organic targets are the keywords easier to rank for than this difficulty.
pub const SEO_MAX_DIFFICULTY: u32 = 70;

/// Paid targets need more monthly searches than this.
pub const SEA_MIN_SEARCH_VOLUME: u32 = 20_000;

pub const LONG_TAIL_MIN_WORDS: usize = 3;

/// The best few keywords for each strategy, by priority.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recommendations {
    pub seo: Vec<ScoredKeyword>,
    pub sea: Vec<ScoredKeyword>,
    pub long_tail: Vec<ScoredKeyword>,
}

impl Recommendations {
    pub fn is_empty(&self) -> bool {
        self.seo.is_empty() && self.sea.is_empty() && self.long_tail.is_empty()
    }
}

fn top(ranked: &[&ScoredKeyword], keep: impl Fn(&ScoredKeyword) -> bool) -> Vec<ScoredKeyword> {
    ranked
        .iter()
        .filter(|&&kw| keep(kw))
        .take(RECOMMENDATIONS_PER_STRATEGY)
        .map(|&kw| kw.clone())
        .collect()
}

pub fn recommendations(keywords: &[ScoredKeyword]) -> Recommendations {
    let mut ranked: Vec<&ScoredKeyword> = keywords.iter().collect();
    ranked.sort_by(|a, b| rank_order(a, b));

    Recommendations {
        seo: top(&ranked, |kw| kw.difficulty < SEO_MAX_DIFFICULTY),
        sea: top(&ranked, |kw| kw.search_volume > SEA_MIN_SEARCH_VOLUME),
        long_tail: top(&ranked, |kw| kw.keyword.split(' ').count() >= LONG_TAIL_MIN_WORDS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kw(keyword: &str, search_volume: u32, difficulty: u32, priority: u32) -> ScoredKeyword {
        ScoredKeyword {
            keyword: keyword.to_string(),
            search_volume,
            difficulty,
            competition: 0.75,
            priority_score: priority,
        }
    }

    fn names(keywords: &[ScoredKeyword]) -> Vec<&str> {
        keywords.iter().map(|k| k.keyword.as_str()).collect()
    }

    #[test]
    fn test_thresholds_are_strict() {
        let keywords = vec![
            kw("easy", 20_000, 69, 10),
            kw("borderline", 20_001, 70, 10),
        ];
        let recs = recommendations(&keywords);
        assert_eq!(names(&recs.seo), vec!["easy"]);
        assert_eq!(names(&recs.sea), vec!["borderline"]);
        assert!(recs.long_tail.is_empty());
    }

    #[test]
    fn test_capped_at_three_by_priority() {
        let keywords = vec![
            kw("garden", 30_000, 61, 10),
            kw("garden tools guide", 30_000, 62, 60),
            kw("garden tools", 30_000, 63, 40),
            kw("best garden tools online", 30_000, 64, 30),
            kw("cheap garden tools", 30_000, 65, 50),
        ];
        let recs = recommendations(&keywords);
        assert_eq!(
            names(&recs.seo),
            vec!["garden tools guide", "cheap garden tools", "garden tools"]
        );
        assert_eq!(recs.sea, recs.seo);
        assert_eq!(
            names(&recs.long_tail),
            vec!["garden tools guide", "cheap garden tools", "best garden tools online"]
        );
    }

    #[test]
    fn test_empty_input() {
        let recs = recommendations(&[]);
        assert!(recs.is_empty());
        assert_eq!(recs, Recommendations::default());
    }
}
