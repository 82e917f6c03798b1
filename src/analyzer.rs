use once_cell::sync::Lazy;
use std::collections::BTreeSet;
use std::collections::HashSet;
use unicode_normalization::char::is_combining_mark;

/// Words too common to carry meaning as keyword candidates.
static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "and", "the", "for", "with", "this", "that", "what", "where", "when", "how", "why", "who",
    ])
});

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(word)
}

/// Longest keyword candidate, in words.
pub const MAX_NGRAM: usize = 3;

/// A character filter receives the original text and can transform it by adding, removing,
/// or changing characters before it is split into tokens.
pub trait CharacterFilter: Send + Sync {
    fn filter(&self, text: String) -> String;
}

#[derive(Debug, Default)]
pub struct LowerCaseCharFilter;

impl CharacterFilter for LowerCaseCharFilter {
    fn filter(&self, text: String) -> String {
        text.to_lowercase()
    }
}

/// Replaces every character that is neither alphanumeric nor whitespace with a space,
/// so "node.js-tips" becomes "node js tips". Combining marks are dropped instead: lowercasing
/// "İ" leaves a U+0307 behind that must not split the word.
#[derive(Debug, Default)]
pub struct PunctuationCharFilter;

impl CharacterFilter for PunctuationCharFilter {
    fn filter(&self, text: String) -> String {
        text.chars()
            .filter_map(|c| {
                if c.is_alphanumeric() || c.is_whitespace() {
                    Some(c)
                } else if is_combining_mark(c) {
                    None
                } else {
                    Some(' ')
                }
            })
            .collect()
    }
}

/// A tokenizer receives a stream of characters, breaks it up into individual tokens
/// (usually individual words), and outputs a stream of tokens.
/// For instance, a whitespace tokenizer breaks text into tokens whenever it sees any whitespace.
/// It would convert the text "Quick brown fox!" into the terms [Quick, brown, fox!].
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: String) -> Vec<String>;
}

pub struct WhiteSpaceTokenizer;

impl Tokenizer for WhiteSpaceTokenizer {
    fn tokenize(&self, text: String) -> Vec<String> {
        text.split_whitespace()
            .map(|w| w.to_string())
            .collect::<Vec<String>>()
    }
}

/// A token filter receives the token stream and may add, remove, or change tokens.
/// For example, a stop token filter removes common words like "the" from the token stream.
pub trait TokenFilter: Send + Sync {
    fn filter(&self, tokens: Vec<TextToken>) -> Vec<TextToken>;
}

pub struct StopWordTokenFilter;

impl TokenFilter for StopWordTokenFilter {
    fn filter(&self, mut tokens: Vec<TextToken>) -> Vec<TextToken> {
        tokens.retain(|w| !is_stop_word(&w.term));
        tokens
    }
}

/// Drops tokens shorter than `min_length` characters.
pub struct MinLengthTokenFilter {
    min_length: usize,
}

impl MinLengthTokenFilter {
    pub fn new(min_length: usize) -> Self {
        Self { min_length }
    }
}

impl Default for MinLengthTokenFilter {
    fn default() -> Self {
        // anything of three characters or fewer is noise ("seo", "top", "faq")
        Self { min_length: 4 }
    }
}

impl TokenFilter for MinLengthTokenFilter {
    fn filter(&self, mut tokens: Vec<TextToken>) -> Vec<TextToken> {
        tokens.retain(|t| t.term.chars().count() >= self.min_length);
        tokens
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextToken {
    pub term: String,
}

impl TextToken {
    pub fn new(term: impl Into<String>) -> Self {
        Self { term: term.into() }
    }
}

/// Pure text analysis pipeline - no async, no I/O, just text transformations
pub struct TextAnalyzer {
    char_filters: Vec<Box<dyn CharacterFilter>>,
    tokenizer: Box<dyn Tokenizer>,
    token_filters: Vec<Box<dyn TokenFilter>>,
}

impl TextAnalyzer {
    pub fn new(
        char_filters: Vec<Box<dyn CharacterFilter>>,
        tokenizer: Box<dyn Tokenizer>,
        token_filters: Vec<Box<dyn TokenFilter>>,
    ) -> Self {
        Self {
            char_filters,
            tokenizer,
            token_filters,
        }
    }

    pub fn char_filter(&self, mut content: String) -> String {
        for filter in self.char_filters.iter() {
            content = filter.filter(content);
        }
        content
    }

    pub fn tokenize(&self, content: String) -> Vec<TextToken> {
        self.tokenizer
            .tokenize(content)
            .into_iter()
            .map(TextToken::new)
            .collect()
    }

    pub fn token_filter(&self, mut tokens: Vec<TextToken>) -> Vec<TextToken> {
        for filter in self.token_filters.iter() {
            tokens = filter.filter(tokens);
        }
        tokens
    }

    /// Analyzes raw content and returns the surviving tokens in text order
    pub fn analyze(&self, raw_content: String) -> Vec<TextToken> {
        let content = self.char_filter(raw_content);
        let tokens = self.tokenize(content);
        self.token_filter(tokens)
    }
}

impl Default for TextAnalyzer {
    fn default() -> Self {
        TextAnalyzer::new(
            vec![Box::new(LowerCaseCharFilter), Box::new(PunctuationCharFilter)],
            Box::new(WhiteSpaceTokenizer),
            vec![
                Box::new(MinLengthTokenFilter::default()),
                Box::new(StopWordTokenFilter),
            ],
        )
    }
}

/// Joins every window of `n` consecutive tokens with a single space.
/// Yields nothing when there are fewer than `n` tokens.
pub fn ngrams(tokens: &[TextToken], n: usize) -> impl Iterator<Item = String> + '_ {
    // windows(0) panics
    tokens.windows(n.max(1)).filter(move |_| n > 0).map(|window| {
        window
            .iter()
            .map(|t| t.term.as_str())
            .collect::<Vec<&str>>()
            .join(" ")
    })
}

/// Turns free text into keyword candidates: every unigram, bigram and trigram of the
/// analyzed token stream. Filtered-out words are skipped over, so "guide to the rust
/// language" yields the bigram "guide rust".
pub struct KeywordExtractor {
    analyzer: TextAnalyzer,
    max_ngram: usize,
}

impl KeywordExtractor {
    pub fn new(analyzer: TextAnalyzer, max_ngram: usize) -> Self {
        Self {
            analyzer,
            max_ngram,
        }
    }

    pub fn extract(&self, text: &str) -> BTreeSet<String> {
        let mut keywords = BTreeSet::new();
        self.extract_into(text, &mut keywords);
        keywords
    }

    /// Same as [`extract`](Self::extract) but unions into an existing set.
    pub fn extract_into(&self, text: &str, keywords: &mut BTreeSet<String>) {
        if text.trim().is_empty() {
            return;
        }
        let tokens = self.analyzer.analyze(text.to_string());
        for n in 1..=self.max_ngram {
            keywords.extend(ngrams(&tokens, n));
        }
    }
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        KeywordExtractor::new(TextAnalyzer::default(), MAX_NGRAM)
    }
}
