//! Shared match predicate
//!
//! KeywordPattern is the single definition of "this text matches this
//! keyword". Both the tokenizer and the UI find feature
//! (`search::TextFinder`) sit on it, so keyword styling and text search
//! cannot silently diverge on what counts as a match.
//!
//! Matching is always case-insensitive. `MatchMode::Loose` applies the
//! one looseness transform on top:
//! - a whitespace run in the keyword matches any whitespace run in the text
//! - straight and curly apostrophes are interchangeable

use regex::Regex;
use serde::{Deserialize, Serialize};

// ==================== TYPE DEFINITIONS ====================

/// How keyword text is compared against input text
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Literal match (case-insensitive)
    Strict,
    /// Literal match plus the looseness transform
    Loose,
}

impl Default for MatchMode {
    fn default() -> Self {
        MatchMode::Strict
    }
}

/// Pattern compilation error
#[derive(Debug)]
pub struct PatternError {
    pub keyword: String,
    source: regex::Error,
}

impl std::fmt::Display for PatternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "cannot compile keyword '{}': {}", self.keyword, self.source)
    }
}

impl std::error::Error for PatternError {}

// ==================== MAIN IMPLEMENTATION ====================

/// Compiled match predicate for one keyword
#[derive(Debug, Clone)]
pub struct KeywordPattern {
    /// Unanchored occurrence search
    finder: Regex,
    /// Anchored whole-string check
    whole: Regex,
}

impl KeywordPattern {
    /// Compile a keyword into its predicate. The keyword is treated as a
    /// literal; regex metacharacters in it carry no special meaning.
    pub fn compile(keyword: &str, mode: MatchMode) -> Result<Self, PatternError> {
        let body = match mode {
            MatchMode::Strict => regex::escape(keyword),
            MatchMode::Loose => loose_source(keyword),
        };

        let finder = Regex::new(&format!("(?i){}", body)).map_err(|e| PatternError {
            keyword: keyword.to_string(),
            source: e,
        })?;
        let whole = Regex::new(&format!("(?i)^(?:{})$", body)).map_err(|e| PatternError {
            keyword: keyword.to_string(),
            source: e,
        })?;

        Ok(Self { finder, whole })
    }

    /// First occurrence at or after `start`, as byte offsets into `text`
    pub fn find_at(&self, text: &str, start: usize) -> Option<(usize, usize)> {
        self.finder.find_at(text, start).map(|m| (m.start(), m.end()))
    }

    /// All non-overlapping occurrences, as byte offsets into `text`
    pub fn occurrences(&self, text: &str) -> Vec<(usize, usize)> {
        self.finder
            .find_iter(text)
            .map(|m| (m.start(), m.end()))
            .collect()
    }

    /// Whether `candidate` in its entirety matches the keyword
    pub fn matches_whole(&self, candidate: &str) -> bool {
        self.whole.is_match(candidate)
    }

    /// Whether `text` contains the keyword anywhere
    pub fn is_contained_in(&self, text: &str) -> bool {
        self.finder.is_match(text)
    }
}

/// Build the loose regex source: whitespace runs become `\s+`, apostrophe
/// variants collapse into one class, everything else is escaped literally.
fn loose_source(keyword: &str) -> String {
    let mut body = String::with_capacity(keyword.len() * 2);
    let mut chars = keyword.chars().peekable();

    while let Some(c) = chars.next() {
        if c.is_whitespace() {
            while chars.peek().map_or(false, |n| n.is_whitespace()) {
                chars.next();
            }
            body.push_str(r"\s+");
        } else if c == '\'' || c == '\u{2019}' {
            body.push_str("['\u{2019}]");
        } else {
            body.push_str(&regex::escape(&c.to_string()));
        }
    }

    body
}

// ==================== TESTS ====================
