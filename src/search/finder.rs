//! TextFinder - UI text search over the shared match predicate
//!
//! The find feature and keyword annotation must agree on what counts as
//! a match, so both sit on `KeywordPattern`. A query that the annotator
//! would highlight is exactly a query the finder locates, in both Strict
//! and Loose modes.

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::annotate::log;
use crate::annotate::matcher::{KeywordPattern, MatchMode};

// ==================== TYPE DEFINITIONS ====================

/// A single find result, byte offsets into the searched text
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FindMatch {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

// ==================== MAIN IMPLEMENTATION ====================

/// TextFinder - locates query occurrences with annotation semantics
#[wasm_bindgen]
pub struct TextFinder {
    mode: MatchMode,
}

#[wasm_bindgen]
impl TextFinder {
    /// Create a finder
    ///
    /// # Arguments
    /// * `loose` - If true, apply the looseness transform (flexible
    ///   whitespace, interchangeable apostrophes)
    #[wasm_bindgen(constructor)]
    pub fn new(loose: bool) -> Self {
        Self {
            mode: if loose {
                MatchMode::Loose
            } else {
                MatchMode::Strict
            },
        }
    }

    /// All occurrences of `query` in `text`
    #[wasm_bindgen(js_name = findAll)]
    pub fn find_all_js(&self, text: &str, query: &str) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.find_all(text, query))
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    /// Whether `text` contains `query` at all
    #[wasm_bindgen(js_name = contains)]
    pub fn contains(&self, text: &str, query: &str) -> bool {
        match self.compile(query) {
            Some(pattern) => pattern.is_contained_in(text),
            None => false,
        }
    }

    /// Number of occurrences of `query` in `text`
    #[wasm_bindgen(js_name = count)]
    pub fn count(&self, text: &str, query: &str) -> usize {
        self.find_all(text, query).len()
    }
}

impl TextFinder {
    /// All occurrences of `query` in `text`, native form
    pub fn find_all(&self, text: &str, query: &str) -> Vec<FindMatch> {
        let pattern = match self.compile(query) {
            Some(pattern) => pattern,
            None => return Vec::new(),
        };

        pattern
            .occurrences(text)
            .into_iter()
            .map(|(start, end)| FindMatch {
                start,
                end,
                text: text[start..end].to_string(),
            })
            .collect()
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    fn compile(&self, query: &str) -> Option<KeywordPattern> {
        if query.trim().is_empty() {
            return None;
        }
        match KeywordPattern::compile(query, self.mode) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                log::warn(&format!("[TextFinder] {}", e));
                None
            }
        }
    }
}

// ==================== TESTS ====================
