//! Annotation rule model
//!
//! An AnnotationRule attaches display metadata to a dictionary keyword: an
//! optional style class, an optional cross-reference, an optional literal
//! replacement for the matched text. A keyword maps to an *ordered chain*
//! of rules, so a single match may expand to several adjacent tokens
//! (a roster entry renders as index badge + space + styled name).

use serde::{Deserialize, Serialize};

// ==================== TYPE DEFINITIONS ====================

/// Opaque cross-reference identifier (wiki article, player profile, ...).
///
/// Resolved only by the host's navigation sink; the engine never
/// interprets it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct CrossRef(pub String);

impl CrossRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One annotation rule attached to a keyword
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct AnnotationRule {
    /// CSS-class-like style tag applied by the host
    #[serde(default)]
    pub style: Option<String>,
    /// Cross-reference this match navigates to when links are enabled
    #[serde(default)]
    pub link: Option<CrossRef>,
    /// Literal text substituted for the matched substring
    #[serde(default)]
    pub replacement: Option<String>,
}

impl AnnotationRule {
    /// Rule carrying only a style class
    pub fn styled(style: impl Into<String>) -> Self {
        Self {
            style: Some(style.into()),
            ..Self::default()
        }
    }

    /// Rule carrying only a literal replacement (e.g. a separator space)
    pub fn literal(replacement: impl Into<String>) -> Self {
        Self {
            replacement: Some(replacement.into()),
            ..Self::default()
        }
    }

    pub fn with_link(mut self, link: CrossRef) -> Self {
        self.link = Some(link);
        self
    }

    pub fn with_replacement(mut self, replacement: impl Into<String>) -> Self {
        self.replacement = Some(replacement.into());
        self
    }
}

// ==================== TESTS ====================
