//! Longest-first keyword tokenizer
//!
//! Turns input text plus a dictionary snapshot into an ordered token
//! list. Keywords apply longest-first (ties lexicographic, pre-sorted in
//! the snapshot), so a long keyword is never partially consumed by a
//! shorter one it contains. Annotation is "consume and lock", not "mask":
//! once a segment is annotated it is final, but shorter keywords still
//! match inside the raw remainders split off around it.
//!
//! Invariants:
//! - concatenating every token's pre-annotation source span reproduces
//!   the input exactly, no characters dropped or duplicated
//! - annotated spans never overlap
//! - total over its inputs: no panic for any dictionary and any text

use serde::{Deserialize, Serialize};

use super::dictionary::{DictEntry, Dictionary};
use super::matcher::KeywordPattern;
use super::rules::CrossRef;

// ==================== TYPE DEFINITIONS ====================

/// A contiguous, non-overlapping unit of output text
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Token {
    /// Passes through to output unmodified (already safe by contract)
    Raw { text: String },
    /// A keyword match, carrying its display metadata
    Annotated {
        /// Display text: the rule replacement when present, else the
        /// matched substring in its original case
        text: String,
        /// Pre-annotation source span. The first token of a rule chain
        /// owns the whole matched substring; continuation tokens carry
        /// an empty source so reconstruction stays exact.
        source: String,
        style: Option<String>,
        link: Option<CrossRef>,
        replacement_applied: bool,
    },
}

impl Token {
    pub fn raw(text: impl Into<String>) -> Self {
        Token::Raw { text: text.into() }
    }

    /// The pre-annotation source span this token accounts for
    pub fn source_span(&self) -> &str {
        match self {
            Token::Raw { text } => text,
            Token::Annotated { source, .. } => source,
        }
    }

    /// The text this token displays
    pub fn display_text(&self) -> &str {
        match self {
            Token::Raw { text } => text,
            Token::Annotated { text, .. } => text,
        }
    }

    pub fn is_annotated(&self) -> bool {
        matches!(self, Token::Annotated { .. })
    }
}

// ==================== MAIN IMPLEMENTATION ====================

/// Tokenize `text` against a dictionary snapshot.
///
/// Algorithm: start from a single Raw token holding the whole input. For
/// each dictionary entry in matching order, split every *current* Raw
/// token on occurrences of the keyword; segments that match the keyword
/// expand to one Annotated token per rule in the chain, the rest stay
/// Raw. New tokens are spliced in place of the split token and the scan
/// index advances past them, so a keyword never re-examines its own
/// output within a pass.
pub fn tokenize(text: &str, dictionary: &Dictionary) -> Vec<Token> {
    let mut tokens = vec![Token::raw(text)];

    if !dictionary.may_contain(text) {
        return tokens;
    }

    for entry in dictionary.entries() {
        let mut i = 0;
        while i < tokens.len() {
            let raw_text = match &tokens[i] {
                Token::Raw { text } => text.clone(),
                Token::Annotated { .. } => {
                    i += 1;
                    continue;
                }
            };

            match split_segments(&raw_text, entry.pattern()) {
                None => i += 1,
                Some(segments) => {
                    let mut replacements = Vec::with_capacity(segments.len());
                    for segment in segments {
                        if entry.pattern().matches_whole(segment) {
                            annotate_segment(segment, entry, &mut replacements);
                        } else {
                            replacements.push(Token::raw(segment));
                        }
                    }

                    let inserted = replacements.len();
                    tokens.splice(i..=i, replacements);
                    i += inserted;
                }
            }
        }
    }

    tokens
}

/// Split `text` on occurrences of the keyword, keeping the matched pieces
/// and dropping empty splits. `None` when the keyword does not occur.
fn split_segments<'t>(text: &'t str, pattern: &KeywordPattern) -> Option<Vec<&'t str>> {
    let mut segments = Vec::new();
    let mut cursor = 0;
    let mut found = false;

    while let Some((start, end)) = pattern.find_at(text, cursor) {
        // Zero-width matches cannot happen for real keywords; bail rather
        // than loop if one slips through
        if end == start {
            break;
        }
        found = true;
        if start > cursor {
            segments.push(&text[cursor..start]);
        }
        segments.push(&text[start..end]);
        cursor = end;
    }

    if !found {
        return None;
    }
    if cursor < text.len() {
        segments.push(&text[cursor..]);
    }
    Some(segments)
}

/// Expand a matched segment into one Annotated token per rule, in chain
/// order. The first token carries the matched source span.
fn annotate_segment(matched: &str, entry: &DictEntry, out: &mut Vec<Token>) {
    if entry.rules.is_empty() {
        // An empty chain has nothing to annotate with; keep the text
        out.push(Token::raw(matched));
        return;
    }

    for (position, rule) in entry.rules.iter().enumerate() {
        let (text, replacement_applied) = match &rule.replacement {
            Some(replacement) => (replacement.clone(), true),
            None => (matched.to_string(), false),
        };

        out.push(Token::Annotated {
            text,
            source: if position == 0 {
                matched.to_string()
            } else {
                String::new()
            },
            style: rule.style.clone(),
            link: rule.link.clone(),
            replacement_applied,
        });
    }
}

// ==================== TESTS ====================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::dictionary::{
        CatalogData, DictionaryBuilder, GlossaryEntry, RosterEntry, VariantMap,
    };
    use crate::annotate::matcher::MatchMode;
    use crate::annotate::rules::AnnotationRule;

    fn dict_of(entries: Vec<(&str, Vec<AnnotationRule>)>) -> Dictionary {
        let glossary: Vec<GlossaryEntry> = entries
            .into_iter()
            .map(|(term, rules)| GlossaryEntry {
                term: term.to_string(),
                rules,
            })
            .collect();
        let mut builder = DictionaryBuilder::new(MatchMode::Strict);
        builder.add_glossary(&glossary, &VariantMap::new());
        builder.build()
    }

    fn reconstruct(tokens: &[Token]) -> String {
        tokens.iter().map(Token::source_span).collect()
    }

    #[test]
    fn test_empty_dictionary_returns_single_raw_token() {
        let dict = Dictionary::empty();
        let tokens = tokenize("The Sheriff investigated", &dict);

        assert_eq!(tokens, vec![Token::raw("The Sheriff investigated")]);
    }

    #[test]
    fn test_empty_input() {
        let dict = dict_of(vec![("Bob", vec![AnnotationRule::styled("player")])]);
        let tokens = tokenize("", &dict);

        assert_eq!(tokens, vec![Token::raw("")]);
    }

    #[test]
    fn test_single_match_splits_text() {
        let dict = dict_of(vec![("Sheriff", vec![AnnotationRule::styled("role")])]);
        let tokens = tokenize("The Sheriff investigated", &dict);

        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0], Token::raw("The "));
        assert!(tokens[1].is_annotated());
        assert_eq!(tokens[1].display_text(), "Sheriff");
        assert_eq!(tokens[2], Token::raw(" investigated"));
    }

    #[test]
    fn test_longest_keyword_wins() {
        let dict = dict_of(vec![
            ("Sheriff", vec![AnnotationRule::styled("role")]),
            ("Sheriff's Deputy", vec![AnnotationRule::styled("role-special")]),
        ]);
        let tokens = tokenize("The Sheriff's Deputy investigated", &dict);

        // "Sheriff's Deputy" annotates as one unit; "Sheriff" never
        // separately matches inside it
        let annotated: Vec<&Token> = tokens.iter().filter(|t| t.is_annotated()).collect();
        assert_eq!(annotated.len(), 1);
        assert_eq!(annotated[0].source_span(), "Sheriff's Deputy");
        match annotated[0] {
            Token::Annotated { style, .. } => {
                assert_eq!(style.as_deref(), Some("role-special"))
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_shorter_keyword_still_matches_outside_longer_match() {
        let dict = dict_of(vec![
            ("Alice", vec![AnnotationRule::styled("player").with_replacement("Alice")]),
            ("Alice the Elder", vec![AnnotationRule::styled("player-special")]),
        ]);
        let tokens = tokenize("Alice the Elder spoke to Alice", &dict);

        assert_eq!(
            tokens,
            vec![
                Token::Annotated {
                    text: "Alice the Elder".to_string(),
                    source: "Alice the Elder".to_string(),
                    style: Some("player-special".to_string()),
                    link: None,
                    replacement_applied: false,
                },
                Token::raw(" spoke to "),
                Token::Annotated {
                    text: "Alice".to_string(),
                    source: "Alice".to_string(),
                    style: Some("player".to_string()),
                    link: None,
                    replacement_applied: true,
                },
            ]
        );
    }

    #[test]
    fn test_repeated_keyword_non_overlapping() {
        let dict = dict_of(vec![("Bob", vec![AnnotationRule::styled("player")])]);
        let tokens = tokenize("Bob told Bob", &dict);

        assert_eq!(tokens.len(), 3);
        assert!(tokens[0].is_annotated());
        assert_eq!(tokens[1], Token::raw(" told "));
        assert!(tokens[2].is_annotated());
    }

    #[test]
    fn test_case_insensitive_match_preserves_source_case() {
        let dict = dict_of(vec![("Sheriff", vec![AnnotationRule::styled("role")])]);
        let tokens = tokenize("the SHERIFF slept", &dict);

        // No replacement on the rule, so the display text keeps the
        // original casing from the input
        assert_eq!(tokens[1].display_text(), "SHERIFF");
        assert_eq!(tokens[1].source_span(), "SHERIFF");
    }

    #[test]
    fn test_replacement_rewrites_display_not_source() {
        let dict = dict_of(vec![(
            "Sheriff",
            vec![AnnotationRule::styled("role").with_replacement("Sheriff")],
        )]);
        let tokens = tokenize("the sheriff slept", &dict);

        assert_eq!(tokens[1].display_text(), "Sheriff");
        assert_eq!(tokens[1].source_span(), "sheriff");
    }

    #[test]
    fn test_rule_chain_expands_to_adjacent_tokens() {
        let mut builder = DictionaryBuilder::new(MatchMode::Strict);
        builder.add_roster(&[RosterEntry {
            index: 3,
            name: "Alice".to_string(),
        }]);
        let dict = builder.build();

        let tokens = tokenize("Alice voted", &dict);

        // badge + space + name, then the raw remainder
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[0].display_text(), "3");
        assert_eq!(tokens[0].source_span(), "Alice");
        assert_eq!(tokens[1].display_text(), " ");
        assert_eq!(tokens[1].source_span(), "");
        assert_eq!(tokens[2].display_text(), "Alice");
        assert_eq!(tokens[2].source_span(), "");
        assert_eq!(tokens[3], Token::raw(" voted"));
    }

    #[test]
    fn test_annotated_tokens_are_locked_within_a_pass() {
        // "night" occurs inside the replacement text of "nightfall", but
        // annotation output is never re-examined
        let dict = dict_of(vec![
            ("nightfall", vec![AnnotationRule::styled("phase").with_replacement("nightfall")]),
            ("night", vec![AnnotationRule::styled("phase-short")]),
        ]);
        let tokens = tokenize("at nightfall the night begins", &dict);

        let styles: Vec<Option<&str>> = tokens
            .iter()
            .filter(|t| t.is_annotated())
            .map(|t| match t {
                Token::Annotated { style, .. } => style.as_deref(),
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(styles, vec![Some("phase"), Some("phase-short")]);
    }

    #[test]
    fn test_reconstruction_invariant() {
        let mut builder = DictionaryBuilder::new(MatchMode::Strict);
        builder.add_glossary(
            &[
                GlossaryEntry {
                    term: "Sheriff".to_string(),
                    rules: vec![AnnotationRule::styled("role").with_replacement("Sheriff")],
                },
                GlossaryEntry {
                    term: "lynch".to_string(),
                    rules: vec![AnnotationRule::styled("glossary")],
                },
            ],
            &VariantMap::new(),
        );
        builder.add_roster(&[RosterEntry {
            index: 7,
            name: "Mallory".to_string(),
        }]);
        let dict = builder.build();

        for input in [
            "",
            "no keywords here",
            "the SHERIFF voted to lynch 7: Mallory at dusk",
            "Mallorylynchsheriff",
            "lynch lynch lynch",
        ] {
            let tokens = tokenize(input, &dict);
            assert_eq!(reconstruct(&tokens), input, "input: {:?}", input);
        }
    }

    #[test]
    fn test_adjacent_matches() {
        let dict = dict_of(vec![("aa", vec![AnnotationRule::styled("x")])]);
        let tokens = tokenize("aaaa", &dict);

        assert_eq!(tokens.len(), 2);
        assert!(tokens.iter().all(Token::is_annotated));
        assert_eq!(reconstruct(&tokens), "aaaa");
    }

    #[test]
    fn test_keyword_with_regex_metacharacters() {
        let dict = dict_of(vec![("f(x)?", vec![AnnotationRule::styled("math")])]);
        let tokens = tokenize("compute f(x)? now", &dict);

        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1].source_span(), "f(x)?");
    }

    #[test]
    fn test_totality_over_catalog_dictionary() {
        // Mixed sources, multibyte input, no panic, exact reconstruction
        let mut styles = std::collections::HashMap::new();
        styles.insert("town".to_string(), "role-town".to_string());
        let dict = Dictionary::from_sources(
            &[GlossaryEntry {
                term: "r\u{00f4}le".to_string(),
                rules: vec![AnnotationRule::styled("glossary")],
            }],
            &CatalogData {
                entries: vec![],
                styles,
            },
            &[],
            &VariantMap::new(),
            MatchMode::Strict,
        );

        let input = "le R\u{00d4}LE du jour \u{2014} encore";
        let tokens = tokenize(input, &dict);
        assert_eq!(reconstruct(&tokens), input);
    }
}
