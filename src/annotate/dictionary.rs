//! Dictionary builder and snapshot
//!
//! The dictionary maps literal keywords to annotation rule chains. It is
//! pure derived state: rebuilt wholesale from its three sources (static
//! glossary, role catalog, live roster) whenever any of them changes, and
//! shared as an immutable snapshot. Matching iterates entries by
//! descending keyword length so a longer keyword ("Town Investigator") is
//! never shadowed by a shorter one it contains ("Town"); same-length ties
//! break lexicographically, independent of hydration order.
//!
//! Merge order is glossary, then catalog, then roster, with last-wins
//! precedence: a live player whose name collides with a glossary term
//! overrides it for the duration of the game.

use aho_corasick::{AhoCorasick, AhoCorasickBuilder};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::log;
use super::matcher::{KeywordPattern, MatchMode};
use super::rules::{AnnotationRule, CrossRef};

// ==================== TYPE DEFINITIONS ====================

/// Minimum keyword length in characters. Shorter keys have a high false
/// positive rate, and an empty key would match everywhere.
const MIN_KEYWORD_LEN: usize = 2;

/// Style class for the roster index badge
pub const INDEX_BADGE_STYLE: &str = "player-number";
/// Style class for the roster name segment
pub const PLAYER_NAME_STYLE: &str = "player";

/// Glossary source entry: a stable term with its rule chain
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct GlossaryEntry {
    pub term: String,
    #[serde(default)]
    pub rules: Vec<AnnotationRule>,
}

/// Catalog source entry: a fixed-set term (e.g. a role name) styled by
/// category and linked to its article
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CatalogEntry {
    pub name: String,
    pub category: String,
    /// Cross-reference target; defaults to the entry name
    #[serde(default)]
    pub article: Option<String>,
}

/// Catalog source: entries plus the style lookup keyed by category
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct CatalogData {
    #[serde(default)]
    pub entries: Vec<CatalogEntry>,
    #[serde(default)]
    pub styles: HashMap<String, String>,
}

/// Live roster entry. The name must already have been through
/// `sanitize()` at the trust boundary - it originates from user input.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct RosterEntry {
    pub index: u32,
    pub name: String,
}

/// Localized variant sets: canonical term -> its numbered variants, in
/// variant-key order (variant 0, 1, 2, ...)
pub type VariantMap = HashMap<String, Vec<String>>;

/// One compiled dictionary entry
#[derive(Debug, Clone)]
pub struct DictEntry {
    pub keyword: String,
    pub rules: Vec<AnnotationRule>,
    pattern: KeywordPattern,
}

impl DictEntry {
    pub fn pattern(&self) -> &KeywordPattern {
        &self.pattern
    }
}

// ==================== DICTIONARY SNAPSHOT ====================

/// Immutable dictionary snapshot
///
/// Entries are pre-sorted and patterns pre-compiled at build time; a
/// snapshot is never mutated afterwards. Callers swap whole snapshots on
/// rebuild, so concurrent readers always observe a consistent dictionary.
#[derive(Debug)]
pub struct Dictionary {
    /// Sorted by descending keyword length, then lexicographically
    entries: Vec<DictEntry>,
    /// Fast containment pre-check (Strict mode only; Loose matching can
    /// hit text the literal automaton cannot, so no pre-filter there)
    prefilter: Option<AhoCorasick>,
    mode: MatchMode,
}

impl Dictionary {
    /// Dictionary with no keywords; tokenizing against it is a no-op
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
            prefilter: None,
            mode: MatchMode::default(),
        }
    }

    /// Build from the three sources in one call, merge order glossary ->
    /// catalog -> roster. Pure function of its inputs.
    pub fn from_sources(
        glossary: &[GlossaryEntry],
        catalog: &CatalogData,
        roster: &[RosterEntry],
        variants: &VariantMap,
        mode: MatchMode,
    ) -> Self {
        let mut builder = DictionaryBuilder::new(mode);
        builder.add_glossary(glossary, variants);
        builder.add_catalog(catalog, variants);
        builder.add_roster(roster);
        builder.build()
    }

    /// Entries in matching order (descending keyword length)
    pub fn entries(&self) -> &[DictEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Rule chain registered for an exact keyword, if any
    pub fn get(&self, keyword: &str) -> Option<&[AnnotationRule]> {
        self.entries
            .iter()
            .find(|e| e.keyword == keyword)
            .map(|e| e.rules.as_slice())
    }

    /// Conservative pre-check: `false` guarantees no keyword occurs in
    /// `text`. Only the Strict automaton can rule text out; in Loose mode
    /// any non-empty dictionary answers `true`.
    pub(crate) fn may_contain(&self, text: &str) -> bool {
        if self.entries.is_empty() {
            return false;
        }
        match &self.prefilter {
            Some(automaton) => automaton.is_match(text.to_lowercase().as_str()),
            None => true,
        }
    }

    /// Exact containment check: does `text` mention any keyword?
    pub fn mentions_any(&self, text: &str) -> bool {
        match &self.prefilter {
            Some(automaton) => automaton.is_match(text.to_lowercase().as_str()),
            None => self.entries.iter().any(|e| e.pattern.is_contained_in(text)),
        }
    }
}

// ==================== BUILDER ====================

/// Accumulates keywords from the three sources, then compiles the
/// immutable snapshot
#[derive(Debug)]
pub struct DictionaryBuilder {
    map: HashMap<String, Vec<AnnotationRule>>,
    mode: MatchMode,
}

impl DictionaryBuilder {
    pub fn new(mode: MatchMode) -> Self {
        Self {
            map: HashMap::new(),
            mode,
        }
    }

    /// Register glossary terms and their localized variants
    pub fn add_glossary(&mut self, entries: &[GlossaryEntry], variants: &VariantMap) {
        for entry in entries {
            if entry.rules.is_empty() {
                log::warn(&format!(
                    "[Dictionary] skipping glossary term '{}': no rules attached",
                    entry.term
                ));
                continue;
            }
            self.insert_with_variants(&entry.term, entry.rules.clone(), variants);
        }
    }

    /// Register catalog terms. An entry whose category has no style
    /// mapping is malformed: it is logged and skipped, and the rebuild
    /// continues with the remaining entries.
    pub fn add_catalog(&mut self, catalog: &CatalogData, variants: &VariantMap) {
        for entry in &catalog.entries {
            let style = match catalog.styles.get(&entry.category) {
                Some(style) => style.clone(),
                None => {
                    log::warn(&format!(
                        "[Dictionary] skipping catalog entry '{}': no style for category '{}'",
                        entry.name, entry.category
                    ));
                    continue;
                }
            };

            let article = entry
                .article
                .clone()
                .unwrap_or_else(|| entry.name.clone());
            let rule = AnnotationRule::styled(style)
                .with_link(CrossRef::new(article))
                .with_replacement(entry.name.clone());

            self.insert_with_variants(&entry.name, vec![rule], variants);
        }
    }

    /// Register live roster entries, merged last so they win collisions.
    ///
    /// Each entry contributes two keywords - the bare name and the
    /// canonical "<index>: <name>" form - both expanding to the fixed
    /// chain: index badge, separator space, styled name.
    pub fn add_roster(&mut self, roster: &[RosterEntry]) {
        for player in roster {
            let chain = vec![
                AnnotationRule::styled(INDEX_BADGE_STYLE)
                    .with_replacement(player.index.to_string()),
                AnnotationRule::literal(" "),
                AnnotationRule::styled(PLAYER_NAME_STYLE)
                    .with_replacement(player.name.clone()),
            ];

            self.insert(&format!("{}: {}", player.index, player.name), chain.clone());
            self.insert(&player.name, chain);
        }
    }

    /// Compile the snapshot: sort by descending keyword length
    /// (lexicographic tie-break), compile predicates, build the Strict
    /// pre-filter automaton. A keyword whose predicate fails to compile
    /// is logged and skipped.
    pub fn build(self) -> Dictionary {
        let mode = self.mode;
        let mut entries: Vec<DictEntry> = Vec::with_capacity(self.map.len());

        for (keyword, rules) in self.map {
            match KeywordPattern::compile(&keyword, mode) {
                Ok(pattern) => entries.push(DictEntry {
                    keyword,
                    rules,
                    pattern,
                }),
                Err(e) => log::warn(&format!("[Dictionary] skipping keyword: {}", e)),
            }
        }

        entries.sort_by(|a, b| {
            let len_a = a.keyword.chars().count();
            let len_b = b.keyword.chars().count();
            len_b.cmp(&len_a).then_with(|| a.keyword.cmp(&b.keyword))
        });

        let prefilter = if mode == MatchMode::Strict && !entries.is_empty() {
            let patterns: Vec<String> = entries
                .iter()
                .map(|e| e.keyword.to_lowercase())
                .collect();
            match AhoCorasickBuilder::new()
                .ascii_case_insensitive(true)
                .build(&patterns)
            {
                Ok(automaton) => Some(automaton),
                Err(e) => {
                    log::warn(&format!("[Dictionary] pre-filter build failed: {}", e));
                    None
                }
            }
        } else {
            None
        };

        Dictionary {
            entries,
            prefilter,
            mode,
        }
    }

    /// Register one keyword. Last insert wins, which is what gives the
    /// glossary -> catalog -> roster precedence.
    fn insert(&mut self, keyword: &str, rules: Vec<AnnotationRule>) {
        let keyword = keyword.trim();
        if keyword.chars().count() < MIN_KEYWORD_LEN {
            return;
        }
        self.map.insert(keyword.to_string(), rules);
    }

    /// Register a term plus its localized variants. Each variant inherits
    /// the base chain, except that a rule whose replacement equals the
    /// canonical term text takes the variant's own literal text instead,
    /// preserving the variant's capitalization and inflection in output.
    fn insert_with_variants(
        &mut self,
        term: &str,
        rules: Vec<AnnotationRule>,
        variants: &VariantMap,
    ) {
        if let Some(variant_texts) = variants.get(term) {
            for variant in variant_texts {
                let adapted: Vec<AnnotationRule> = rules
                    .iter()
                    .map(|rule| {
                        let mut rule = rule.clone();
                        if rule.replacement.as_deref() == Some(term) {
                            rule.replacement = Some(variant.clone());
                        }
                        rule
                    })
                    .collect();
                self.insert(variant, adapted);
            }
        }

        self.insert(term, rules);
    }
}

// ==================== TESTS ====================
