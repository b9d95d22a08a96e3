//! TextAnnotator - Unified annotation facade
//!
//! Owns the three dictionary sources (glossary, role catalog, live
//! roster) plus localized variants, and the current immutable dictionary
//! snapshot. Every hydration call rebuilds the snapshot wholesale and
//! swaps it in atomically - readers keep whatever snapshot they already
//! hold, and there is no partial-update path.
//!
//! # Usage (JavaScript)
//! ```javascript,ignore
//! import init, { TextAnnotator, sanitizeText } from 'veilcore';
//!
//! await init();
//! const annotator = new TextAnnotator(null);
//! annotator.hydrateCatalog(catalogJson);
//! annotator.hydrateRoster(players.map(p => ({
//!   index: p.index,
//!   name: sanitizeText(p.rawName),
//! })));
//! annotator.setNavigationSink(ref => router.open(ref));
//! const html = annotator.renderMarkup(translatedMessage);
//! ```

use instant::Instant;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use wasm_bindgen::prelude::*;

use super::dictionary::{CatalogData, Dictionary, GlossaryEntry, RosterEntry, VariantMap};
use super::matcher::MatchMode;
use super::renderer::{render_markup, render_ops, RenderOp};
use super::sanitize::sanitize;
use super::tokenizer::{tokenize, Token};

// ==================== TYPE DEFINITIONS ====================

/// Configuration for the TextAnnotator
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct AnnotatorConfig {
    #[serde(default = "default_true")]
    pub links_enabled: bool,
    #[serde(default)]
    pub mode: MatchMode,
}

fn default_true() -> bool {
    true
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            links_enabled: true,
            mode: MatchMode::Strict,
        }
    }
}

/// Result of an annotate() call
#[derive(Serialize, Deserialize, Debug)]
pub struct AnnotateResult {
    pub tokens: Vec<Token>,
    pub stats: AnnotateStats,
}

/// Performance statistics for one annotation pass
#[derive(Serialize, Deserialize, Debug)]
pub struct AnnotateStats {
    pub total_time_ms: f64,
    pub text_length: usize,
    pub token_count: usize,
    pub annotated_count: usize,
    pub keyword_count: usize,
}

// ==================== MAIN IMPLEMENTATION ====================

/// TextAnnotator - the annotation pipeline facade
///
/// Hydrate the dictionary sources, then annotate or render translated
/// message text. Tokenization consults the current snapshot; rebuilds
/// replace the snapshot reference instead of mutating it.
#[wasm_bindgen]
pub struct TextAnnotator {
    glossary: Vec<GlossaryEntry>,
    catalog: CatalogData,
    roster: Vec<RosterEntry>,
    variants: VariantMap,
    dictionary: Arc<Dictionary>,
    config: AnnotatorConfig,
    nav_sink: Option<js_sys::Function>,
}

#[wasm_bindgen]
impl TextAnnotator {
    /// Create a new TextAnnotator with optional configuration
    ///
    /// # Arguments
    /// * `config` - Optional JSON configuration object
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<TextAnnotator, JsValue> {
        let config: AnnotatorConfig = if config.is_null() || config.is_undefined() {
            AnnotatorConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))?
        };

        Ok(Self::with_config(config))
    }

    /// Hydrate the static glossary source
    ///
    /// # Arguments
    /// * `entries` - JSON array of GlossaryEntry objects
    #[wasm_bindgen(js_name = hydrateGlossary)]
    pub fn hydrate_glossary(&mut self, entries: JsValue) -> Result<(), JsValue> {
        let entries: Vec<GlossaryEntry> = serde_wasm_bindgen::from_value(entries)
            .map_err(|e| JsValue::from_str(&format!("Invalid glossary: {}", e)))?;
        self.set_glossary(entries);
        Ok(())
    }

    /// Hydrate the role/category catalog source
    ///
    /// # Arguments
    /// * `catalog` - JSON object with entries[] and styles{} keyed by category
    #[wasm_bindgen(js_name = hydrateCatalog)]
    pub fn hydrate_catalog(&mut self, catalog: JsValue) -> Result<(), JsValue> {
        let catalog: CatalogData = serde_wasm_bindgen::from_value(catalog)
            .map_err(|e| JsValue::from_str(&format!("Invalid catalog: {}", e)))?;
        self.set_catalog(catalog);
        Ok(())
    }

    /// Hydrate the live roster source. Names must already be sanitized.
    ///
    /// # Arguments
    /// * `roster` - JSON array of { index, name } objects
    #[wasm_bindgen(js_name = hydrateRoster)]
    pub fn hydrate_roster(&mut self, roster: JsValue) -> Result<(), JsValue> {
        let roster: Vec<RosterEntry> = serde_wasm_bindgen::from_value(roster)
            .map_err(|e| JsValue::from_str(&format!("Invalid roster: {}", e)))?;
        self.set_roster(roster);
        Ok(())
    }

    /// Hydrate localized variant sets (canonical term -> variant texts,
    /// in variant-key order)
    #[wasm_bindgen(js_name = hydrateVariants)]
    pub fn hydrate_variants(&mut self, variants: JsValue) -> Result<(), JsValue> {
        let variants: VariantMap = serde_wasm_bindgen::from_value(variants)
            .map_err(|e| JsValue::from_str(&format!("Invalid variants: {}", e)))?;
        self.set_variants(variants);
        Ok(())
    }

    /// Tokenize text against the current dictionary snapshot
    ///
    /// # Arguments
    /// * `text` - Already-translated, already-sanitized message text
    #[wasm_bindgen(js_name = annotate)]
    pub fn annotate(&self, text: &str) -> Result<JsValue, JsValue> {
        let result = self.annotate_native(text);
        serde_wasm_bindgen::to_value(&result)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    /// Tokenize and render to a markup string in one call
    #[wasm_bindgen(js_name = renderMarkup)]
    pub fn render_markup_js(&self, text: &str) -> String {
        self.render_markup_native(text)
    }

    /// Tokenize and lower to structured render ops in one call
    #[wasm_bindgen(js_name = renderOps)]
    pub fn render_ops_js(&self, text: &str) -> Result<JsValue, JsValue> {
        let ops = self.render_ops_native(text);
        serde_wasm_bindgen::to_value(&ops)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    /// Quick check whether text mentions any registered keyword
    #[wasm_bindgen(js_name = containsKeywords)]
    pub fn contains_keywords(&self, text: &str) -> bool {
        self.dictionary.mentions_any(text)
    }

    /// Toggle cross-reference links in rendered output
    #[wasm_bindgen(js_name = setLinksEnabled)]
    pub fn set_links_enabled(&mut self, enabled: bool) {
        self.config.links_enabled = enabled;
    }

    /// Register the navigation sink invoked by activateLink()
    #[wasm_bindgen(js_name = setNavigationSink)]
    pub fn set_navigation_sink(&mut self, sink: js_sys::Function) {
        self.nav_sink = Some(sink);
    }

    /// Dispatch a cross-reference to the navigation sink. Called by the
    /// host on user activation of a link token; the identifier passes
    /// through uninterpreted.
    #[wasm_bindgen(js_name = activateLink)]
    pub fn activate_link(&self, cross_ref: &str) -> Result<(), JsValue> {
        let sink = self.nav_sink.as_ref().ok_or_else(|| {
            JsValue::from_str("No navigation sink registered. Call setNavigationSink() first.")
        })?;
        sink.call1(&JsValue::NULL, &JsValue::from_str(cross_ref))?;
        Ok(())
    }

    /// Get annotator status
    #[wasm_bindgen(js_name = getStatus)]
    pub fn get_status(&self) -> JsValue {
        let status = serde_json::json!({
            "keyword_count": self.dictionary.len(),
            "glossary_terms": self.glossary.len(),
            "catalog_terms": self.catalog.entries.len(),
            "roster_entries": self.roster.len(),
            "variant_sets": self.variants.len(),
            "nav_sink_registered": self.nav_sink.is_some(),
            "config": {
                "links_enabled": self.config.links_enabled,
                "mode": match self.config.mode {
                    MatchMode::Strict => "strict",
                    MatchMode::Loose => "loose",
                },
            }
        });

        JsValue::from_str(&status.to_string())
    }
}

impl TextAnnotator {
    /// Native constructor
    pub fn with_config(config: AnnotatorConfig) -> Self {
        Self {
            glossary: Vec::new(),
            catalog: CatalogData::default(),
            roster: Vec::new(),
            variants: VariantMap::new(),
            dictionary: Arc::new(Dictionary::empty()),
            config,
            nav_sink: None,
        }
    }

    pub fn set_glossary(&mut self, entries: Vec<GlossaryEntry>) {
        self.glossary = entries;
        self.rebuild();
    }

    pub fn set_catalog(&mut self, catalog: CatalogData) {
        self.catalog = catalog;
        self.rebuild();
    }

    pub fn set_roster(&mut self, roster: Vec<RosterEntry>) {
        self.roster = roster;
        self.rebuild();
    }

    pub fn set_variants(&mut self, variants: VariantMap) {
        self.variants = variants;
        self.rebuild();
    }

    /// The current dictionary snapshot. Clones of this Arc stay
    /// consistent across later rebuilds.
    pub fn snapshot(&self) -> Arc<Dictionary> {
        Arc::clone(&self.dictionary)
    }

    pub fn links_enabled(&self) -> bool {
        self.config.links_enabled
    }

    /// Tokenize against the current snapshot, with timing stats
    pub fn annotate_native(&self, text: &str) -> AnnotateResult {
        let start = Instant::now();
        let snapshot = self.snapshot();
        let tokens = tokenize(text, &snapshot);
        let total_time_ms = start.elapsed().as_secs_f64() * 1000.0;

        let annotated_count = tokens.iter().filter(|t| t.is_annotated()).count();
        AnnotateResult {
            stats: AnnotateStats {
                total_time_ms,
                text_length: text.len(),
                token_count: tokens.len(),
                annotated_count,
                keyword_count: snapshot.len(),
            },
            tokens,
        }
    }

    pub fn render_markup_native(&self, text: &str) -> String {
        let snapshot = self.snapshot();
        let tokens = tokenize(text, &snapshot);
        render_markup(&tokens, self.config.links_enabled)
    }

    pub fn render_ops_native(&self, text: &str) -> Vec<RenderOp> {
        let snapshot = self.snapshot();
        let tokens = tokenize(text, &snapshot);
        render_ops(&tokens, self.config.links_enabled)
    }

    /// Rebuild the dictionary from the current sources and swap the
    /// snapshot reference. Merge order glossary -> catalog -> roster;
    /// the roster wins collisions.
    fn rebuild(&mut self) {
        self.dictionary = Arc::new(Dictionary::from_sources(
            &self.glossary,
            &self.catalog,
            &self.roster,
            &self.variants,
            self.config.mode,
        ));
    }
}

/// Escape untrusted text at the pipeline boundary. Apply exactly once,
/// before the text (or a display name) is handed to hydration or
/// annotation - never inside them.
#[wasm_bindgen(js_name = sanitizeText)]
pub fn sanitize_text(untrusted: &str) -> String {
    sanitize(untrusted)
}

// ==================== TESTS ====================
