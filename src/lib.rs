//! VeilCore: Keyword Annotation Engine
//!
//! A Rust/WASM implementation of the Veil client text annotation pipeline.
//!
//! # Architecture
//!
//! ## Annotation Components
//! - `sanitize.rs` - Boundary escaping for untrusted text (chat, display names)
//! - `matcher.rs` - KeywordPattern: the **shared match predicate** used by both
//!   annotation and the UI find feature
//! - `dictionary.rs` - Dictionary snapshot + DictionaryBuilder (glossary, role
//!   catalog, live roster merged with last-wins precedence)
//! - `tokenizer.rs` - Longest-keyword-first tokenizer (split, annotate, lock)
//! - `renderer.rs` - Token list -> markup string / structured render ops
//! - `core.rs` - TextAnnotator: **unified facade** - hydrate sources, annotate,
//!   render, navigation sink dispatch
//!
//! ## Search Components
//! - `finder.rs` - TextFinder: UI text search over the same KeywordPattern
//!
//! # Usage (WASM)
//! ```javascript,ignore
//! import init, { TextAnnotator, sanitizeText } from 'veilcore';
//!
//! await init();
//!
//! const annotator = new TextAnnotator(null);
//! annotator.hydrateCatalog({
//!   entries: [{ name: 'Sheriff', category: 'town' }],
//!   styles: { town: 'role-town' },
//! });
//! annotator.hydrateRoster([{ index: 3, name: sanitizeText(rawName) }]);
//!
//! // Tokens for custom mounting, or markup for direct insertion
//! const { tokens, stats } = annotator.annotate(messageText);
//! const html = annotator.renderMarkup(messageText);
//! ```

pub mod annotate;
pub mod search;

// Public exports - Annotation
pub use annotate::*;

// Public exports - Search
pub use search::*;

use wasm_bindgen::prelude::*;

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator for smaller WASM bundle size.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    format!("veilcore v{}", env!("CARGO_PKG_VERSION"))
}
