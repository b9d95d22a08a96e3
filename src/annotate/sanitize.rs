//! Boundary escaping for untrusted text
//!
//! Player-typed text (chat messages, display names) is escaped exactly
//! once, where it enters the pipeline. Everything downstream stays
//! trust-agnostic: the matcher treats escaped text as ordinary text and
//! the renderer emits token text verbatim, relying on this step having
//! already run. Applying it twice mangles the output, so callers own the
//! boundary.

/// Escape markup-significant characters so the result can be placed in
/// the final output without further processing.
pub fn sanitize(untrusted: &str) -> String {
    untrusted
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

// ==================== TESTS ====================
