//! Token rendering
//!
//! Converts a token list into a markup string, or into an equivalent
//! structured op list for hosts without implicit markup injection. The
//! markup form is produced from the ops, so the two output contracts
//! cannot disagree.
//!
//! The renderer performs **no escaping**. Untrusted text was escaped at
//! the boundary by `sanitize()` before it ever became a token; token
//! text and cross-ref identifiers are emitted verbatim. Rendering is
//! deterministic: the same token list always yields byte-identical
//! output.

use serde::{Deserialize, Serialize};

use super::rules::CrossRef;
use super::tokenizer::Token;

// ==================== TYPE DEFINITIONS ====================

/// One render instruction for hosts that mount native UI elements
/// instead of inserting markup
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum RenderOp {
    /// Plain text run
    Text { text: String },
    /// Inert styled run
    Styled { text: String, style: String },
    /// Activatable run; activation dispatches `target` to the
    /// navigation sink
    Link {
        text: String,
        style: Option<String>,
        target: CrossRef,
    },
}

// ==================== MAIN IMPLEMENTATION ====================

/// Lower a token list into render instructions.
///
/// Raw tokens and unstyled annotations become plain text runs. A link
/// only becomes activatable when `links_enabled` is set; otherwise the
/// token degrades to its inert styled (or plain) form.
pub fn render_ops(tokens: &[Token], links_enabled: bool) -> Vec<RenderOp> {
    tokens
        .iter()
        .map(|token| match token {
            Token::Raw { text } => RenderOp::Text { text: text.clone() },
            Token::Annotated {
                text, style, link, ..
            } => match link {
                Some(target) if links_enabled => RenderOp::Link {
                    text: text.clone(),
                    style: style.clone(),
                    target: target.clone(),
                },
                _ => match style {
                    Some(style) => RenderOp::Styled {
                        text: text.clone(),
                        style: style.clone(),
                    },
                    None => RenderOp::Text { text: text.clone() },
                },
            },
        })
        .collect()
}

/// Render a token list to a markup string for direct insertion.
pub fn render_markup(tokens: &[Token], links_enabled: bool) -> String {
    let mut out = String::new();
    for op in render_ops(tokens, links_enabled) {
        match op {
            RenderOp::Text { text } => out.push_str(&text),
            RenderOp::Styled { text, style } => {
                out.push_str(&format!("<span class=\"{}\">{}</span>", style, text));
            }
            RenderOp::Link {
                text,
                style,
                target,
            } => {
                let class = match &style {
                    Some(style) => format!("kw-link {}", style),
                    None => "kw-link".to_string(),
                };
                out.push_str(&format!(
                    "<a class=\"{}\" data-ref=\"{}\">{}</a>",
                    class,
                    target.as_str(),
                    text
                ));
            }
        }
    }
    out
}

// ==================== TESTS ====================

#[cfg(test)]
mod tests {
    use super::*;

    fn annotated(
        text: &str,
        style: Option<&str>,
        link: Option<&str>,
    ) -> Token {
        Token::Annotated {
            text: text.to_string(),
            source: text.to_string(),
            style: style.map(str::to_string),
            link: link.map(CrossRef::new),
            replacement_applied: false,
        }
    }

    #[test]
    fn test_raw_tokens_pass_through_verbatim() {
        // Includes entities baked in by the sanitizer; the renderer must
        // not touch them again
        let tokens = vec![Token::raw("a &amp; b &lt;c&gt;")];

        assert_eq!(render_markup(&tokens, true), "a &amp; b &lt;c&gt;");
    }

    #[test]
    fn test_styled_span() {
        let tokens = vec![annotated("Sheriff", Some("role-town"), None)];

        assert_eq!(
            render_markup(&tokens, true),
            "<span class=\"role-town\">Sheriff</span>"
        );
    }

    #[test]
    fn test_unstyled_annotation_is_plain_text() {
        let tokens = vec![annotated(" ", None, None)];

        assert_eq!(render_markup(&tokens, true), " ");
        assert_eq!(
            render_ops(&tokens, true),
            vec![RenderOp::Text { text: " ".to_string() }]
        );
    }

    #[test]
    fn test_link_markup_carries_style_and_ref() {
        let tokens = vec![annotated("Sheriff", Some("role-town"), Some("wiki:sheriff"))];

        assert_eq!(
            render_markup(&tokens, true),
            "<a class=\"kw-link role-town\" data-ref=\"wiki:sheriff\">Sheriff</a>"
        );
    }

    #[test]
    fn test_link_without_style() {
        let tokens = vec![annotated("lynch", None, Some("wiki:lynch"))];

        assert_eq!(
            render_markup(&tokens, true),
            "<a class=\"kw-link\" data-ref=\"wiki:lynch\">lynch</a>"
        );
    }

    #[test]
    fn test_links_disabled_suppresses_anchors() {
        let tokens = vec![
            annotated("Sheriff", Some("role-town"), Some("wiki:sheriff")),
            annotated("lynch", None, Some("wiki:lynch")),
        ];

        let markup = render_markup(&tokens, false);
        assert_eq!(
            markup,
            "<span class=\"role-town\">Sheriff</span>lynch"
        );
        assert!(!markup.contains("<a"));
    }

    #[test]
    fn test_rendering_is_idempotent() {
        let tokens = vec![
            Token::raw("The "),
            annotated("Sheriff", Some("role-town"), Some("wiki:sheriff")),
            Token::raw(" investigated"),
        ];

        let first = render_markup(&tokens, true);
        let second = render_markup(&tokens, true);
        assert_eq!(first, second);
    }

    #[test]
    fn test_markup_agrees_with_ops() {
        let tokens = vec![
            Token::raw("The "),
            annotated("Sheriff", Some("role-town"), Some("wiki:sheriff")),
        ];

        let ops = render_ops(&tokens, true);
        assert_eq!(
            ops,
            vec![
                RenderOp::Text { text: "The ".to_string() },
                RenderOp::Link {
                    text: "Sheriff".to_string(),
                    style: Some("role-town".to_string()),
                    target: CrossRef::new("wiki:sheriff"),
                },
            ]
        );
        // Markup is generated from the same ops
        assert_eq!(
            render_markup(&tokens, true),
            "The <a class=\"kw-link role-town\" data-ref=\"wiki:sheriff\">Sheriff</a>"
        );
    }
}
