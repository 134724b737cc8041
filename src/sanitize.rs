//! Untrusted-content sanitization.
//!
//! Posts and profile text arrive as arbitrary HTML authored by other
//! users. Before the display layer injects such a fragment into the
//! document it is reduced to an allow-listed tag subset: the usual
//! rich-text baseline, plus the disclosure widgets (`details`,
//! `summary`) and inline SVG icons (`svg`, `circle`, `path`) the feed's
//! content model uses.
//!
//! Attributes on allowed tags are deliberately passed through
//! untouched. The rendering layer depends on attributes the markup
//! carries (disclosure `open` state, SVG geometry), so filtering them
//! by name is a product decision this layer does not make.

use std::collections::HashSet;

use lol_html::{doc_comments, element, rewrite_str, RewriteStrSettings};
use once_cell::sync::Lazy;

/// Safe rich-text baseline, extended with the feed's disclosure and
/// inline-SVG tags.
const ALLOWED_TAGS: &[&str] = &[
    // Sections and grouping
    "address", "article", "aside", "footer", "header", "h1", "h2", "h3", "h4", "h5", "h6",
    "hgroup", "main", "nav", "section", "blockquote", "dd", "div", "dl", "dt", "figcaption",
    "figure", "hr", "li", "ol", "p", "pre", "ul",
    // Inline text
    "a", "abbr", "b", "bdi", "bdo", "br", "cite", "code", "data", "dfn", "em", "i", "kbd",
    "mark", "q", "rb", "rp", "rt", "rtc", "ruby", "s", "samp", "small", "span", "strong",
    "sub", "sup", "time", "u", "var", "wbr",
    // Tables
    "caption", "col", "colgroup", "table", "tbody", "td", "tfoot", "th", "thead", "tr",
    // Disclosure widgets
    "details", "summary",
    // Inline vector icons
    "svg", "circle", "path",
];

/// Tags whose text content is meaningless or dangerous without the tag
/// itself; these are dropped together with everything inside them.
const DROP_CONTENT_TAGS: &[&str] = &["script", "style", "textarea", "option", "noscript"];

static ALLOWED: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ALLOWED_TAGS.iter().copied().collect());

static DROP_CONTENT: Lazy<HashSet<&'static str>> =
    Lazy::new(|| DROP_CONTENT_TAGS.iter().copied().collect());

/// Reduce an untrusted HTML fragment to the allow-listed subset.
///
/// Disallowed tags are unwrapped (the tag goes, its children stay)
/// except for the script-like tags, which are removed with their
/// content. Comments are removed. Deterministic, side-effect free, and
/// tolerant of malformed input: the rewriter recovers from broken
/// markup, and in the rare case it cannot, the result is the empty
/// string rather than an error.
pub fn sanitize_html(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let result = rewrite_str(
        raw,
        RewriteStrSettings {
            element_content_handlers: vec![
                element!("*", |el| {
                    let tag = el.tag_name();
                    if !ALLOWED.contains(tag.as_str()) {
                        if DROP_CONTENT.contains(tag.as_str()) {
                            el.remove();
                        } else {
                            el.remove_and_keep_content();
                        }
                    }
                    Ok(())
                }),
            ],
            document_content_handlers: vec![doc_comments!(|c| {
                c.remove();
                Ok(())
            })],
            ..RewriteStrSettings::default()
        },
    );

    // The rewriter only fails on genuinely ambiguous parsing states;
    // a maximally-stripped fragment beats surfacing an error to the
    // rendering layer.
    match result {
        Ok(rewritten) => strip_stray_end_tags(&rewritten),
        Err(_) => String::new(),
    }
}

/// Drop end tags of disallowed elements that survived the rewrite.
///
/// Element handlers only fire on start tags, so an end tag with no
/// matching start (a lone `</iframe>`) passes through the rewriter
/// verbatim. Browsers ignore such tags, but the output contract is
/// "allow-listed tags only", so they are removed here. Start tags are
/// copied whole, honoring quoted attribute values, so markup stored
/// inside an attribute of an allowed tag is left untouched.
fn strip_stray_end_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(lt) = rest.find('<') {
        out.push_str(&rest[..lt]);
        let tag = &rest[lt..];

        if let Some(after_slash) = tag.strip_prefix("</") {
            let name_len = after_slash
                .bytes()
                .take_while(|b| b.is_ascii_alphanumeric())
                .count();
            if name_len > 0 {
                if let Some(gt) = after_slash[name_len..].find('>') {
                    let end = 2 + name_len + gt + 1;
                    let name = after_slash[..name_len].to_ascii_lowercase();
                    if ALLOWED.contains(name.as_str()) {
                        out.push_str(&tag[..end]);
                    }
                    rest = &tag[end..];
                    continue;
                }
            }
            // Nameless or truncated end tag: pass through as-is.
            out.push_str(tag);
            return out;
        }

        // Start tag, comment remnant, or a stray '<': copy through to
        // its closing '>', skipping over quoted attribute values.
        let mut quote: Option<char> = None;
        let mut end = tag.len();
        for (idx, ch) in tag.char_indices().skip(1) {
            match quote {
                Some(q) if ch == q => quote = None,
                Some(_) => {}
                None if ch == '"' || ch == '\'' => quote = Some(ch),
                None if ch == '>' => {
                    end = idx + 1;
                    break;
                }
                None => {}
            }
        }
        out.push_str(&tag[..end]);
        rest = &tag[end..];
    }

    out.push_str(rest);
    out
}
