//! Static rendering pass.
//!
//! A thin consumer of the scanner/aligner/markup pipeline for read-only
//! output: pure functions from text to an [`AnnotationFragment`] or to HTML
//! ruby markup. No caret, no viewport, no incremental state.

use crate::markup::{AnnotationFragment, RubyNode};
use crate::notation::Patterns;
use crate::scanning::{FenceState, MatchKind, ScanMatch, scan_line};
use crate::segment;
use crate::tokenize::Tokenizer;

/// Builds the fragment for one scan match: manual alignment or tokenizer
/// resolution. A manual match that fails alignment (cannot happen for
/// matches the parser produced, but the degradation is cheap) and an
/// unavailable tokenizer both yield the source text unannotated.
pub fn fragment_for_match(
    source: &str,
    kind: &MatchKind,
    tokenizer: &dyn Tokenizer,
) -> AnnotationFragment {
    let mut frag = AnnotationFragment::new();
    match kind {
        MatchKind::Manual(m) => match segment::align_manual(m) {
            Some(segments) => frag.push_segments(&segments),
            None => frag.push_text(source),
        },
        MatchKind::Auto => {
            frag.push_segments(&segment::resolve_auto(source, tokenizer));
        }
    }
    frag
}

/// Annotates one text unit. Pure function of its inputs: no side effects
/// beyond the returned fragment.
///
/// Returns `None` when the unit contains no match at all, so the caller can
/// keep the original text node untouched.
pub fn annotate(
    text: &str,
    patterns: Option<&Patterns>,
    tokenizer: &dyn Tokenizer,
) -> Option<AnnotationFragment> {
    let matches = scan_line(text, 0, patterns, &[]);
    if matches.is_empty() {
        return None;
    }
    Some(splice(text, &matches, tokenizer))
}

/// Splices matched fragments and the plain runs between them into one
/// fragment covering the whole unit.
fn splice(text: &str, matches: &[ScanMatch], tokenizer: &dyn Tokenizer) -> AnnotationFragment {
    let mut frag = AnnotationFragment::new();
    let mut pos = 0;

    for m in matches {
        frag.push_text(&text[pos..m.span.start]);
        let source = &text[m.span.start..m.span.end];
        let inner = fragment_for_match(source, &m.kind, tokenizer);
        for node in inner.nodes {
            match node {
                RubyNode::Text(t) => frag.push_text(&t),
                ruby => frag.nodes.push(ruby),
            }
        }
        pos = m.span.end;
    }
    frag.push_text(&text[pos..]);
    frag
}

/// Serializes a fragment to HTML ruby markup, escaping all text content.
pub fn to_html(frag: &AnnotationFragment) -> String {
    let mut out = String::new();
    for node in &frag.nodes {
        write_node(&mut out, node, true);
    }
    out
}

fn write_node(out: &mut String, node: &RubyNode, escape_text: bool) {
    match node {
        RubyNode::Text(t) if escape_text => out.push_str(&html_escape::encode_text(t)),
        RubyNode::Text(t) => out.push_str(t),
        RubyNode::Ruby { base, reading } => {
            out.push_str("<ruby>");
            out.push_str(&html_escape::encode_text(base));
            out.push_str("<rt>");
            out.push_str(&html_escape::encode_text(reading));
            out.push_str("</rt></ruby>");
        }
    }
}

/// Annotates a whole Markdown document line by line, tracking fence state,
/// and returns it with HTML ruby markup spliced in. Fenced lines and lines
/// without matches pass through unchanged (not escaped: the output is the
/// source document plus ruby elements, for embedding by a Markdown host).
pub fn annotate_markdown(
    doc: &str,
    patterns: Option<&Patterns>,
    tokenizer: &dyn Tokenizer,
) -> String {
    let mut out = String::with_capacity(doc.len());
    let mut fences = FenceState::new();

    for raw in doc.split_inclusive('\n') {
        let line = raw.trim_end_matches(['\r', '\n']);
        let newline = &raw[line.len()..];

        if fences.feed(line) {
            out.push_str(raw);
            continue;
        }

        match annotate(line, patterns, tokenizer) {
            Some(frag) => {
                // Plain runs stay verbatim here: the output is the source
                // document plus ruby elements, not a full HTML page.
                for node in &frag.nodes {
                    write_node(&mut out, node, false);
                }
                out.push_str(newline);
            }
            None => out.push_str(raw),
        }
    }
    out
}
