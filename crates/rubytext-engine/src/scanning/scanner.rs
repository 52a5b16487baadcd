//! Per-line match scanning.
//!
//! Order of precedence inside one line: exclusion zones (inline code spans,
//! existing ruby subtrees, caller-supplied zones) beat everything; manual
//! matches beat automatic ones; automatic candidates fill the gaps.

use crate::kana;
use crate::notation::{ManualMatch, Patterns};
use crate::span::Span;

use super::{code_span, ruby};

/// How a matched span gets its readings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchKind {
    /// Author-written override with explicit readings.
    Manual(ManualMatch),
    /// Contiguous Japanese run to be resolved by the tokenizer.
    Auto,
}

/// One annotation candidate found by the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanMatch {
    /// Absolute byte span in the containing document.
    pub span: Span,
    pub kind: MatchKind,
}

/// Scans one line (fence state already resolved by the caller) and returns
/// all matches in ascending, non-overlapping span order.
///
/// `base_offset` is the byte position of `line` within the document;
/// `extra_exclusions` are absolute spans. Caret buffer zones are not passed
/// here: the live surface filters those afterwards, so a match can reappear
/// when the caret moves away.
pub fn scan_line(
    line: &str,
    base_offset: usize,
    patterns: Option<&Patterns>,
    extra_exclusions: &[Span],
) -> Vec<ScanMatch> {
    // Fast path: nothing annotable, nothing to do.
    if !kana::has_annotable(line) {
        return Vec::new();
    }

    let mut excluded = code_span::code_spans(line, base_offset);
    excluded.extend(ruby::ruby_spans(line, base_offset));
    excluded.extend_from_slice(extra_exclusions);
    excluded.sort();

    let mut matches: Vec<ScanMatch> = Vec::new();

    if let Some(patterns) = patterns {
        for m in patterns.find_matches(line, base_offset) {
            if excluded.iter().any(|z| z.intersects(m.span)) {
                continue;
            }
            matches.push(ScanMatch {
                span: m.span,
                kind: MatchKind::Manual(m),
            });
        }
    }

    // Manual spans are consumed: automatic scanning treats them like
    // exclusion zones and fills only the remaining gaps.
    let mut blocked = excluded;
    blocked.extend(matches.iter().map(|m| m.span));
    blocked.sort();

    matches.extend(auto_matches(line, base_offset, &blocked));
    matches.sort_by_key(|m| m.span.start);
    matches
}

/// Finds maximal runs of Japanese text containing at least one annotable
/// character, outside all blocked spans.
fn auto_matches(line: &str, base_offset: usize, blocked: &[Span]) -> Vec<ScanMatch> {
    fn flush(out: &mut Vec<ScanMatch>, start: Option<usize>, end: usize, has_annotable: bool) {
        if let Some(s) = start
            && has_annotable
        {
            out.push(ScanMatch {
                span: Span::new(s, end),
                kind: MatchKind::Auto,
            });
        }
    }

    let mut out = Vec::new();
    let mut run_start: Option<usize> = None;
    let mut run_has_annotable = false;

    for (i, c) in line.char_indices() {
        let abs = base_offset + i;
        let char_span = Span::new(abs, abs + c.len_utf8());
        let usable = kana::is_japanese(c) && !blocked.iter().any(|z| z.intersects(char_span));

        if usable {
            if run_start.is_none() {
                run_start = Some(abs);
            }
            run_has_annotable |= kana::is_annotable(c);
        } else if run_start.is_some() {
            flush(&mut out, run_start.take(), abs, run_has_annotable);
            run_has_annotable = false;
        }
    }
    flush(
        &mut out,
        run_start,
        base_offset + line.len(),
        run_has_annotable,
    );

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notation::NotationStyle;

    fn curly() -> Patterns {
        Patterns::compile(NotationStyle::Curly).unwrap()
    }

    fn slice<'a>(line: &'a str, m: &ScanMatch) -> &'a str {
        &line[m.span.start..m.span.end]
    }

    #[test]
    fn non_japanese_line_short_circuits() {
        assert!(scan_line("nothing here", 0, Some(&curly()), &[]).is_empty());
    }

    #[test]
    fn kana_only_line_yields_no_matches() {
        assert!(scan_line("これはかなだけ", 0, Some(&curly()), &[]).is_empty());
    }

    #[test]
    fn manual_then_auto_in_order() {
        let line = "今日は{漢字|かん|じ}を勉強した。";
        let patterns = curly();
        let matches = scan_line(line, 0, Some(&patterns), &[]);

        assert_eq!(matches.len(), 3);
        assert_eq!(slice(line, &matches[0]), "今日は");
        assert!(matches!(matches[0].kind, MatchKind::Auto));
        assert_eq!(slice(line, &matches[1]), "{漢字|かん|じ}");
        assert!(matches!(matches[1].kind, MatchKind::Manual(_)));
        assert_eq!(slice(line, &matches[2]), "を勉強した");
        assert!(matches!(matches[2].kind, MatchKind::Auto));
    }

    #[test]
    fn malformed_notation_falls_through_to_auto() {
        let line = "{漢字|か|ん|じ}";
        let patterns = curly();
        let matches = scan_line(line, 0, Some(&patterns), &[]);

        // The braces and pipes are not Japanese, so the auto matches are
        // the inner runs only. No manual match anywhere.
        assert!(matches.iter().all(|m| matches!(m.kind, MatchKind::Auto)));
        assert_eq!(slice(line, &matches[0]), "漢字");
    }

    #[test]
    fn code_span_suppresses_all_matching() {
        let line = "say `漢字` here";
        assert!(scan_line(line, 0, Some(&curly()), &[]).is_empty());
    }

    #[test]
    fn code_span_suppresses_manual_notation() {
        let line = "`{漢字|かんじ}` and 勉強";
        let matches = scan_line(line, 0, Some(&curly()), &[]);
        assert_eq!(matches.len(), 1);
        assert_eq!(slice(line, &matches[0]), "勉強");
        assert!(matches!(matches[0].kind, MatchKind::Auto));
    }

    #[test]
    fn existing_ruby_is_not_rescanned() {
        let line = "<ruby>漢字<rt>かんじ</rt></ruby>と勉強";
        let matches = scan_line(line, 0, Some(&curly()), &[]);
        assert_eq!(matches.len(), 1);
        // The run after the subtree starts at the particle: maximal
        // Japanese runs keep their leading kana.
        assert_eq!(slice(line, &matches[0]), "と勉強");
        assert!(matches!(matches[0].kind, MatchKind::Auto));
    }

    #[test]
    fn disabled_patterns_leave_notation_to_auto() {
        let line = "{漢字|かんじ}";
        let matches = scan_line(line, 0, None, &[]);
        assert!(matches.iter().all(|m| matches!(m.kind, MatchKind::Auto)));
        assert_eq!(slice(line, &matches[0]), "漢字");
    }

    #[test]
    fn extra_exclusion_zone_blocks_matches() {
        let line = "勉強した";
        let zone = Span::new(0, line.len());
        assert!(scan_line(line, 0, Some(&curly()), &[zone]).is_empty());
    }

    #[test]
    fn spans_are_ascending_and_disjoint() {
        let line = "一つ、`二`、{三|さん}、四";
        let matches = scan_line(line, 0, Some(&curly()), &[]);
        for pair in matches.windows(2) {
            assert!(pair[0].span.end <= pair[1].span.start);
        }
    }
}
