//! Existing annotation subtrees as exclusion zones.
//!
//! Text inside a `<ruby>…</ruby>` element is already annotated; scanning it
//! again would nest annotations. An unterminated `<ruby>` extends to the
//! end of the unit (best effort, never an error).

use crate::span::Span;

use super::cursor::Cursor;

const OPEN: &[u8] = b"<ruby";
const CLOSE: &[u8] = b"</ruby>";

/// Finds all existing ruby subtrees in `text`, tags included, as exclusion
/// zones. Spans are absolute (offset by `base_offset`) and ascending.
pub fn ruby_spans(text: &str, base_offset: usize) -> Vec<Span> {
    let mut cur = Cursor::new(text, base_offset);
    let mut out = Vec::new();

    while !cur.eof() {
        if !at_open_tag(&cur) {
            cur.bump();
            continue;
        }

        let start = cur.pos();
        cur.bump_n(OPEN.len());

        loop {
            if cur.eof() {
                // Unterminated subtree: exclude through end of unit.
                out.push(Span::new(start, cur.pos()));
                break;
            }
            if cur.starts_with(CLOSE) {
                cur.bump_n(CLOSE.len());
                out.push(Span::new(start, cur.pos()));
                break;
            }
            cur.bump();
        }
    }

    out
}

/// `<ruby` only opens a tag when followed by `>` or an attribute separator;
/// `<rubyish>` is some other element.
fn at_open_tag(cur: &Cursor<'_>) -> bool {
    if !cur.starts_with(OPEN) {
        return false;
    }
    let mut ahead = cur.clone();
    ahead.bump_n(OPEN.len());
    matches!(ahead.peek(), Some(b'>') | Some(b' ') | Some(b'\t') | None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_subtree_is_excluded() {
        let text = "before <ruby>漢字<rt>かんじ</rt></ruby> after";
        let spans = ruby_spans(text, 0);
        assert_eq!(spans.len(), 1);
        assert_eq!(
            &text[spans[0].start..spans[0].end],
            "<ruby>漢字<rt>かんじ</rt></ruby>"
        );
    }

    #[test]
    fn unterminated_subtree_extends_to_end() {
        let text = "x <ruby>漢字<rt>かんじ";
        let spans = ruby_spans(text, 0);
        assert_eq!(spans, vec![Span::new(2, text.len())]);
    }

    #[test]
    fn tag_with_attributes_opens() {
        let text = "<ruby class=\"x\">字</ruby>";
        assert_eq!(ruby_spans(text, 0), vec![Span::new(0, text.len())]);
    }

    #[test]
    fn similar_element_name_does_not_open() {
        assert_eq!(ruby_spans("<rubyish>字</rubyish>", 0), vec![]);
    }

    #[test]
    fn base_offset_shifts_spans() {
        let spans = ruby_spans("<ruby>字</ruby>", 50);
        assert_eq!(spans[0].start, 50);
    }
}
