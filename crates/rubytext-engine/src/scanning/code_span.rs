//! Inline code span detection.
//!
//! An opening run of N backticks closes only with a later run of exactly N,
//! per CommonMark: `` `a` `` is a span, ```` ``a`` ```` is a span with a
//! two-tick delimiter, and `` ``a` `` is not closed at all. Unclosed
//! opening runs are literal text, not exclusion zones.

use crate::span::Span;

use super::cursor::Cursor;

const TICK: u8 = b'`';

/// Finds all inline code spans in one line, delimiters included, as
/// exclusion zones. Spans are absolute (offset by `base_offset`) and
/// ascending.
pub fn code_spans(line: &str, base_offset: usize) -> Vec<Span> {
    let mut cur = Cursor::new(line, base_offset);
    let mut out = Vec::new();

    while !cur.eof() {
        if cur.peek() != Some(TICK) {
            cur.bump();
            continue;
        }

        let start = cur.pos();
        let open_len = cur.take_run(TICK);

        // No closing run of the same length means the opening run is
        // literal text; scanning resumes right after it.
        if let Some(end) = find_closing_run(&mut cur, open_len) {
            out.push(Span::new(start, end));
        }
    }

    out
}

/// Advances the cursor looking for a backtick run of exactly `open_len`.
///
/// On success the cursor sits after the closing run and the absolute end
/// position is returned. On failure the cursor is restored to just after
/// the opening run.
fn find_closing_run(cur: &mut Cursor<'_>, open_len: usize) -> Option<usize> {
    let saved = cur.clone();

    while !cur.eof() {
        if cur.peek() == Some(TICK) {
            let run = cur.take_run(TICK);
            if run == open_len {
                return Some(cur.pos());
            }
            // A run of a different length is content; keep looking.
        } else {
            cur.bump();
        }
    }

    *cur = saved;
    None
}
