//! Manual-override notation: `{base|reading}` or `[base|reading]`.
//!
//! An author can force a reading with pipe notation, either one reading for
//! the whole base (`{漢字|かんじ}`) or one reading per base character
//! (`{漢字|かん|じ}`). Manual spans always win over automatic segmentation.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::kana;
use crate::span::Span;

/// Which bracket pair (if any) denotes a manual reading override.
///
/// User-configured and global; all compiled [`Patterns`] become invalid when
/// this changes, so callers recompile rather than caching across changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotationStyle {
    #[default]
    Curly,
    Square,
    Disabled,
}

/// A manual override match: a span of raw text decomposed into a base and
/// its pipe-separated reading segments.
///
/// Invariant (enforced at match time, violations are simply not matches):
/// `readings.len() == 1` or `readings.len()` equals the character count of
/// `base`, and every reading is entirely phonetic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualMatch {
    /// Full span of the notation in the source, brackets included.
    pub span: Span,
    /// The text being annotated (brackets and readings stripped).
    pub base: String,
    /// One reading for the whole base, or one per base character.
    pub readings: Vec<String>,
}

/// Compiled match patterns for one [`NotationStyle`].
///
/// Matcher state is single-use per call: [`Patterns::find_matches`] builds a
/// fresh iterator every time and never shares scan positions across calls.
#[derive(Debug, Clone)]
pub struct Patterns {
    style: NotationStyle,
    regex: Regex,
}

impl Patterns {
    /// Compiles the pattern set for `style`. Returns `None` when notation is
    /// disabled, which callers treat as "zero manual matches".
    pub fn compile(style: NotationStyle) -> Option<Self> {
        let source = match style {
            // base, then one-or-more |reading groups, none spanning lines
            NotationStyle::Curly => r"\{([^{}|\r\n]+)((?:\|[^{}|\r\n]*)+)\}",
            NotationStyle::Square => r"\[([^\[\]|\r\n]+)((?:\|[^\[\]|\r\n]*)+)\]",
            NotationStyle::Disabled => return None,
        };
        let regex = Regex::new(source).expect("notation pattern is a fixed, valid regex");
        Some(Self { style, regex })
    }

    pub fn style(&self) -> NotationStyle {
        self.style
    }

    /// Finds all well-formed manual matches in `text`, leftmost and
    /// non-overlapping; scanning resumes after each consumed span.
    ///
    /// Candidates that fail validation (segment-count mismatch, empty or
    /// non-phonetic reading) are skipped silently: the literal text is left
    /// untouched and falls through to automatic scanning.
    ///
    /// Spans are offset by `base_offset`, the byte position of `text` within
    /// the containing document.
    pub fn find_matches(&self, text: &str, base_offset: usize) -> Vec<ManualMatch> {
        let mut out = Vec::new();
        for cap in self.regex.captures_iter(text) {
            let full = cap.get(0).expect("capture 0 always present");
            let base = &cap[1];
            let readings: Vec<String> = cap[2]
                .split('|')
                .skip(1) // group text starts with the first pipe
                .map(str::to_string)
                .collect();

            if !segments_are_valid(base, &readings) {
                continue;
            }

            out.push(ManualMatch {
                span: Span::new(base_offset + full.start(), base_offset + full.end()),
                base: base.to_string(),
                readings,
            });
        }
        out
    }
}

/// Checks the manual-segment invariant: readings all phonetic and non-empty,
/// count either 1 or equal to the base character count.
fn segments_are_valid(base: &str, readings: &[String]) -> bool {
    if base.is_empty() || readings.is_empty() {
        return false;
    }
    if !readings.iter().all(|r| kana::is_all_kana(r)) {
        return false;
    }
    readings.len() == 1 || readings.len() == base.chars().count()
}
