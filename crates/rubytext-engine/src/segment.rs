//! Segment alignment: pairing base chunks with readings.
//!
//! The aligner turns both manual override notation and tokenizer output
//! into the same shape, an ordered list of [`Segment`]s, so the markup
//! builder and both renderers never care where a reading came from.

use crate::kana;
use crate::notation::ManualMatch;
use crate::tokenize::{Token, Tokenizer, TokenizerState};

/// One aligned base chunk with an optional reading.
///
/// The reading is absent when the chunk must render as plain text: the
/// chunk is entirely phonetic (kana-skip rule), or the tokenizer had no
/// reading for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub base: String,
    pub reading: Option<String>,
}

impl Segment {
    pub fn annotated(base: impl Into<String>, reading: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            reading: Some(reading.into()),
        }
    }

    pub fn plain(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            reading: None,
        }
    }
}

/// Aligns a manual match into segments.
///
/// Multi-segment readings align 1:1 with base characters, positionally; a
/// single reading covers the whole base. Returns `None` on a segment-count
/// mismatch, though the notation parser already rejects those candidates.
pub fn align_manual(m: &ManualMatch) -> Option<Vec<Segment>> {
    if m.readings.len() == 1 {
        return Some(vec![Segment::annotated(&m.base, &m.readings[0])]);
    }

    let chars: Vec<char> = m.base.chars().collect();
    if m.readings.len() != chars.len() {
        return None;
    }
    Some(
        chars
            .iter()
            .zip(&m.readings)
            .map(|(&c, r)| Segment::annotated(c.to_string(), r))
            .collect(),
    )
}

/// Maps tokenizer output to segments, applying the kana-skip rule.
///
/// A token whose surface is already fully phonetic never receives a reading
/// annotation, even if the tokenizer supplied one; tokens without a reading
/// render as plain text.
pub fn align_tokens(tokens: &[Token]) -> Vec<Segment> {
    tokens
        .iter()
        .map(|t| match &t.reading {
            Some(reading) if !kana::is_all_kana(&t.surface) && !reading.is_empty() => {
                Segment::annotated(&t.surface, reading)
            }
            _ => Segment::plain(&t.surface),
        })
        .collect()
}

/// Resolves an automatic match through the tokenizer.
///
/// When the tokenizer has not completed initialization or has failed, the
/// span degrades to a single plain-text segment. The degradation is silent
/// to the renderer; a debug event is the only trace.
pub fn resolve_auto(text: &str, tokenizer: &dyn Tokenizer) -> Vec<Segment> {
    if tokenizer.state() != TokenizerState::Ready {
        tracing::debug!(state = ?tokenizer.state(), "tokenizer unavailable, rendering plain text");
        return vec![Segment::plain(text)];
    }
    match tokenizer.tokenize(text) {
        Some(tokens) => align_tokens(&tokens),
        None => {
            tracing::debug!("tokenizer returned no tokens, rendering plain text");
            vec![Segment::plain(text)]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notation::{NotationStyle, Patterns};
    use crate::tokenize::{DictionaryTokenizer, NullTokenizer};

    fn manual(text: &str) -> ManualMatch {
        Patterns::compile(NotationStyle::Curly)
            .unwrap()
            .find_matches(text, 0)
            .remove(0)
    }

    #[test]
    fn single_reading_covers_whole_base() {
        let segments = align_manual(&manual("{漢字|かんじ}")).unwrap();
        assert_eq!(segments, vec![Segment::annotated("漢字", "かんじ")]);
    }

    #[test]
    fn per_character_alignment_is_positional() {
        let segments = align_manual(&manual("{漢字|かん|じ}")).unwrap();
        assert_eq!(
            segments,
            vec![
                Segment::annotated("漢", "かん"),
                Segment::annotated("字", "じ"),
            ]
        );
    }

    #[test]
    fn kana_surface_skips_reading() {
        let tokens = vec![Token::new("かな", "かな"), Token::new("漢字", "かんじ")];
        let segments = align_tokens(&tokens);
        assert_eq!(
            segments,
            vec![
                Segment::plain("かな"),
                Segment::annotated("漢字", "かんじ"),
            ]
        );
    }

    #[test]
    fn empty_reading_renders_plain() {
        let tokens = vec![Token::new("謎", ""), Token::plain("字")];
        assert_eq!(
            align_tokens(&tokens),
            vec![Segment::plain("謎"), Segment::plain("字")]
        );
    }

    #[test]
    fn unavailable_tokenizer_degrades_to_plain_text() {
        let segments = resolve_auto("勉強した", &NullTokenizer);
        assert_eq!(segments, vec![Segment::plain("勉強した")]);
    }

    #[test]
    fn ready_tokenizer_resolves_tokens() {
        let dict = DictionaryTokenizer::from_entries([("勉強", "べんきょう")]);
        let segments = resolve_auto("勉強した", &dict);
        assert_eq!(
            segments,
            vec![
                Segment::annotated("勉強", "べんきょう"),
                Segment::plain("し"),
                Segment::plain("た"),
            ]
        );
    }
}
