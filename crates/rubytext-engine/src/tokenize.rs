//! Tokenizer seam for automatic segmentation.
//!
//! The morphological tokenizer is an external collaborator: given a text
//! run it returns ordered tokens with surface form and phonetic reading, or
//! it is unavailable. It is modelled as an explicit dependency object with
//! an enumerated lifecycle state rather than a lazily-initialized global,
//! so callers can poll availability instead of relying on ambient mutation.

use std::collections::HashMap;
use std::io::BufRead;

use thiserror::Error;

/// One tokenizer output token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Surface form as it appears in the source text.
    pub surface: String,
    /// Phonetic reading, absent when the tokenizer has none for this token.
    pub reading: Option<String>,
}

impl Token {
    pub fn new(surface: impl Into<String>, reading: impl Into<String>) -> Self {
        Self {
            surface: surface.into(),
            reading: Some(reading.into()),
        }
    }

    pub fn plain(surface: impl Into<String>) -> Self {
        Self {
            surface: surface.into(),
            reading: None,
        }
    }
}

/// Tokenizer lifecycle. Only `Ready` tokenizers produce tokens; every other
/// state degrades automatic matches to plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenizerState {
    Uninitialized,
    Building,
    Ready,
    Failed,
}

/// Black-box tokenizer contract.
///
/// `tokenize` returns `None` when the tokenizer is unavailable (still
/// initializing, or failed); callers must degrade to plain text rather than
/// block or fail the render pass.
pub trait Tokenizer {
    fn state(&self) -> TokenizerState;

    fn tokenize(&self, text: &str) -> Option<Vec<Token>>;
}

/// Errors raised while loading a reading dictionary.
#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("failed to read dictionary: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed dictionary entry at line {line}: {text:?}")]
    MalformedEntry { line: usize, text: String },
}

/// Greedy longest-match tokenizer over a surface→reading lexicon.
///
/// Stands in for a full morphological analyzer: at each position it takes
/// the longest dictionary entry starting there, and falls back to a
/// single-character plain token when nothing matches. Used by the CLI and
/// by tests; hosts with a real analyzer implement [`Tokenizer`] directly.
#[derive(Debug, Clone)]
pub struct DictionaryTokenizer {
    entries: HashMap<String, String>,
    /// Longest key length in characters, bounding the match window.
    max_key_chars: usize,
}

impl DictionaryTokenizer {
    pub fn from_entries<I, S, R>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, R)>,
        S: Into<String>,
        R: Into<String>,
    {
        let entries: HashMap<String, String> = entries
            .into_iter()
            .map(|(s, r)| (s.into(), r.into()))
            .collect();
        let max_key_chars = entries.keys().map(|k| k.chars().count()).max().unwrap_or(0);
        Self {
            entries,
            max_key_chars,
        }
    }

    /// Loads a tab-separated `surface<TAB>reading` dictionary.
    ///
    /// Blank lines and `#` comments are skipped; a data line without a tab
    /// is an error.
    pub fn from_reader(reader: impl BufRead) -> Result<Self, DictionaryError> {
        let mut entries = Vec::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let Some((surface, reading)) = trimmed.split_once('\t') else {
                return Err(DictionaryError::MalformedEntry {
                    line: idx + 1,
                    text: line,
                });
            };
            entries.push((surface.to_string(), reading.trim().to_string()));
        }
        Ok(Self::from_entries(entries))
    }
}

impl Tokenizer for DictionaryTokenizer {
    fn state(&self) -> TokenizerState {
        TokenizerState::Ready
    }

    fn tokenize(&self, text: &str) -> Option<Vec<Token>> {
        let chars: Vec<(usize, char)> = text.char_indices().collect();
        let mut tokens = Vec::new();
        let mut i = 0;

        while i < chars.len() {
            let start = chars[i].0;
            let mut matched = None;
            // Longest match wins; window bounded by the longest key.
            let window = self.max_key_chars.min(chars.len() - i);
            for len in (1..=window).rev() {
                let end = chars
                    .get(i + len)
                    .map(|&(b, _)| b)
                    .unwrap_or(text.len());
                let candidate = &text[start..end];
                if let Some(reading) = self.entries.get(candidate) {
                    matched = Some((len, candidate.to_string(), reading.clone()));
                    break;
                }
            }

            match matched {
                Some((len, surface, reading)) => {
                    tokens.push(Token::new(surface, reading));
                    i += len;
                }
                None => {
                    tokens.push(Token::plain(chars[i].1.to_string()));
                    i += 1;
                }
            }
        }

        Some(tokens)
    }
}

/// A tokenizer that never becomes available. Exercises the degradation
/// path: automatic matches fall back to plain text.
pub struct NullTokenizer;

impl Tokenizer for NullTokenizer {
    fn state(&self) -> TokenizerState {
        TokenizerState::Failed
    }

    fn tokenize(&self, _text: &str) -> Option<Vec<Token>> {
        None
    }
}
