//! Core furigana annotation engine.
//!
//! Combines author-written reading overrides (`{漢字|かん|じ}`) with
//! tokenizer-derived segmentation into renderable base/reading markup,
//! without ever mutating the source text. Consumed by a static rendering
//! pass ([`render`]) and a live editing surface ([`live`]).

pub mod kana;
pub mod live;
pub mod markup;
pub mod notation;
pub mod render;
pub mod scanning;
pub mod segment;
pub mod settings;
pub mod span;
pub mod tokenize;

// Re-export key types for easier usage
pub use live::{Cmd, Decoration, DecorationDiff, DecorationSet, LiveAnnotator, View, same_render};
pub use markup::{AnnotationFragment, RubyNode};
pub use notation::{ManualMatch, NotationStyle, Patterns};
pub use scanning::{FenceState, MatchKind, ScanMatch};
pub use segment::Segment;
pub use settings::Settings;
pub use span::Span;
pub use tokenize::{DictionaryTokenizer, NullTokenizer, Token, Tokenizer, TokenizerState};
