//! Live, editable surface support.
//!
//! The live surface keeps the raw text authoritative in an `xi_rope` buffer
//! and derives zero-width replacement decorations over the visible viewport
//! only. Decorations are rebuilt whole, never mutated in place, on every
//! qualifying event (edit, selection move, scroll, composition change).

pub mod decorations;
pub mod view;

pub use decorations::{Decoration, DecorationDiff, DecorationSet, LiveAnnotator, same_render};
pub use view::{Cmd, LineRef, View};
