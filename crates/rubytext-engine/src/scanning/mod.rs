//! Match scanning: finding manual and automatic annotation candidates in a
//! text unit while honoring exclusion zones (fenced code blocks, inline
//! code spans, existing ruby subtrees).

pub mod code_span;
pub mod cursor;
pub mod fence;
pub mod ruby;
pub mod scanner;

pub use fence::{Fence, FenceSig, FenceState};
pub use scanner::{MatchKind, ScanMatch, scan_line};
