//! Fenced code block detection.
//!
//! Fence state is causal: whether a line is inside a fence depends on every
//! fence marker line before it, from the start of the document. A live
//! surface may only materialize a middle window, so [`FenceState`] is
//! always fed forward from line zero up to wherever scanning begins.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceSig {
    Backticks,
    Tildes,
}

pub struct Fence;

impl Fence {
    pub const BACKTICKS: &'static str = "```";
    pub const TILDES: &'static str = "~~~";

    /// Classifies a line as a fence marker, ignoring the trailing newline
    /// and up to three leading spaces of indentation.
    pub fn sig(line: &str) -> Option<FenceSig> {
        let t = line.trim_end_matches(['\r', '\n']);
        let t = t
            .strip_prefix("   ")
            .or_else(|| t.strip_prefix("  "))
            .or_else(|| t.strip_prefix(' '))
            .unwrap_or(t);
        if t.starts_with(Self::BACKTICKS) {
            Some(FenceSig::Backticks)
        } else if t.starts_with(Self::TILDES) {
            Some(FenceSig::Tildes)
        } else {
            None
        }
    }

    /// A fence closes only on a marker of the same delimiter kind.
    pub fn closes(open: FenceSig, sig: Option<FenceSig>) -> bool {
        sig == Some(open)
    }
}

/// Open/closed fence tracker, fed one line at a time in document order.
///
/// An unterminated opening fence extends to the end of the input: there is
/// no error path, lines simply stay excluded (best effort).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FenceState {
    open: Option<FenceSig>,
}

impl FenceState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true while inside a fence (marker lines excluded separately).
    pub fn in_fence(&self) -> bool {
        self.open.is_some()
    }

    /// Feeds the next line and returns true if that line is excluded from
    /// annotation scanning (a fence marker line, or a line inside a fence).
    pub fn feed(&mut self, line: &str) -> bool {
        match self.open {
            None => {
                if let Some(sig) = Fence::sig(line) {
                    self.open = Some(sig);
                    true
                } else {
                    false
                }
            }
            Some(open) => {
                if Fence::closes(open, Fence::sig(line)) {
                    self.open = None;
                }
                true
            }
        }
    }

    /// Computes the fence state just before `first_line`, folding all
    /// earlier lines. This is what makes mid-document scan windows correct
    /// regardless of scroll position.
    pub fn before_line<'a>(lines: impl Iterator<Item = &'a str>, first_line: usize) -> Self {
        let mut state = Self::new();
        for line in lines.take(first_line) {
            state.feed(line);
        }
        state
    }
}
