use std::ops::Range;

use xi_rope::delta::Builder;
use xi_rope::{Delta, Rope, RopeInfo};

use crate::span::Span;

/// Edit commands the host surface can apply to a view's buffer.
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    InsertText { at: usize, text: String },
    DeleteRange { range: Range<usize> },
    ReplaceRange { range: Range<usize>, text: String },
}

/// A single line with its byte span in the document.
#[derive(Debug, Clone)]
pub struct LineRef {
    /// Zero-based line index.
    pub index: usize,
    /// Byte span of this line (includes the newline if present).
    pub span: Span,
    /// The line text, newline included.
    pub text: String,
}

impl LineRef {
    /// The line content without its trailing newline, for scanning.
    pub fn content(&self) -> &str {
        self.text.trim_end_matches(['\r', '\n'])
    }
}

/// One live view over a document: the raw text plus the ephemeral state
/// that drives decoration rebuilds (selection, viewport, composition).
///
/// The buffer is the single source of truth; decorations never mutate it.
/// Each view's state is private to that view: concurrent views over the
/// same document share nothing mutable.
pub struct View {
    doc_id: String,
    buffer: Rope,
    /// Current selection/caret as byte offsets; caret is an empty range.
    selection: Range<usize>,
    /// Visible line range `[start, end)`.
    viewport: Range<usize>,
    /// True while an input-method composition session is active.
    composing: bool,
    /// Update counter, incremented on every qualifying event. Rebuilds are
    /// stamped with it so stale results can be rejected (latest wins).
    version: u64,
}

impl View {
    pub fn new(doc_id: impl Into<String>, text: &str) -> Self {
        let buffer = Rope::from(text);
        let len = buffer.len();
        let line_count = buffer.lines_raw(..).count().max(1);
        Self {
            doc_id: doc_id.into(),
            buffer,
            selection: len..len,
            viewport: 0..line_count,
            composing: false,
            version: 0,
        }
    }

    pub fn doc_id(&self) -> &str {
        &self.doc_id
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.len() == 0
    }

    pub fn selection(&self) -> Range<usize> {
        self.selection.clone()
    }

    pub fn viewport(&self) -> Range<usize> {
        self.viewport.clone()
    }

    pub fn composing(&self) -> bool {
        self.composing
    }

    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    pub fn slice(&self, span: Span) -> String {
        self.buffer.slice_to_cow(span.start..span.end).into_owned()
    }

    /// Iterates all lines with their byte spans, in document order.
    pub fn lines(&self) -> impl Iterator<Item = LineRef> + '_ {
        let mut offset = 0usize;
        self.buffer.lines_raw(..).enumerate().map(move |(index, line)| {
            let start = offset;
            offset += line.len();
            LineRef {
                index,
                span: Span::new(start, offset),
                text: line.into_owned(),
            }
        })
    }

    /// Applies an edit command: compile to a delta, apply to the buffer,
    /// transform the selection through the edit, bump the version.
    pub fn apply(&mut self, cmd: Cmd) {
        let delta = self.compile_command(&cmd);
        self.buffer = delta.apply(&self.buffer);
        self.selection = transform_offset(self.selection.start, &cmd)
            ..transform_offset(self.selection.end, &cmd);
        self.clamp_viewport();
        self.version += 1;
    }

    /// Selection, scroll and composition changes are rebuild triggers just
    /// like edits, so each bumps the update counter.
    pub fn set_selection(&mut self, selection: Range<usize>) {
        self.selection = selection;
        self.version += 1;
    }

    pub fn scroll_to(&mut self, viewport: Range<usize>) {
        self.viewport = viewport;
        self.clamp_viewport();
        self.version += 1;
    }

    pub fn set_composing(&mut self, composing: bool) {
        self.composing = composing;
        self.version += 1;
    }

    fn compile_command(&self, cmd: &Cmd) -> Delta<RopeInfo> {
        let mut builder = Builder::new(self.buffer.len());
        match cmd {
            Cmd::InsertText { at, text } => {
                builder.replace(*at..*at, Rope::from(text));
            }
            Cmd::DeleteRange { range } => {
                builder.delete(range.clone());
            }
            Cmd::ReplaceRange { range, text } => {
                builder.replace(range.clone(), Rope::from(text));
            }
        }
        builder.build()
    }

    fn clamp_viewport(&mut self) {
        let line_count = self.buffer.lines_raw(..).count().max(1);
        let start = self.viewport.start.min(line_count);
        let end = self.viewport.end.min(line_count).max(start);
        self.viewport = start..end;
    }
}

/// Transforms a byte offset through an edit command.
fn transform_offset(offset: usize, cmd: &Cmd) -> usize {
    match cmd {
        Cmd::InsertText { at, text } => {
            if offset >= *at {
                offset + text.len()
            } else {
                offset
            }
        }
        Cmd::DeleteRange { range } => collapse(offset, range, 0),
        Cmd::ReplaceRange { range, text } => collapse(offset, range, text.len()),
    }
}

/// Offsets inside the edited range collapse to its start (plus the length
/// of any replacement text); offsets after it shift by the length change.
fn collapse(offset: usize, range: &Range<usize>, inserted: usize) -> usize {
    if offset <= range.start {
        offset
    } else if offset < range.end {
        range.start + inserted
    } else {
        offset - (range.end - range.start) + inserted
    }
}
