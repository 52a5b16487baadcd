//! Renderable annotation fragments.
//!
//! A fragment is a flat left-to-right sequence of plain text runs and
//! base/reading pairs. Both the static renderer and the live decoration
//! widgets consume this shape; neither ever nests one annotation inside
//! another.

use crate::segment::Segment;

/// One node of a rendered fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RubyNode {
    /// Unannotated text run.
    Text(String),
    /// A base chunk with its attached reading.
    Ruby { base: String, reading: String },
}

/// Ordered sequence of ruby pairs and plain runs for one match span.
///
/// Created fresh per match; owned by whichever renderer requested it.
/// Stripping all readings reconstructs the original characters exactly.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnnotationFragment {
    pub nodes: Vec<RubyNode>,
}

impl AnnotationFragment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a plain run, coalescing with a preceding text node.
    pub fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(RubyNode::Text(prev)) = self.nodes.last_mut() {
            prev.push_str(text);
        } else {
            self.nodes.push(RubyNode::Text(text.to_string()));
        }
    }

    /// Appends aligned segments: annotated segments become ruby pairs,
    /// plain segments become (coalesced) text runs.
    pub fn push_segments(&mut self, segments: &[Segment]) {
        for seg in segments {
            match &seg.reading {
                Some(reading) => self.nodes.push(RubyNode::Ruby {
                    base: seg.base.clone(),
                    reading: reading.clone(),
                }),
                None => self.push_text(&seg.base),
            }
        }
    }

    /// Returns true if no node carries a reading.
    pub fn is_plain(&self) -> bool {
        self.nodes
            .iter()
            .all(|n| matches!(n, RubyNode::Text(_)))
    }

    /// Round-trip: the original source characters with all readings removed.
    pub fn strip(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            match node {
                RubyNode::Text(t) => out.push_str(t),
                RubyNode::Ruby { base, .. } => out.push_str(base),
            }
        }
        out
    }
}
