//! Viewport-scoped decoration rebuilds.
//!
//! Every qualifying view event triggers a full rebuild of the decoration
//! set over the current viewport (never the whole document), which bounds
//! cost to visible content. Matches near the caret or an active composition
//! session are suppressed so in-progress input is never covered.

use std::collections::{HashMap, HashSet};

use crate::kana;
use crate::markup::AnnotationFragment;
use crate::notation::Patterns;
use crate::render;
use crate::scanning::{FenceState, scan_line};
use crate::settings::Settings;
use crate::span::Span;
use crate::tokenize::Tokenizer;

use super::view::View;

/// Caret buffer half-width in bytes around each selection endpoint.
const CARET_MARGIN: usize = 4;
/// Widened half-width while an input-method composition is active.
const COMPOSITION_MARGIN: usize = 16;

/// One zero-width replacement decoration: the matched span renders as the
/// fragment instead of the raw text, without touching the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoration {
    /// Matched span in the document.
    pub span: Span,
    /// The raw source text of the span, for cheap equality checks.
    pub source: String,
    pub fragment: AnnotationFragment,
}

/// The full decoration state for one view update cycle.
///
/// Rebuilt whole on every qualifying event; decorations are in ascending,
/// non-overlapping span order. `version` stamps the view state this set was
/// computed from and `generation` the rebuild request within `doc_id`, so
/// stale sets can be detected and discarded per document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DecorationSet {
    pub doc_id: String,
    pub version: u64,
    pub generation: u64,
    pub decorations: Vec<Decoration>,
}

/// Widget equality for incremental redraw: two decorations at the same span
/// render identically iff their source text is identical. Pure; the host's
/// diffing machinery calls this to short-circuit DOM replacement.
pub fn same_render(old_source: &str, new_source: &str) -> bool {
    old_source == new_source
}

/// Span-keyed diff between two decoration sets, for hosts that redraw
/// incrementally. Purely a churn optimization: applying `new` wholesale is
/// always correct.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DecorationDiff {
    /// In `new` with no same-rendering counterpart at the same span.
    pub added: Vec<Decoration>,
    /// In `old` with no surviving counterpart.
    pub removed: Vec<Decoration>,
    /// Unchanged: same span, same render.
    pub kept: Vec<Decoration>,
}

impl DecorationDiff {
    pub fn between(old: &DecorationSet, new: &DecorationSet) -> Self {
        let mut diff = Self::default();

        for d in &new.decorations {
            let unchanged = old
                .decorations
                .iter()
                .any(|o| o.span == d.span && same_render(&o.source, &d.source));
            if unchanged {
                diff.kept.push(d.clone());
            } else {
                diff.added.push(d.clone());
            }
        }
        for o in &old.decorations {
            let survives = new
                .decorations
                .iter()
                .any(|d| d.span == o.span && same_render(&o.source, &d.source));
            if !survives {
                diff.removed.push(o.clone());
            }
        }
        diff
    }
}

/// Decoration provider for live views.
///
/// Owns the compiled notation patterns, the tokenizer handle and the
/// per-document skip flags. One annotator can serve multiple views; each
/// rebuild reads only the given view's state and returns a fresh set.
pub struct LiveAnnotator {
    settings: Settings,
    patterns: Option<Patterns>,
    tokenizer: Box<dyn Tokenizer>,
    skip_documents: HashSet<String>,
    /// Monotonic rebuild counter per document: the newest generation
    /// supersedes all earlier in-flight results for that document only, so
    /// rebuilding one view never invalidates another view's current set.
    generations: HashMap<String, u64>,
    applied: HashMap<String, u64>,
}

impl LiveAnnotator {
    pub fn new(settings: Settings, tokenizer: Box<dyn Tokenizer>) -> Self {
        Self {
            patterns: Patterns::compile(settings.notation_style),
            settings,
            tokenizer,
            skip_documents: HashSet::new(),
            generations: HashMap::new(),
            applied: HashMap::new(),
        }
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    /// Applies new settings, recompiling the notation patterns. Previously
    /// compiled patterns are invalid from this point on.
    pub fn set_settings(&mut self, settings: Settings) {
        self.patterns = Patterns::compile(settings.notation_style);
        self.settings = settings;
    }

    /// Marks a document as skipped: its views are neither scanned nor
    /// decorated until the flag is cleared.
    pub fn set_skip(&mut self, doc_id: impl Into<String>, skip: bool) {
        let doc_id = doc_id.into();
        if skip {
            self.skip_documents.insert(doc_id);
        } else {
            self.skip_documents.remove(&doc_id);
        }
    }

    pub fn is_skipped(&self, doc_id: &str) -> bool {
        self.skip_documents.contains(doc_id)
    }

    /// Rebuilds the decoration set for the view's current viewport.
    ///
    /// This is the decoration-provider entry point: the host re-invokes it
    /// on every trigger event (document, selection, viewport or composition
    /// change) and must not cache the result across events.
    pub fn rebuild(&mut self, view: &View) -> DecorationSet {
        let generation = self.generations.entry(view.doc_id().to_string()).or_insert(0);
        *generation += 1;
        let mut set = DecorationSet {
            doc_id: view.doc_id().to_string(),
            version: view.version(),
            generation: *generation,
            decorations: Vec::new(),
        };

        if !self.settings.editing_mode || self.is_skipped(view.doc_id()) {
            return set;
        }

        // Whole-document fast path: no annotable character anywhere means
        // no decorations, without touching lines at all.
        if !kana::has_annotable(&view.text()) {
            return set;
        }

        let caret_zones = caret_zones(view);
        let viewport = view.viewport();
        let mut fences = FenceState::new();

        for line in view.lines() {
            if line.index >= viewport.end {
                break;
            }
            // Lines above the viewport only feed fence state; this keeps
            // fence causality correct however far the view has scrolled.
            let excluded = fences.feed(line.content());
            if line.index < viewport.start || excluded {
                continue;
            }

            for m in scan_line(line.content(), line.span.start, self.patterns.as_ref(), &[]) {
                if caret_zones.iter().any(|z| z.intersects(m.span)) {
                    continue;
                }
                let source = view.slice(m.span);
                let fragment = render::fragment_for_match(&source, &m.kind, self.tokenizer.as_ref());
                set.decorations.push(Decoration {
                    span: m.span,
                    source,
                    fragment,
                });
            }
        }

        set
    }

    /// Latest-wins acceptance, scoped to the set's document: a set is
    /// applied only if no newer rebuild for the same document has started
    /// since it was produced and it is newer than the last set applied for
    /// that document. Superseded sets are simply discarded.
    pub fn accept(&mut self, set: &DecorationSet) -> bool {
        let current = self.generations.get(&set.doc_id).copied().unwrap_or(0);
        let applied = self.applied.get(&set.doc_id).copied().unwrap_or(0);
        if set.generation != current || set.generation <= applied {
            return false;
        }
        self.applied.insert(set.doc_id.clone(), set.generation);
        true
    }
}

/// Buffer zones around the selection endpoints, widened while composition
/// is active. Matches intersecting a zone are suppressed for this rebuild
/// only; they come back as soon as the caret moves away.
fn caret_zones(view: &View) -> Vec<Span> {
    let margin = if view.composing() {
        COMPOSITION_MARGIN
    } else {
        CARET_MARGIN
    };
    let sel = view.selection();
    let zone = |at: usize| Span::new(at.saturating_sub(margin), (at + margin).min(view.len()));

    if sel.start == sel.end {
        vec![zone(sel.start)]
    } else {
        vec![zone(sel.start), zone(sel.end)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notation::NotationStyle;
    use crate::tokenize::DictionaryTokenizer;

    fn annotator() -> LiveAnnotator {
        let dict = DictionaryTokenizer::from_entries([
            ("今日", "きょう"),
            ("勉強", "べんきょう"),
            ("漢字", "かんじ"),
        ]);
        LiveAnnotator::new(Settings::default(), Box::new(dict))
    }

    fn sources(set: &DecorationSet) -> Vec<&str> {
        set.decorations.iter().map(|d| d.source.as_str()).collect()
    }

    #[test]
    fn rebuild_decorates_visible_japanese() {
        let mut view = View::new("doc", "今日は勉強した。\n");
        view.set_selection(0..0);
        let mut ann = annotator();
        let set = ann.rebuild(&view);
        // Caret at 0 suppresses the start of the line; move it away first.
        view.set_selection(view.len()..view.len());
        let set2 = ann.rebuild(&view);
        assert!(set.decorations.len() <= set2.decorations.len());
        assert_eq!(sources(&set2), vec!["今日は勉強した"]);
    }

    #[test]
    fn skip_flag_disables_document() {
        // Default caret sits at the end, past the trailing padding.
        let view = View::new("skipped", "勉強した tail padding");
        let mut ann = annotator();
        ann.set_skip("skipped", true);
        assert!(ann.rebuild(&view).decorations.is_empty());
        ann.set_skip("skipped", false);
        assert!(!ann.rebuild(&view).decorations.is_empty());
    }

    #[test]
    fn editing_mode_off_disables_rebuilds() {
        let view = View::new("doc", "勉強した");
        let mut ann = annotator();
        let mut s = ann.settings();
        s.editing_mode = false;
        ann.set_settings(s);
        assert!(ann.rebuild(&view).decorations.is_empty());
    }

    #[test]
    fn non_japanese_document_fast_path() {
        let view = View::new("doc", "english only\nmore english\n");
        let mut ann = annotator();
        assert!(ann.rebuild(&view).decorations.is_empty());
    }

    #[test]
    fn caret_zone_suppresses_then_reappears() {
        let text = "勉強した。 padding padding";
        let mut view = View::new("doc", text);
        view.set_selection(0..0);
        let mut ann = annotator();
        assert!(ann.rebuild(&view).decorations.is_empty());

        // Cursor moves far away; the match reappears on the next rebuild.
        view.set_selection(view.len()..view.len());
        let set = ann.rebuild(&view);
        assert_eq!(sources(&set), vec!["勉強した"]);
    }

    #[test]
    fn composition_widens_the_buffer_zone() {
        let text = "padding 勉強した";
        let offset = "padding ".len(); // 8, within 16 of the caret at 0
        assert!(offset < COMPOSITION_MARGIN);

        let mut view = View::new("doc", text);
        view.set_selection(0..0);
        let mut ann = annotator();
        assert_eq!(sources(&ann.rebuild(&view)), vec!["勉強した"]);

        view.set_composing(true);
        assert!(ann.rebuild(&view).decorations.is_empty());
    }

    #[test]
    fn viewport_bounds_decorations() {
        let mut view = View::new("doc", "勉強\n勉強\n勉強\n");
        view.set_selection(0..0);
        // Only the middle line is visible; the caret zone covers line 0
        // anyway, so without the viewport we would still see lines 1-2.
        view.scroll_to(1..2);
        let mut ann = annotator();
        let set = ann.rebuild(&view);
        assert_eq!(set.decorations.len(), 1);
        assert_eq!(set.decorations[0].span.start, "勉強\n".len());
    }

    #[test]
    fn fence_opened_above_viewport_still_excludes() {
        let doc = "```\n勉強\n勉強\n```\n勉強\n";
        let mut view = View::new("doc", doc);
        view.set_selection(0..0);
        // Scroll to the tail: lines 2..5. Line 2 is still inside the fence
        // opened on line 0, outside the scan window.
        view.scroll_to(2..5);
        let mut ann = annotator();
        let set = ann.rebuild(&view);
        assert_eq!(sources(&set), vec!["勉強"]);
        assert_eq!(set.decorations[0].span.start, doc.rfind("勉強").unwrap());
    }

    #[test]
    fn decorations_are_ascending_and_disjoint() {
        let mut view = View::new("doc", "今日は{漢字|かん|じ}を勉強した。");
        view.set_selection(0..0);
        let mut ann = annotator();
        // Park the caret past the end of the text runs.
        view.set_selection(view.len()..view.len());
        let set = ann.rebuild(&view);
        for pair in set.decorations.windows(2) {
            assert!(pair[0].span.end <= pair[1].span.start);
        }
    }

    #[test]
    fn latest_wins_acceptance() {
        let view = View::new("doc", "勉強");
        let mut ann = annotator();
        let first = ann.rebuild(&view);
        let second = ann.rebuild(&view);

        // The older in-flight result is superseded and discarded.
        assert!(!ann.accept(&first));
        assert!(ann.accept(&second));
        // Re-applying the same set is a no-op.
        assert!(!ann.accept(&second));
    }

    #[test]
    fn diff_short_circuits_unchanged_spans() {
        let mut view = View::new("doc", "勉強 and 漢字");
        view.set_selection(view.len()..view.len());
        let mut ann = annotator();
        let old = ann.rebuild(&view);
        let new = ann.rebuild(&view);

        let diff = DecorationDiff::between(&old, &new);
        assert_eq!(diff.kept.len(), old.decorations.len());
        assert!(diff.added.is_empty());
        assert!(diff.removed.is_empty());
    }

    #[test]
    fn style_switch_changes_only_manual_matching() {
        // Trailing padding keeps the caret zone clear of every match.
        let mut view = View::new("doc", "{漢字|かんじ}と[勉強|べんきょう] tail padding");
        let mut ann = annotator();
        view.set_selection(view.len()..view.len());

        let curly = ann.rebuild(&view);
        assert!(sources(&curly).contains(&"{漢字|かんじ}"));

        let mut s = ann.settings();
        s.notation_style = NotationStyle::Square;
        ann.set_settings(s);
        let square = ann.rebuild(&view);
        assert!(sources(&square).contains(&"[勉強|べんきょう]"));
        assert!(!sources(&square).contains(&"{漢字|かんじ}"));
    }
}
