//! The chunk builder: the visitor-facing half of this crate.
//!
//! A [`ChunkBuilder`] turns a stream of `write`/`split`/`start_rule`/...
//! calls into a flat [`Chunk`] vector tied to [`layout_rules::RuleId`]s.
//! Nested blocks get their own child builder (`start_block`/`end_block`)
//! that shares the parent's rule graph, nesting arena and span arena
//! through [`Shared`] - so hardening a rule inside a block is visible to
//! the parent immediately, and a rule never "forgets" it was hardened
//! once a child builder returns. Sharing the arena instead of copying
//! it avoids losing forced-rule state across a `start_block`/
//! `end_block` boundary.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use layout_rules::{HardRule, RuleBehavior, RuleGraph, RuleId};
use unicode_width::UnicodeWidthStr;

use crate::chunk::{Chunk, DoubleNewline, SplitInfo};
use crate::comment::SourceComment;
use crate::errors::BuilderError;
use crate::nesting::{NestingArena, NestingId};
use crate::span::{SpanArena, SpanId};
use crate::whitespace::PendingWhitespace;

/// Default per-level width used when a caller doesn't name an explicit
/// one in `indent`/`nest_expression`.
pub const DEFAULT_INDENT_WIDTH: usize = 2;
pub const DEFAULT_NEST_WIDTH: usize = 2;
pub const DEFAULT_SPAN_COST: i32 = 1;

/// Arenas shared by a root builder and every block builder nested under
/// it, so a `RuleId`/`NestingId`/`SpanId` minted anywhere in the tree
/// resolves the same way everywhere in the tree.
#[derive(Debug, Default)]
pub struct Shared {
    pub rules: RefCell<RuleGraph>,
    pub nesting: RefCell<NestingArena>,
    pub spans: RefCell<SpanArena>,
}

impl Shared {
    fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }
}

/// Link back to the parent builder a block builder was split off from,
/// so `end_block` knows where to graft its finished chunks.
struct ParentLink {
    parent: Box<ChunkBuilder>,
    parent_chunk_index: usize,
    enclosing_rule: Option<RuleId>,
}

/// The chunk stream plus everything the solver needs to interpret it,
/// produced by [`ChunkBuilder::end`].
pub struct BuildOutput {
    pub chunks: Vec<Chunk>,
    pub rules: RuleGraph,
    pub nesting: NestingArena,
    pub spans: SpanArena,
}

pub struct ChunkBuilder {
    shared: Rc<Shared>,
    chunks: Vec<Chunk>,
    rule_stack: Vec<RuleId>,
    lazy_rule: Option<RuleId>,
    pending_whitespace: PendingWhitespace,
    hard_split_rules: HashSet<RuleId>,
    indent_stack: Vec<usize>,
    current_indent: usize,
    nesting_stack: Vec<Option<NestingId>>,
    current_nesting: Option<NestingId>,
    pending_nesting: Option<Option<NestingId>>,
    active_spans: Vec<SpanId>,
    block_arg_nesting_stack: Vec<Option<NestingId>>,
    parent: Option<ParentLink>,
}

impl ChunkBuilder {
    /// A fresh root builder for a whole compilation unit, starting at
    /// `initial_indent` columns.
    pub fn new(initial_indent: usize) -> Self {
        let shared = Shared::new();
        let root_rule = shared.rules.borrow_mut().add_rule(Box::new(HardRule));
        Self {
            shared,
            chunks: vec![Chunk::empty()],
            rule_stack: vec![root_rule],
            lazy_rule: None,
            pending_whitespace: PendingWhitespace::None,
            hard_split_rules: HashSet::new(),
            indent_stack: Vec::new(),
            current_indent: initial_indent,
            nesting_stack: Vec::new(),
            current_nesting: None,
            pending_nesting: None,
            active_spans: Vec::new(),
            block_arg_nesting_stack: Vec::new(),
            parent: None,
        }
    }

    fn current_chunk_mut(&mut self) -> &mut Chunk {
        self.chunks.last_mut().expect("chunk stream is never empty")
    }

    /// Install a new rule in the shared graph without activating it
    /// (the caller decides whether to `start_rule`/`start_lazy_rule`
    /// with the returned id, or hold onto it to reuse later).
    pub fn add_rule(&mut self, behavior: Box<dyn RuleBehavior>) -> RuleId {
        self.shared.rules.borrow_mut().add_rule(behavior)
    }

    fn innermost_rule(&self) -> RuleId {
        *self.rule_stack.last().expect("rule stack is never empty")
    }

    // ---- rule scope -----------------------------------------------

    pub fn start_rule(&mut self, rule: Option<RuleId>) -> RuleId {
        let id = rule.unwrap_or_else(|| self.add_rule(Box::new(layout_rules::SimpleRule::default())));
        let outer = self.innermost_rule();
        self.shared.rules.borrow_mut().contain(outer, id);
        self.rule_stack.push(id);
        id
    }

    pub fn end_rule(&mut self) {
        self.rule_stack.pop().expect("end_rule without matching start_rule");
    }

    /// Queue a rule whose scope begins only after the next whitespace
    /// is actually emitted, e.g. so a construct that might turn out to
    /// be a single token doesn't pay for a rule it never splits on.
    pub fn start_lazy_rule(&mut self, rule: Option<RuleId>) -> RuleId {
        let id = rule.unwrap_or_else(|| self.add_rule(Box::new(layout_rules::SimpleRule::default())));
        self.lazy_rule = Some(id);
        id
    }

    fn activate_lazy_rule(&mut self) {
        if let Some(id) = self.lazy_rule.take() {
            self.start_rule(Some(id));
        }
    }

    pub fn force_rules(&mut self) {
        let active: Vec<RuleId> = self.rule_stack.clone();
        for r in active {
            self.shared.rules.borrow_mut().harden_transitive(r);
        }
    }

    // ---- indentation / nesting -------------------------------------

    pub fn indent(&mut self, amount: Option<usize>) {
        let amt = amount.unwrap_or(DEFAULT_INDENT_WIDTH);
        self.indent_stack.push(self.current_indent);
        self.current_indent += amt;
    }

    pub fn unindent(&mut self) {
        self.current_indent = self
            .indent_stack
            .pop()
            .expect("unindent without matching indent");
    }

    /// Open a new expression-nesting level. If `now` is false the level
    /// only becomes the active nesting starting with the next `write`
    /// call (commits the pending nesting); a split applied before that
    /// next write still uses the old nesting.
    pub fn nest_expression(&mut self, indent: Option<usize>, now: bool) {
        let amt = indent.unwrap_or(DEFAULT_NEST_WIDTH);
        let id = self.shared.nesting.borrow_mut().push(self.current_nesting, amt);
        self.nesting_stack.push(self.current_nesting);
        if now {
            self.current_nesting = Some(id);
        } else {
            self.pending_nesting = Some(Some(id));
        }
    }

    pub fn unnest(&mut self) {
        self.pending_nesting = None;
        self.current_nesting = self
            .nesting_stack
            .pop()
            .expect("unnest without matching nest_expression");
    }

    pub fn start_block_argument_nesting(&mut self) {
        self.block_arg_nesting_stack.push(self.current_nesting);
    }

    pub fn end_block_argument_nesting(&mut self) {
        self.current_nesting = self
            .block_arg_nesting_stack
            .pop()
            .expect("end_block_argument_nesting without matching start");
    }

    // ---- spans ------------------------------------------------------

    pub fn start_span(&mut self, cost: Option<i32>) -> SpanId {
        let id = self
            .shared
            .spans
            .borrow_mut()
            .open(cost.unwrap_or(DEFAULT_SPAN_COST));
        self.active_spans.push(id);
        self.sync_active_spans();
        id
    }

    pub fn end_span(&mut self) {
        self.active_spans.pop().expect("end_span without matching start_span");
        self.sync_active_spans();
    }

    fn sync_active_spans(&mut self) {
        let spans = self.active_spans.clone();
        self.current_chunk_mut().spans = spans;
    }

    // ---- selection ----------------------------------------------------

    pub fn start_selection_from_end(&mut self, offset_from_end: usize) {
        let chunk = self.current_chunk_mut();
        let len = chunk.text.len();
        chunk.selection.start = Some(len.saturating_sub(offset_from_end));
    }

    pub fn end_selection_from_end(&mut self, offset_from_end: usize) {
        let chunk = self.current_chunk_mut();
        let len = chunk.text.len();
        chunk.selection.end = Some(len.saturating_sub(offset_from_end));
    }

    // ---- whitespace / text ------------------------------------------

    pub fn write_whitespace(&mut self, kind: PendingWhitespace) {
        self.pending_whitespace = kind;
    }

    pub fn preserve_newlines(&mut self, n: usize) {
        self.pending_whitespace = self.pending_whitespace.resolve(n);
    }

    fn flush_pending_whitespace(&mut self) -> Result<(), BuilderError> {
        let pending = self.pending_whitespace;
        if pending.is_ambiguous() {
            return Err(BuilderError::AmbiguousWhitespace);
        }
        match pending {
            PendingWhitespace::None => {}
            PendingWhitespace::Space => {
                self.current_chunk_mut().text.push(' ');
                self.activate_lazy_rule();
            }
            PendingWhitespace::Newline => {
                self.apply_pending_split(false, DoubleNewline::Single)?;
                self.activate_lazy_rule();
            }
            PendingWhitespace::NestedNewline => {
                self.apply_pending_split(true, DoubleNewline::Single)?;
                self.activate_lazy_rule();
            }
            PendingWhitespace::NewlineFlushLeft => {
                self.apply_pending_split_flush_left()?;
                self.activate_lazy_rule();
            }
            PendingWhitespace::TwoNewlines => {
                self.apply_pending_split(false, DoubleNewline::Double)?;
                self.activate_lazy_rule();
            }
            PendingWhitespace::SpaceOrNewline | PendingWhitespace::OneOrTwoNewlines => unreachable!(),
        }
        self.pending_whitespace = PendingWhitespace::None;
        Ok(())
    }

    fn apply_pending_split(&mut self, use_nesting: bool, is_double: DoubleNewline) -> Result<(), BuilderError> {
        let rule = self.innermost_rule();
        let nesting = if use_nesting { self.current_nesting } else { None };
        self.apply_split(rule, nesting, true, is_double, false)
    }

    fn apply_pending_split_flush_left(&mut self) -> Result<(), BuilderError> {
        let rule = self.innermost_rule();
        self.apply_split(rule, None, false, DoubleNewline::Single, true)
    }

    pub fn write(&mut self, text: &str) -> Result<(), BuilderError> {
        self.flush_pending_whitespace()?;
        if let Some(pending) = self.pending_nesting.take() {
            self.current_nesting = pending;
        }
        self.current_chunk_mut().text.push_str(text);
        Ok(())
    }

    /// Apply a split at the current chunk, owned by the innermost rule,
    /// using the active expression nesting.
    pub fn split(
        &mut self,
        space_when_unsplit: bool,
        is_double: DoubleNewline,
        flush_left: bool,
    ) -> Result<(), BuilderError> {
        self.flush_pending_whitespace()?;
        let rule = self.innermost_rule();
        self.apply_split(rule, self.current_nesting, space_when_unsplit, is_double, flush_left)
    }

    /// Like [`Self::split`] but block-level: no expression nesting.
    pub fn block_split(&mut self, space_when_unsplit: bool, is_double: DoubleNewline) -> Result<(), BuilderError> {
        self.flush_pending_whitespace()?;
        let rule = self.innermost_rule();
        self.apply_split(rule, None, space_when_unsplit, is_double, false)
    }

    fn apply_split(
        &mut self,
        rule: RuleId,
        nesting: Option<NestingId>,
        space_when_unsplit: bool,
        is_double: DoubleNewline,
        flush_left: bool,
    ) -> Result<(), BuilderError> {
        let rule_local_index = self.shared.rules.borrow_mut().register_split(rule);
        let indent = self.current_indent;
        self.current_chunk_mut().split = Some(SplitInfo {
            rule,
            rule_local_index,
            indent,
            nesting,
            flush_left,
            is_double,
            space_when_unsplit,
        });
        self.note_split_applied(rule);
        self.push_chunk();
        Ok(())
    }

    fn push_chunk(&mut self) {
        let mut chunk = Chunk::empty();
        chunk.spans = self.active_spans.clone();
        self.chunks.push(chunk);
    }

    /// Record which currently-active rules should be hardened at `end`
    /// because one of their splits turned out to be unconditional - a
    /// hard split forces every rule wrapping it.
    fn note_split_applied(&mut self, rule: RuleId) {
        let rules = self.shared.rules.borrow();
        if rules.value_count(rule) > 1 {
            return;
        }
        let active: Vec<RuleId> = self
            .rule_stack
            .iter()
            .copied()
            .filter(|r| rules.rule(*r).splits_on_inner_rules())
            .collect();
        drop(rules);
        self.hard_split_rules.extend(active);
    }

    // ---- comments -----------------------------------------------------

    /// Interleave source comments between the previously written token
    /// and the next one. `lines_before_token` is the number of source
    /// newlines between the last comment (or the previous token, if
    /// `comments` is empty) and `next_token`.
    pub fn write_comments(
        &mut self,
        mut comments: Vec<SourceComment>,
        mut lines_before_token: usize,
        next_token: &str,
    ) -> Result<(), BuilderError> {
        if comments.is_empty() {
            self.preserve_newlines(lines_before_token);
            return Ok(());
        }

        // 1. Blank-line absorption: a pending blank line collapses to a
        // single newline if nothing around the comment run actually
        // wants a blank line.
        if self.pending_whitespace == PendingWhitespace::TwoNewlines && comments[0].lines_before < 2 {
            let wants_blank = lines_before_token > 1 || comments.iter().any(|c| c.lines_before > 1);
            if !wants_blank {
                self.pending_whitespace = PendingWhitespace::Newline;
            }
        }

        // 2. Inline-run spacing: a run of same-line block comments
        // hugging the next token pulls the pending newline in front of
        // itself instead of after.
        const MIN_LINES: usize = 1;
        let demands_newline = matches!(
            self.pending_whitespace,
            PendingWhitespace::Newline
                | PendingWhitespace::NestedNewline
                | PendingWhitespace::NewlineFlushLeft
                | PendingWhitespace::TwoNewlines
                | PendingWhitespace::OneOrTwoNewlines
        );
        if lines_before_token == 0 && demands_newline && comments.iter().all(|c| c.is_inline) {
            comments[0].lines_before = MIN_LINES;
            lines_before_token = 1;
        }

        let n = comments.len();
        let mut final_lines_after = lines_before_token;
        for i in 0..n {
            // 3a-c.
            self.pending_whitespace = self.pending_whitespace.resolve(comments[i].lines_before);
            if self.pending_whitespace == PendingWhitespace::Space {
                self.pending_whitespace = PendingWhitespace::None;
            }
            self.flush_pending_whitespace()?;

            // 3d-e.
            if comments[i].lines_before == 0 {
                self.adhere_trailing_comment(&comments[i]);
            } else {
                let is_double = if comments[i].lines_before > 1 {
                    DoubleNewline::Double
                } else {
                    DoubleNewline::Single
                };
                self.split(true, is_double, comments[i].flush_left)?;
            }

            // 3f.
            self.append_comment_text(&comments[i]);

            // 3g-h.
            let mut lines_after = if i + 1 < n {
                comments[i + 1].lines_before
            } else {
                lines_before_token
            };
            if comments[i].is_multiline() && lines_after == 0 {
                lines_after = 1;
            }
            if lines_after > 0 {
                let is_double = if lines_after > 1 {
                    DoubleNewline::Double
                } else {
                    DoubleNewline::Single
                };
                self.split(true, is_double, false)?;
            }
            if i == n - 1 {
                final_lines_after = lines_after;
            }
        }

        // 4. Trailing space before the next token, unless a hard split
        // already separated the last comment from it, or it's a closer
        // that should hug the comment, or we're at EOF.
        const CLOSERS: [&str; 5] = [")", "]", "}", ",", ";"];
        if final_lines_after == 0 && !next_token.is_empty() && !CLOSERS.contains(&next_token) {
            self.pending_whitespace = PendingWhitespace::Space;
        }

        // 5.
        self.pending_whitespace = self.pending_whitespace.resolve(lines_before_token);
        Ok(())
    }

    fn adhere_trailing_comment(&mut self, comment: &SourceComment) {
        let len = self.chunks.len();
        let mut reallow = false;
        if len >= 2 {
            let prev = &self.chunks[len - 2];
            let ends_split = prev.split.is_some();
            let opens_group = prev.text.ends_with(['(', '[', '{']);
            if ends_split && !opens_group && !comment.is_multiline() {
                reallow = true;
            }
        }
        if reallow {
            let cur = self.chunks.pop().expect("just checked len >= 2");
            debug_assert!(cur.text.is_empty() && cur.split.is_none());
            self.chunks.last_mut().expect("len >= 2").split = None;
        }
        let opens_group = self.chunks.last().expect("chunk stream is never empty").text.ends_with(['(', '[', '{']);
        if comment.is_line_comment || !opens_group {
            self.current_chunk_mut().text.push(' ');
        }
    }

    fn append_comment_text(&mut self, comment: &SourceComment) {
        let base = self.chunks.last().expect("chunk stream is never empty").text.len();
        self.current_chunk_mut().text.push_str(&comment.text);
        if let Some(s) = comment.selection_start {
            self.current_chunk_mut().selection.start = Some(base + s);
        }
        if let Some(e) = comment.selection_end {
            self.current_chunk_mut().selection.end = Some(base + e);
        }
    }

    // ---- nested blocks --------------------------------------------------

    /// Split off a child builder for a nested block's contents. The
    /// block's own chunks are recorded against `parent_chunk_index`'s
    /// chunk once [`Self::end_block`] returns. Consumes `self` by value
    /// and hands back the child so the caller reassigns its own
    /// variable: `builder = builder.start_block(None);`.
    pub fn start_block(mut self, enclosing_rule: Option<RuleId>) -> ChunkBuilder {
        let parent_chunk_index = self.chunks.len() - 1;
        // The chunk open when the block starts becomes the block's
        // parent chunk and is never written to again; the parent
        // resumes writing into a fresh chunk once the block ends, so
        // text added after `end_block` lands after the block's
        // content instead of fusing into its opening chunk.
        self.push_chunk();
        let shared = Rc::clone(&self.shared);
        let indent = self.current_indent;
        let nesting = self.current_nesting;
        let parent = ParentLink {
            parent: Box::new(self),
            parent_chunk_index,
            enclosing_rule,
        };
        ChunkBuilder {
            shared,
            chunks: vec![Chunk::empty()],
            rule_stack: vec![enclosing_rule.unwrap_or_else(|| {
                parent.parent.rule_stack.last().copied().expect("rule stack is never empty")
            })],
            lazy_rule: None,
            pending_whitespace: PendingWhitespace::None,
            hard_split_rules: HashSet::new(),
            indent_stack: Vec::new(),
            current_indent: indent,
            nesting_stack: Vec::new(),
            current_nesting: nesting,
            pending_nesting: None,
            active_spans: Vec::new(),
            block_arg_nesting_stack: Vec::new(),
            parent: Some(parent),
        }
    }

    /// Index, within this block builder's own chunk vector, of the most
    /// recently finalized chunk — the one carrying whatever split was
    /// just applied. Lets a caller capture the block's own delimiter
    /// split (e.g. the one right before a closing bracket) to pass as
    /// `ignored_split` to [`Self::end_block`], so that split alone
    /// doesn't force the enclosing rule to split.
    pub fn last_split_chunk_index(&self) -> usize {
        self.chunks.len().saturating_sub(2)
    }

    /// Finalize this block builder, grafting its chunks back onto the
    /// chunk its parent was building when `start_block` was called, and
    /// return the parent builder (see [`Self::start_block`]'s calling
    /// convention). `ignored_split`, if given, is a chunk index (see
    /// [`Self::last_split_chunk_index`]) excluded from the scan that
    /// decides whether the block's content forces `enclosing_rule` to
    /// split - the block's own delimiter split is often hard regardless
    /// of whether its *content* needed to split, and shouldn't by
    /// itself count as a reason to force the enclosing rule. `force_split`
    /// hardens `enclosing_rule` unconditionally, regardless of what the
    /// scan finds.
    pub fn end_block(mut self, ignored_split: Option<usize>, force_split: bool) -> ChunkBuilder {
        let parent_link = self.parent.take().expect("end_block without matching start_block");
        for r in self.hard_split_rules.drain() {
            self.shared.rules.borrow_mut().harden_transitive(r);
        }
        let rules = self.shared.rules.borrow();
        let contains_hard_split = self
            .chunks
            .iter()
            .enumerate()
            .any(|(i, c)| ignored_split != Some(i) && c.is_hard_split(&rules));
        drop(rules);
        if let Some(enclosing) = parent_link.enclosing_rule {
            if force_split || contains_hard_split {
                // Shared with the parent builder, so this is visible
                // the instant the parent resumes - no state is lost
                // crossing the block boundary.
                self.shared.rules.borrow_mut().harden_transitive(enclosing);
            }
        }
        self.run_divide_pass();

        let mut parent = *parent_link.parent;
        let unsplit_len: usize = self
            .chunks
            .iter()
            .map(|c| {
                let width = UnicodeWidthStr::width(c.text.as_str());
                let space = c.split.as_ref().is_some_and(|s| s.space_when_unsplit) as usize;
                width + space
            })
            .sum();
        let slot = &mut parent.chunks[parent_link.parent_chunk_index];
        slot.block_chunks = self.chunks;
        slot.unsplit_block_length = unsplit_len;
        parent
    }

    // ---- finishing ----------------------------------------------------

    /// Finish the (root) builder: emit a trailing hard split, harden
    /// every rule that turned out to own an unconditional split, run
    /// the divide pass, and hand back the finished chunk stream along
    /// with the arenas needed to interpret it.
    pub fn end(mut self) -> Result<BuildOutput, BuilderError> {
        assert!(self.parent.is_none(), "end() called on a nested block builder; call end_block instead");
        self.flush_pending_whitespace()?;
        let eof_rule = self.add_rule(Box::new(HardRule));
        self.apply_split(eof_rule, None, false, DoubleNewline::Single, false)?;
        for r in self.hard_split_rules.drain() {
            self.shared.rules.borrow_mut().harden_transitive(r);
        }
        self.run_divide_pass();

        let chunks = self.chunks;
        let shared = Rc::try_unwrap(self.shared)
            .unwrap_or_else(|_| panic!("dangling reference into shared arena at end()"));
        Ok(BuildOutput {
            chunks,
            rules: shared.rules.into_inner(),
            nesting: shared.nesting.into_inner(),
            spans: shared.spans.into_inner(),
        })
    }

    /// Mark divide markers: chunks whose split is hardened, block-level
    /// (no expression nesting), not a block parent, and whose rule owns
    /// no chunk further along. These are safe boundaries for the solver
    /// to search independently.
    fn run_divide_pass(&mut self) {
        let mut rule_last_index: HashMap<RuleId, usize> = HashMap::new();
        for (i, c) in self.chunks.iter().enumerate() {
            if let Some(s) = &c.split {
                rule_last_index.insert(s.rule, i);
            }
        }
        let rules = self.shared.rules.borrow();
        for i in 0..self.chunks.len() {
            let is_marker = match &self.chunks[i].split {
                Some(s) => {
                    let hard = rules.is_determined(s.rule);
                    let block_level = s.nesting.is_none();
                    let no_block_children = self.chunks[i].block_chunks.is_empty();
                    let rule_done = rule_last_index.get(&s.rule).is_none_or(|&last| last <= i);
                    hard && block_level && no_block_children && rule_done
                }
                None => false,
            };
            self.chunks[i].divide_marker = is_marker;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layout_rules::PositionalRule;

    #[test]
    fn write_concatenates_into_current_chunk() {
        let mut b = ChunkBuilder::new(0);
        b.write("foo").unwrap();
        b.write_whitespace(PendingWhitespace::Space);
        b.write("bar").unwrap();
        assert_eq!(b.chunks.last().unwrap().text, "foo bar");
    }

    #[test]
    fn split_finalizes_current_chunk_and_opens_a_new_one() {
        let mut b = ChunkBuilder::new(0);
        b.write("a").unwrap();
        b.split(true, DoubleNewline::Single, false).unwrap();
        b.write("b").unwrap();
        assert_eq!(b.chunks.len(), 2);
        assert_eq!(b.chunks[0].text, "a");
        assert!(b.chunks[0].split.is_some());
        assert_eq!(b.chunks[1].text, "b");
        assert!(b.chunks[1].split.is_none());
    }

    #[test]
    fn ambiguous_whitespace_must_be_resolved_before_flushing() {
        let mut b = ChunkBuilder::new(0);
        b.write("a").unwrap();
        b.write_whitespace(PendingWhitespace::SpaceOrNewline);
        let err = b.write("b");
        assert!(err.is_err());
    }

    #[test]
    fn preserve_newlines_resolves_ambiguous_whitespace() {
        let mut b = ChunkBuilder::new(0);
        b.write("a").unwrap();
        b.write_whitespace(PendingWhitespace::SpaceOrNewline);
        b.preserve_newlines(1);
        b.write("b").unwrap();
        assert_eq!(b.chunks[0].text, "a");
        assert!(b.chunks[0].split.is_some());
    }

    #[test]
    fn a_hard_split_hardens_every_rule_wrapping_it() {
        let mut b = ChunkBuilder::new(0);
        let r = b.add_rule(Box::new(layout_rules::SimpleRule::default()));
        b.start_rule(Some(r));
        b.write("a").unwrap();
        let eof = b.add_rule(Box::new(HardRule));
        b.apply_split(eof, None, false, DoubleNewline::Single, false).unwrap();
        b.end_rule();
        assert!(b.shared.rules.borrow().is_hardened(r));
    }

    #[test]
    fn lazy_rule_activates_only_after_whitespace_is_emitted() {
        let mut b = ChunkBuilder::new(0);
        let root = b.rule_stack[0];
        let r = b.add_rule(Box::new(layout_rules::SimpleRule::default()));
        b.start_lazy_rule(Some(r));
        assert_eq!(b.rule_stack.last().copied(), Some(root));
        b.write_whitespace(PendingWhitespace::Space);
        b.write("x").unwrap();
        assert_eq!(b.rule_stack.last().copied(), Some(r));
    }

    #[test]
    fn start_block_and_end_block_round_trip_chunks_into_the_parent() {
        let mut parent = ChunkBuilder::new(0);
        parent.write("(").unwrap();
        let enclosing = parent.add_rule(Box::new(PositionalRule::default()));
        let mut child = parent.start_block(Some(enclosing));
        child.write("inner").unwrap();
        parent = child.end_block(None, false);
        let slot = &parent.chunks[parent.chunks.len() - 2];
        assert_eq!(slot.block_chunks.len(), 1);
        assert_eq!(slot.block_chunks[0].text, "inner");
    }

    #[test]
    fn end_block_with_force_split_hardens_the_enclosing_rule() {
        let mut parent = ChunkBuilder::new(0);
        parent.write("(").unwrap();
        let enclosing = parent.add_rule(Box::new(layout_rules::SimpleRule::default()));
        let child = parent.start_block(Some(enclosing));
        parent = child.end_block(None, true);
        assert!(parent.shared.rules.borrow().is_hardened(enclosing));
    }

    #[test]
    fn end_block_ignores_the_named_delimiter_split_when_scanning_for_hard_splits() {
        let mut parent = ChunkBuilder::new(0);
        parent.write("(").unwrap();
        let enclosing = parent.add_rule(Box::new(layout_rules::SimpleRule::default()));
        let mut child = parent.start_block(Some(enclosing));
        child.write("inner").unwrap();

        // Hand-install a chunk whose split is hardened independently of
        // `enclosing`, standing in for the block's own delimiter split
        // (e.g. the one right before a closing bracket) that is always
        // hard regardless of whether the block's content needed to
        // split.
        let delimiter_rule = child.add_rule(Box::new(layout_rules::SimpleRule::default()));
        child.shared.rules.borrow_mut().harden(delimiter_rule);
        child.chunks.last_mut().unwrap().split = Some(SplitInfo {
            rule: delimiter_rule,
            rule_local_index: 0,
            indent: 0,
            nesting: None,
            flush_left: false,
            is_double: DoubleNewline::Single,
            space_when_unsplit: false,
        });
        child.push_chunk();
        let delimiter = child.last_split_chunk_index();

        parent = child.end_block(Some(delimiter), false);
        assert!(!parent.shared.rules.borrow().is_hardened(enclosing));
    }

    #[test]
    fn end_block_without_ignored_split_still_forces_on_an_unrelated_hard_chunk() {
        let mut parent = ChunkBuilder::new(0);
        parent.write("(").unwrap();
        let enclosing = parent.add_rule(Box::new(layout_rules::SimpleRule::default()));
        let mut child = parent.start_block(Some(enclosing));
        child.write("inner").unwrap();

        let delimiter_rule = child.add_rule(Box::new(layout_rules::SimpleRule::default()));
        child.shared.rules.borrow_mut().harden(delimiter_rule);
        child.chunks.last_mut().unwrap().split = Some(SplitInfo {
            rule: delimiter_rule,
            rule_local_index: 0,
            indent: 0,
            nesting: None,
            flush_left: false,
            is_double: DoubleNewline::Single,
            space_when_unsplit: false,
        });
        child.push_chunk();

        parent = child.end_block(None, false);
        assert!(parent.shared.rules.borrow().is_hardened(enclosing));
    }

    #[test]
    fn write_comments_attaches_trailing_line_comment_with_one_space() {
        let mut b = ChunkBuilder::new(0);
        b.write("let x = 1;").unwrap();
        b.write_comments(vec![SourceComment::line("// note", 0)], 1, "")
            .unwrap();
        assert_eq!(b.chunks[0].text, "let x = 1; // note");
    }

    #[test]
    fn write_comments_emits_own_lines_for_comments_with_lines_before() {
        let mut b = ChunkBuilder::new(0);
        b.write("a").unwrap();
        b.write_comments(vec![SourceComment::line("// c", 1)], 1, "b")
            .unwrap();
        b.write("b").unwrap();
        assert_eq!(b.chunks.len(), 3);
        assert_eq!(b.chunks[0].text, "a");
        assert_eq!(b.chunks[1].text, "// c");
        assert_eq!(b.chunks[2].text, "b");
    }

    #[test]
    fn write_comments_separates_same_line_comment_and_next_token_with_a_space() {
        let mut b = ChunkBuilder::new(0);
        b.write("a").unwrap();
        b.write_comments(vec![SourceComment::block("/* x */", 0)], 0, "b")
            .unwrap();
        b.write("b").unwrap();
        assert_eq!(b.chunks[0].text, "a /* x */ b");
    }

    #[test]
    fn write_comments_with_no_comments_just_preserves_newlines() {
        let mut b = ChunkBuilder::new(0);
        b.write("a").unwrap();
        b.write_comments(vec![], 1, "b").unwrap();
        b.write("b").unwrap();
        assert_eq!(b.chunks.len(), 2);
        assert_eq!(b.chunks[0].text, "a");
        assert_eq!(b.chunks[1].text, "b");
    }

    #[test]
    fn divide_pass_marks_hardened_block_level_splits_with_no_later_owner() {
        let mut b = ChunkBuilder::new(0);
        b.write("stmt1;").unwrap();
        let eof = b.add_rule(Box::new(HardRule));
        b.apply_split(eof, None, false, DoubleNewline::Single, false).unwrap();
        b.write("stmt2;").unwrap();
        b.run_divide_pass();
        assert!(b.chunks[0].divide_marker);
    }
}
