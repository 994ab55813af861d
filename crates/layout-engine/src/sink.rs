//! `VisitorSink`: the event interface this crate exposes for driving
//! the layout engine - the chunk builder's operation table, restated
//! as a trait so a real syntax-tree visitor has a single surface to
//! drive.

use layout_chunks::{DoubleNewline, PendingWhitespace, SourceComment};
use layout_rules::RuleId;

use crate::error::LayoutError;

pub trait VisitorSink {
    fn write(&mut self, text: &str) -> Result<(), LayoutError>;
    fn write_whitespace(&mut self, kind: PendingWhitespace);
    fn split(
        &mut self,
        space_when_unsplit: bool,
        is_double: DoubleNewline,
        flush_left: bool,
    ) -> Result<(), LayoutError>;
    fn block_split(&mut self, space_when_unsplit: bool, is_double: DoubleNewline) -> Result<(), LayoutError>;
    fn write_comments(
        &mut self,
        comments: Vec<SourceComment>,
        lines_before_token: usize,
        next_token: &str,
    ) -> Result<(), LayoutError>;
    fn preserve_newlines(&mut self, n: usize);
    fn indent(&mut self, amount: Option<usize>);
    fn unindent(&mut self);
    fn nest_expression(&mut self, indent: Option<usize>, now: bool);
    fn unnest(&mut self);
    fn start_rule(&mut self, rule: Option<RuleId>) -> RuleId;
    fn end_rule(&mut self);
    fn start_lazy_rule(&mut self, rule: Option<RuleId>) -> RuleId;
    fn force_rules(&mut self);
    fn start_span(&mut self, cost: Option<i32>);
    fn end_span(&mut self);
    fn start_block_argument_nesting(&mut self);
    fn end_block_argument_nesting(&mut self);
    fn start_block(&mut self, enclosing_rule: Option<RuleId>);
    fn end_block(&mut self, ignored_split: Option<usize>, force_split: bool);
    fn start_selection_from_end(&mut self, offset_from_end: usize);
    fn end_selection_from_end(&mut self, offset_from_end: usize);
}
