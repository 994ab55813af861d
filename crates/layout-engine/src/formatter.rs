//! The `Formatter` facade: owns a [`ChunkBuilder`], exposes its
//! operations as inherent methods (and as [`VisitorSink`]), and runs
//! the divide pass + solver at `end()` to produce the output record.

use layout_chunks::{ChunkBuilder, DoubleNewline, PendingWhitespace, SourceComment};
use layout_rules::{RuleBehavior, RuleId};

use crate::config::Config;
use crate::error::LayoutError;
use crate::sink::VisitorSink;

/// Output record: `{text, uri?, is_compilation_unit, selection_start?,
/// selection_length?}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatResult {
    pub text: String,
    pub uri: Option<String>,
    pub is_compilation_unit: bool,
    pub selection_start: Option<usize>,
    pub selection_length: Option<usize>,
}

pub struct Formatter {
    builder: Option<ChunkBuilder>,
    config: Config,
    uri: Option<String>,
    block_depth: usize,
}

impl Formatter {
    pub fn new(config: Config) -> Self {
        Self {
            builder: Some(ChunkBuilder::new(config.indent)),
            config,
            uri: None,
            block_depth: 0,
        }
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    fn builder_mut(&mut self) -> &mut ChunkBuilder {
        self.builder
            .as_mut()
            .expect("builder taken and not yet restored")
    }

    /// Install a new rule in the engine's rule graph without activating
    /// it, returning the handle for use with [`Self::start_rule`]/
    /// [`Self::start_lazy_rule`]/[`Self::start_block`].
    pub fn add_rule(&mut self, behavior: Box<dyn RuleBehavior>) -> RuleId {
        self.builder_mut().add_rule(behavior)
    }

    /// Finish formatting: emit a trailing hard split, run the divide
    /// pass, solve every partition, and render physical lines. Fails
    /// if a `start_block` was never matched by an `end_block` rather
    /// than letting the unbalanced scope panic through from the
    /// builder - a programmer error, surfaced as a typed error instead
    /// of an opaque abort.
    pub fn end(mut self) -> Result<FormatResult, LayoutError> {
        if self.block_depth != 0 {
            return Err(LayoutError::UnbalancedBlocks {
                depth: self.block_depth,
            });
        }
        let builder = self.builder.take().expect("builder taken and not yet restored");
        let build = builder.end()?;
        let solved = layout_solver::solve(&build, self.config.page_width);
        Ok(FormatResult {
            text: solved.text,
            uri: self.uri,
            is_compilation_unit: self.config.is_compilation_unit,
            selection_start: solved.selection_start,
            selection_length: solved.selection_length,
        })
    }
}

impl VisitorSink for Formatter {
    fn write(&mut self, text: &str) -> Result<(), LayoutError> {
        self.builder_mut().write(text).map_err(Into::into)
    }

    fn write_whitespace(&mut self, kind: PendingWhitespace) {
        self.builder_mut().write_whitespace(kind);
    }

    fn split(
        &mut self,
        space_when_unsplit: bool,
        is_double: DoubleNewline,
        flush_left: bool,
    ) -> Result<(), LayoutError> {
        self.builder_mut()
            .split(space_when_unsplit, is_double, flush_left)
            .map_err(Into::into)
    }

    fn block_split(&mut self, space_when_unsplit: bool, is_double: DoubleNewline) -> Result<(), LayoutError> {
        self.builder_mut()
            .block_split(space_when_unsplit, is_double)
            .map_err(Into::into)
    }

    fn write_comments(
        &mut self,
        comments: Vec<SourceComment>,
        lines_before_token: usize,
        next_token: &str,
    ) -> Result<(), LayoutError> {
        self.builder_mut()
            .write_comments(comments, lines_before_token, next_token)
            .map_err(Into::into)
    }

    fn preserve_newlines(&mut self, n: usize) {
        self.builder_mut().preserve_newlines(n);
    }

    fn indent(&mut self, amount: Option<usize>) {
        self.builder_mut().indent(amount);
    }

    fn unindent(&mut self) {
        self.builder_mut().unindent();
    }

    fn nest_expression(&mut self, indent: Option<usize>, now: bool) {
        self.builder_mut().nest_expression(indent, now);
    }

    fn unnest(&mut self) {
        self.builder_mut().unnest();
    }

    fn start_rule(&mut self, rule: Option<RuleId>) -> RuleId {
        self.builder_mut().start_rule(rule)
    }

    fn end_rule(&mut self) {
        self.builder_mut().end_rule();
    }

    fn start_lazy_rule(&mut self, rule: Option<RuleId>) -> RuleId {
        self.builder_mut().start_lazy_rule(rule)
    }

    fn force_rules(&mut self) {
        self.builder_mut().force_rules();
    }

    fn start_span(&mut self, cost: Option<i32>) {
        self.builder_mut().start_span(cost);
    }

    fn end_span(&mut self) {
        self.builder_mut().end_span();
    }

    fn start_block_argument_nesting(&mut self) {
        self.builder_mut().start_block_argument_nesting();
    }

    fn end_block_argument_nesting(&mut self) {
        self.builder_mut().end_block_argument_nesting();
    }

    fn start_block(&mut self, enclosing_rule: Option<RuleId>) {
        let builder = self.builder.take().expect("builder taken and not yet restored");
        self.builder = Some(builder.start_block(enclosing_rule));
        self.block_depth += 1;
    }

    fn end_block(&mut self, ignored_split: Option<usize>, force_split: bool) {
        let builder = self.builder.take().expect("builder taken and not yet restored");
        self.builder = Some(builder.end_block(ignored_split, force_split));
        self.block_depth = self
            .block_depth
            .checked_sub(1)
            .expect("end_block without matching start_block");
    }

    fn start_selection_from_end(&mut self, offset_from_end: usize) {
        self.builder_mut().start_selection_from_end(offset_from_end);
    }

    fn end_selection_from_end(&mut self, offset_from_end: usize) {
        self.builder_mut().end_selection_from_end(offset_from_end);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsplit_call_renders_on_one_line() {
        let mut f = Formatter::new(Config::default());
        f.write("foo(").unwrap();
        f.split(false, DoubleNewline::Single, false).unwrap();
        f.write("a, b").unwrap();
        f.split(false, DoubleNewline::Single, false).unwrap();
        f.write(")").unwrap();
        let result = f.end().unwrap();
        assert_eq!(result.text, "foo(a, b)\n");
        assert!(result.is_compilation_unit);
    }

    #[test]
    fn unclosed_block_is_a_typed_error_not_a_panic() {
        let mut f = Formatter::new(Config::default());
        f.write("foo(").unwrap();
        f.start_block(None);
        let err = f.end();
        assert!(matches!(err, Err(LayoutError::UnbalancedBlocks { depth: 1 })));
    }

    #[test]
    fn with_uri_is_carried_into_the_result() {
        let f = Formatter::new(Config::default()).with_uri("file:///a.dart");
        let result = f.end().unwrap();
        assert_eq!(result.uri.as_deref(), Some("file:///a.dart"));
    }
}
