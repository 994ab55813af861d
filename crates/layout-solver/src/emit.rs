//! Walking a solved chunk stream and producing physical lines:
//! partitions are solved and emitted left to right, recursing into a
//! block-parent chunk's nested chunks only once it's established the
//! block can't stay on one line.

use layout_chunks::{Chunk, DoubleNewline, NestingArena, SpanArena};
use layout_rules::RuleGraph;

use crate::nesting_offset;
use crate::partition::partition_bounds;
use crate::search::{best_assignment, collect_live_rules, effective_value};
use crate::width::advance_column;

/// Selection offsets resolved against the final output text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolvedSelection {
    pub start: Option<usize>,
    pub end: Option<usize>,
}

pub struct Output {
    pub text: String,
    column: usize,
    pub selection: ResolvedSelection,
}

impl Output {
    fn new() -> Self {
        Self {
            text: String::new(),
            column: 0,
            selection: ResolvedSelection::default(),
        }
    }

    fn write_chunk_text(&mut self, chunk: &Chunk) {
        let base = self.text.len();
        self.text.push_str(&chunk.text);
        self.column = advance_column(self.column, &chunk.text);
        if let Some(s) = chunk.selection.start {
            self.selection.start = Some(base + s);
        }
        if let Some(e) = chunk.selection.end {
            self.selection.end = Some(base + e);
        }
    }

    fn write_space(&mut self) {
        self.text.push(' ');
        self.column += 1;
    }

    fn newline(&mut self, is_double: DoubleNewline) {
        self.text.push('\n');
        if is_double == DoubleNewline::Double {
            self.text.push('\n');
        }
        self.column = 0;
    }

    fn indent_to(&mut self, col: usize, flush_left: bool) {
        if flush_left {
            self.column = 0;
            return;
        }
        for _ in 0..col {
            self.text.push(' ');
        }
        self.column = col;
    }
}

/// Base per-level width fed to [`layout_chunks::NestingArena::assign_offsets`]
/// when a split's nesting frame didn't name an explicit indent.
const BASE_NESTING_STEP: usize = 2;

pub fn solve_and_emit(
    chunks: &[Chunk],
    rules: &RuleGraph,
    nesting: &NestingArena,
    spans: &SpanArena,
    page_width: usize,
    out: &mut Output,
) {
    for range in partition_bounds(chunks) {
        let live = collect_live_rules(chunks, range.clone(), rules);
        let assignment = best_assignment(chunks, range.clone(), &live, rules, spans, page_width, out.column);

        for chunk in &chunks[range.clone()] {
            out.write_chunk_text(chunk);

            if chunk.is_block_parent() {
                let fits_unsplit = out.column + chunk.unsplit_block_length <= page_width;
                let internally_forced = chunk.block_chunks.iter().any(|c| c.is_hard_split(rules));
                if fits_unsplit && !internally_forced {
                    for inner in &chunk.block_chunks {
                        out.write_chunk_text(inner);
                        if let Some(split) = &inner.split {
                            if split.space_when_unsplit {
                                out.write_space();
                            }
                        }
                    }
                } else {
                    solve_and_emit(&chunk.block_chunks, rules, nesting, spans, page_width, out);
                }
            }

            if let Some(split) = &chunk.split {
                let value = effective_value(split.rule, &assignment, rules);
                let fires = rules.is_split_at_value(split.rule, split.rule_local_index, value);
                if fires {
                    out.newline(split.is_double);
                    let col = if split.flush_left {
                        0
                    } else {
                        split.indent
                            + split
                                .nesting
                                .map(|id| nesting_offset::resolve(id, nesting, BASE_NESTING_STEP))
                                .unwrap_or(0)
                    };
                    out.indent_to(col, split.flush_left);
                } else if split.space_when_unsplit {
                    out.write_space();
                }
            }
        }
    }
}

pub fn run(chunks: &[Chunk], rules: &RuleGraph, nesting: &NestingArena, spans: &SpanArena, page_width: usize) -> Output {
    let mut out = Output::new();
    solve_and_emit(chunks, rules, nesting, spans, page_width, &mut out);
    out
}
