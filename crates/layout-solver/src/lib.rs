//! The line writer / splitter: turns a solved
//! [`layout_chunks::BuildOutput`] into physical output text.
//!
//! Partitioning by divide marker keeps the exhaustive per-partition
//! search over a small number of live rules at a time; nested blocks
//! are measured with their cached `unsplit_block_length` first and
//! only recursed into for real once they're known not to fit on the
//! current line.

mod emit;
mod nesting_offset;
mod partition;
mod search;
mod width;

pub use emit::ResolvedSelection;
pub use partition::partition_bounds;
pub use search::{best_assignment, collect_live_rules, Assignment};

use layout_chunks::BuildOutput;

/// The finished rendering of one document (the output record, minus
/// the `uri`/`is_compilation_unit` fields the facade crate adds).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solved {
    pub text: String,
    pub selection_start: Option<usize>,
    pub selection_length: Option<usize>,
}

pub fn solve(build: &BuildOutput, page_width: usize) -> Solved {
    let out = emit::run(&build.chunks, &build.rules, &build.nesting, &build.spans, page_width);
    let selection_length = match (out.selection.start, out.selection.end) {
        (Some(s), Some(e)) => Some(e.saturating_sub(s)),
        _ => None,
    };
    Solved {
        text: out.text,
        selection_start: out.selection.start,
        selection_length,
    }
}
