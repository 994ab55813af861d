//! The "programmer error" class: unbalanced rule/span/nesting scopes,
//! selection marks on a non-existent chunk, and emitting an ambiguous
//! pending whitespace without a prior `preserve_newlines`. These are
//! bugs in the visitor driving the engine, not recoverable formatting
//! failures - callers should let them propagate and stop, not paper
//! over them with a fallback.
//! Budget exhaustion is deliberately absent here: it's a soft cost
//! folded into the solver, never an error.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error(transparent)]
    Builder(#[from] layout_chunks::BuilderError),

    #[error("end() called while {depth} nested block(s) were still open")]
    UnbalancedBlocks { depth: usize },
}
