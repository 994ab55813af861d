//! Visitor-facing chunk building: turns a stream of
//! `write`/`split`/`start_rule`/... calls into a flat [`chunk::Chunk`]
//! vector tied to [`layout_rules::RuleId`]s, ready for the solver.
//!
//! This crate owns the expression-nesting tree, the span arena, the
//! pending-whitespace state machine and the comment-interleaving
//! algorithm; it depends on `layout-rules` for the rule algebra but has
//! no knowledge of how a partition gets turned into physical lines.

pub mod builder;
pub mod chunk;
pub mod comment;
pub mod errors;
pub mod nesting;
pub mod span;
pub mod whitespace;

pub use builder::{BuildOutput, ChunkBuilder, Shared};
pub use chunk::{Chunk, DoubleNewline, SelectionMarks, SplitInfo};
pub use comment::SourceComment;
pub use errors::BuilderError;
pub use nesting::{NestingArena, NestingId};
pub use span::{SpanArena, SpanId};
pub use whitespace::PendingWhitespace;
