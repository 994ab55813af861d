//! The facade crate: wires the rule graph, chunk builder, and solver
//! together behind a [`Formatter`], owns [`Config`], defines the
//! [`VisitorSink`] trait that is the "event interface" an external
//! syntax-tree visitor is driven through, and owns the top-level
//! error type.
//!
//! This crate has no parser or lexer of its own, so the only way to
//! drive a [`Formatter`] is through [`VisitorSink`], exactly as a real
//! visitor would.

pub mod config;
pub mod error;
pub mod formatter;
pub mod sink;

pub use config::Config;
pub use error::LayoutError;
pub use formatter::{FormatResult, Formatter};
pub use sink::VisitorSink;

pub use layout_chunks::{DoubleNewline, PendingWhitespace, SourceComment};
pub use layout_rules::{
    AssignmentRule, CombinatorRule, HardRule, NamedRule, PositionalRule, RuleBehavior, RuleId, SimpleRule,
};
