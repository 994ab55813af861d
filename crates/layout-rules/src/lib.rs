//! The rule graph: a small algebra of split rules.
//!
//! A [`Rule`] owns a set of chunk splits and can take on one of several
//! discrete *values*; the value dictates whether its owned splits fire.
//! Rules constrain one another only through explicit [`RuleGraph::contain`]
//! edges or a [`RuleBehavior::constrain`] call returning a forced value.
//! This crate has no runtime dependency on the chunk builder or the
//! solver - it is a closed algebra over rule identities.

pub mod graph;
pub mod rule;

pub use graph::RuleGraph;
pub use rule::{
    AssignmentRule, CombinatorRule, HardRule, NamedRule, PositionalRule, RuleBehavior, SimpleRule,
};

/// Opaque handle into a [`RuleGraph`]'s arena.
///
/// Rules never reference each other directly; every relationship is
/// recorded as an edge inside the graph. This keeps the rule objects
/// themselves free of lifetimes or reference cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RuleId(pub(crate) usize);

impl RuleId {
    /// Raw arena index, exposed for callers (chunk builder) that need to
    /// use `RuleId` as a map key without pulling in this crate's
    /// `Hash`/`Ord` impls in hot loops.
    pub fn index(self) -> usize {
        self.0
    }
}
