//! Concrete rule variants.
//!
//! `RuleBehavior` is a polymorphic capability set: a small interface
//! with a fixed method table rather than a deep inheritance hierarchy.
//! Each concrete type below installs the formatting policy for one
//! syntactic construct.
use std::fmt;

/// Capability set every rule variant implements.
///
/// `owned_count` is threaded into every method instead of being stored
/// on `self` because a rule's owned-split count is only known once the
/// chunk builder has finished registering every split it owns (an
/// argument list's arity, for instance, isn't known until the last
/// argument has been written) - see [`crate::graph::RuleGraph::register_split`].
pub trait RuleBehavior: fmt::Debug {
    /// The value that represents "every owned split fires".
    fn fully_split_value(&self, owned_count: usize) -> usize;

    /// Number of distinct values this rule can take, given it currently
    /// owns `owned_count` splits. Default: `fully_split_value + 1`,
    /// i.e. values `0..=fully_split_value`.
    fn value_count(&self, owned_count: usize) -> usize {
        self.fully_split_value(owned_count) + 1
    }

    /// Base cost added once to the total if any owned split fires.
    fn cost(&self) -> i32 {
        0
    }

    /// Whether a hard split occurring on one of this rule's chunks
    /// should add this rule to the builder's hard-split set. Almost
    /// always true; rules that don't actually gate any splits of their
    /// own (rare) can opt out.
    fn splits_on_inner_rules(&self) -> bool {
        true
    }

    /// Does the split owned at rule-local position `owned_index` fire
    /// when this rule is assigned `value`?
    fn is_split_at_value(&self, owned_index: usize, value: usize, owned_count: usize) -> bool;

    /// When this rule is assigned `my_value`, what value (if any) is a
    /// contained rule forced to take?
    ///
    /// The default policy is the worklist condition transitive
    /// hardening uses: once a rule commits to its own fully-split
    /// value, everything it contains is forced fully split too (e.g.
    /// "if positional arguments split, named arguments must split
    /// too"). Variants that need a different policy override this.
    fn constrain(&self, my_value: usize, owned_count: usize, other_fully_split: usize) -> Option<usize> {
        if my_value == self.fully_split_value(owned_count) {
            Some(other_fully_split)
        } else {
            None
        }
    }

    /// Short, stable name used in diagnostics and `Debug` output.
    fn name(&self) -> &'static str;
}

/// Always splits. One value, always fires: the "hard split" rule
/// behind forced line breaks (statement terminators, block bodies).
#[derive(Debug, Default)]
pub struct HardRule;

impl RuleBehavior for HardRule {
    fn fully_split_value(&self, _owned_count: usize) -> usize {
        0
    }

    fn value_count(&self, _owned_count: usize) -> usize {
        1
    }

    fn is_split_at_value(&self, _owned_index: usize, _value: usize, _owned_count: usize) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "hard"
    }
}

/// Two values: `0` (unsplit) or `1` (split). All splits owned by the
/// rule fire together - the basic binary "Simple" rule.
#[derive(Debug)]
pub struct SimpleRule {
    pub cost: i32,
}

impl SimpleRule {
    pub fn new(cost: i32) -> Self {
        Self { cost }
    }
}

impl Default for SimpleRule {
    fn default() -> Self {
        Self::new(0)
    }
}

impl RuleBehavior for SimpleRule {
    fn fully_split_value(&self, _owned_count: usize) -> usize {
        1
    }

    fn cost(&self) -> i32 {
        self.cost
    }

    fn is_split_at_value(&self, _owned_index: usize, value: usize, _owned_count: usize) -> bool {
        value == 1
    }

    fn name(&self) -> &'static str {
        "simple"
    }
}

/// Argument-list rule, for constructs like positional call arguments.
///
/// Owns one split per argument gap. Value `0` keeps every argument on
/// the current line; value `v` (`1..=owned_count`) splits only the
/// trailing `v` gaps, so a call whose last argument is a closure or
/// collection literal can hang that one argument onto its own
/// indented block without forcing every earlier argument onto its own
/// line too. Value `owned_count` is "fully split": every gap breaks.
#[derive(Debug)]
pub struct PositionalRule {
    pub cost: i32,
}

impl PositionalRule {
    pub fn new(cost: i32) -> Self {
        Self { cost }
    }
}

impl Default for PositionalRule {
    fn default() -> Self {
        Self::new(1)
    }
}

impl RuleBehavior for PositionalRule {
    fn fully_split_value(&self, owned_count: usize) -> usize {
        owned_count
    }

    fn cost(&self) -> i32 {
        self.cost
    }

    fn is_split_at_value(&self, owned_index: usize, value: usize, owned_count: usize) -> bool {
        if value == 0 {
            return false;
        }
        owned_index >= owned_count.saturating_sub(value)
    }

    fn name(&self) -> &'static str {
        "positional"
    }
}

/// Named-argument rule, for constructs like named/keyword call
/// arguments.
///
/// Binary like [`SimpleRule`] but kept as its own type because a
/// positional-argument rule that contains a named-argument rule forces
/// it fully split whenever the positional rule itself fully splits.
/// That policy is exactly the trait's default, so this type exists to
/// give the construct its own identity in diagnostics rather than to
/// change behavior.
#[derive(Debug)]
pub struct NamedRule {
    pub cost: i32,
}

impl NamedRule {
    pub fn new(cost: i32) -> Self {
        Self { cost }
    }
}

impl Default for NamedRule {
    fn default() -> Self {
        Self::new(0)
    }
}

impl RuleBehavior for NamedRule {
    fn fully_split_value(&self, _owned_count: usize) -> usize {
        1
    }

    fn cost(&self) -> i32 {
        self.cost
    }

    fn is_split_at_value(&self, _owned_index: usize, value: usize, _owned_count: usize) -> bool {
        value == 1
    }

    fn name(&self) -> &'static str {
        "named"
    }
}

/// Binary-operator chain rule, e.g. `a && b && c`. All-or-nothing like
/// [`SimpleRule`], but its cost is meant to be set proportional to the
/// number of operators the caller registers, discouraging splitting
/// very short chains while barely taxing long ones (the same kind of
/// locality bias spans apply at the chunk level for short method
/// chains).
#[derive(Debug)]
pub struct CombinatorRule {
    pub cost: i32,
}

impl CombinatorRule {
    pub fn new(cost: i32) -> Self {
        Self { cost }
    }
}

impl Default for CombinatorRule {
    fn default() -> Self {
        Self::new(0)
    }
}

impl RuleBehavior for CombinatorRule {
    fn fully_split_value(&self, _owned_count: usize) -> usize {
        1
    }

    fn cost(&self) -> i32 {
        self.cost
    }

    fn is_split_at_value(&self, _owned_index: usize, value: usize, _owned_count: usize) -> bool {
        value == 1
    }

    fn name(&self) -> &'static str {
        "combinator"
    }
}

/// Assignment rule, for whether a `let`/`=` right-hand side hangs on
/// the next line. Binary: `0` keeps the right-hand side on the line
/// with the `=`; `1` breaks after it.
#[derive(Debug)]
pub struct AssignmentRule {
    pub cost: i32,
}

impl AssignmentRule {
    pub fn new(cost: i32) -> Self {
        Self { cost }
    }
}

impl Default for AssignmentRule {
    fn default() -> Self {
        Self::new(0)
    }
}

impl RuleBehavior for AssignmentRule {
    fn fully_split_value(&self, _owned_count: usize) -> usize {
        1
    }

    fn cost(&self) -> i32 {
        self.cost
    }

    fn is_split_at_value(&self, _owned_index: usize, value: usize, _owned_count: usize) -> bool {
        value == 1
    }

    fn name(&self) -> &'static str {
        "assignment"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hard_rule_always_splits() {
        let r = HardRule;
        assert_eq!(r.value_count(0), 1);
        assert!(r.is_split_at_value(0, 0, 1));
    }

    #[test]
    fn simple_rule_two_values() {
        let r = SimpleRule::new(2);
        assert_eq!(r.value_count(0), 2);
        assert!(!r.is_split_at_value(0, 0, 1));
        assert!(r.is_split_at_value(0, 1, 1));
        assert_eq!(r.cost(), 2);
    }

    #[test]
    fn positional_rule_splits_trailing_gaps_first() {
        let r = PositionalRule::default();
        // Three owned gaps; value 1 should split only the last one.
        assert!(!r.is_split_at_value(0, 1, 3));
        assert!(!r.is_split_at_value(1, 1, 3));
        assert!(r.is_split_at_value(2, 1, 3));
        // Fully split: every gap fires.
        let full = r.fully_split_value(3);
        assert_eq!(full, 3);
        for i in 0..3 {
            assert!(r.is_split_at_value(i, full, 3));
        }
        // Value 0 never splits anything.
        for i in 0..3 {
            assert!(!r.is_split_at_value(i, 0, 3));
        }
    }

    #[test]
    fn constrain_default_forces_fully_split_on_fully_split() {
        let outer = PositionalRule::default();
        let inner_full = NamedRule::default().fully_split_value(0);
        assert_eq!(outer.constrain(0, 2, inner_full), None);
        assert_eq!(outer.constrain(2, 2, inner_full), Some(inner_full));
    }
}
