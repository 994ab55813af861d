//! The rule graph arena: containment edges, hardening, and the
//! transitive-hardening worklist.

use crate::rule::RuleBehavior;
use crate::RuleId;
use std::collections::HashSet;

/// Arena holding every rule installed while building one document (or
/// one nested block), plus the `contain` edges and hardened-state bits
/// that make rules constrain one another.
///
/// Representing rules by integer handle into a flat arena (rather than
/// as owning references to each other) avoids any ownership cycle
/// while still letting `contain`/`constrain` express arbitrary graphs.
#[derive(Debug, Default)]
pub struct RuleGraph {
    rules: Vec<Box<dyn RuleBehavior>>,
    /// `contains[outer.index()]` is every `inner` rule `outer` wraps.
    contains: Vec<Vec<RuleId>>,
    hardened: Vec<bool>,
    owned_counts: Vec<usize>,
}

impl RuleGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a new rule and return its handle.
    pub fn add_rule(&mut self, behavior: Box<dyn RuleBehavior>) -> RuleId {
        let id = RuleId(self.rules.len());
        self.rules.push(behavior);
        self.contains.push(Vec::new());
        self.hardened.push(false);
        self.owned_counts.push(0);
        id
    }

    pub fn rule(&self, id: RuleId) -> &dyn RuleBehavior {
        self.rules[id.0].as_ref()
    }

    /// Record that `outer` wraps `inner`, giving `outer` the
    /// opportunity to constrain `inner`'s value during hardening and
    /// solving.
    pub fn contain(&mut self, outer: RuleId, inner: RuleId) {
        if outer == inner {
            return;
        }
        let edges = &mut self.contains[outer.0];
        if !edges.contains(&inner) {
            edges.push(inner);
        }
    }

    pub fn contained_by(&self, outer: RuleId) -> &[RuleId] {
        &self.contains[outer.0]
    }

    /// Claim the next rule-local split index owned by `id`, growing its
    /// owned-split count. Returns the index assigned to this split.
    pub fn register_split(&mut self, id: RuleId) -> usize {
        let count = &mut self.owned_counts[id.0];
        let index = *count;
        *count += 1;
        index
    }

    pub fn owned_count(&self, id: RuleId) -> usize {
        self.owned_counts[id.0]
    }

    pub fn is_hardened(&self, id: RuleId) -> bool {
        self.hardened[id.0]
    }

    /// True if `id`'s owned splits are guaranteed to fire regardless of
    /// the solver's search: either it was explicitly hardened, or it
    /// was never ambiguous to begin with (a plain [`crate::rule::HardRule`]
    /// reports a single value without ever being hardened). Divide
    /// markers and block-forcing decisions key off this, not
    /// [`Self::is_hardened`] alone, since the latter misses the second
    /// case.
    pub fn is_determined(&self, id: RuleId) -> bool {
        self.value_count(id) <= 1
    }

    /// Number of values `id` can currently be assigned. Hardened rules
    /// always report `1` - their only legal value is their fully-split
    /// value, since hardening replaces a rule's value set with the
    /// singleton `{fully_split_value}`.
    pub fn value_count(&self, id: RuleId) -> usize {
        if self.hardened[id.0] {
            1
        } else {
            self.rule(id).value_count(self.owned_counts[id.0])
        }
    }

    pub fn fully_split_value(&self, id: RuleId) -> usize {
        self.rule(id).fully_split_value(self.owned_counts[id.0])
    }

    /// Translate a solver-visible value index into the rule's actual
    /// value space. For hardened rules the only visible index (`0`)
    /// maps to the fully-split value.
    pub fn effective_value(&self, id: RuleId, value_index: usize) -> usize {
        if self.hardened[id.0] {
            self.fully_split_value(id)
        } else {
            value_index
        }
    }

    pub fn is_split_at_value(&self, id: RuleId, owned_index: usize, value: usize) -> bool {
        self.rule(id)
            .is_split_at_value(owned_index, value, self.owned_counts[id.0])
    }

    pub fn cost(&self, id: RuleId) -> i32 {
        self.rule(id).cost()
    }

    /// Harden a single rule. Returns `false` if it was already
    /// hardened (a no-op the caller should not propagate from again).
    pub fn harden(&mut self, id: RuleId) -> bool {
        if self.hardened[id.0] {
            return false;
        }
        self.hardened[id.0] = true;
        tracing::debug!(target: "rules", rule = self.rule(id).name(), id = id.0, "hardened");
        true
    }

    /// Harden `id` and then harden every rule transitively forced to
    /// its own fully-split value as a consequence.
    ///
    /// Worklist traversal over `contain` edges; each rule is hardened
    /// at most once, which is what guarantees termination even though
    /// `contain` edges may form cycles.
    pub fn harden_transitive(&mut self, id: RuleId) {
        let mut worklist = vec![id];
        let mut visited = HashSet::new();
        while let Some(r) = worklist.pop() {
            if !visited.insert(r) {
                continue;
            }
            if !self.harden(r) {
                continue;
            }
            if !self.rule(r).splits_on_inner_rules() {
                continue;
            }
            let full = self.fully_split_value(r);
            let owned = self.owned_counts[r.0];
            let inner_ids = self.contains[r.0].clone();
            for inner in inner_ids {
                if self.hardened[inner.0] {
                    continue;
                }
                let inner_full = self.fully_split_value(inner);
                let forced = self.rule(r).constrain(full, owned, inner_full);
                if forced == Some(inner_full) {
                    worklist.push(inner);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{HardRule, PositionalRule, SimpleRule};

    #[test]
    fn harden_is_idempotent() {
        let mut g = RuleGraph::new();
        let r = g.add_rule(Box::new(SimpleRule::default()));
        assert!(g.harden(r));
        assert!(!g.harden(r));
        assert_eq!(g.value_count(r), 1);
    }

    #[test]
    fn transitive_hardening_propagates_through_contain() {
        let mut g = RuleGraph::new();
        let outer = g.add_rule(Box::new(HardRule));
        let inner = g.add_rule(Box::new(PositionalRule::default()));
        g.register_split(inner);
        g.register_split(inner);
        g.contain(outer, inner);

        g.harden_transitive(outer);

        assert!(g.is_hardened(outer));
        assert!(g.is_hardened(inner));
        // Inner's only remaining value is its fully-split value, and
        // every owned split fires at it.
        assert_eq!(g.value_count(inner), 1);
        let full = g.fully_split_value(inner);
        assert!(g.is_split_at_value(inner, 0, full));
        assert!(g.is_split_at_value(inner, 1, full));
    }

    #[test]
    fn hardening_does_not_propagate_through_unrelated_rules() {
        let mut g = RuleGraph::new();
        let outer = g.add_rule(Box::new(HardRule));
        let unrelated = g.add_rule(Box::new(SimpleRule::default()));
        g.harden_transitive(outer);
        assert!(!g.is_hardened(unrelated));
    }
}
