//! Expression-nesting tree.
//!
//! An expression-nesting frame is a node holding a parent, an indent
//! contribution, and a monotonic depth. It is distinct from block
//! (statement) indentation: a chunk's split may carry `nesting = None`
//! meaning "block-level" (no expression nesting active), or `Some(id)`
//! pointing into this arena.

/// Handle into a [`NestingArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NestingId(usize);

#[derive(Debug, Clone, Copy)]
struct NestingNode {
    parent: Option<NestingId>,
    indent: usize,
    depth: usize,
}

/// Arena of nesting frames shared by a document's whole builder tree
/// (root builder and every nested block builder), so nesting depth
/// comparisons remain meaningful across block boundaries.
#[derive(Debug, Default)]
pub struct NestingArena {
    nodes: Vec<NestingNode>,
}

impl NestingArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a new nesting frame below `parent` (`None` means the new
    /// frame nests directly under statement-level) with the given
    /// per-level indent contribution.
    pub fn push(&mut self, parent: Option<NestingId>, indent: usize) -> NestingId {
        let depth = parent.map(|p| self.nodes[p.0].depth + 1).unwrap_or(1);
        let id = NestingId(self.nodes.len());
        self.nodes.push(NestingNode {
            parent,
            indent,
            depth,
        });
        id
    }

    pub fn parent(&self, id: NestingId) -> Option<NestingId> {
        self.nodes[id.0].parent
    }

    pub fn indent(&self, id: NestingId) -> usize {
        self.nodes[id.0].indent
    }

    pub fn depth(&self, id: NestingId) -> usize {
        self.nodes[id.0].depth
    }

    /// Every frame from `id` up to (but not including) statement-level,
    /// ordered from outermost to innermost.
    pub fn chain(&self, id: NestingId) -> Vec<NestingId> {
        let mut chain = Vec::new();
        let mut cur = Some(id);
        while let Some(n) = cur {
            chain.push(n);
            cur = self.nodes[n.0].parent;
        }
        chain.reverse();
        chain
    }

    /// True if `ancestor` is `descendant` or an ancestor of it.
    pub fn is_ancestor_or_self(&self, ancestor: NestingId, descendant: NestingId) -> bool {
        let mut cur = Some(descendant);
        while let Some(n) = cur {
            if n == ancestor {
                return true;
            }
            cur = self.nodes[n.0].parent;
        }
        false
    }

    /// Assign each nesting level active at a single physical line a
    /// unique indent offset, deepest-last: a stable sort by depth, then
    /// consecutive offsets, rather than a mutable global counter.
    /// `base_step` is the per-level indent width used when a frame
    /// didn't specify an explicit indent via `nest_expression(indent)`.
    pub fn assign_offsets(&self, active: &[NestingId], base_step: usize) -> Vec<(NestingId, usize)> {
        let mut sorted: Vec<NestingId> = active.to_vec();
        sorted.sort_by_key(|id| self.depth(*id));
        sorted.dedup();
        let mut offsets = Vec::with_capacity(sorted.len());
        let mut running = 0usize;
        for id in sorted {
            let step = if self.nodes[id.0].indent == 0 {
                base_step
            } else {
                self.nodes[id.0].indent
            };
            running += step;
            offsets.push((id, running));
        }
        offsets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_increases_with_nesting() {
        let mut a = NestingArena::new();
        let root = a.push(None, 2);
        let child = a.push(Some(root), 2);
        assert_eq!(a.depth(root), 1);
        assert_eq!(a.depth(child), 2);
        assert!(a.is_ancestor_or_self(root, child));
        assert!(!a.is_ancestor_or_self(child, root));
    }

    #[test]
    fn offsets_are_monotonic_by_depth() {
        let mut a = NestingArena::new();
        let root = a.push(None, 2);
        let child = a.push(Some(root), 2);
        let grandchild = a.push(Some(child), 2);
        let offsets = a.assign_offsets(&[grandchild, root, child], 2);
        let by_id = |id: NestingId| offsets.iter().find(|(n, _)| *n == id).unwrap().1;
        assert!(by_id(root) < by_id(child));
        assert!(by_id(child) < by_id(grandchild));
    }
}
