//! Resolving a split's expression-nesting offset: the extra indent
//! contributed by the chain of nesting frames active at that split,
//! assigned via [`layout_chunks::NestingArena::assign_offsets`]'s
//! stable sort by depth rather than a running mutable counter.

use layout_chunks::{NestingArena, NestingId};

pub fn resolve(id: NestingId, nesting: &NestingArena, base_step: usize) -> usize {
    let chain = nesting.chain(id);
    nesting
        .assign_offsets(&chain, base_step)
        .into_iter()
        .find(|(n, _)| *n == id)
        .map(|(_, offset)| offset)
        .unwrap_or(0)
}
