//! Dividing a chunk stream into independently solvable partitions: a
//! `divide_marker` chunk is a safe boundary, so the search space for
//! the exhaustive solver never has to cover the whole chunk stream at
//! once.

use std::ops::Range;

use layout_chunks::Chunk;

/// Maximal runs of chunks bounded by (and including, as their final
/// element) a `divide_marker` chunk. The last partition runs to the
/// end of the stream even if its final chunk isn't a marker.
pub fn partition_bounds(chunks: &[Chunk]) -> Vec<Range<usize>> {
    let mut bounds = Vec::new();
    let mut start = 0;
    for (i, chunk) in chunks.iter().enumerate() {
        if chunk.divide_marker {
            bounds.push(start..i + 1);
            start = i + 1;
        }
    }
    if start < chunks.len() {
        bounds.push(start..chunks.len());
    }
    bounds
}

#[cfg(test)]
mod tests {
    use super::*;
    use layout_chunks::{Chunk, DoubleNewline, SplitInfo};
    use layout_rules::RuleGraph;

    fn hard_split(rule: layout_rules::RuleId, marker: bool) -> Chunk {
        let mut c = Chunk::empty();
        c.split = Some(SplitInfo {
            rule,
            rule_local_index: 0,
            indent: 0,
            nesting: None,
            flush_left: false,
            is_double: DoubleNewline::Single,
            space_when_unsplit: true,
        });
        c.divide_marker = marker;
        c
    }

    #[test]
    fn bounds_split_at_every_marker_and_keep_the_tail() {
        let mut rules = RuleGraph::new();
        let r = rules.add_rule(Box::new(layout_rules::HardRule));
        let chunks = vec![
            Chunk::empty(),
            hard_split(r, true),
            Chunk::empty(),
            hard_split(r, false),
            Chunk::empty(),
        ];
        let bounds = partition_bounds(&chunks);
        assert_eq!(bounds, vec![0..2, 2..5]);
    }
}
