//! The exhaustive per-partition search: enumerate every
//! combination of values for the partition's live (non-hardened)
//! rules, score each with [`evaluate`], and keep the cheapest -
//! ties broken in favor of whichever combination was generated first,
//! which (since values are tried ascending from `0`) is always the
//! least-split one.

use std::collections::{HashMap, HashSet};
use std::ops::Range;

use layout_chunks::{Chunk, SpanArena};
use layout_rules::{RuleGraph, RuleId};

use crate::width::advance_column;

/// Above this many live rules in one partition, an exhaustive search
/// over the cartesian product of their value sets is no longer cheap
/// enough to be worth it; fall back to the fully-split assignment.
/// Divide markers are supposed to keep partitions well under this, so
/// hitting it at all is a sign of an unusually rule-dense partition.
const MAX_LIVE_RULES_FOR_EXHAUSTIVE_SEARCH: usize = 12;

/// Above this many total (rule, value) combinations in one partition,
/// fall back the same way. Bounding only on rule *count* misses a
/// single positional-style rule whose owned-split count (hence value
/// count) scales with the size of a flat argument list or collection
/// literal: a 10,000-element literal is one live rule but ~10,000
/// values, which would otherwise make the search quadratic in the
/// partition length instead of near-linear.
const MAX_SEARCH_STATE_SPACE: usize = 4_096;

/// Cost (in the same units as [`layout_rules::RuleBehavior::cost`]) of
/// a single column of line overflow. Large enough that the search
/// always prefers fitting the page width over any other consideration.
const OVERFLOW_PENALTY: i64 = 1_000;

pub type Assignment = HashMap<RuleId, usize>;

pub fn collect_live_rules(chunks: &[Chunk], range: Range<usize>, rules: &RuleGraph) -> Vec<RuleId> {
    let mut seen = HashSet::new();
    let mut order = Vec::new();
    for chunk in &chunks[range] {
        if let Some(split) = &chunk.split {
            if rules.value_count(split.rule) > 1 && seen.insert(split.rule) {
                order.push(split.rule);
            }
        }
    }
    order
}

pub fn effective_value(rule: RuleId, assignment: &Assignment, rules: &RuleGraph) -> usize {
    let raw = assignment.get(&rule).copied().unwrap_or(0);
    rules.effective_value(rule, raw)
}

#[allow(clippy::too_many_arguments)]
pub fn best_assignment(
    chunks: &[Chunk],
    range: Range<usize>,
    live: &[RuleId],
    rules: &RuleGraph,
    spans: &SpanArena,
    page_width: usize,
    start_col: usize,
) -> Assignment {
    if live.is_empty() {
        return Assignment::new();
    }
    let state_space = live
        .iter()
        .fold(1usize, |acc, &r| acc.saturating_mul(rules.value_count(r)));
    if live.len() > MAX_LIVE_RULES_FOR_EXHAUSTIVE_SEARCH || state_space > MAX_SEARCH_STATE_SPACE {
        tracing::warn!(
            target: "solver",
            live_rules = live.len(),
            state_space,
            "partition exceeds exhaustive search bound; falling back to fully split"
        );
        return live.iter().map(|&r| (r, rules.fully_split_value(r))).collect();
    }

    tracing::debug!(target: "solver", live_rules = live.len(), partition_len = range.len(), "searching partition");

    let mut current = Assignment::new();
    let mut best: Option<(i64, Assignment)> = None;
    search(
        chunks, range, live, 0, rules, spans, page_width, start_col, &mut current, &mut best,
    );
    best.map(|(_, a)| a).unwrap_or_default()
}

#[allow(clippy::too_many_arguments)]
fn search(
    chunks: &[Chunk],
    range: Range<usize>,
    live: &[RuleId],
    pos: usize,
    rules: &RuleGraph,
    spans: &SpanArena,
    page_width: usize,
    start_col: usize,
    current: &mut Assignment,
    best: &mut Option<(i64, Assignment)>,
) {
    if pos == live.len() {
        let cost = evaluate(chunks, range.clone(), current, rules, spans, page_width, start_col);
        if best.as_ref().is_none_or(|(b, _)| cost < *b) {
            *best = Some((cost, current.clone()));
        }
        return;
    }
    let rule = live[pos];
    let value_count = rules.value_count(rule).max(1);
    for value in 0..value_count {
        current.insert(rule, value);
        search(
            chunks,
            range.clone(),
            live,
            pos + 1,
            rules,
            spans,
            page_width,
            start_col,
            current,
            best,
        );
    }
    current.remove(&rule);
}

/// Cost of rendering `chunks[range]` under `assignment`: a large
/// penalty per column of line overflow - charged once per physical
/// line against the widest column that line reached, not once per
/// chunk that happens to sit past the margin - plus each fired rule's
/// and each fired span's cost, counted once no matter how many of
/// their owned splits fire. Nested blocks are measured using their
/// cached `unsplit_block_length` rather than recursed into - real
/// emission recurses for real only once a block is known not to fit.
#[allow(clippy::too_many_arguments)]
fn evaluate(
    chunks: &[Chunk],
    range: Range<usize>,
    assignment: &Assignment,
    rules: &RuleGraph,
    spans: &SpanArena,
    page_width: usize,
    start_col: usize,
) -> i64 {
    let mut cost = 0i64;
    let mut col = start_col;
    let mut line_max = start_col;
    let mut fired_rules = HashSet::new();
    let mut fired_spans = HashSet::new();

    for chunk in &chunks[range] {
        col = advance_column(col, &chunk.text);
        if chunk.is_block_parent() {
            col += chunk.unsplit_block_length;
        }
        line_max = line_max.max(col);
        if let Some(split) = &chunk.split {
            let value = effective_value(split.rule, assignment, rules);
            let fires = rules.is_split_at_value(split.rule, split.rule_local_index, value);
            if fires {
                fired_rules.insert(split.rule);
                fired_spans.extend(chunk.spans.iter().copied());
                if line_max > page_width {
                    cost += OVERFLOW_PENALTY * (line_max - page_width) as i64;
                }
                col = split.indent;
                line_max = col;
            } else if split.space_when_unsplit {
                col += 1;
                line_max = line_max.max(col);
            }
        }
    }
    if line_max > page_width {
        cost += OVERFLOW_PENALTY * (line_max - page_width) as i64;
    }

    for r in fired_rules {
        cost += i64::from(rules.cost(r));
    }
    for s in fired_spans {
        cost += i64::from(spans.cost(s));
    }
    cost
}
