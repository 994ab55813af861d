//! Spans: cost bearers over a contiguous chunk range.
//!
//! A span contributes `cost` to the total exactly once if any split it
//! covers fires - used to discourage splitting inside, e.g., a short
//! method chain. Spans don't store their chunk range explicitly;
//! membership is recorded on each [`crate::chunk::Chunk`] as it is
//! appended while the span is active. A span's range is always local
//! to one solver partition, since a span can't outlive the builder
//! scope it was opened in and divide markers only ever appear at scope
//! boundaries.

/// Handle into the span arena shared by a builder tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpanId(usize);

#[derive(Debug, Default)]
pub struct SpanArena {
    costs: Vec<i32>,
}

impl SpanArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, cost: i32) -> SpanId {
        let id = SpanId(self.costs.len());
        self.costs.push(cost);
        id
    }

    pub fn cost(&self, id: SpanId) -> i32 {
        self.costs[id.0]
    }
}
