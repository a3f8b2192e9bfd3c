use std::collections::BTreeMap;

use crate::model::Table;

/// Free tables bucketed by seat count.
///
/// The ordered index holds one entry per distinct size, so best-fit lookup is
/// O(log distinct sizes) no matter how many tables share a size. A bucket is
/// dropped as soon as it empties.
#[derive(Debug, Default)]
pub struct TablePool {
    buckets: BTreeMap<u32, Vec<Table>>,
    free: usize,
}

impl TablePool {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Mutations ────────────────────────────────────────────

    /// Put a table back on the free list. The caller guarantees it is not
    /// already free.
    pub fn free(&mut self, table: Table) {
        debug_assert!(
            !self
                .buckets
                .get(&table.seats)
                .is_some_and(|b| b.iter().any(|t| t.id == table.id)),
            "table {} freed twice",
            table.id
        );
        self.buckets.entry(table.seats).or_default().push(table);
        self.free += 1;
    }

    /// Take the smallest free table with at least `min_seats` seats.
    pub fn allocate(&mut self, min_seats: u32) -> Option<Table> {
        let (&seats, bucket) = self.buckets.range_mut(min_seats..).next()?;
        let table = bucket.pop()?;
        if bucket.is_empty() {
            self.buckets.remove(&seats);
        }
        self.free -= 1;
        Some(table)
    }

    // ── Queries ──────────────────────────────────────────────

    pub fn count(&self) -> usize {
        self.free
    }

    pub fn is_empty(&self) -> bool {
        self.free == 0
    }

    /// Distinct sizes that currently have at least one free table, ascending.
    pub fn distinct_sizes(&self) -> Vec<u32> {
        self.buckets.keys().copied().collect()
    }
}
