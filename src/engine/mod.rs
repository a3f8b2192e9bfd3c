mod error;
mod pool;

pub use error::EngineError;
pub use pool::TablePool;

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::debug;

use crate::limits::*;
use crate::model::*;

/// Seats customer groups at tables, best fit first, with a FIFO waiting line.
///
/// Every group the manager has seen has exactly one `GroupState`. The waiting
/// line is a secondary index (arrival seq → group) over the `Waiting` entries,
/// so it iterates oldest first and drops a leaver in O(log n).
///
/// Not synchronized: wrap it in a [`crate::service::SeatingService`] to share
/// it between callers.
pub struct SeatingManager {
    pool: TablePool,
    table_count: usize,
    groups: HashMap<GroupId, GroupState>,
    queue: BTreeMap<u64, GroupId>,
    next_seq: u64,
    seated: usize,
    departed: usize,
    /// Pending events, only collected when `record_events` is on.
    events: Vec<Event>,
    record_events: bool,
}

fn validate_size(n: u32) -> Result<(), EngineError> {
    if n == 0 || n > MAX_TABLE_SEATS {
        return Err(EngineError::InvalidSize(n));
    }
    Ok(())
}

impl SeatingManager {
    pub fn new(tables: impl IntoIterator<Item = Table>) -> Result<Self, EngineError> {
        let tables: Vec<Table> = tables.into_iter().collect();
        if tables.len() > MAX_TABLES {
            return Err(EngineError::LimitExceeded("too many tables"));
        }
        let mut seen = HashSet::with_capacity(tables.len());
        for table in &tables {
            validate_size(table.seats)?;
            if !seen.insert(table.id) {
                return Err(EngineError::DuplicateTable(table.id));
            }
        }

        let mut pool = TablePool::new();
        let table_count = tables.len();
        for table in tables {
            pool.free(table);
        }
        debug!("seating manager ready with {table_count} tables");

        Ok(Self {
            pool,
            table_count,
            groups: HashMap::new(),
            queue: BTreeMap::new(),
            next_seq: 0,
            seated: 0,
            departed: 0,
            events: Vec::new(),
            record_events: false,
        })
    }

    /// Build a floor from bare seat counts, minting a fresh table for each.
    pub fn with_sizes(sizes: &[u32]) -> Result<Self, EngineError> {
        Self::new(sizes.iter().map(|&seats| Table::new(seats)))
    }

    /// Start (or stop) collecting events for [`Self::drain_events`].
    pub fn record_events(&mut self, on: bool) {
        self.record_events = on;
        if !on {
            self.events.clear();
        }
    }

    // ── Mutations ────────────────────────────────────────────

    /// A group walks in. Returns the table it was given, or `None` if it has to
    /// wait.
    pub fn arrives(&mut self, group: CustomerGroup) -> Result<Option<Table>, EngineError> {
        validate_size(group.size)?;
        if self.groups.contains_key(&group.id) {
            return Err(EngineError::AlreadyTracked(group.id));
        }
        if self.queue.len() >= MAX_WAITING_GROUPS {
            return Err(EngineError::LimitExceeded("waiting line full"));
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        self.groups.insert(
            group.id,
            GroupState::Waiting {
                seq,
                size: group.size,
            },
        );
        self.queue.insert(seq, group.id);
        self.emit(Event::GroupArrived {
            id: group.id,
            size: group.size,
        });

        self.reallocate();
        Ok(self.locate(group.id))
    }

    /// A group leaves, seated or not. Always ends up departed; a second call
    /// changes nothing.
    pub fn leaves(&mut self, id: GroupId) -> Departure {
        let previous = self.groups.insert(id, GroupState::Departed);
        let released = match previous {
            Some(GroupState::Waiting { seq, .. }) => {
                self.queue.remove(&seq);
                None
            }
            Some(GroupState::Seated { table }) => {
                self.seated -= 1;
                self.pool.free(table);
                Some(table)
            }
            Some(GroupState::Departed) | None => None,
        };

        if previous != Some(GroupState::Departed) {
            self.departed += 1;
            self.emit(Event::GroupLeft { id, released });
            debug!(
                "group {id} left ({})",
                previous.as_ref().map_or("unknown", GroupState::label)
            );
        }

        // Only a freed table can change anything for the line.
        if released.is_some() {
            self.reallocate();
        }
        Departure { previous, released }
    }

    /// Walk the waiting line oldest first and seat whoever fits. A group that
    /// doesn't fit is skipped, not blocking the ones behind it; the walk stops
    /// once no table is free.
    fn reallocate(&mut self) {
        let mut placed = Vec::new();
        for (&seq, &id) in &self.queue {
            if self.pool.is_empty() {
                break;
            }
            let Some(GroupState::Waiting { size, .. }) = self.groups.get(&id) else {
                continue;
            };
            if let Some(table) = self.pool.allocate(*size) {
                placed.push((seq, id, table));
            }
        }

        for (seq, id, table) in placed {
            self.queue.remove(&seq);
            self.groups.insert(id, GroupState::Seated { table });
            self.seated += 1;
            debug!("seated group {id} at table {} ({} seats)", table.id, table.seats);
            self.emit(Event::GroupSeated { id, table });
        }
    }

    fn emit(&mut self, event: Event) {
        if self.record_events {
            self.events.push(event);
        }
    }

    /// Take every event recorded since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    // ── Queries ──────────────────────────────────────────────

    /// The table a group sits at. `None` for waiting, departed and unknown
    /// groups alike.
    pub fn locate(&self, id: GroupId) -> Option<Table> {
        match self.groups.get(&id) {
            Some(GroupState::Seated { table }) => Some(*table),
            _ => None,
        }
    }

    pub fn state_of(&self, id: GroupId) -> Option<GroupState> {
        self.groups.get(&id).copied()
    }

    /// Waiting groups, oldest first.
    pub fn waiting_order(&self) -> Vec<GroupId> {
        self.queue.values().copied().collect()
    }

    pub fn pool(&self) -> &TablePool {
        &self.pool
    }

    pub fn table_count(&self) -> usize {
        self.table_count
    }

    pub fn free_count(&self) -> usize {
        self.pool.count()
    }

    pub fn seated_count(&self) -> usize {
        self.seated
    }

    pub fn waiting_count(&self) -> usize {
        self.queue.len()
    }

    pub fn departed_count(&self) -> usize {
        self.departed
    }

    pub fn stats(&self) -> SeatingStats {
        SeatingStats {
            tables: self.table_count,
            free: self.free_count(),
            seated: self.seated,
            waiting: self.queue.len(),
            departed: self.departed,
        }
    }
}
