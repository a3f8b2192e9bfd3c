use serde::{Deserialize, Serialize};
use ulid::Ulid;

pub type TableId = Ulid;
pub type GroupId = Ulid;

/// A table with a fixed number of seats. Identity is the id, never the size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Table {
    pub id: TableId,
    pub seats: u32,
}

impl Table {
    pub fn new(seats: u32) -> Self {
        Self {
            id: Ulid::new(),
            seats,
        }
    }

    pub fn fits(&self, party: u32) -> bool {
        self.seats >= party
    }
}

/// A party asking to be seated together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomerGroup {
    pub id: GroupId,
    pub size: u32,
}

impl CustomerGroup {
    pub fn new(size: u32) -> Self {
        Self {
            id: Ulid::new(),
            size,
        }
    }
}

/// Where a group the engine has seen currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupState {
    /// In line. `seq` is the arrival position, `size` the party size.
    Waiting { seq: u64, size: u32 },
    Seated { table: Table },
    /// Terminal.
    Departed,
}

impl GroupState {
    pub fn label(&self) -> &'static str {
        match self {
            GroupState::Waiting { .. } => "waiting",
            GroupState::Seated { .. } => "seated",
            GroupState::Departed => "departed",
        }
    }
}

/// Outcome of a `leaves` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Departure {
    /// State before the call; `None` if the group was never seen.
    pub previous: Option<GroupState>,
    /// Table handed back to the pool, if the group was seated.
    pub released: Option<Table>,
}

/// Seating events — flat, one per state transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    GroupArrived { id: GroupId, size: u32 },
    GroupSeated { id: GroupId, table: Table },
    GroupLeft { id: GroupId, released: Option<Table> },
}

impl Event {
    pub fn group_id(&self) -> GroupId {
        match self {
            Event::GroupArrived { id, .. }
            | Event::GroupSeated { id, .. }
            | Event::GroupLeft { id, .. } => *id,
        }
    }
}

/// Point-in-time counters for a floor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatingStats {
    pub tables: usize,
    pub free: usize,
    pub seated: usize,
    pub waiting: usize,
    pub departed: usize,
}
