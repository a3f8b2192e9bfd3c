/// Max tables a single floor may be built with.
pub const MAX_TABLES: usize = 10_000;

/// Max seats at one table, and max party size.
pub const MAX_TABLE_SEATS: u32 = 1_000;

/// Max groups allowed in the waiting line at once.
pub const MAX_WAITING_GROUPS: usize = 100_000;

/// Default capacity of the service command channel.
pub const DEFAULT_QUEUE_DEPTH: usize = 4096;
