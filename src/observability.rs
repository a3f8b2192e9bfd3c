use std::net::SocketAddr;

use crate::engine::EngineError;
use crate::model::{Departure, Event, GroupState, SeatingStats};

// ── Flow metrics (event-driven) ─────────────────────────────────

/// Counter: groups that walked in.
pub const GROUPS_ARRIVED_TOTAL: &str = "seatwise_groups_arrived_total";

/// Counter: groups given a table.
pub const GROUPS_SEATED_TOTAL: &str = "seatwise_groups_seated_total";

/// Counter: groups that left. Labels: from (waiting, seated, unknown).
pub const GROUPS_LEFT_TOTAL: &str = "seatwise_groups_left_total";

/// Counter: arrivals refused by validation.
pub const COMMANDS_REJECTED_TOTAL: &str = "seatwise_commands_rejected_total";

/// Histogram: time spent in the seating task per command. Labels: command.
pub const COMMAND_DURATION_SECONDS: &str = "seatwise_command_duration_seconds";

// ── Floor metrics (state gauges) ────────────────────────────────

/// Gauge: tables currently free.
pub const TABLES_FREE: &str = "seatwise_tables_free";

/// Gauge: tables currently occupied.
pub const TABLES_SEATED: &str = "seatwise_tables_seated";

/// Gauge: groups in the waiting line.
pub const GROUPS_WAITING: &str = "seatwise_groups_waiting";

/// Install Prometheus metrics exporter on the given port. No-op if port is None.
pub fn init(port: Option<u16>) -> Result<(), EngineError> {
    let Some(port) = port else { return Ok(()) };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| EngineError::InvalidConfig(format!("metrics exporter: {e}")))?;
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
    Ok(())
}

pub fn record_event(event: &Event) {
    match event {
        Event::GroupArrived { .. } => {
            metrics::counter!(GROUPS_ARRIVED_TOTAL).increment(1);
        }
        Event::GroupSeated { .. } => {
            metrics::counter!(GROUPS_SEATED_TOTAL).increment(1);
        }
        // Counted from the `Departure`, which knows the prior state.
        Event::GroupLeft { .. } => {}
    }
}

pub fn record_stats(stats: &SeatingStats) {
    metrics::gauge!(TABLES_FREE).set(stats.free as f64);
    metrics::gauge!(TABLES_SEATED).set(stats.seated as f64);
    metrics::gauge!(GROUPS_WAITING).set(stats.waiting as f64);
}

/// Count a departure by the state the group left from. Repeat departures
/// are not counted.
pub fn record_departure(departure: &Departure) {
    let from = match departure.previous {
        Some(GroupState::Departed) => return,
        Some(state) => state.label(),
        None => "unknown",
    };
    metrics::counter!(GROUPS_LEFT_TOTAL, "from" => from).increment(1);
}
