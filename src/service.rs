use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{info, warn};

use crate::engine::{EngineError, SeatingManager};
use crate::model::*;
use crate::notify::NotifyHub;
use crate::observability;

// ── Command channel ──────────────────────────────────────

pub(crate) enum SeatingCommand {
    Arrive {
        group: CustomerGroup,
        response: oneshot::Sender<Result<Option<Table>, EngineError>>,
    },
    Leave {
        id: GroupId,
        response: oneshot::Sender<Departure>,
    },
    Locate {
        id: GroupId,
        response: oneshot::Sender<Option<Table>>,
    },
    StateOf {
        id: GroupId,
        response: oneshot::Sender<Option<GroupState>>,
    },
    Stats {
        response: oneshot::Sender<SeatingStats>,
    },
    WaitingOrder {
        response: oneshot::Sender<Vec<GroupId>>,
    },
}

impl SeatingCommand {
    fn label(&self) -> &'static str {
        match self {
            SeatingCommand::Arrive { .. } => "arrive",
            SeatingCommand::Leave { .. } => "leave",
            SeatingCommand::Locate { .. } => "locate",
            SeatingCommand::StateOf { .. } => "state_of",
            SeatingCommand::Stats { .. } => "stats",
            SeatingCommand::WaitingOrder { .. } => "waiting_order",
        }
    }
}

/// Background task that owns the manager. Commands run one at a time, so
/// readers never see a half-applied arrival or departure.
async fn run_seating_loop(
    mut manager: SeatingManager,
    mut rx: mpsc::Receiver<SeatingCommand>,
    notify: Arc<NotifyHub>,
) {
    manager.record_events(true);
    observability::record_stats(&manager.stats());

    while let Some(cmd) = rx.recv().await {
        let label = cmd.label();
        let start = Instant::now();
        match cmd {
            SeatingCommand::Arrive { group, response } => {
                let result = manager.arrives(group);
                if let Err(e) = &result {
                    warn!("rejected arrival of group {}: {e}", group.id);
                    metrics::counter!(observability::COMMANDS_REJECTED_TOTAL).increment(1);
                }
                publish(&mut manager, &notify);
                let _ = response.send(result);
            }
            SeatingCommand::Leave { id, response } => {
                let departure = manager.leaves(id);
                observability::record_departure(&departure);
                publish(&mut manager, &notify);
                let _ = response.send(departure);
            }
            SeatingCommand::Locate { id, response } => {
                let _ = response.send(manager.locate(id));
            }
            SeatingCommand::StateOf { id, response } => {
                let _ = response.send(manager.state_of(id));
            }
            SeatingCommand::Stats { response } => {
                let _ = response.send(manager.stats());
            }
            SeatingCommand::WaitingOrder { response } => {
                let _ = response.send(manager.waiting_order());
            }
        }
        metrics::histogram!(observability::COMMAND_DURATION_SECONDS, "command" => label)
            .record(start.elapsed().as_secs_f64());
    }

    info!("seating service stopped");
}

/// Fan out whatever the last command changed, then refresh the gauges.
fn publish(manager: &mut SeatingManager, notify: &NotifyHub) {
    let events = manager.drain_events();
    if events.is_empty() {
        return;
    }
    for event in &events {
        observability::record_event(event);
        notify.publish(event);
    }
    observability::record_stats(&manager.stats());
}

// ── Service ──────────────────────────────────────────────

pub struct SeatingService;

impl SeatingService {
    /// Move `manager` onto its own task and return a handle to it. Must be
    /// called inside a tokio runtime. The task exits when the last handle is
    /// dropped.
    pub fn spawn(manager: SeatingManager, queue_depth: usize) -> SeatingHandle {
        let (tx, rx) = mpsc::channel(queue_depth.max(1));
        let notify = Arc::new(NotifyHub::new());
        info!(
            "seating service started: {} tables, queue depth {queue_depth}",
            manager.table_count()
        );
        tokio::spawn(run_seating_loop(manager, rx, notify.clone()));
        SeatingHandle { tx, notify }
    }
}

/// Cloneable front door to a running [`SeatingService`].
#[derive(Clone)]
pub struct SeatingHandle {
    tx: mpsc::Sender<SeatingCommand>,
    notify: Arc<NotifyHub>,
}

impl SeatingHandle {
    /// Send a command and wait for the loop's answer.
    async fn call<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> SeatingCommand,
    ) -> Result<T, EngineError> {
        let (tx, rx) = oneshot::channel();
        self.tx
            .send(make(tx))
            .await
            .map_err(|_| EngineError::ServiceUnavailable("seating task shut down".into()))?;
        rx.await
            .map_err(|_| EngineError::ServiceUnavailable("seating task dropped response".into()))
    }

    pub async fn arrive(&self, group: CustomerGroup) -> Result<Option<Table>, EngineError> {
        self.call(|response| SeatingCommand::Arrive { group, response })
            .await?
    }

    pub async fn leave(&self, id: GroupId) -> Result<Departure, EngineError> {
        self.call(|response| SeatingCommand::Leave { id, response }).await
    }

    pub async fn locate(&self, id: GroupId) -> Result<Option<Table>, EngineError> {
        self.call(|response| SeatingCommand::Locate { id, response }).await
    }

    pub async fn state_of(&self, id: GroupId) -> Result<Option<GroupState>, EngineError> {
        self.call(|response| SeatingCommand::StateOf { id, response }).await
    }

    pub async fn stats(&self) -> Result<SeatingStats, EngineError> {
        self.call(|response| SeatingCommand::Stats { response }).await
    }

    pub async fn waiting_order(&self) -> Result<Vec<GroupId>, EngineError> {
        self.call(|response| SeatingCommand::WaitingOrder { response })
            .await
    }

    /// Events for one group from now on: seated, then left.
    pub fn subscribe(&self, id: GroupId) -> broadcast::Receiver<Event> {
        self.notify.subscribe(id)
    }

    /// Resolve once the group has a table. `None` if it departs (or was never
    /// seen) before getting one.
    pub async fn wait_until_seated(&self, id: GroupId) -> Result<Option<Table>, EngineError> {
        // Subscribe first so a seating between the check and the wait is not lost.
        let mut rx = self.subscribe(id);
        match self.state_of(id).await? {
            Some(GroupState::Seated { table }) => return Ok(Some(table)),
            Some(GroupState::Waiting { .. }) => {}
            Some(GroupState::Departed) | None => {
                drop(rx);
                self.notify.prune(&id);
                return Ok(None);
            }
        }
        loop {
            match rx.recv().await {
                Ok(Event::GroupSeated { table, .. }) => return Ok(Some(table)),
                Ok(Event::GroupLeft { .. }) | Err(broadcast::error::RecvError::Closed) => {
                    return Ok(None);
                }
                Ok(Event::GroupArrived { .. }) => {}
                Err(broadcast::error::RecvError::Lagged(_)) => {
                    return self.locate(id).await;
                }
            }
        }
    }
}
