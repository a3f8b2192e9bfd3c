use dashmap::DashMap;
use tokio::sync::broadcast;

use crate::model::{Event, GroupId};

const CHANNEL_CAPACITY: usize = 16;

/// Broadcast hub for seating events, one channel per group.
pub struct NotifyHub {
    channels: DashMap<GroupId, broadcast::Sender<Event>>,
}

impl Default for NotifyHub {
    fn default() -> Self {
        Self::new()
    }
}

impl NotifyHub {
    pub fn new() -> Self {
        Self {
            channels: DashMap::new(),
        }
    }

    /// Subscribe to events for a group. Creates the channel if needed.
    pub fn subscribe(&self, group_id: GroupId) -> broadcast::Receiver<Event> {
        let sender = self
            .channels
            .entry(group_id)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0);
        sender.subscribe()
    }

    /// Send a notification. No-op if nobody is listening.
    pub fn send(&self, group_id: GroupId, event: &Event) {
        if let Some(sender) = self.channels.get(&group_id) {
            let _ = sender.send(event.clone());
        }
    }

    /// Route an event to its group's channel; a departure also closes the
    /// channel, since a departed group never changes state again.
    pub fn publish(&self, event: &Event) {
        let group_id = event.group_id();
        self.send(group_id, event);
        if matches!(event, Event::GroupLeft { .. }) {
            self.remove(&group_id);
        }
    }

    pub fn remove(&self, group_id: &GroupId) {
        self.channels.remove(group_id);
    }

    /// Drop a group's channel if nobody holds a receiver for it any more.
    pub fn prune(&self, group_id: &GroupId) {
        self.channels
            .remove_if(group_id, |_, sender| sender.receiver_count() == 0);
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }
}
