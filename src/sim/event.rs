//! Session events and the listener registry
//!
//! Presentation and audio subscribe here. Delivery is synchronous: every
//! listener for an event runs, in subscription order, before `emit` returns.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Notifications emitted by `GameSession`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A run began
    GameStarted,
    /// Score went up
    ScoreChanged { score: u32 },
    /// The run ended (fires immediately)
    GameOverNotified,
    /// Game-over panel may be shown (fires after the presentation delay)
    GameOverPanelReady { final_score: u32, high_score: u32 },
}

/// Discriminant of `GameEvent`, used as the subscription key
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EventKind {
    GameStarted,
    ScoreChanged,
    GameOverNotified,
    GameOverPanelReady,
}

impl EventKind {
    pub const ALL: [EventKind; 4] = [
        EventKind::GameStarted,
        EventKind::ScoreChanged,
        EventKind::GameOverNotified,
        EventKind::GameOverPanelReady,
    ];
}

impl GameEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            GameEvent::GameStarted => EventKind::GameStarted,
            GameEvent::ScoreChanged { .. } => EventKind::ScoreChanged,
            GameEvent::GameOverNotified => EventKind::GameOverNotified,
            GameEvent::GameOverPanelReady { .. } => EventKind::GameOverPanelReady,
        }
    }
}

/// Handle returned by `subscribe`, needed to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&GameEvent)>;

/// Event kind -> ordered listener list
#[derive(Default)]
pub struct EventBus {
    listeners: BTreeMap<EventKind, Vec<(ListenerId, Listener)>>,
    next_id: u64,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: BTreeMap<_, _> = self
            .listeners
            .iter()
            .map(|(kind, list)| (*kind, list.len()))
            .collect();
        f.debug_struct("EventBus").field("listeners", &counts).finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for one event kind
    pub fn subscribe(
        &mut self,
        kind: EventKind,
        listener: impl FnMut(&GameEvent) + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners
            .entry(kind)
            .or_default()
            .push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        for list in self.listeners.values_mut() {
            if let Some(pos) = list.iter().position(|(lid, _)| *lid == id) {
                list.remove(pos);
                return true;
            }
        }
        false
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.get(&kind).map_or(0, Vec::len)
    }

    /// Deliver to every listener of the event's kind, in subscription order
    pub fn emit(&mut self, event: &GameEvent) {
        log::debug!("Event {:?}", event);
        if let Some(list) = self.listeners.get_mut(&event.kind()) {
            for (_, listener) in list.iter_mut() {
                listener(event);
            }
        }
    }
}
