//! Cooperative deferred tasks on game time
//!
//! Nothing runs in the background: `advance` is called once per tick and
//! hands back whatever came due.

use serde::{Deserialize, Serialize};

/// Work that can be scheduled for later
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeferredTask {
    /// Announce the game-over panel with the values captured at game over
    GameOverPanel { final_score: u32, high_score: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimerId(u64);

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Pending {
    id: TimerId,
    due: f64,
    task: DeferredTask,
}

/// Cancellable one-shot timers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scheduler {
    now: f64,
    next_id: u64,
    pending: Vec<Pending>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current game time in seconds
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Run `task` once `delay` seconds of game time have passed
    pub fn schedule(&mut self, delay: f32, task: DeferredTask) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending {
            id,
            due: self.now + f64::from(delay.max(0.0)),
            task,
        });
        id
    }

    /// Returns false if the timer already fired or was cancelled
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.id != id);
        self.pending.len() != before
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.iter().any(|p| p.id == id)
    }

    /// Advance time and drain due tasks, earliest first (ties by schedule order)
    pub fn advance(&mut self, dt: f32) -> Vec<(TimerId, DeferredTask)> {
        self.now += f64::from(dt.max(0.0));
        let now = self.now;

        let mut due: Vec<Pending> = Vec::new();
        self.pending.retain(|p| {
            if p.due <= now {
                due.push(p.clone());
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.due.total_cmp(&b.due).then(a.id.cmp(&b.id)));
        due.into_iter().map(|p| (p.id, p.task)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TASK: DeferredTask = DeferredTask::GameOverPanel {
        final_score: 1,
        high_score: 2,
    };

    #[test]
    fn test_fires_after_delay_once() {
        let mut s = Scheduler::new();
        let id = s.schedule(0.5, TASK);

        assert!(s.advance(0.25).is_empty());
        assert!(s.is_pending(id));
        assert_eq!(s.advance(0.25), vec![(id, TASK)]);
        assert!(!s.is_pending(id));
        assert!(s.advance(1.0).is_empty());
    }

    #[test]
    fn test_cancel() {
        let mut s = Scheduler::new();
        let id = s.schedule(0.5, TASK);
        assert!(s.cancel(id));
        assert!(!s.cancel(id));
        assert!(s.advance(1.0).is_empty());
    }

    #[test]
    fn test_due_order() {
        let mut s = Scheduler::new();
        let late = s.schedule(0.3, TASK);
        let early = s.schedule(0.1, TASK);
        let fired: Vec<_> = s.advance(1.0).into_iter().map(|(id, _)| id).collect();
        assert_eq!(fired, vec![early, late]);
        assert!((s.now() - 1.0).abs() < 1e-9);
    }
}
