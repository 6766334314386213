//! Session state machine: score, high score, phase
//!
//! Every operation is a guarded transition. Calls that make no sense in the
//! current phase (scoring after death, a second game over) are absorbed as
//! no-ops so the frame loop never has to handle errors.

use serde::{Deserialize, Serialize};

use super::event::{EventBus, EventKind, GameEvent, ListenerId};
use super::spawner::ObstacleSpawner;
use super::timer::{DeferredTask, Scheduler, TimerId};
use crate::consts::GAME_OVER_PANEL_DELAY;
use crate::highscores::HighScore;
use crate::persistence::KeyValueStore;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first impulse
    Idle,
    /// Active gameplay
    Running,
    /// Run ended
    GameOver,
}

pub struct GameSession {
    score: u32,
    high_score: HighScore,
    phase: GamePhase,
    /// 1.0 normally, 0.0 while paused
    time_scale: f32,
    events: EventBus,
    timers: Scheduler,
    panel_timer: Option<TimerId>,
    store: Option<Box<dyn KeyValueStore>>,
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("score", &self.score)
            .field("high_score", &self.high_score)
            .field("phase", &self.phase)
            .field("time_scale", &self.time_scale)
            .field("events", &self.events)
            .field("panel_timer", &self.panel_timer)
            .field("has_store", &self.store.is_some())
            .finish()
    }
}

impl GameSession {
    /// Create the session, reading the high score from `store` if given
    pub fn new(store: Option<Box<dyn KeyValueStore>>) -> Self {
        let high_score = match &store {
            Some(store) => HighScore::load(&**store),
            None => {
                log::warn!("No persistent store, high score will not be saved");
                HighScore::default()
            }
        };
        Self {
            score: 0,
            high_score,
            phase: GamePhase::Idle,
            time_scale: 1.0,
            events: EventBus::new(),
            timers: Scheduler::new(),
            panel_timer: None,
            store,
        }
    }

    /// Begin a run. No-op while already running.
    pub fn start_game(&mut self, spawner: Option<&mut ObstacleSpawner>) {
        if self.phase == GamePhase::Running {
            return;
        }

        self.cancel_panel_timer();
        self.score = 0;
        self.phase = GamePhase::Running;

        match spawner {
            Some(spawner) => spawner.start_spawning(),
            None => log::warn!("Game started without an obstacle spawner"),
        }

        log::info!("Game started (best {})", self.high_score.best);
        self.events.emit(&GameEvent::GameStarted);
    }

    /// +1 while running, ignored otherwise
    pub fn add_score(&mut self) {
        if self.phase != GamePhase::Running {
            return;
        }
        self.score += 1;
        self.events.emit(&GameEvent::ScoreChanged { score: self.score });
    }

    /// End the run. No-op if already over.
    pub fn end_game(&mut self, spawner: Option<&mut ObstacleSpawner>) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.phase = GamePhase::GameOver;

        if let Some(spawner) = spawner {
            spawner.stop_spawning();
        }

        if self.high_score.submit(self.score) {
            log::info!("New high score: {}", self.high_score.best);
            if let Some(store) = self.store.as_deref_mut() {
                self.high_score.save(store);
            }
        }

        log::info!("Game over (score {}, best {})", self.score, self.high_score.best);
        self.events.emit(&GameEvent::GameOverNotified);

        self.panel_timer = Some(self.timers.schedule(
            GAME_OVER_PANEL_DELAY,
            DeferredTask::GameOverPanel {
                final_score: self.score,
                high_score: self.high_score.best,
            },
        ));
    }

    /// Back to Idle with a zero score. High score is kept; a pending
    /// game-over panel notification is cancelled.
    pub fn reset_game(&mut self) {
        self.cancel_panel_timer();
        self.score = 0;
        self.phase = GamePhase::Idle;
        self.time_scale = 1.0;
    }

    /// Advance deferred notifications by `dt` seconds of game time
    pub fn update(&mut self, dt: f32) {
        for (id, task) in self.timers.advance(dt * self.time_scale) {
            if self.panel_timer == Some(id) {
                self.panel_timer = None;
            }
            match task {
                DeferredTask::GameOverPanel {
                    final_score,
                    high_score,
                } => self.events.emit(&GameEvent::GameOverPanelReady {
                    final_score,
                    high_score,
                }),
            }
        }
    }

    pub fn pause_game(&mut self) {
        if self.time_scale != 0.0 {
            log::info!("Paused");
        }
        self.time_scale = 0.0;
    }

    pub fn resume_game(&mut self) {
        if self.time_scale == 0.0 {
            log::info!("Resumed");
        }
        self.time_scale = 1.0;
    }

    pub fn is_paused(&self) -> bool {
        self.time_scale == 0.0
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    fn cancel_panel_timer(&mut self) {
        if let Some(id) = self.panel_timer.take() {
            self.timers.cancel(id);
        }
    }

    /// Register a presentation/audio listener
    pub fn subscribe(
        &mut self,
        kind: EventKind,
        listener: impl FnMut(&GameEvent) + 'static,
    ) -> ListenerId {
        self.events.subscribe(kind, listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.events.unsubscribe(id)
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score.best
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// True while the game-over panel notification is still scheduled
    pub fn panel_pending(&self) -> bool {
        self.panel_timer
            .is_some_and(|id| self.timers.is_pending(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::HIGH_SCORE_KEY;
    use crate::persistence::MemoryStore;
    use crate::settings::{ObstacleTemplate, SpawnerConfig};
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Session recording every event it emits
    fn recorded(store: Option<Box<dyn KeyValueStore>>) -> (GameSession, Rc<RefCell<Vec<GameEvent>>>) {
        let mut session = GameSession::new(store);
        let log = Rc::new(RefCell::new(Vec::new()));
        for kind in EventKind::ALL {
            let log = log.clone();
            session.subscribe(kind, move |e| log.borrow_mut().push(*e));
        }
        (session, log)
    }

    fn spawner() -> ObstacleSpawner {
        ObstacleSpawner::new(SpawnerConfig::default(), ObstacleTemplate::default(), 1)
    }

    /// Shared store handle so tests can inspect what the session wrote
    #[derive(Clone, Default)]
    struct SharedStore(Rc<RefCell<MemoryStore>>);

    impl KeyValueStore for SharedStore {
        fn get(&self, key: &str) -> i64 {
            self.0.borrow().get(key)
        }
        fn set(&mut self, key: &str, value: i64) {
            self.0.borrow_mut().set(key, value)
        }
        fn flush(&mut self) -> Result<(), crate::SkyflapError> {
            self.0.borrow_mut().flush()
        }
    }

    #[test]
    fn test_start_game_transitions_and_starts_spawner() {
        let (mut session, log) = recorded(None);
        let mut spawner = spawner();
        session.start_game(Some(&mut spawner));

        assert_eq!(session.phase(), GamePhase::Running);
        assert!(spawner.is_spawning());
        assert_eq!(*log.borrow(), vec![GameEvent::GameStarted]);

        // Second start is a no-op
        session.start_game(Some(&mut spawner));
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn test_add_score_only_while_running() {
        let (mut session, log) = recorded(None);
        session.add_score();
        assert_eq!(session.score(), 0);
        assert!(log.borrow().is_empty());

        session.start_game(None);
        session.add_score();
        session.add_score();
        assert_eq!(session.score(), 2);

        session.end_game(None);
        session.add_score();
        assert_eq!(session.score(), 2);
        assert!(log.borrow().contains(&GameEvent::ScoreChanged { score: 2 }));
    }

    #[test]
    fn test_scenario_a_end_game_with_prior_high_score() {
        let store = SharedStore::default();
        store.0.borrow_mut().set(HIGH_SCORE_KEY, 2);
        let (mut session, log) = recorded(Some(Box::new(store.clone())));
        let mut spawner = spawner();

        session.start_game(Some(&mut spawner));
        for _ in 0..3 {
            session.add_score();
        }
        session.end_game(Some(&mut spawner));
        session.end_game(Some(&mut spawner));

        assert_eq!(session.score(), 3);
        assert_eq!(session.high_score(), 3);
        assert_eq!(store.get(HIGH_SCORE_KEY), 3);
        assert_eq!(store.0.borrow().flushes, 1);
        assert!(!spawner.is_spawning());

        // Panel is deferred by the presentation delay
        session.update(0.25);
        assert!(session.panel_pending());
        session.update(0.3);
        session.update(1.0);

        let events = log.borrow();
        let over = events
            .iter()
            .filter(|e| **e == GameEvent::GameOverNotified)
            .count();
        let panels: Vec<_> = events
            .iter()
            .filter(|e| e.kind() == EventKind::GameOverPanelReady)
            .collect();
        assert_eq!(over, 1);
        assert_eq!(
            panels,
            vec![&GameEvent::GameOverPanelReady {
                final_score: 3,
                high_score: 3
            }]
        );
    }

    #[test]
    fn test_lower_score_does_not_touch_store() {
        let store = SharedStore::default();
        store.0.borrow_mut().set(HIGH_SCORE_KEY, 10);
        let mut session = GameSession::new(Some(Box::new(store.clone())));

        session.start_game(None);
        session.add_score();
        session.end_game(None);

        assert_eq!(session.high_score(), 10);
        assert_eq!(store.0.borrow().flushes, 0);
    }

    #[test]
    fn test_reset_cancels_pending_panel() {
        let (mut session, log) = recorded(None);
        session.start_game(None);
        session.end_game(None);
        assert!(session.panel_pending());

        session.reset_game();
        assert_eq!(session.phase(), GamePhase::Idle);
        assert!(!session.panel_pending());
        session.update(1.0);

        assert!(
            log.borrow()
                .iter()
                .all(|e| e.kind() != EventKind::GameOverPanelReady)
        );
    }

    #[test]
    fn test_reset_keeps_high_score() {
        let mut session = GameSession::new(None);
        session.start_game(None);
        session.add_score();
        session.end_game(None);
        session.reset_game();
        assert_eq!(session.score(), 0);
        assert_eq!(session.high_score(), 1);
    }

    #[test]
    fn test_pause_freezes_panel_timer() {
        let (mut session, log) = recorded(None);
        session.start_game(None);
        session.end_game(None);

        session.pause_game();
        assert!(session.is_paused());
        session.update(5.0);
        assert!(session.panel_pending());

        session.resume_game();
        session.update(0.5);
        assert!(!session.panel_pending());
        assert_eq!(
            log.borrow().last(),
            Some(&GameEvent::GameOverPanelReady {
                final_score: 0,
                high_score: 0
            })
        );
    }

    #[test]
    fn test_missing_spawner_and_store_degrade_gracefully() {
        let mut session = GameSession::new(None);
        session.start_game(None);
        session.add_score();
        session.end_game(None);
        assert_eq!(session.high_score(), 1);
    }

    proptest! {
        #[test]
        fn prop_high_score_is_max_of_sessions(
            initial in 0u32..10,
            runs in prop::collection::vec(0u32..15, 1..8),
        ) {
            let store = SharedStore::default();
            store.0.borrow_mut().set(HIGH_SCORE_KEY, i64::from(initial));
            let mut session = GameSession::new(Some(Box::new(store.clone())));
            let mut expected = initial;

            for run in runs {
                session.start_game(None);
                for _ in 0..run {
                    session.add_score();
                }
                prop_assert_eq!(session.score(), run);
                let before = session.high_score();
                session.end_game(None);
                prop_assert!(session.high_score() >= before);
                session.reset_game();

                expected = expected.max(run);
                prop_assert_eq!(session.high_score(), expected);
                prop_assert_eq!(store.get(HIGH_SCORE_KEY), i64::from(expected));
            }
        }
    }
}
