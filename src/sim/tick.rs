//! Fixed timestep simulation tick
//!
//! One call advances the whole scene by one frame in a fixed order:
//! input, physics, spawning, obstacle motion, contacts, actor logic,
//! deferred notifications.

use super::actor::ImpulseResponse;
use super::session::GameSession;
use super::state::Scene;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Impulse (flap) events since the last tick
    pub impulses: u32,
    /// Pause toggle
    pub pause: bool,
    /// Full reset back to Idle
    pub restart: bool,
}

/// What happened during a tick, for callers that drive audio
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub impulses: Vec<ImpulseResponse>,
    /// Id of the obstacle spawned this tick
    pub spawned: Option<u32>,
    /// Obstacles that scrolled off and were dropped
    pub despawned: usize,
}

/// Advance the game by one timestep
pub fn tick(session: &mut GameSession, scene: &mut Scene, input: &TickInput, dt: f32) -> TickReport {
    let mut report = TickReport::default();

    if input.restart {
        restart(session, scene);
        return report;
    }

    // Handle pause toggle
    if input.pause {
        if session.is_paused() {
            session.resume_game();
        } else {
            session.pause_game();
        }
    }

    // Paused: nothing moves and input is dropped
    if session.is_paused() {
        return report;
    }
    let dt = dt * session.time_scale();

    let Scene {
        actor,
        spawner,
        time_ticks,
    } = scene;
    *time_ticks += 1;

    for _ in 0..input.impulses {
        report
            .impulses
            .push(actor.on_impulse(session, Some(&mut *spawner)));
    }

    actor.integrate(dt);

    report.spawned = spawner.update(dt);
    report.despawned = spawner.update_obstacles(dt);

    actor.collide(session, spawner);
    actor.update(dt, session, Some(&mut *spawner));

    session.update(dt);

    report
}

/// Explicit replacement for reloading the scene: session back to Idle
/// (pending game-over panel cancelled), actor reset, field cleared.
pub fn restart(session: &mut GameSession, scene: &mut Scene) {
    session.reset_game();
    scene.reset();
    log::info!("Restarted (best {})", session.high_score());
}
