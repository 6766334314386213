//! The player-controlled actor
//!
//! Falls under gravity, flaps on impulse, tilts with its vertical velocity,
//! and dies on leaving the play area or touching an obstacle.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Collidable;
use super::session::GameSession;
use super::spawner::ObstacleSpawner;
use crate::consts::*;
use crate::settings::ActorConfig;
use crate::{lerp, lerp_angle};

/// What an impulse did, for audio/presentation hooks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpulseResponse {
    /// First flap: the run started and the actor jumped
    Started,
    Jumped,
    /// Dead or input disabled
    Ignored,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub pos: Vec2,
    /// Vertical velocity (positive = up)
    pub velocity: f32,
    /// Degrees, normalized to [-180, 180)
    pub rotation: f32,
    pub alive: bool,
    pub started: bool,
    /// Physics (gravity, integration, contacts) active
    pub simulated: bool,
    /// Impulses are handled
    pub input_enabled: bool,
    /// Score zones the actor is currently inside (enter-only scoring)
    #[serde(default)]
    pub inside_zones: Vec<u32>,
    config: ActorConfig,
}

impl Actor {
    pub fn new(config: ActorConfig) -> Self {
        Self {
            pos: config.spawn_point,
            velocity: 0.0,
            rotation: 0.0,
            alive: true,
            started: false,
            simulated: false,
            input_enabled: true,
            inside_zones: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &ActorConfig {
        &self.config
    }

    /// Handle one impulse (flap) event
    pub fn on_impulse(
        &mut self,
        session: &mut GameSession,
        spawner: Option<&mut ObstacleSpawner>,
    ) -> ImpulseResponse {
        if !self.input_enabled {
            return ImpulseResponse::Ignored;
        }

        if !self.started {
            // First flap doubles as session start
            self.started = true;
            self.simulated = true;
            session.start_game(spawner);
            self.jump();
            return ImpulseResponse::Started;
        }

        if !self.alive {
            return ImpulseResponse::Ignored;
        }

        self.jump();
        ImpulseResponse::Jumped
    }

    /// Zero vertical velocity, then apply the jump impulse
    pub fn jump(&mut self) {
        self.velocity = 0.0;
        self.velocity += self.config.jump_force / self.config.mass;
    }

    /// Physics step: gravity then position (semi-implicit Euler)
    pub fn integrate(&mut self, dt: f32) {
        if !self.simulated {
            return;
        }
        self.velocity += self.config.gravity * self.config.gravity_scale * dt;
        self.pos.y += self.velocity * dt;
    }

    /// Per-frame logic: bounds check, then rotation
    pub fn update(
        &mut self,
        dt: f32,
        session: &mut GameSession,
        spawner: Option<&mut ObstacleSpawner>,
    ) {
        if !self.alive || !self.started {
            return;
        }

        if self.pos.y > self.config.max_height || self.pos.y < self.config.min_height {
            log::debug!("Actor left the play area at y={:.2}", self.pos.y);
            self.die(session, spawner);
        }

        self.rotate(dt);
    }

    /// Rotation the actor tilts toward at its current velocity
    pub fn target_rotation(&self) -> f32 {
        let t = (-self.velocity + ROTATION_VELOCITY_OFFSET) / ROTATION_VELOCITY_WINDOW;
        lerp(ROTATION_RISING, ROTATION_FALLING, t)
    }

    fn rotate(&mut self, dt: f32) {
        let target = self.target_rotation();
        self.rotation = lerp_angle(self.rotation, target, self.config.rotation_speed * dt);
    }

    /// Gather trigger contacts against every live obstacle.
    ///
    /// Obstacle contacts are reported every step; a score zone only on the
    /// step the actor enters it.
    pub fn sense(&mut self, spawner: &ObstacleSpawner) -> Vec<(u32, Collidable)> {
        if !self.simulated {
            return Vec::new();
        }

        let mut contacts = Vec::new();
        let mut zones_now = Vec::new();
        for pair in spawner.obstacles() {
            match pair.contact(self.pos, self.config.radius) {
                Collidable::Obstacle => contacts.push((pair.id, Collidable::Obstacle)),
                Collidable::ScoreZone => {
                    if !self.inside_zones.contains(&pair.id) {
                        contacts.push((pair.id, Collidable::ScoreZone));
                    }
                    zones_now.push(pair.id);
                }
                Collidable::None => {}
            }
        }
        self.inside_zones = zones_now;
        contacts
    }

    /// Sense and respond to contacts with the spawner's obstacles
    pub fn collide(&mut self, session: &mut GameSession, spawner: &mut ObstacleSpawner) {
        for (id, kind) in self.sense(spawner) {
            log::debug!("Actor touched {:?} of obstacle {}", kind, id);
            self.on_trigger_enter(kind, session, Some(&mut *spawner));
        }
    }

    /// Trigger contact with a categorized region
    pub fn on_trigger_enter(
        &mut self,
        kind: Collidable,
        session: &mut GameSession,
        spawner: Option<&mut ObstacleSpawner>,
    ) {
        if !self.simulated {
            return;
        }
        match kind {
            Collidable::Obstacle => self.die(session, spawner),
            Collidable::ScoreZone => session.add_score(),
            Collidable::None => {}
        }
    }

    /// Solid-body collision with anything
    pub fn on_collision_enter(
        &mut self,
        session: &mut GameSession,
        spawner: Option<&mut ObstacleSpawner>,
    ) {
        if self.simulated {
            self.die(session, spawner);
        }
    }

    /// End the run. Only the first call has any effect.
    pub fn die(&mut self, session: &mut GameSession, spawner: Option<&mut ObstacleSpawner>) {
        if !self.alive {
            return;
        }
        self.alive = false;
        self.velocity = 0.0;
        self.simulated = false;
        self.input_enabled = false;
        log::info!("Actor died at {:?}", self.pos);
        session.end_game(spawner);
    }

    /// Back to the pre-run pose
    pub fn reset(&mut self) {
        self.alive = true;
        self.started = false;
        self.pos = self.config.spawn_point;
        self.rotation = 0.0;
        self.velocity = 0.0;
        self.simulated = false;
        self.input_enabled = true;
        self.inside_zones.clear();
    }
}
