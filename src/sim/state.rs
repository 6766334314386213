//! Per-scene simulation state
//!
//! The actor and the spawner live as long as the scene and are reset in place
//! between runs. The `GameSession` is created once and passed alongside.

use serde::{Deserialize, Serialize};

use super::actor::Actor;
use super::spawner::ObstacleSpawner;
use crate::settings::GameConfig;

#[derive(Debug, Clone)]
pub struct Scene {
    pub actor: Actor,
    pub spawner: ObstacleSpawner,
    /// Simulation tick counter (advances only while not paused)
    pub time_ticks: u64,
}

impl Scene {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            actor: Actor::new(config.actor.clone()),
            spawner: ObstacleSpawner::new(
                config.spawner.clone(),
                config.obstacle.clone(),
                config.seed,
            ),
            time_ticks: 0,
        }
    }

    /// Put the actor back on its spawn point and empty the field
    pub fn reset(&mut self) {
        self.actor.reset();
        self.spawner.stop_spawning();
        self.spawner.clear_all_pipes();
    }

    pub fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot {
            time_ticks: self.time_ticks,
            actor: self.actor.clone(),
            obstacles: self
                .spawner
                .obstacles()
                .map(|p| ObstacleSnapshot {
                    id: p.id,
                    x: p.pos.x,
                    y: p.pos.y,
                    gap: p.gap,
                })
                .collect(),
            current_gap: self.spawner.current_gap(),
        }
    }
}

/// Serializable view of the scene for presentation or replay comparison
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneSnapshot {
    pub time_ticks: u64,
    pub actor: Actor,
    pub obstacles: Vec<ObstacleSnapshot>,
    pub current_gap: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSnapshot {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub gap: f32,
}
