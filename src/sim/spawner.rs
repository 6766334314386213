//! Timed obstacle spawning with difficulty escalation
//!
//! The spawner owns every live obstacle pair. While spawning it drops a new
//! pair at a random height every `spawn_interval` seconds and narrows the gap
//! a little after each one, down to `min_gap_limit`.

use std::collections::BTreeMap;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::obstacle::{ObstaclePair, ObstacleStatus};
use crate::settings::{ObstacleTemplate, SpawnerConfig};

#[derive(Debug, Clone)]
pub struct ObstacleSpawner {
    config: SpawnerConfig,
    template: ObstacleTemplate,
    /// Seconds accumulated toward the next spawn
    timer: f32,
    current_gap: f32,
    spawning: bool,
    /// Live obstacles keyed by id (id order keeps iteration deterministic)
    live: BTreeMap<u32, ObstaclePair>,
    next_id: u32,
    rng: Pcg32,
}

impl ObstacleSpawner {
    pub fn new(config: SpawnerConfig, template: ObstacleTemplate, seed: u64) -> Self {
        let current_gap = config.max_gap;
        Self {
            config,
            template,
            timer: 0.0,
            current_gap,
            spawning: false,
            live: BTreeMap::new(),
            next_id: 1,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Advance the spawn timer. Returns the id of the pair spawned this step.
    pub fn update(&mut self, dt: f32) -> Option<u32> {
        if !self.spawning {
            return None;
        }

        self.timer += dt;
        if self.timer < self.config.spawn_interval {
            return None;
        }

        let id = self.spawn_pipe();
        self.timer = 0.0;

        if self.config.escalate && self.current_gap > self.config.min_gap_limit {
            self.current_gap =
                (self.current_gap - self.config.escalation_rate).max(self.config.min_gap_limit);
        }

        Some(id)
    }

    /// Create one pair at a random height and start it moving
    pub fn spawn_pipe(&mut self) -> u32 {
        let (lo, hi) = (self.config.min_height, self.config.max_height);
        let y = if lo < hi {
            self.rng.random_range(lo..=hi)
        } else {
            lo
        };

        let id = self.next_id;
        self.next_id += 1;

        let mut pair = self
            .template
            .instantiate(id, Vec2::new(self.config.spawn_x, y));
        pair.start_moving();

        let jitter = if self.config.gap_jitter > 0.0 {
            self.rng.random_range(0.0..=self.config.gap_jitter)
        } else {
            0.0
        };
        // Never below the floor, even if the config or jitter would allow it
        let gap = (self.current_gap - jitter).max(self.config.min_gap_limit);
        pair.set_gap(gap);

        log::debug!("Spawned obstacle {} at y={:.2} gap={:.2}", id, y, gap);
        self.live.insert(id, pair);
        id
    }

    /// Begin a session: spawn on the next update, full gap again
    pub fn start_spawning(&mut self) {
        self.spawning = true;
        self.timer = self.config.spawn_interval;
        self.current_gap = self.config.max_gap;
        log::info!("Spawner started (gap {:.2})", self.current_gap);
    }

    /// Stop spawning and freeze every live obstacle in place
    pub fn stop_spawning(&mut self) {
        self.spawning = false;
        for pair in self.live.values_mut() {
            pair.stop_moving();
        }
        log::info!("Spawner stopped, {} obstacles frozen", self.live.len());
    }

    /// Drop every live obstacle
    pub fn clear_all_pipes(&mut self) {
        let cleared = self.live.len();
        self.live.clear();
        log::info!("Cleared {} obstacles", cleared);
    }

    /// Move every live obstacle and drop the ones that left the field.
    /// Returns how many were removed.
    pub fn update_obstacles(&mut self, dt: f32) -> usize {
        let mut gone = Vec::new();
        for (id, pair) in self.live.iter_mut() {
            if pair.update(dt) == ObstacleStatus::OutOfBounds {
                gone.push(*id);
            }
        }
        for id in &gone {
            self.live.remove(id);
            log::debug!("Obstacle {} left the field", id);
        }
        gone.len()
    }

    pub fn obstacles(&self) -> impl Iterator<Item = &ObstaclePair> {
        self.live.values()
    }

    pub fn obstacle(&self, id: u32) -> Option<&ObstaclePair> {
        self.live.get(&id)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn is_spawning(&self) -> bool {
        self.spawning
    }

    pub fn current_gap(&self) -> f32 {
        self.current_gap
    }

    pub fn timer(&self) -> f32 {
        self.timer
    }

    pub fn config(&self) -> &SpawnerConfig {
        &self.config
    }
}
