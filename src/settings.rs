//! Game tuning
//!
//! All gameplay numbers in one serializable struct. Defaults reproduce the
//! classic feel; a JSON file can override any subset of fields.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::SkyflapError;

/// Actor physics and play-area bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorConfig {
    /// Upward impulse applied on each flap
    pub jump_force: f32,
    /// Body mass (impulse / mass = velocity change)
    pub mass: f32,
    /// World gravity (negative = down)
    pub gravity: f32,
    /// Per-body gravity multiplier
    pub gravity_scale: f32,
    /// Rotation smoothing rate (per second)
    pub rotation_speed: f32,
    /// Vertical play area
    pub min_height: f32,
    pub max_height: f32,
    /// Where the actor sits before a run starts
    pub spawn_point: Vec2,
    /// Collision circle radius
    pub radius: f32,
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            jump_force: 5.0,
            mass: 1.0,
            gravity: -9.81,
            gravity_scale: 1.0,
            rotation_speed: 5.0,
            min_height: -5.0,
            max_height: 5.0,
            spawn_point: Vec2::new(-3.0, 0.0),
            radius: 0.25,
        }
    }
}

/// Spawn cadence, placement and difficulty escalation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerConfig {
    /// Seconds between spawns
    pub spawn_interval: f32,
    /// Horizontal spawn position
    pub spawn_x: f32,
    /// Range for the random vertical center
    pub min_height: f32,
    pub max_height: f32,
    /// Gap at the start of every session
    pub max_gap: f32,
    /// Random amount (0..=jitter) taken off the gap per spawn
    pub gap_jitter: f32,
    /// Shrink the gap after every spawn
    pub escalate: bool,
    /// Gap shrink per spawn
    pub escalation_rate: f32,
    /// The gap never goes below this
    pub min_gap_limit: f32,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            spawn_interval: 2.0,
            spawn_x: 10.0,
            min_height: -2.0,
            max_height: 2.0,
            max_gap: 4.5,
            gap_jitter: 0.0,
            escalate: true,
            escalation_rate: 0.1,
            min_gap_limit: 2.5,
        }
    }
}

/// Shape and motion of every spawned obstacle pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleTemplate {
    /// Leftward scroll speed (units per second)
    pub speed: f32,
    /// Obstacles left of this x are removed
    pub destroy_x: f32,
    /// Width of the top and bottom halves
    pub width: f32,
    /// Height of each half
    pub segment_height: f32,
    /// Width of the scoring sensor between the halves
    pub score_zone_width: f32,
}

impl Default for ObstacleTemplate {
    fn default() -> Self {
        Self {
            speed: 3.0,
            destroy_x: -12.0,
            width: 1.0,
            segment_height: 5.0,
            score_zone_width: 0.2,
        }
    }
}

/// Complete game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// RNG seed for obstacle placement
    pub seed: u64,
    pub actor: ActorConfig,
    pub spawner: SpawnerConfig,
    pub obstacle: ObstacleTemplate,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 0x5EED,
            actor: ActorConfig::default(),
            spawner: SpawnerConfig::default(),
            obstacle: ObstacleTemplate::default(),
        }
    }
}

impl GameConfig {
    /// Parse from JSON (missing fields take defaults) and sanitize
    pub fn from_json(json: &str) -> Result<Self, SkyflapError> {
        let config: GameConfig = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    pub fn to_json(&self) -> Result<String, SkyflapError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load from a JSON file, falling back to defaults on any error
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path)
            .map_err(SkyflapError::from)
            .and_then(|json| Self::from_json(&json))
        {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Using default config ({}): {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Repair values that would break simulation invariants
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        let a = &mut self.actor;
        if a.mass <= 0.0 {
            log::warn!("actor.mass must be positive, using {}", defaults.actor.mass);
            a.mass = defaults.actor.mass;
        }
        if a.min_height > a.max_height {
            std::mem::swap(&mut a.min_height, &mut a.max_height);
        }
        a.radius = a.radius.max(0.0);
        a.rotation_speed = a.rotation_speed.max(0.0);

        let s = &mut self.spawner;
        if s.spawn_interval <= 0.0 {
            log::warn!(
                "spawner.spawn_interval must be positive, using {}",
                defaults.spawner.spawn_interval
            );
            s.spawn_interval = defaults.spawner.spawn_interval;
        }
        if s.min_height > s.max_height {
            std::mem::swap(&mut s.min_height, &mut s.max_height);
        }
        if s.min_gap_limit <= 0.0 {
            s.min_gap_limit = defaults.spawner.min_gap_limit;
        }
        // Starting gap below the floor would make escalation a no-op anyway
        s.max_gap = s.max_gap.max(s.min_gap_limit);
        s.gap_jitter = s.gap_jitter.max(0.0);
        s.escalation_rate = s.escalation_rate.max(0.0);

        let o = &mut self.obstacle;
        o.width = o.width.max(0.0);
        o.segment_height = o.segment_height.max(0.0);
        o.score_zone_width = o.score_zone_width.max(0.0);

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = GameConfig::from_json(r#"{ "spawner": { "spawn_interval": 1.5 } }"#).unwrap();
        assert_eq!(config.spawner.spawn_interval, 1.5);
        assert_eq!(config.spawner.max_gap, 4.5);
        assert_eq!(config.actor, ActorConfig::default());
    }

    #[test]
    fn test_sanitize_repairs_bad_values() {
        let json = r#"{
            "actor": { "mass": 0.0, "min_height": 5.0, "max_height": -5.0 },
            "spawner": { "spawn_interval": -1.0, "min_height": 3.0, "max_height": 1.0,
                         "max_gap": 1.0, "min_gap_limit": 2.0 }
        }"#;
        let config = GameConfig::from_json(json).unwrap();
        assert_eq!(config.actor.mass, 1.0);
        assert!(config.actor.min_height < config.actor.max_height);
        assert_eq!(config.spawner.spawn_interval, 2.0);
        assert_eq!((config.spawner.min_height, config.spawner.max_height), (1.0, 3.0));
        assert_eq!(config.spawner.max_gap, 2.0);
    }

    #[test]
    fn test_json_round_trip() {
        let config = GameConfig::default();
        let back = GameConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = GameConfig::load(Path::new("/definitely/not/here.json"));
        assert_eq!(config, GameConfig::default());
    }
}
