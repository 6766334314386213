//! Obstacle pairs
//!
//! A pair is two solid halves ("top" and "bottom") with a scoring sensor in
//! the gap between them. It only knows how to scroll left and when it has
//! left the field; the actor does the collision checks.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Aabb, Collidable, circle_aabb_collision};
use crate::settings::ObstacleTemplate;

/// Outcome of a movement step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleStatus {
    Active,
    /// Passed the destroy line; the owner should drop it
    OutOfBounds,
}

/// A single scrolling obstacle unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstaclePair {
    pub id: u32,
    /// Center of the pair (middle of the gap)
    pub pos: Vec2,
    /// Vertical clearance between the halves
    pub gap: f32,
    pub moving: bool,
    pub speed: f32,
    pub destroy_x: f32,
    /// Local y offset of the top half's center
    pub top_offset: f32,
    /// Local y offset of the bottom half's center
    pub bottom_offset: f32,
    width: f32,
    segment_height: f32,
    score_zone_width: f32,
}

impl ObstacleTemplate {
    /// Produce a stationary pair at `pos` with halves closed around the center.
    /// The spawner sets the gap and starts it moving.
    pub fn instantiate(&self, id: u32, pos: Vec2) -> ObstaclePair {
        let mut pair = ObstaclePair {
            id,
            pos,
            gap: 0.0,
            moving: false,
            speed: self.speed,
            destroy_x: self.destroy_x,
            top_offset: 0.0,
            bottom_offset: 0.0,
            width: self.width,
            segment_height: self.segment_height,
            score_zone_width: self.score_zone_width,
        };
        pair.set_gap(0.0);
        pair
    }
}

impl ObstaclePair {
    pub fn start_moving(&mut self) {
        self.moving = true;
    }

    pub fn stop_moving(&mut self) {
        self.moving = false;
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    /// Place the halves symmetrically so `gap` units separate their inner edges
    pub fn set_gap(&mut self, gap: f32) {
        self.gap = gap;
        let offset = gap / 2.0 + self.segment_height / 2.0;
        self.top_offset = offset;
        self.bottom_offset = -offset;
    }

    /// Scroll left; report when past the destroy line
    pub fn update(&mut self, dt: f32) -> ObstacleStatus {
        if !self.moving {
            return ObstacleStatus::Active;
        }
        self.pos.x -= self.speed * dt;
        if self.pos.x < self.destroy_x {
            ObstacleStatus::OutOfBounds
        } else {
            ObstacleStatus::Active
        }
    }

    pub fn top_region(&self) -> Aabb {
        Aabb::from_center_size(
            self.pos + Vec2::new(0.0, self.top_offset),
            Vec2::new(self.width, self.segment_height),
        )
    }

    pub fn bottom_region(&self) -> Aabb {
        Aabb::from_center_size(
            self.pos + Vec2::new(0.0, self.bottom_offset),
            Vec2::new(self.width, self.segment_height),
        )
    }

    /// Sensor spanning the gap
    pub fn score_zone(&self) -> Aabb {
        Aabb::from_center_size(self.pos, Vec2::new(self.score_zone_width, self.gap))
    }

    /// Classify what a circle at `center` touches. Solid halves win over the
    /// sensor.
    pub fn contact(&self, center: Vec2, radius: f32) -> Collidable {
        let solid = [self.top_region(), self.bottom_region()]
            .iter()
            .any(|region| circle_aabb_collision(center, radius, region));
        if solid {
            Collidable::Obstacle
        } else if circle_aabb_collision(center, radius, &self.score_zone()) {
            Collidable::ScoreZone
        } else {
            Collidable::None
        }
    }
}
