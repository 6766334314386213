//! Collision detection for axis-aligned geometry
//!
//! The actor is a circle; obstacle halves and score zones are axis-aligned
//! boxes. Overlap is all the game needs: responses are category driven
//! (see `Collidable`), not physical.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// What the actor touched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Collidable {
    /// Solid obstacle half, ends the run
    Obstacle,
    /// Scoring sensor between the halves
    ScoreZone,
    None,
}

/// Axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size.abs() * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn contains_point(&self, p: Vec2) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// Closest point on (or in) the box to `p`
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min, self.max)
    }
}

/// Check overlap between a circle and a box
///
/// Touching edges count as a hit so a grazing pass still registers.
pub fn circle_aabb_collision(center: Vec2, radius: f32, aabb: &Aabb) -> bool {
    aabb.contains_point(center) || center.distance(aabb.closest_point(center)) <= radius
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Aabb {
        Aabb::from_center_size(Vec2::ZERO, Vec2::new(2.0, 2.0))
    }

    #[test]
    fn test_circle_inside_box() {
        assert!(circle_aabb_collision(Vec2::new(0.5, 0.0), 0.1, &unit_box()));
    }

    #[test]
    fn test_circle_overlapping_edge() {
        assert!(circle_aabb_collision(Vec2::new(1.2, 0.0), 0.25, &unit_box()));
        assert!(!circle_aabb_collision(Vec2::new(1.3, 0.0), 0.25, &unit_box()));
    }

    #[test]
    fn test_circle_touching_edge_hits() {
        assert!(circle_aabb_collision(Vec2::new(1.25, 0.0), 0.25, &unit_box()));
    }

    #[test]
    fn test_circle_near_corner_misses() {
        // Within radius on each axis, but not of the corner itself
        assert!(!circle_aabb_collision(Vec2::new(1.2, 1.2), 0.25, &unit_box()));
    }

    #[test]
    fn test_from_center_size_negative_size() {
        let b = Aabb::from_center_size(Vec2::new(1.0, 1.0), Vec2::new(-2.0, 4.0));
        assert_eq!(b.min, Vec2::new(0.0, -1.0));
        assert_eq!(b.max, Vec2::new(2.0, 3.0));
    }
}
