//! Circle-circle collision
//!
//! Every entity in the game is a circle, so one overlap test covers all
//! pairs.

use glam::Vec2;

/// Anything with a circular collision shape
pub trait Collider {
    fn center(&self) -> Vec2;
    fn radius(&self) -> f32;

    /// True if the two circles overlap. Touching (distance equal to the sum
    /// of radii) is not a collision.
    fn collides_with(&self, other: &dyn Collider) -> bool {
        circles_overlap(self.center(), self.radius(), other.center(), other.radius())
    }
}

/// Strict overlap test between two circles
#[inline]
pub fn circles_overlap(a_center: Vec2, a_radius: f32, b_center: Vec2, b_radius: f32) -> bool {
    a_center.distance(b_center) < a_radius + b_radius
}
