//! 2D pose used by everything that flies: a position on the sky plane and a heading.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Position and heading on the sky plane.
///
/// Headings are radians, counter-clockwise, with 0 pointing along +X ("east").
/// Body-local space always has the nose on +X and the left wing on +Y.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Transform2D {
    pub position: Vec2,
    pub rotation: f32,
}

impl Transform2D {
    /// Create a transform with position and heading.
    pub fn from_position_rotation(position: Vec2, rotation: f32) -> Self {
        Self {
            position,
            rotation: wrap_angle(rotation),
        }
    }

    /// Unit vector along the nose.
    pub fn forward(&self) -> Vec2 {
        Vec2::from_angle(self.rotation)
    }

    /// Translate the transform by a delta.
    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    /// Turn by `angle` radians (positive = left).
    pub fn rotate_by(&mut self, angle: f32) {
        self.rotation = wrap_angle(self.rotation + angle);
    }

    /// Set the heading.
    pub fn rotate_to(&mut self, heading: f32) {
        self.rotation = wrap_angle(heading);
    }

    /// Map a body-local point into world space.
    pub fn to_world(&self, local: Vec2) -> Vec2 {
        self.position + self.forward().rotate(local)
    }

    /// Map a world point into body-local space.
    pub fn to_local(&self, world: Vec2) -> Vec2 {
        Vec2::from_angle(-self.rotation).rotate(world - self.position)
    }
}

/// Wrap an angle into `(-PI, PI]`.
pub fn wrap_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let mut a = angle % TAU;
    if a <= -PI {
        a += TAU;
    } else if a > PI {
        a -= TAU;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn local_world_roundtrip() {
        let t = Transform2D::from_position_rotation(Vec2::new(10.0, -4.0), 0.7);
        let local = Vec2::new(3.0, 5.0);
        let back = t.to_local(t.to_world(local));
        assert!((back - local).length() < 1e-4);
    }

    #[test]
    fn nose_and_left_wing_axes() {
        let t = Transform2D::from_position_rotation(Vec2::ZERO, FRAC_PI_2);
        assert!((t.forward() - Vec2::Y).length() < 1e-6);
        // left wing points west
        assert!((t.to_world(Vec2::Y) + Vec2::X).length() < 1e-6);
    }

    #[test]
    fn wrap_angle_stays_in_range() {
        for raw in [-10.0_f32, -3.2, 0.0, 3.2, 7.0, 100.0] {
            let w = wrap_angle(raw);
            assert!(w > -std::f32::consts::PI - 1e-6 && w <= std::f32::consts::PI + 1e-6);
            assert!((w.cos() - raw.cos()).abs() < 1e-4);
            assert!((w.sin() - raw.sin()).abs() < 1e-4);
        }
    }
}
