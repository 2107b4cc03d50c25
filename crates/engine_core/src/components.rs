//! Small components shared by parts and aircraft.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Velocity on the sky plane.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub linear: Vec2,
}

impl Velocity {
    /// Velocity implied by moving from `from` to `to` in `dt` seconds.
    pub fn from_displacement(from: Vec2, to: Vec2, dt: f32) -> Self {
        if dt <= 0.0 {
            return Self::default();
        }
        Self {
            linear: (to - from) / dt,
        }
    }

    pub fn speed(&self) -> f32 {
        self.linear.length()
    }
}

/// Hit points of a part.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    /// Apply damage; returns true when this hit brought the health to zero.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        let was_alive = !self.is_dead();
        self.current = (self.current - amount.max(0.0)).max(0.0);
        was_alive && self.is_dead()
    }

    /// Repair up to `amount`, never above max.
    pub fn repair(&mut self, amount: f32) {
        self.current = (self.current + amount.max(0.0)).min(self.max);
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }
}

impl Default for Health {
    fn default() -> Self {
        Self::new(10.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lethal_hit_reported_once() {
        let mut health = Health::new(8.0);
        assert!(!health.take_damage(5.0));
        assert!(health.take_damage(5.0));
        assert!(!health.take_damage(1.0));
        assert_eq!(health.current, 0.0);
        health.repair(100.0);
        assert_eq!(health.current, 8.0);
    }

    #[test]
    fn velocity_from_displacement() {
        let v = Velocity::from_displacement(Vec2::ZERO, Vec2::new(3.0, 4.0), 0.5);
        assert_eq!(v.linear, Vec2::new(6.0, 8.0));
        assert_eq!(v.speed(), 10.0);
        assert_eq!(Velocity::from_displacement(Vec2::ZERO, Vec2::ONE, 0.0).speed(), 0.0);
    }
}
