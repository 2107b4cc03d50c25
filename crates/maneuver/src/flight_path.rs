//! Flight-path head and the controller that flies the aircraft to it.

use engine_core::Transform2D;
use glam::Vec2;

use crate::path::TravelPath;
use crate::power_up::PowerType;
use crate::spline::SplinePolygon;

/// Where the aircraft will be at the end of the turn, and what it spends to get there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightPathHead {
    pub position: Vec2,
    /// Heading on arrival, radians.
    pub rotation: f32,
    pub power: PowerType,
}

/// Correction applied to a player head after it was clamped into the envelope.
pub trait HeadProximity {
    fn adjust(&self, head: Vec2) -> Vec2;
}

/// Keeps a head within `max_distance` of every other head in `others`.
#[derive(Debug, Clone, PartialEq)]
pub struct MaxSeparation {
    pub others: Vec<Vec2>,
    pub max_distance: f32,
}

impl HeadProximity for MaxSeparation {
    /// Pull the head toward the nearest head it is too far from until it is in range.
    /// A single pass per other head; when heads are themselves spread wider than
    /// `max_distance` the last pull wins.
    fn adjust(&self, head: Vec2) -> Vec2 {
        let mut head = head;
        for _ in 0..self.others.len() {
            let offender = self
                .others
                .iter()
                .copied()
                .filter(|o| o.distance(head) > self.max_distance)
                .min_by(|a, b| a.distance_squared(head).total_cmp(&b.distance_squared(head)));
            let Some(other) = offender else {
                break;
            };
            head = other + (head - other).normalize_or_zero() * self.max_distance;
        }
        head
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlightPathController {
    head: FlightPathHead,
    path: TravelPath,
}

impl FlightPathController {
    /// Controller parked on the aircraft.
    pub fn new(pose: &Transform2D) -> Self {
        Self {
            head: FlightPathHead {
                position: pose.position,
                rotation: pose.rotation,
                power: PowerType::Normal,
            },
            path: TravelPath::stationary(pose.position, pose.rotation),
        }
    }

    pub fn head(&self) -> &FlightPathHead {
        &self.head
    }

    pub fn path(&self) -> &TravelPath {
        &self.path
    }

    /// Place the head at the point of `polygon` closest to `point`, then rebuild the
    /// path from the aircraft pose to it.
    pub fn move_head_to(
        &mut self,
        point: Vec2,
        pose: &Transform2D,
        polygon: &SplinePolygon,
        proximity: Option<&dyn HeadProximity>,
    ) {
        let mut target = polygon.closest_point_inside(point);
        if let Some(proximity) = proximity {
            target = proximity.adjust(target);
        }
        self.head.position = target;
        self.path = TravelPath::new(pose.position, pose.rotation, target);
        self.head.rotation = self.path.end_direction();
    }

    /// Default head: `extent` straight ahead of the aircraft, clamped.
    pub fn reset_head_position(
        &mut self,
        pose: &Transform2D,
        extent: f32,
        polygon: &SplinePolygon,
        proximity: Option<&dyn HeadProximity>,
    ) {
        let ahead = pose.position + pose.forward() * extent;
        self.move_head_to(ahead, pose, polygon, proximity);
    }

    /// Back to the plain head.
    pub fn reset_head(&mut self) {
        self.head.power = PowerType::Normal;
    }

    pub fn set_power(&mut self, power: PowerType) {
        self.head.power = power;
    }

    /// Fly `dt` worth of the turn. Returns true once the aircraft sits on the path end.
    pub fn advance(&self, dt: f32, turn_duration: f32, pose: &mut Transform2D) -> bool {
        let distance = dt / turn_duration * self.path.total_length();
        let (destination, direction) = self.path.advance(pose.position, distance);
        pose.position = destination;
        pose.rotate_to(direction);
        destination == self.path.end_point()
    }
}
