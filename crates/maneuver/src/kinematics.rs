//! Energy → displacement for one turn.
//!
//! A turn is flown as constant-radius circular motion: kinetic energy sets the
//! speed along the arc, rotational energy sets the turn rate. Positive rotational
//! energy turns left (counter-clockwise in body space), negative turns right.

use glam::Vec2;

use crate::config::ManeuverConfig;

/// Mass properties and turn constants needed to project energies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicProjector {
    pub mass: f32,
    pub moment_of_inertia: f32,
    /// World units per unit of energy-derived speed.
    pub scale: f32,
    pub turn_duration: f32,
}

impl KinematicProjector {
    pub fn new(mass: f32, moment_of_inertia: f32, config: &ManeuverConfig) -> Self {
        Self {
            mass,
            moment_of_inertia,
            scale: config.standard_scale,
            turn_duration: config.turn_duration,
        }
    }

    /// Speed along the arc for a kinetic energy.
    pub fn speed(&self, ekin: f32) -> f32 {
        if self.mass <= 0.0 {
            return 0.0;
        }
        (2.0 * ekin.max(0.0) / self.mass).sqrt() * self.scale
    }

    /// Signed turn rate (rad/s) for a rotational energy.
    ///
    /// Without a positive moment of inertia there is nothing to turn; the
    /// aircraft then flies straight instead of dividing by zero.
    pub fn turn_rate(&self, erot: f32) -> f32 {
        if erot == 0.0 {
            return 0.0;
        }
        if self.moment_of_inertia <= 0.0 {
            log::debug!(
                "moment of inertia {} with Erot {}, flying straight",
                self.moment_of_inertia,
                erot
            );
            return 0.0;
        }
        erot.signum() * (2.0 * erot.abs() / self.moment_of_inertia).sqrt()
    }

    /// Body-local displacement after one turn with the given energies.
    pub fn project(&self, ekin: f32, erot: f32) -> Vec2 {
        let w = self.turn_rate(erot);
        let distance = self.speed(ekin) * self.turn_duration;
        if w == 0.0 {
            return Vec2::new(distance, 0.0);
        }
        let phi_max = w * self.turn_duration;
        let radius = (distance / phi_max).abs();
        let circle = Vec2::new(0.0, if w > 0.0 { radius } else { -radius });
        // Rotate the start point (the origin) about the circle center.
        circle + Vec2::from_angle(phi_max).rotate(-circle)
    }

    /// Heading change over one turn with the given rotational energy.
    pub fn end_heading(&self, erot: f32) -> f32 {
        self.turn_rate(erot) * self.turn_duration
    }
}
