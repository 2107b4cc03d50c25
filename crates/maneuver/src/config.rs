//! Tunables of the maneuver model. Embedded in the game's `config.ron`; every field
//! falls back to its default when missing.

use serde::{Deserialize, Serialize};

use crate::power_up::BodyPowerTable;

/// Constants of the turn, the envelope walk and the post-death fall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManeuverConfig {
    /// Length of one turn in seconds.
    #[serde(default = "default_turn_duration")]
    pub turn_duration: f32,
    /// World units per unit of energy-derived speed.
    #[serde(default = "default_standard_scale")]
    pub standard_scale: f32,
    /// Minimal speed an aircraft needs to stay in the sky.
    #[serde(default = "default_v_min")]
    pub v_min: f32,
    /// Steps per part when ramping coefficients in the boundary walk.
    #[serde(default = "default_partitions")]
    pub partitions: u32,
    /// Straight-line reach below which the envelope is pushed forward.
    #[serde(default = "default_min_clearance")]
    pub min_clearance: f32,
    /// How far the envelope is pushed forward when it lacks clearance.
    #[serde(default = "default_clearance_shift")]
    pub clearance_shift: f32,
    /// Fallback quad distance as a fraction of one turn at the current speed.
    #[serde(default = "default_fallback_range_factor")]
    pub fallback_range_factor: f32,
    /// Constant term of the fall speed once shot down (negative = down).
    #[serde(default = "default_fall_base")]
    pub fall_base: f32,
    /// Altitude feedback of the fall speed.
    #[serde(default = "default_fall_gain")]
    pub fall_gain: f32,
    /// Altitude at which a falling aircraft hits the ground and is removed.
    #[serde(default = "default_ground_altitude")]
    pub ground_altitude: f32,
    /// Envelope scale while the Boost power-up is selected.
    #[serde(default = "default_boost_scale")]
    pub boost_scale: f32,
    /// Offset of the back-turn spot toward the left wing.
    #[serde(default = "default_back_turn_distance")]
    pub back_turn_distance: f32,
    /// Largest allowed distance between the heads of player aircraft.
    #[serde(default = "default_head_max_separation")]
    pub head_max_separation: f32,
    /// Power-ups awarded per body variant.
    #[serde(default)]
    pub power_ups: BodyPowerTable,
}

fn default_turn_duration() -> f32 {
    2.0
}
fn default_standard_scale() -> f32 {
    4.0
}
fn default_v_min() -> f32 {
    40.0
}
fn default_partitions() -> u32 {
    10
}
fn default_min_clearance() -> f32 {
    30.0
}
fn default_clearance_shift() -> f32 {
    10.0
}
fn default_fallback_range_factor() -> f32 {
    0.4
}
fn default_fall_base() -> f32 {
    -500.0
}
fn default_fall_gain() -> f32 {
    0.5
}
fn default_ground_altitude() -> f32 {
    -1000.0
}
fn default_boost_scale() -> f32 {
    2.0
}
fn default_back_turn_distance() -> f32 {
    140.0
}
fn default_head_max_separation() -> f32 {
    400.0
}

impl Default for ManeuverConfig {
    fn default() -> Self {
        Self {
            turn_duration: default_turn_duration(),
            standard_scale: default_standard_scale(),
            v_min: default_v_min(),
            partitions: default_partitions(),
            min_clearance: default_min_clearance(),
            clearance_shift: default_clearance_shift(),
            fallback_range_factor: default_fallback_range_factor(),
            fall_base: default_fall_base(),
            fall_gain: default_fall_gain(),
            ground_altitude: default_ground_altitude(),
            boost_scale: default_boost_scale(),
            back_turn_distance: default_back_turn_distance(),
            head_max_separation: default_head_max_separation(),
            power_ups: BodyPowerTable::default(),
        }
    }
}

impl ManeuverConfig {
    /// Replace values that would break the model (zero turn length, zero partitions)
    /// with their defaults.
    pub fn sanitized(mut self) -> Self {
        if !(self.turn_duration > 0.0) {
            log::warn!(
                "turn_duration {} is not positive, using {}",
                self.turn_duration,
                default_turn_duration()
            );
            self.turn_duration = default_turn_duration();
        }
        if self.partitions == 0 {
            log::warn!("partitions must be at least 1, using {}", default_partitions());
            self.partitions = default_partitions();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: ManeuverConfig = ron::from_str("(turn_duration: 3.0)").unwrap();
        assert_eq!(config.turn_duration, 3.0);
        assert_eq!(config.partitions, 10);
        assert_eq!(config.min_clearance, 30.0);
        assert_eq!(config.power_ups, BodyPowerTable::default());
    }

    #[test]
    fn sanitized_repairs_unusable_values() {
        let config = ManeuverConfig {
            turn_duration: 0.0,
            partitions: 0,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(config.turn_duration, 2.0);
        assert_eq!(config.partitions, 10);
    }
}
