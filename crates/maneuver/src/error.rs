//! Error type for the maneuver crate.
//!
//! Degenerate geometry never shows up here: an envelope with too few samples falls
//! back to a minimal polygon, a non-positive moment of inertia flies straight, and a
//! head outside the envelope is clamped. What remains are construction and
//! persistence failures.

use thiserror::Error;

use crate::part::PartId;
use crate::power_up::PowerType;

#[derive(Debug, Error)]
pub enum ManeuverError {
    #[error("a spline polygon needs at least {min} control points, got {got}")]
    TooFewControlPoints { got: usize, min: usize },

    #[error("invalid maneuver ability: power {power_min}..{power_max}, rotation bonus {bonus_min}..{bonus_max}")]
    InvalidManeuverAbility {
        power_min: f32,
        power_max: f32,
        bonus_min: f32,
        bonus_max: f32,
    },

    #[error("no part with id {0:?}")]
    UnknownPart(PartId),

    #[error("part tree has no body")]
    MissingBody,

    #[error("unknown part template '{0}'")]
    UnknownTemplate(String),

    #[error("power-up {0:?} is not available")]
    PowerUnavailable(PowerType),

    #[error("could not serialize part tree: {0}")]
    Serialize(#[from] ron::Error),

    #[error("could not parse part tree: {0}")]
    Deserialize(#[from] ron::error::SpannedError),
}

pub type Result<T> = std::result::Result<T, ManeuverError>;
