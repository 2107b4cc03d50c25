//! AI pilots: fly at the nearest enemy and spend power-ups now and then.

use glam::Vec2;
use maneuver::{Aircraft, Pilot, PowerType};
use rand::prelude::*;

/// How far the aim point wanders around the prey.
const AIM_JITTER: f32 = 60.0;
/// Chance per turn to spend a power-up when one is useful.
const POWER_CHANCE: f32 = 0.3;

/// Which squadron an aircraft flies for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Team {
    Player,
    Enemy,
}

impl Team {
    pub fn opponent(self) -> Team {
        match self {
            Team::Player => Team::Enemy,
            Team::Enemy => Team::Player,
        }
    }
}

/// Chases `prey` with a bit of noise so squadrons don't stack on one point.
pub struct ChasePilot {
    /// World position to chase this turn; `None` keeps the default head.
    pub prey: Option<Vec2>,
    rng: StdRng,
}

impl ChasePilot {
    pub fn new(seed: u64) -> Self {
        Self {
            prey: None,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn useful(power: PowerType, aircraft: &Aircraft, prey: Option<Vec2>) -> bool {
        match power {
            PowerType::Normal => false,
            PowerType::Heal => aircraft.health() < aircraft.max_health(),
            PowerType::Boost => prey.map_or(false, |p| {
                p.distance(aircraft.transform().position) > aircraft.max_velocity()
            }),
            PowerType::BackTurn => prey.map_or(false, |p| {
                aircraft.transform().to_local(p).x < 0.0
            }),
            PowerType::Shield => true,
        }
    }
}

impl Pilot for ChasePilot {
    fn choose_target(&mut self, _aircraft: &Aircraft) -> Option<Vec2> {
        let prey = self.prey?;
        let jitter = Vec2::new(
            self.rng.gen_range(-AIM_JITTER..=AIM_JITTER),
            self.rng.gen_range(-AIM_JITTER..=AIM_JITTER),
        );
        Some(prey + jitter)
    }

    fn choose_power(&mut self, aircraft: &Aircraft) -> PowerType {
        let useful: Vec<PowerType> = aircraft
            .power_ups()
            .available()
            .into_iter()
            .filter(|&p| Self::useful(p, aircraft, self.prey))
            .collect();
        if useful.is_empty() || self.rng.gen::<f32>() >= POWER_CHANCE {
            return PowerType::Normal;
        }
        useful[self.rng.gen_range(0..useful.len())]
    }
}
