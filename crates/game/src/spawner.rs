//! Squadron spawning.
//!
//! Each squadron flies in a line abreast facing the other one. The airframe of
//! every slot is rolled from a small weighted roster so no two seeds play alike.

use anyhow::{Context, Result};
use engine_core::Transform2D;
use glam::Vec2;
use hecs::{Entity, World};
use maneuver::{Aircraft, Catalog, ManeuverConfig, PartTree, TurnMachine};
use rand::prelude::*;

use crate::pilot::{ChasePilot, Team};

/// Spacing between aircraft in a line abreast.
const FORMATION_SPACING: f32 = 150.0;

/// Airframes a squadron is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Airframe {
    Fighter,
    Bomber,
    Potato,
}

impl Airframe {
    pub fn build(self, catalog: &Catalog) -> maneuver::Result<PartTree> {
        match self {
            Airframe::Fighter => catalog.fighter(),
            Airframe::Bomber => catalog.bomber(),
            Airframe::Potato => catalog.potato_plane(),
        }
    }
}

pub struct AircraftSpawner {
    catalog: Catalog,
    rng: StdRng,
}

impl AircraftSpawner {
    pub fn new(seed: u64) -> Self {
        Self {
            catalog: Catalog::default(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Roll an airframe: mostly fighters, some bombers, the odd potato.
    pub fn random_airframe(&mut self) -> Airframe {
        let roll = self.rng.gen::<f32>();
        if roll < 0.6 {
            Airframe::Fighter
        } else if roll < 0.85 {
            Airframe::Bomber
        } else {
            Airframe::Potato
        }
    }

    /// Spawn `count` aircraft for `team` centred on `center`, noses along `heading`.
    pub fn spawn_squadron(
        &mut self,
        world: &mut World,
        team: Team,
        count: usize,
        center: Vec2,
        heading: f32,
        config: &ManeuverConfig,
    ) -> Result<Vec<Entity>> {
        let abreast = Vec2::from_angle(heading).perp();
        let mut spawned = Vec::with_capacity(count);
        for i in 0..count {
            let slot = i as f32 - (count as f32 - 1.0) * 0.5;
            let position = center + abreast * slot * FORMATION_SPACING;
            let airframe = self.random_airframe();
            let parts = airframe
                .build(&self.catalog)
                .with_context(|| format!("building {:?}", airframe))?;
            let mut aircraft = Aircraft::new(
                parts,
                Transform2D::from_position_rotation(position, heading),
                config.clone(),
            )
            .with_context(|| format!("assembling {:?} for {:?}", airframe, team))?;
            aircraft.set_controlled_by_player(team == Team::Player);
            let pilot = ChasePilot::new(self.rng.gen());
            spawned.push(world.spawn((aircraft, TurnMachine::new(), pilot, team)));
            log::debug!("spawned {:?} for {:?} at {:?}", airframe, team, position);
        }
        Ok(spawned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn squadron_lines_up_abreast() {
        let mut world = World::new();
        let mut spawner = AircraftSpawner::new(5);
        let entities = spawner
            .spawn_squadron(&mut world, Team::Enemy, 3, Vec2::new(800.0, 0.0), std::f32::consts::PI, &ManeuverConfig::default())
            .unwrap();
        assert_eq!(entities.len(), 3);
        for e in &entities {
            let team = world.get::<&Team>(*e).unwrap();
            assert_eq!(*team, Team::Enemy);
            let aircraft = world.get::<&Aircraft>(*e).unwrap();
            assert!(aircraft.is_active());
            assert!(!aircraft.controlled_by_player());
        }
    }

    #[test]
    fn same_seed_same_roster() {
        let mut a = AircraftSpawner::new(11);
        let mut b = AircraftSpawner::new(11);
        for _ in 0..20 {
            assert_eq!(a.random_airframe(), b.random_airframe());
        }
    }
}
