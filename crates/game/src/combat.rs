//! Gunnery, resolved once at the end of each turn.
//!
//! Every active aircraft fires each working gun at the closest hostile inside its
//! forward cone. A hit lands on a random active part of the target; a selected
//! Shield swallows it.

use glam::Vec2;
use hecs::{Entity, World};
use maneuver::{Aircraft, PartId, PartKind, PowerType};
use rand::prelude::*;

use crate::pilot::Team;

/// Gun settings, taken from the game config.
#[derive(Debug, Clone, Copy)]
pub struct Gunnery {
    pub range: f32,
    /// Half-angle of the firing cone, radians.
    pub cone: f32,
    pub damage: f32,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct VolleyReport {
    pub hits: u32,
    pub shielded: u32,
    pub parts_destroyed: u32,
}

struct Shot {
    target: Entity,
    guns: u32,
}

impl Gunnery {
    /// Whether `target` sits inside the firing cone of a gun on `shooter`.
    pub fn in_cone(&self, shooter: &Aircraft, target: Vec2) -> bool {
        let local = shooter.transform().to_local(target);
        let distance = local.length();
        distance > 0.0 && distance <= self.range && local.y.atan2(local.x).abs() <= self.cone
    }

    /// Fire every gun once and apply the damage.
    pub fn resolve(&self, world: &mut World, rng: &mut StdRng) -> VolleyReport {
        let targets: Vec<(Entity, Vec2, Team)> = world
            .query::<(&Aircraft, &Team)>()
            .iter()
            .filter(|(_, (aircraft, _))| aircraft.is_active())
            .map(|(e, (aircraft, team))| (e, aircraft.transform().position, *team))
            .collect();

        let mut shots = Vec::new();
        for (_, (aircraft, team)) in world.query::<(&Aircraft, &Team)>().iter() {
            if !aircraft.is_active() {
                continue;
            }
            let guns = aircraft
                .parts()
                .active_parts()
                .filter(|(_, p)| p.kind == PartKind::Gun)
                .count() as u32;
            if guns == 0 {
                continue;
            }
            let position = aircraft.transform().position;
            let target = targets
                .iter()
                .filter(|(_, p, t)| *t == team.opponent() && self.in_cone(aircraft, *p))
                .min_by(|a, b| a.1.distance_squared(position).total_cmp(&b.1.distance_squared(position)));
            if let Some(&(target, _, _)) = target {
                shots.push(Shot { target, guns });
            }
        }

        let mut report = VolleyReport::default();
        for shot in shots {
            let Ok(mut aircraft) = world.get::<&mut Aircraft>(shot.target) else {
                continue;
            };
            for _ in 0..shot.guns {
                if !aircraft.is_active() {
                    break;
                }
                if aircraft.selected_power() == PowerType::Shield {
                    report.shielded += 1;
                    continue;
                }
                let parts: Vec<PartId> = aircraft.parts().active_parts().map(|(id, _)| id).collect();
                let Some(&part) = parts.choose(rng) else {
                    break;
                };
                report.hits += 1;
                match aircraft.damage_part(part, self.damage) {
                    Ok(true) => report.parts_destroyed += 1,
                    Ok(false) => {}
                    Err(e) => log::warn!("hit on {:?} failed: {}", part, e),
                }
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::Transform2D;
    use maneuver::{Catalog, ManeuverConfig, TurnMachine};

    fn gunnery() -> Gunnery {
        Gunnery {
            range: 600.0,
            cone: 0.35,
            damage: 4.0,
        }
    }

    fn spawn(world: &mut World, team: Team, position: Vec2, heading: f32) -> Entity {
        let tree = Catalog::default().fighter().unwrap();
        let aircraft = Aircraft::new(
            tree,
            Transform2D::from_position_rotation(position, heading),
            ManeuverConfig::default(),
        )
        .unwrap();
        world.spawn((aircraft, TurnMachine::new(), team))
    }

    #[test]
    fn cone_and_range() {
        let mut world = World::new();
        let e = spawn(&mut world, Team::Player, Vec2::ZERO, 0.0);
        let shooter = world.get::<&Aircraft>(e).unwrap();
        let g = gunnery();
        let origin = shooter.transform().position;
        assert!(g.in_cone(&shooter, origin + Vec2::new(300.0, 20.0)));
        assert!(!g.in_cone(&shooter, origin + Vec2::new(-300.0, 0.0)));
        assert!(!g.in_cone(&shooter, origin + Vec2::new(900.0, 0.0)));
    }

    #[test]
    fn facing_fighters_trade_hits() {
        let mut world = World::new();
        let a = spawn(&mut world, Team::Player, Vec2::ZERO, 0.0);
        let b = spawn(&mut world, Team::Enemy, Vec2::new(300.0, 0.0), std::f32::consts::PI);
        let mut rng = StdRng::seed_from_u64(1);
        let report = gunnery().resolve(&mut world, &mut rng);
        assert_eq!(report.hits, 2);
        for e in [a, b] {
            let aircraft = world.get::<&Aircraft>(e).unwrap();
            assert!(aircraft.health() < aircraft.max_health());
        }
    }

    #[test]
    fn shield_swallows_the_hit() {
        let mut world = World::new();
        spawn(&mut world, Team::Player, Vec2::ZERO, 0.0);
        let target = spawn(&mut world, Team::Enemy, Vec2::new(300.0, 0.0), 0.0);
        world
            .get::<&mut Aircraft>(target)
            .unwrap()
            .select_power(PowerType::Shield, None)
            .unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let report = gunnery().resolve(&mut world, &mut rng);
        assert_eq!(report, VolleyReport { hits: 0, shielded: 1, parts_destroyed: 0 });
    }
}
