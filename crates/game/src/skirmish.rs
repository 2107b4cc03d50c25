//! Headless skirmish: the turn scheduler that drives every aircraft in the world.
//!
//! One turn is planning for everyone, then execution ticked at the fixed rate until
//! every aircraft has reached its head (or fallen out of the sky), then gunnery.

use std::time::Duration;

use anyhow::Result;
use engine_core::Time;
use glam::Vec2;
use hecs::{Entity, World};
use maneuver::{Aircraft, HeadProximity, MaxSeparation, Pilot, TickOutcome, TurnMachine};
use rand::prelude::*;

use crate::combat::{Gunnery, VolleyReport};
use crate::config::GameConfig;
use crate::pilot::{ChasePilot, Team};
use crate::spawner::AircraftSpawner;

/// Summary of one played turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReport {
    pub turn: u32,
    pub ticks: u32,
    pub players_alive: usize,
    pub enemies_alive: usize,
    pub removed: usize,
    pub volley: VolleyReport,
}

pub struct Skirmish {
    world: World,
    time: Time,
    rng: StdRng,
    config: GameConfig,
    gunnery: Gunnery,
    turn: u32,
}

impl Skirmish {
    pub fn new(config: GameConfig) -> Result<Self> {
        let mut world = World::new();
        let mut spawner = AircraftSpawner::new(config.seed);
        let half = config.arena_radius * 0.5;
        spawner.spawn_squadron(
            &mut world,
            Team::Player,
            config.player_count,
            Vec2::new(-half, 0.0),
            0.0,
            &config.maneuver,
        )?;
        spawner.spawn_squadron(
            &mut world,
            Team::Enemy,
            config.enemy_count,
            Vec2::new(half, 0.0),
            std::f32::consts::PI,
            &config.maneuver,
        )?;
        Ok(Self {
            world,
            time: Time::with_fixed_rate(config.ticks_per_second),
            rng: StdRng::seed_from_u64(config.seed.wrapping_add(1)),
            gunnery: Gunnery {
                range: config.gun_range,
                cone: config.gun_cone,
                damage: config.gun_damage,
            },
            config,
            turn: 0,
        })
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Simulated seconds flown so far.
    pub fn elapsed(&self) -> f32 {
        self.time.elapsed_seconds()
    }

    pub fn alive(&self, team: Team) -> usize {
        self.world
            .query::<(&Aircraft, &Team)>()
            .iter()
            .filter(|(_, (aircraft, t))| **t == team && aircraft.is_active())
            .count()
    }

    /// One side has nothing left in the air.
    pub fn is_over(&self) -> bool {
        self.alive(Team::Player) == 0 || self.alive(Team::Enemy) == 0
    }

    /// Point every pilot at the closest active hostile.
    fn assign_prey(&mut self) {
        let positions: Vec<(Vec2, Team)> = self
            .world
            .query::<(&Aircraft, &Team)>()
            .iter()
            .filter(|(_, (aircraft, _))| aircraft.is_active())
            .map(|(_, (aircraft, team))| (aircraft.transform().position, *team))
            .collect();
        for (_, (aircraft, team, pilot)) in
            self.world.query_mut::<(&Aircraft, &Team, &mut ChasePilot)>()
        {
            let own = aircraft.transform().position;
            pilot.prey = positions
                .iter()
                .filter(|(_, t)| *t == team.opponent())
                .map(|(p, _)| *p)
                .min_by(|a, b| a.distance_squared(own).total_cmp(&b.distance_squared(own)));
        }
    }

    fn plan(&mut self) -> Result<()> {
        self.assign_prey();
        let max_distance = self.config.maneuver.head_max_separation;
        // Player heads placed so far this turn; later players stay close to them.
        let mut player_heads: Vec<Vec2> = Vec::new();
        for (_, (aircraft, machine, pilot)) in self
            .world
            .query_mut::<(&mut Aircraft, &mut TurnMachine, &mut ChasePilot)>()
        {
            let separation = MaxSeparation {
                others: player_heads.clone(),
                max_distance,
            };
            let proximity: Option<&dyn HeadProximity> =
                if aircraft.controlled_by_player() && !player_heads.is_empty() {
                    Some(&separation)
                } else {
                    None
                };
            machine.begin_planning(aircraft, Some(pilot as &mut dyn Pilot), proximity)?;
            if aircraft.controlled_by_player() && aircraft.is_active() {
                player_heads.push(aircraft.head_position());
            }
        }
        Ok(())
    }

    fn execute(&mut self) -> Result<(u32, Vec<Entity>)> {
        for (_, (aircraft, machine)) in self.world.query_mut::<(&mut Aircraft, &mut TurnMachine)>() {
            machine.begin_execution(aircraft)?;
        }

        let frame = Duration::from_secs_f64(1.0 / self.config.ticks_per_second);
        // Generous cap; a turn normally ends after turn_duration * ticks_per_second ticks.
        let max_ticks = (self.config.maneuver.turn_duration as f64 * self.config.ticks_per_second * 2.0)
            .ceil() as u32
            + 10;
        let mut ticks = 0;
        let mut removed = Vec::new();
        let mut done = false;
        loop {
            self.time.advance(frame);
            while self.time.should_fixed_update() {
                let dt = self.time.fixed_timestep_seconds();
                ticks += 1;
                done = true;
                for (entity, (aircraft, machine)) in
                    self.world.query_mut::<(&mut Aircraft, &mut TurnMachine)>()
                {
                    if removed.contains(&entity) {
                        continue;
                    }
                    match machine.tick(aircraft, dt) {
                        TickOutcome::Moving => done = false,
                        TickOutcome::Removed => removed.push(entity),
                        TickOutcome::Finished | TickOutcome::Idle => {}
                    }
                }
            }
            if done || ticks >= max_ticks {
                if !done {
                    log::warn!("turn {} cut off after {} ticks", self.turn, ticks);
                }
                break;
            }
        }
        Ok((ticks, removed))
    }

    /// Play one full turn.
    pub fn play_turn(&mut self) -> Result<TurnReport> {
        self.turn += 1;
        self.plan()?;
        let (ticks, removed) = self.execute()?;
        let volley = self.gunnery.resolve(&mut self.world, &mut self.rng);
        for entity in &removed {
            self.world.despawn(*entity).ok();
        }
        let report = TurnReport {
            turn: self.turn,
            ticks,
            players_alive: self.alive(Team::Player),
            enemies_alive: self.alive(Team::Enemy),
            removed: removed.len(),
            volley,
        };
        log::info!(
            "turn {}: {} ticks, players {} / enemies {}, {} hits ({} shielded, {} parts lost), {} removed",
            report.turn,
            report.ticks,
            report.players_alive,
            report.enemies_alive,
            report.volley.hits,
            report.volley.shielded,
            report.volley.parts_destroyed,
            report.removed
        );
        Ok(report)
    }

    /// Play until one side is gone or the turn limit is reached.
    pub fn run(&mut self) -> Result<Vec<TurnReport>> {
        let mut reports = Vec::new();
        while self.turn < self.config.turns && !self.is_over() {
            reports.push(self.play_turn()?);
        }
        Ok(reports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> GameConfig {
        GameConfig {
            turns: 3,
            ticks_per_second: 30.0,
            player_count: 2,
            enemy_count: 2,
            ..Default::default()
        }
    }

    #[test]
    fn a_turn_runs_for_the_turn_duration() {
        let mut skirmish = Skirmish::new(small_config()).unwrap();
        let report = skirmish.play_turn().unwrap();
        // 2 s at 30 Hz
        assert!((59..=61).contains(&report.ticks), "ticks {}", report.ticks);
        assert_eq!(report.turn, 1);
    }

    #[test]
    fn same_seed_replays_the_same_fight() {
        let positions = |skirmish: &Skirmish| -> Vec<Vec2> {
            let mut p: Vec<Vec2> = skirmish
                .world()
                .query::<&Aircraft>()
                .iter()
                .map(|(_, a)| a.transform().position)
                .collect();
            p.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
            p
        };
        let mut a = Skirmish::new(small_config()).unwrap();
        let mut b = Skirmish::new(small_config()).unwrap();
        let ra = a.run().unwrap();
        let rb = b.run().unwrap();
        assert_eq!(ra, rb);
        assert_eq!(positions(&a), positions(&b));
    }

    #[test]
    fn player_heads_stay_together() {
        let mut skirmish = Skirmish::new(small_config()).unwrap();
        skirmish.plan().unwrap();
        let heads: Vec<Vec2> = skirmish
            .world()
            .query::<(&Aircraft, &Team)>()
            .iter()
            .filter(|(_, (_, t))| **t == Team::Player)
            .map(|(_, (a, _))| a.head_position())
            .collect();
        assert_eq!(heads.len(), 2);
        let max = skirmish.config.maneuver.head_max_separation;
        assert!(heads[0].distance(heads[1]) <= max + 1e-2);
    }
}
