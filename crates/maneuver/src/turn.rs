//! Per-aircraft turn phases.
//!
//! The scheduler outside this crate drives every aircraft through the same cycle:
//! `begin_planning` for all of them, then `begin_execution`, then `tick` each frame
//! until every aircraft reports [`TickOutcome::Finished`] (or was removed).

use glam::Vec2;

use crate::aircraft::Aircraft;
use crate::error::Result;
use crate::flight_path::HeadProximity;
use crate::power_up::PowerType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    Planning,
    Executing,
    /// Shot down: no more planning, only falling.
    Destroyed,
}

/// Whoever picks the head: a player's input or an AI.
pub trait Pilot {
    /// Desired head position in world space. `None` keeps the default head.
    fn choose_target(&mut self, aircraft: &Aircraft) -> Option<Vec2>;

    /// Power to spend this turn. Must be one of `aircraft.power_ups().available()`.
    fn choose_power(&mut self, _aircraft: &Aircraft) -> PowerType {
        PowerType::Normal
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not executing; nothing moved.
    Idle,
    Moving,
    Finished,
    /// Hit the ground; drop the aircraft.
    Removed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnMachine {
    phase: TurnPhase,
}

impl Default for TurnMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnMachine {
    pub fn new() -> Self {
        Self {
            phase: TurnPhase::Planning,
        }
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// Reset the head and let the pilot choose a target and a power.
    pub fn begin_planning(
        &mut self,
        aircraft: &mut Aircraft,
        pilot: Option<&mut dyn Pilot>,
        proximity: Option<&dyn HeadProximity>,
    ) -> Result<()> {
        if !aircraft.is_active() {
            self.phase = TurnPhase::Destroyed;
            return Ok(());
        }
        aircraft.prepare_for_planning_phase(proximity);
        if let Some(pilot) = pilot {
            let power = pilot.choose_power(aircraft);
            if power != PowerType::Normal {
                if aircraft.power_ups().is_available(power) {
                    aircraft.select_power(power, proximity)?;
                } else {
                    log::warn!("pilot chose {:?} with none left, flying a normal turn", power);
                }
            }
            if let Some(target) = pilot.choose_target(aircraft) {
                aircraft.move_head_to(target, proximity);
            }
        }
        self.phase = TurnPhase::Planning;
        Ok(())
    }

    /// Lock in the plan: apply and spend the selected power.
    pub fn begin_execution(&mut self, aircraft: &mut Aircraft) -> Result<()> {
        match self.phase {
            TurnPhase::Planning if aircraft.is_active() => {
                aircraft.prepare_for_execute_orders()?;
                self.phase = TurnPhase::Executing;
                log::debug!("executing with {:?}", aircraft.selected_power());
            }
            TurnPhase::Planning => self.phase = TurnPhase::Destroyed,
            TurnPhase::Executing | TurnPhase::Destroyed => {}
        }
        Ok(())
    }

    /// Advance one frame.
    pub fn tick(&mut self, aircraft: &mut Aircraft, dt: f32) -> TickOutcome {
        if aircraft.to_be_removed() {
            return TickOutcome::Removed;
        }
        if self.phase == TurnPhase::Planning {
            return TickOutcome::Idle;
        }
        let finished = aircraft.execute_orders(dt);
        if !aircraft.is_active() && self.phase != TurnPhase::Destroyed {
            log::info!("aircraft destroyed during the turn");
            self.phase = TurnPhase::Destroyed;
        }
        if aircraft.to_be_removed() {
            TickOutcome::Removed
        } else if finished {
            TickOutcome::Finished
        } else {
            TickOutcome::Moving
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::config::ManeuverConfig;
    use engine_core::Transform2D;

    struct FixedPilot {
        target: Vec2,
        power: PowerType,
    }

    impl Pilot for FixedPilot {
        fn choose_target(&mut self, _aircraft: &Aircraft) -> Option<Vec2> {
            Some(self.target)
        }

        fn choose_power(&mut self, _aircraft: &Aircraft) -> PowerType {
            self.power
        }
    }

    fn fighter() -> Aircraft {
        let tree = Catalog::default().fighter().unwrap();
        Aircraft::new(tree, Transform2D::default(), ManeuverConfig::default()).unwrap()
    }

    fn run_turn(machine: &mut TurnMachine, aircraft: &mut Aircraft, dt: f32) -> (usize, TickOutcome) {
        machine.begin_execution(aircraft).unwrap();
        let mut ticks = 0;
        loop {
            ticks += 1;
            let outcome = machine.tick(aircraft, dt);
            if outcome != TickOutcome::Moving || ticks > 1000 {
                return (ticks, outcome);
            }
        }
    }

    #[test]
    fn a_turn_lasts_the_turn_duration() {
        let mut aircraft = fighter();
        let mut machine = TurnMachine::new();
        let mut pilot = FixedPilot {
            target: Vec2::new(10_000.0, 300.0),
            power: PowerType::Normal,
        };
        machine
            .begin_planning(&mut aircraft, Some(&mut pilot), None)
            .unwrap();
        assert_eq!(machine.tick(&mut aircraft, 0.1), TickOutcome::Idle);
        let head = aircraft.head_position();

        let (ticks, outcome) = run_turn(&mut machine, &mut aircraft, 0.1);
        assert_eq!(outcome, TickOutcome::Finished);
        assert_eq!(ticks, 20);
        assert_eq!(aircraft.transform().position, head);
        assert_eq!(machine.phase(), TurnPhase::Executing);
    }

    #[test]
    fn whole_turn_in_a_single_tick() {
        let mut aircraft = fighter();
        let mut machine = TurnMachine::new();
        machine.begin_planning(&mut aircraft, None, None).unwrap();
        let head = aircraft.head_position();
        let (ticks, outcome) = run_turn(&mut machine, &mut aircraft, 2.0);
        assert_eq!((ticks, outcome), (1, TickOutcome::Finished));
        assert_eq!(aircraft.transform().position, head);
    }

    #[test]
    fn pilot_power_is_spent_on_execution() {
        let mut aircraft = fighter();
        let mut machine = TurnMachine::new();
        let mut pilot = FixedPilot {
            target: Vec2::new(50.0, 0.0),
            power: PowerType::Boost,
        };
        machine
            .begin_planning(&mut aircraft, Some(&mut pilot), None)
            .unwrap();
        assert_eq!(aircraft.selected_power(), PowerType::Boost);
        machine.begin_execution(&mut aircraft).unwrap();
        assert_eq!(aircraft.power_ups().count(PowerType::Boost), 1);

        // next turn starts from a plain head again
        machine.begin_planning(&mut aircraft, None, None).unwrap();
        assert_eq!(aircraft.selected_power(), PowerType::Normal);
    }

    #[test]
    fn out_of_stock_power_falls_back_to_normal() {
        let mut aircraft = fighter();
        assert!(!aircraft.power_ups().is_available(PowerType::Heal));
        let mut machine = TurnMachine::new();
        let mut pilot = FixedPilot {
            target: Vec2::new(50.0, 0.0),
            power: PowerType::Heal,
        };
        machine
            .begin_planning(&mut aircraft, Some(&mut pilot), None)
            .unwrap();
        assert_eq!(aircraft.selected_power(), PowerType::Normal);
        assert_eq!(machine.phase(), TurnPhase::Planning);
        machine.begin_execution(&mut aircraft).unwrap();
        assert_eq!(machine.phase(), TurnPhase::Executing);
    }

    #[test]
    fn shot_down_aircraft_skip_planning_and_fall() {
        let mut aircraft = fighter();
        let mut machine = TurnMachine::new();
        machine.begin_planning(&mut aircraft, None, None).unwrap();
        machine.begin_execution(&mut aircraft).unwrap();
        aircraft.damage_part(crate::part::PartId(0), 1000.0).unwrap();
        assert!(!aircraft.is_active());

        let mut outcome = machine.tick(&mut aircraft, 0.05);
        assert_eq!(machine.phase(), TurnPhase::Destroyed);
        let mut ticks = 0;
        while outcome != TickOutcome::Removed {
            outcome = machine.tick(&mut aircraft, 0.05);
            ticks += 1;
            assert!(ticks < 200);
        }

        let mut next = TurnMachine::new();
        next.begin_planning(&mut aircraft, None, None).unwrap();
        assert_eq!(next.phase(), TurnPhase::Destroyed);
        assert_eq!(next.tick(&mut aircraft, 0.05), TickOutcome::Removed);
    }
}
