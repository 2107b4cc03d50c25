//! Power-ups: what an aircraft can spend on a turn, and how many it gets per body.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ManeuverError, Result};

/// Special move selected for a turn. `Normal` is always available and free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum PowerType {
    #[default]
    Normal,
    /// Repair every part when the turn starts executing.
    Heal,
    /// Scale the envelope up for one turn.
    Boost,
    /// Replace the envelope by a single spot behind the aircraft.
    BackTurn,
    /// Absorb hits this turn (resolved by the combat system).
    Shield,
}

impl PowerType {
    /// Whether selecting this power reshapes the envelope.
    pub fn reshapes_envelope(self) -> bool {
        matches!(self, PowerType::Boost | PowerType::BackTurn)
    }
}

/// Body families. The body an aircraft is built on decides its starting power-ups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BodyVariant {
    Balloon,
    Bat,
    Potato,
    Test,
    BigBomber,
    Fighter,
    Scrap,
}

/// `body variant -> {power: count}` table, part of the maneuver config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BodyPowerTable(pub BTreeMap<BodyVariant, BTreeMap<PowerType, u32>>);

impl Default for BodyPowerTable {
    fn default() -> Self {
        use BodyVariant::*;
        use PowerType::*;
        let rows: [(BodyVariant, &[(PowerType, u32)]); 7] = [
            (Balloon, &[(Heal, 2), (Boost, 3)]),
            (Bat, &[(BackTurn, 2)]),
            (Potato, &[(Boost, 2)]),
            (Test, &[(Shield, 1), (Boost, 1)]),
            (BigBomber, &[(Heal, 1), (Shield, 2), (Boost, 1)]),
            (Fighter, &[(Shield, 2), (Boost, 2)]),
            (Scrap, &[(Shield, 1), (BackTurn, 1)]),
        ];
        Self(
            rows.iter()
                .map(|(body, powers)| (*body, powers.iter().copied().collect()))
                .collect(),
        )
    }
}

impl BodyPowerTable {
    /// Starting inventory for a body variant (empty for unlisted variants).
    pub fn inventory_for(&self, body: Option<BodyVariant>) -> PowerUpInventory {
        let mut inventory = PowerUpInventory::default();
        if let Some(powers) = body.and_then(|b| self.0.get(&b)) {
            for (&power, &count) in powers {
                inventory.add(power, count);
            }
        }
        inventory
    }
}

/// Remaining power-ups of one aircraft.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PowerUpInventory {
    counts: BTreeMap<PowerType, u32>,
}

impl PowerUpInventory {
    pub fn count(&self, power: PowerType) -> u32 {
        self.counts.get(&power).copied().unwrap_or(0)
    }

    pub fn add(&mut self, power: PowerType, count: u32) {
        if power == PowerType::Normal || count == 0 {
            return;
        }
        *self.counts.entry(power).or_insert(0) += count;
    }

    pub fn is_available(&self, power: PowerType) -> bool {
        power == PowerType::Normal || self.count(power) > 0
    }

    /// Powers that can be selected right now. `Normal` is always last.
    pub fn available(&self) -> Vec<PowerType> {
        let mut powers: Vec<PowerType> = self
            .counts
            .iter()
            .filter(|(_, &count)| count > 0)
            .map(|(&power, _)| power)
            .collect();
        powers.push(PowerType::Normal);
        powers
    }

    /// Spend one use of `power`. Spending `Normal` is a no-op.
    pub fn consume(&mut self, power: PowerType) -> Result<()> {
        if power == PowerType::Normal {
            return Ok(());
        }
        match self.counts.get_mut(&power) {
            Some(count) if *count > 0 => {
                *count -= 1;
                Ok(())
            }
            _ => Err(ManeuverError::PowerUnavailable(power)),
        }
    }
}
