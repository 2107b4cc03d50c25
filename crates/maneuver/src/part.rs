//! Aircraft parts and the arena they live in.
//!
//! Parts are one data-driven record; what differs between an engine and a wing is
//! its numbers plus a small [`PartKind`] tag. Mount relations are indices into the
//! arena, and index 0 is always the body.

use engine_core::Health;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{ManeuverError, Result};
use crate::power_up::BodyVariant;

/// Index of a part in its [`PartTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PartId(pub usize);

/// Mount type of a part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartKind {
    Body,
    SingleWing,
    Wings,
    Engine,
    Rotor,
    Rudder,
    Gun,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartState {
    #[default]
    Active,
    Destroyed,
}

/// Energy a part can put into the turn, plus its extra turning push.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ManeuverAbility {
    pub power_min: f32,
    pub power_max: f32,
    pub rotation_bonus_min: f32,
    pub rotation_bonus_max: f32,
}

impl ManeuverAbility {
    pub fn new(power_min: f32, power_max: f32, bonus_min: f32, bonus_max: f32) -> Result<Self> {
        let ability = Self {
            power_min,
            power_max,
            rotation_bonus_min: bonus_min,
            rotation_bonus_max: bonus_max,
        };
        ability.validate()?;
        Ok(ability)
    }

    /// Pure thrust, no rotation bonus.
    pub fn power(power_min: f32, power_max: f32) -> Result<Self> {
        Self::new(power_min, power_max, 0.0, 0.0)
    }

    /// Pure rotation bonus (rudders).
    pub fn rotation_bonus(bonus_min: f32, bonus_max: f32) -> Result<Self> {
        Self::new(0.0, 0.0, bonus_min, bonus_max)
    }

    /// All values finite and non-negative, and min ≤ max.
    pub fn validate(&self) -> Result<()> {
        let values = [
            self.power_min,
            self.power_max,
            self.rotation_bonus_min,
            self.rotation_bonus_max,
        ];
        let ok = values.iter().all(|v| v.is_finite() && *v >= 0.0)
            && self.power_min <= self.power_max
            && self.rotation_bonus_min <= self.rotation_bonus_max;
        if ok {
            Ok(())
        } else {
            Err(ManeuverError::InvalidManeuverAbility {
                power_min: self.power_min,
                power_max: self.power_max,
                bonus_min: self.rotation_bonus_min,
                bonus_max: self.rotation_bonus_max,
            })
        }
    }
}

/// One part of an aircraft. `position` is body-local, nose along +X.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    /// Catalog template the part was built from.
    pub template: String,
    pub kind: PartKind,
    pub mass: f32,
    pub position: Vec2,
    pub maneuver: Option<ManeuverAbility>,
    pub health: Health,
    #[serde(default)]
    pub state: PartState,
    pub parent: Option<PartId>,
}

impl Part {
    pub fn is_active(&self) -> bool {
        self.state == PartState::Active
    }
}

/// Arena of parts. Index 0 is the body; every other part hangs off an earlier one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartTree {
    parts: Vec<Part>,
    #[serde(default)]
    body_variant: Option<BodyVariant>,
}

impl PartTree {
    /// Start a tree from its body.
    pub fn new(body: Part, body_variant: Option<BodyVariant>) -> Self {
        Self {
            parts: vec![Part { parent: None, ..body }],
            body_variant,
        }
    }

    /// Mount `part` on its parent and return its id.
    pub fn attach(&mut self, part: Part) -> Result<PartId> {
        let parent = part.parent.unwrap_or(PartId(0));
        if parent.0 >= self.parts.len() {
            return Err(ManeuverError::UnknownPart(parent));
        }
        if let Some(ability) = &part.maneuver {
            ability.validate()?;
        }
        self.parts.push(Part {
            parent: Some(parent),
            ..part
        });
        Ok(PartId(self.parts.len() - 1))
    }

    pub fn body(&self) -> Option<&Part> {
        self.parts.first().filter(|p| p.kind == PartKind::Body)
    }

    pub fn body_variant(&self) -> Option<BodyVariant> {
        self.body_variant
    }

    pub fn get(&self, id: PartId) -> Option<&Part> {
        self.parts.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PartId, &Part)> {
        self.parts.iter().enumerate().map(|(i, p)| (PartId(i), p))
    }

    pub fn active_parts(&self) -> impl Iterator<Item = (PartId, &Part)> {
        self.iter().filter(|(_, p)| p.is_active())
    }

    /// Active parts that contribute energy, in arena order.
    pub fn maneuver_parts(&self) -> impl Iterator<Item = (PartId, &Part, ManeuverAbility)> {
        self.active_parts()
            .filter_map(|(id, p)| p.maneuver.map(|ability| (id, p, ability)))
    }

    /// Damage one part; returns true when this hit destroyed it.
    pub fn damage(&mut self, id: PartId, amount: f32) -> Result<bool> {
        let part = self
            .parts
            .get_mut(id.0)
            .ok_or(ManeuverError::UnknownPart(id))?;
        if !part.is_active() {
            return Ok(false);
        }
        let destroyed = part.health.take_damage(amount);
        if destroyed {
            part.state = PartState::Destroyed;
            log::info!("part {} ({:?}) destroyed", part.template, id);
        }
        Ok(destroyed)
    }

    /// Bring every part back to full health, destroyed ones included.
    pub fn repair_all(&mut self) {
        for part in &mut self.parts {
            part.health.repair(part.health.max);
            part.state = PartState::Active;
        }
    }

    /// Sum of remaining health over active parts.
    pub fn health(&self) -> f32 {
        self.active_parts().map(|(_, p)| p.health.current).sum()
    }

    pub fn max_health(&self) -> f32 {
        self.parts.iter().map(|p| p.health.max).sum()
    }

    pub fn mass(&self) -> f32 {
        self.active_parts().map(|(_, p)| p.mass).sum()
    }

    /// Mass-weighted mean position of active parts; origin when massless.
    pub fn center_of_mass(&self) -> Vec2 {
        let mass = self.mass();
        if mass <= 0.0 {
            return Vec2::ZERO;
        }
        self.active_parts()
            .map(|(_, p)| p.position * p.mass)
            .sum::<Vec2>()
            / mass
    }

    /// Point-mass moment of inertia about `com`.
    pub fn moment_of_inertia(&self, com: Vec2) -> f32 {
        self.active_parts()
            .map(|(_, p)| p.mass * p.position.distance_squared(com))
            .sum()
    }

    /// Shift every part so that `offset` becomes the new origin.
    pub fn recenter(&mut self, offset: Vec2) {
        for part in &mut self.parts {
            part.position -= offset;
        }
    }

    /// Body-local bounding length along the nose axis.
    pub fn length(&self) -> f32 {
        let (min, max) = self
            .active_parts()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), (_, p)| {
                (lo.min(p.position.x), hi.max(p.position.x))
            });
        if min > max {
            0.0
        } else {
            max - min
        }
    }

    pub fn to_ron(&self) -> Result<String> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    /// Parse a tree and check what serde alone cannot: a body at index 0, parents
    /// that point backwards, and valid maneuver abilities.
    pub fn from_ron(text: &str) -> Result<Self> {
        let tree: PartTree = ron::from_str(text)?;
        if tree.body().is_none() {
            return Err(ManeuverError::MissingBody);
        }
        for (id, part) in tree.iter().skip(1) {
            match part.parent {
                Some(parent) if parent.0 < id.0 => {}
                Some(parent) => return Err(ManeuverError::UnknownPart(parent)),
                None => return Err(ManeuverError::UnknownPart(id)),
            }
            if let Some(ability) = &part.maneuver {
                ability.validate()?;
            }
        }
        Ok(tree)
    }
}
