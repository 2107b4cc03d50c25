//! Per-part energy bounds and how a side's energies add up.
//!
//! A part's power is split by where it sits relative to the center of mass: the
//! share along the line to the center pushes the aircraft forward (Ekin), the rest
//! turns it (Erot). Parts on the left of the body turn the aircraft right and vice
//! versa; only the difference between the sides turns, the matched part flies
//! straight.

use std::cmp::Ordering;

use glam::Vec2;

use crate::kinematics::KinematicProjector;
use crate::part::{ManeuverAbility, PartId, PartTree};

/// Energy range of one part at a fixed center of mass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartEnergy {
    pub id: PartId,
    pub ekin_min: f32,
    pub ekin_max: f32,
    pub erot_min: f32,
    pub erot_max: f32,
    pub bonus_min: f32,
    pub bonus_max: f32,
}

impl PartEnergy {
    pub fn new(id: PartId, position: Vec2, ability: ManeuverAbility, com: Vec2) -> Self {
        let angle = (com.y - position.y).atan2(com.x - position.x);
        let forward = angle.cos().abs();
        let ekin_min = ability.power_min * forward;
        let ekin_max = ability.power_max * forward;
        Self {
            id,
            ekin_min,
            ekin_max,
            erot_min: ability.power_min - ekin_min,
            erot_max: ability.power_max - ekin_max,
            bonus_min: ability.rotation_bonus_min,
            bonus_max: ability.rotation_bonus_max,
        }
    }

    /// Forward-to-turning ratio the sides are ordered by. 0/0 sorts last.
    pub fn sort_key(&self) -> f32 {
        let key = self.ekin_max / (self.erot_max + self.bonus_max);
        if key.is_nan() {
            f32::INFINITY
        } else {
            key
        }
    }

    pub fn ekin(&self, c: f32) -> f32 {
        lerp(self.ekin_min, self.ekin_max, c)
    }

    pub fn erot(&self, c: f32) -> f32 {
        lerp(self.erot_min, self.erot_max, c)
    }

    pub fn bonus(&self, c: f32) -> f32 {
        lerp(self.bonus_min, self.bonus_max, c)
    }
}

fn lerp(min: f32, max: f32, c: f32) -> f32 {
    min + (max - min) * c
}

/// Summed energies of one side for one allocation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SideTotals {
    pub ekin: f32,
    pub erot: f32,
    pub bonus: f32,
}

/// Aircraft-wide kinetic and rotational energy of both sides.
///
/// Positive Erot turns left. The rotational energy the sides share cancels into
/// forward motion; the losing side's extra bonus may add to it, but never more than
/// the rotational difference.
pub fn combine(left: SideTotals, right: SideTotals) -> (f32, f32) {
    let diff = (right.erot - left.erot).abs();
    let bonus_kin = if right.erot - left.erot > 0.0 {
        (left.bonus - right.bonus).max(0.0).min(diff)
    } else {
        (right.bonus - left.bonus).max(0.0).min(diff)
    };
    let ekin = right.ekin + left.ekin + (right.erot + left.erot - diff) + bonus_kin;
    let erot = right.erot + right.bonus - left.erot - left.bonus;
    (ekin, erot)
}

/// Coefficients in [0, 1]: one per part on each side plus one bonus per side.
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    pub left: Vec<f32>,
    pub right: Vec<f32>,
    pub left_bonus: f32,
    pub right_bonus: f32,
}

/// Energy bounds of every maneuvering part, split by side and ordered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnergyModel {
    pub left: Vec<PartEnergy>,
    pub right: Vec<PartEnergy>,
}

impl EnergyModel {
    pub fn new(tree: &PartTree, com: Vec2) -> Self {
        let body_y = tree.body().map(|b| b.position.y).unwrap_or(com.y);
        let mut model = Self::default();
        for (id, part, ability) in tree.maneuver_parts() {
            let energy = PartEnergy::new(id, part.position, ability, com);
            if part.position.y > body_y {
                model.left.push(energy);
            } else {
                model.right.push(energy);
            }
        }
        let by_key = |a: &PartEnergy, b: &PartEnergy| {
            a.sort_key().partial_cmp(&b.sort_key()).unwrap_or(Ordering::Equal)
        };
        model.left.sort_by(by_key);
        model.right.sort_by(by_key);
        model
    }

    /// Everything at minimum.
    pub fn baseline(&self) -> Allocation {
        self.uniform(0.0)
    }

    /// Every part and bonus at `c`.
    pub fn uniform(&self, c: f32) -> Allocation {
        Allocation {
            left: vec![c; self.left.len()],
            right: vec![c; self.right.len()],
            left_bonus: c,
            right_bonus: c,
        }
    }

    pub fn side_totals(&self, allocation: &Allocation) -> (SideTotals, SideTotals) {
        fn side(parts: &[PartEnergy], coeffs: &[f32], bonus: f32) -> SideTotals {
            parts
                .iter()
                .zip(coeffs)
                .fold(SideTotals::default(), |acc, (part, &c)| SideTotals {
                    ekin: acc.ekin + part.ekin(c),
                    erot: acc.erot + part.erot(c),
                    bonus: acc.bonus + part.bonus(bonus),
                })
        }
        (
            side(&self.left, &allocation.left, allocation.left_bonus),
            side(&self.right, &allocation.right, allocation.right_bonus),
        )
    }

    /// `(Ekin, Erot)` of an allocation.
    pub fn energies(&self, allocation: &Allocation) -> (f32, f32) {
        let (left, right) = self.side_totals(allocation);
        combine(left, right)
    }

    /// Straight-line speed with every part at full power.
    pub fn max_velocity(&self, projector: &KinematicProjector) -> f32 {
        let (ekin, _) = self.energies(&self.uniform(1.0));
        projector.speed(ekin)
    }
}
