//! Part templates and a few ready-made aircraft.

use std::collections::BTreeMap;

use engine_core::Health;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{ManeuverError, Result};
use crate::part::{ManeuverAbility, Part, PartId, PartKind, PartState, PartTree};
use crate::power_up::BodyVariant;

/// Numbers shared by every part built from one template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartTemplate {
    pub kind: PartKind,
    pub mass: f32,
    pub health: f32,
    pub maneuver: Option<ManeuverAbility>,
}

impl PartTemplate {
    fn new(kind: PartKind, mass: f32, health: f32) -> Self {
        Self {
            kind,
            mass,
            health,
            maneuver: None,
        }
    }

    fn with_power(mut self, min: f32, max: f32) -> Self {
        self.maneuver = ManeuverAbility::power(min, max).ok();
        self
    }

    fn with_rotation_bonus(mut self, min: f32, max: f32) -> Self {
        self.maneuver = ManeuverAbility::rotation_bonus(min, max).ok();
        self
    }
}

/// Named part templates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    templates: BTreeMap<String, PartTemplate>,
}

impl Default for Catalog {
    fn default() -> Self {
        use PartKind::*;
        let builtin = [
            ("body_potato", PartTemplate::new(Body, 40.0, 10.0)),
            ("body_fighter", PartTemplate::new(Body, 25.0, 15.0)),
            ("wing_potato", PartTemplate::new(SingleWing, 12.0, 8.0)),
            ("wings_fighter", PartTemplate::new(Wings, 15.0, 12.0)),
            ("wing_big_bomber", PartTemplate::new(Wings, 120.0, 40.0)),
            ("test_engine", PartTemplate::new(Engine, 30.0, 10.0).with_power(0.25e5, 3.0e5)),
            ("test_rotor", PartTemplate::new(Rotor, 10.0, 8.0).with_power(1.25e5, 13.0e5)),
            (
                "test_rotor_shiny",
                PartTemplate::new(Rotor, 11.0, 11.0).with_power(7.25e5, 17.0e5),
            ),
            (
                "rudder_fighter",
                PartTemplate::new(Rudder, 4.0, 11.0).with_rotation_bonus(2.5e5, 6.0e5),
            ),
            (
                "rudder_fighter_shiny",
                PartTemplate::new(Rudder, 4.0, 18.0).with_rotation_bonus(1.5e5, 7.0e5),
            ),
            ("gun_small", PartTemplate::new(Gun, 5.0, 6.0)),
        ];
        Self {
            templates: builtin
                .into_iter()
                .map(|(name, template)| (name.to_string(), template))
                .collect(),
        }
    }
}

impl Catalog {
    pub fn template(&self, name: &str) -> Option<&PartTemplate> {
        self.templates.get(name)
    }

    /// Build a part from a template at a body-local position.
    pub fn part(&self, name: &str, position: Vec2, parent: Option<PartId>) -> Result<Part> {
        let template = self
            .template(name)
            .ok_or_else(|| ManeuverError::UnknownTemplate(name.to_string()))?;
        Ok(Part {
            template: name.to_string(),
            kind: template.kind,
            mass: template.mass,
            position,
            maneuver: template.maneuver,
            health: Health::new(template.health),
            state: PartState::Active,
            parent,
        })
    }

    fn build(
        &self,
        body: &str,
        variant: BodyVariant,
        mounts: &[(&str, Vec2, usize)],
    ) -> Result<PartTree> {
        let mut tree = PartTree::new(self.part(body, Vec2::ZERO, None)?, Some(variant));
        for &(name, position, parent) in mounts {
            tree.attach(self.part(name, position, Some(PartId(parent)))?)?;
        }
        Ok(tree)
    }

    /// Slow single-engine trainer: one pusher engine, no way to turn on its own.
    pub fn potato_plane(&self) -> Result<PartTree> {
        self.build(
            "body_potato",
            BodyVariant::Potato,
            &[
                ("wing_potato", Vec2::new(0.0, 0.0), 0),
                ("test_engine", Vec2::new(-35.0, 0.0), 0),
            ],
        )
    }

    /// Twin-rotor fighter with rudders on both sides.
    pub fn fighter(&self) -> Result<PartTree> {
        self.build(
            "body_fighter",
            BodyVariant::Fighter,
            &[
                ("wings_fighter", Vec2::new(5.0, 0.0), 0),
                ("test_rotor", Vec2::new(15.0, 30.0), 1),
                ("test_rotor", Vec2::new(15.0, -30.0), 1),
                ("test_engine", Vec2::new(-20.0, 0.0), 0),
                ("rudder_fighter", Vec2::new(-30.0, 8.0), 0),
                ("rudder_fighter", Vec2::new(-30.0, -8.0), 0),
                ("gun_small", Vec2::new(30.0, 0.0), 0),
            ],
        )
    }

    /// Heavy bomber with shiny rotors on a big wing.
    pub fn bomber(&self) -> Result<PartTree> {
        self.build(
            "body_potato",
            BodyVariant::BigBomber,
            &[
                ("wing_big_bomber", Vec2::new(0.0, 0.0), 0),
                ("test_rotor_shiny", Vec2::new(10.0, 60.0), 1),
                ("test_rotor_shiny", Vec2::new(10.0, -60.0), 1),
                ("test_engine", Vec2::new(-40.0, 0.0), 0),
                ("rudder_fighter_shiny", Vec2::new(-45.0, 10.0), 0),
                ("rudder_fighter_shiny", Vec2::new(-45.0, -10.0), 0),
            ],
        )
    }
}
