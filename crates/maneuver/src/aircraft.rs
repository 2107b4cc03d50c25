//! The aircraft aggregate: parts, mass properties, envelope, head and power-ups.
//!
//! Everything derived from the parts (mass, center of mass, inertia, energy model,
//! envelope) is recomputed in [`Aircraft::parts_changed`]. The envelope is stored
//! body-local; the world copy follows the pose on every tick and whenever the
//! planning phase starts or the selected power changes.

use engine_core::{Transform2D, Velocity};
use glam::Vec2;

use crate::config::ManeuverConfig;
use crate::energy::EnergyModel;
use crate::envelope::{Envelope, EnvelopeBuilder};
use crate::error::{ManeuverError, Result};
use crate::flight_path::{FlightPathController, FlightPathHead, HeadProximity};
use crate::kinematics::KinematicProjector;
use crate::part::{PartId, PartTree};
use crate::power_up::{PowerType, PowerUpInventory};
use crate::spline::SplinePolygon;

/// Forward offset of the back-turn spot, body-local.
const BACK_TURN_X: f32 = -40.0;
/// Side of the square the back-turn head is confined to.
const BACK_TURN_SPOT_SIZE: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AircraftState {
    Active,
    ShotDown,
}

#[derive(Debug, Clone)]
pub struct Aircraft {
    parts: PartTree,
    config: ManeuverConfig,
    transform: Transform2D,
    /// Height above the sky plane; only changes while falling.
    altitude: f32,
    velocity: Velocity,
    state: AircraftState,
    mass: f32,
    moment_of_inertia: f32,
    energy: EnergyModel,
    envelope: Envelope,
    maneuver_polygon: SplinePolygon,
    power_ups: PowerUpInventory,
    controller: FlightPathController,
    controlled_by_player: bool,
    to_be_removed: bool,
}

impl Aircraft {
    /// Assemble an aircraft from its parts. The pose's position is the body origin;
    /// it moves onto the center of mass right away.
    pub fn new(parts: PartTree, transform: Transform2D, config: ManeuverConfig) -> Result<Self> {
        let config = config.sanitized();
        let power_ups = config.power_ups.inventory_for(parts.body_variant());
        let placeholder = SplinePolygon::square(Vec2::ZERO, 1.0);
        let mut aircraft = Self {
            parts,
            config,
            transform,
            altitude: 0.0,
            velocity: Velocity::default(),
            state: AircraftState::Active,
            mass: 0.0,
            moment_of_inertia: 0.0,
            energy: EnergyModel::default(),
            envelope: Envelope {
                polygon: placeholder.clone(),
                samples: Vec::new(),
                degenerate: true,
            },
            maneuver_polygon: placeholder,
            power_ups,
            controller: FlightPathController::new(&transform),
            controlled_by_player: false,
            to_be_removed: false,
        };
        aircraft.parts_changed(false)?;
        aircraft.controller = FlightPathController::new(&aircraft.transform);
        aircraft.reset_head_position(None);
        Ok(aircraft)
    }

    // ── Derived data ────────────────────────────────────────────────

    /// Recompute everything that depends on the parts and rebuild the envelope.
    ///
    /// The aircraft origin moves onto the new center of mass; its world position
    /// shifts by the same amount so the parts stay where they are.
    pub fn parts_changed(&mut self, death_possible: bool) -> Result<()> {
        let com = self.parts.center_of_mass();
        if com != Vec2::ZERO {
            self.parts.recenter(com);
            self.transform.translate(self.transform.forward().rotate(com));
        }
        self.mass = self.parts.mass();
        self.moment_of_inertia = self.parts.moment_of_inertia(Vec2::ZERO);
        self.energy = EnergyModel::new(&self.parts, Vec2::ZERO);
        log::debug!(
            "parts changed: mass {:.1}, inertia {:.1}, {} left / {} right maneuver parts",
            self.mass,
            self.moment_of_inertia,
            self.energy.left.len(),
            self.energy.right.len()
        );
        self.rebuild_envelope(death_possible)?;
        Ok(())
    }

    pub fn projector(&self) -> KinematicProjector {
        KinematicProjector::new(self.mass, self.moment_of_inertia, &self.config)
    }

    /// Trace a fresh envelope. Returns whether it fell back to the minimal quad;
    /// with `death_possible` that kills the aircraft.
    pub fn rebuild_envelope(&mut self, death_possible: bool) -> Result<bool> {
        let envelope = EnvelopeBuilder::new(&self.energy, self.projector(), &self.config)
            .build(self.velocity.speed())?;
        let degenerate = envelope.degenerate;
        self.envelope = envelope;
        self.update_maneuver_polygon();
        if degenerate && death_possible && self.is_active() {
            log::info!("aircraft can no longer maneuver");
            self.die();
        }
        Ok(degenerate)
    }

    /// Place the envelope in the world and apply the selected power's reshaping.
    pub fn update_maneuver_polygon(&mut self) {
        self.maneuver_polygon = match self.selected_power() {
            PowerType::BackTurn => {
                let spot = Vec2::new(BACK_TURN_X, self.config.back_turn_distance);
                SplinePolygon::square(spot, BACK_TURN_SPOT_SIZE).transformed(&self.transform)
            }
            PowerType::Boost => {
                let mut polygon = self.envelope.polygon.transformed(&self.transform);
                polygon.scale(self.config.boost_scale);
                polygon
            }
            _ => self.envelope.polygon.transformed(&self.transform),
        };
    }

    // ── Power-ups ───────────────────────────────────────────────────

    /// Choose the power for this turn. Only powers left in the inventory are accepted.
    pub fn select_power(
        &mut self,
        power: PowerType,
        proximity: Option<&dyn HeadProximity>,
    ) -> Result<()> {
        if !self.power_ups.is_available(power) {
            return Err(ManeuverError::PowerUnavailable(power));
        }
        let old = self.selected_power();
        self.controller.set_power(power);
        self.power_changed(old, proximity);
        Ok(())
    }

    fn power_changed(&mut self, old: PowerType, proximity: Option<&dyn HeadProximity>) {
        self.update_maneuver_polygon();
        if old.reshapes_envelope() || self.selected_power().reshapes_envelope() {
            self.reset_head_position(proximity);
        }
    }

    pub fn selected_power(&self) -> PowerType {
        self.controller.head().power
    }

    /// Bring every part back to full health.
    pub fn heal(&mut self) -> Result<()> {
        self.parts.repair_all();
        self.parts_changed(false)
    }

    // ── Turn phases ─────────────────────────────────────────────────

    /// Back to the plain head, placed ahead of the aircraft.
    pub fn prepare_for_planning_phase(&mut self, proximity: Option<&dyn HeadProximity>) {
        self.controller.reset_head();
        self.update_maneuver_polygon();
        self.reset_head_position(proximity);
    }

    /// Apply and spend the selected power.
    pub fn prepare_for_execute_orders(&mut self) -> Result<()> {
        let power = self.selected_power();
        if power == PowerType::Heal {
            self.heal()?;
        }
        self.power_ups.consume(power)
    }

    /// Ask for the head at `point`; it ends up at the closest reachable position.
    pub fn move_head_to(&mut self, point: Vec2, proximity: Option<&dyn HeadProximity>) {
        self.controller
            .move_head_to(point, &self.transform, &self.maneuver_polygon, proximity);
    }

    pub fn reset_head_position(&mut self, proximity: Option<&dyn HeadProximity>) {
        self.controller.reset_head_position(
            &self.transform,
            self.extent(),
            &self.maneuver_polygon,
            proximity,
        );
    }

    /// Fly `dt` seconds of the turn; returns true once the head is reached. Shot-down
    /// aircraft keep gliding along their path while they fall.
    pub fn execute_orders(&mut self, dt: f32) -> bool {
        let old = self.transform.position;
        let finished = self
            .controller
            .advance(dt, self.config.turn_duration, &mut self.transform);
        self.velocity = Velocity::from_displacement(old, self.transform.position, dt);
        self.update_maneuver_polygon();
        if self.state == AircraftState::ShotDown {
            self.altitude += dt * (self.config.fall_base + self.altitude * self.config.fall_gain);
            if self.altitude < self.config.ground_altitude && !self.to_be_removed {
                log::info!("shot-down aircraft hit the ground");
                self.to_be_removed = true;
            }
        }
        finished
    }

    pub fn die(&mut self) {
        if self.state != AircraftState::ShotDown {
            log::info!("aircraft shot down at {:?}", self.transform.position);
            self.state = AircraftState::ShotDown;
        }
    }

    /// Damage one part. Losing a part reshapes the aircraft; losing the body kills it.
    pub fn damage_part(&mut self, id: PartId, amount: f32) -> Result<bool> {
        let destroyed = self.parts.damage(id, amount)?;
        if destroyed {
            self.parts_changed(true)?;
            if self.parts.body().map_or(true, |body| !body.is_active()) {
                self.die();
            }
        }
        Ok(destroyed)
    }

    // ── Accessors ───────────────────────────────────────────────────

    pub fn parts(&self) -> &PartTree {
        &self.parts
    }

    pub fn config(&self) -> &ManeuverConfig {
        &self.config
    }

    pub fn transform(&self) -> &Transform2D {
        &self.transform
    }

    pub fn altitude(&self) -> f32 {
        self.altitude
    }

    pub fn velocity(&self) -> Velocity {
        self.velocity
    }

    pub fn state(&self) -> AircraftState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == AircraftState::Active
    }

    pub fn to_be_removed(&self) -> bool {
        self.to_be_removed
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn moment_of_inertia(&self) -> f32 {
        self.moment_of_inertia
    }

    pub fn health(&self) -> f32 {
        self.parts.health()
    }

    pub fn max_health(&self) -> f32 {
        self.parts.max_health()
    }

    /// Straight-line speed at full power.
    pub fn max_velocity(&self) -> f32 {
        self.energy.max_velocity(&self.projector())
    }

    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    /// Envelope in world space, as the player sees it.
    pub fn maneuver_polygon(&self) -> &SplinePolygon {
        &self.maneuver_polygon
    }

    /// Envelope in body space.
    pub fn maneuver_polygon_untransformed(&self) -> &SplinePolygon {
        &self.envelope.polygon
    }

    pub fn power_ups(&self) -> &PowerUpInventory {
        &self.power_ups
    }

    pub fn power_ups_mut(&mut self) -> &mut PowerUpInventory {
        &mut self.power_ups
    }

    pub fn controller(&self) -> &FlightPathController {
        &self.controller
    }

    pub fn flight_path_head(&self) -> &FlightPathHead {
        self.controller.head()
    }

    pub fn head_position(&self) -> Vec2 {
        self.controller.head().position
    }

    /// Length of the aircraft along its nose; the default head sits this far ahead.
    pub fn extent(&self) -> f32 {
        self.parts.length()
    }

    pub fn controlled_by_player(&self) -> bool {
        self.controlled_by_player
    }

    pub fn set_controlled_by_player(&mut self, controlled: bool) {
        self.controlled_by_player = controlled;
    }
}
