//! Maneuver model for part-built aircraft:
//! - energy bounds per part and the boundary walk that turns them into an envelope
//! - spline geometry for the envelope and the travel path
//! - the flight-path head and the controller that flies to it
//! - the aircraft aggregate, power-ups and per-turn phases

pub mod aircraft;
pub mod catalog;
pub mod config;
pub mod energy;
pub mod envelope;
pub mod error;
pub mod flight_path;
pub mod kinematics;
pub mod part;
pub mod path;
pub mod power_up;
pub mod spline;
pub mod turn;

pub use aircraft::{Aircraft, AircraftState};
pub use catalog::{Catalog, PartTemplate};
pub use config::ManeuverConfig;
pub use energy::{EnergyModel, PartEnergy};
pub use envelope::{Envelope, EnvelopeBuilder, WalkStrategy};
pub use error::{ManeuverError, Result};
pub use flight_path::{FlightPathController, FlightPathHead, HeadProximity, MaxSeparation};
pub use kinematics::KinematicProjector;
pub use part::{ManeuverAbility, Part, PartId, PartKind, PartState, PartTree};
pub use path::TravelPath;
pub use power_up::{BodyPowerTable, BodyVariant, PowerType, PowerUpInventory};
pub use spline::SplinePolygon;
pub use turn::{Pilot, TickOutcome, TurnMachine, TurnPhase};
