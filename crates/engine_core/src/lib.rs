//! Core engine types shared by the flight crates:
//! - 2D transform (position + heading)
//! - Simulation clock
//! - Common components (health, velocity)

pub mod components;
pub mod time;
pub mod transform;

pub use components::*;
pub use time::*;
pub use transform::*;
