//! Simulation clock for the tick loop.
//!
//! The clock is fed explicit frame deltas instead of reading the wall clock, so a
//! headless run and a test produce exactly the same tick sequence.

use std::time::Duration;

/// Accumulates frame time and hands it out in fixed ticks.
#[derive(Debug, Clone)]
pub struct Time {
    /// Total simulated time.
    elapsed: Duration,
    /// Length of one simulation tick (default 60 Hz).
    fixed_timestep: Duration,
    /// Time not yet consumed by fixed ticks.
    accumulator: Duration,
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

impl Time {
    pub fn new() -> Self {
        Self::with_fixed_rate(60.0)
    }

    /// Create a clock ticking at `hz` fixed updates per second.
    pub fn with_fixed_rate(hz: f64) -> Self {
        Self {
            elapsed: Duration::ZERO,
            fixed_timestep: Duration::from_secs_f64(1.0 / hz.max(1.0)),
            accumulator: Duration::ZERO,
        }
    }

    /// Feed one frame worth of time.
    pub fn advance(&mut self, delta: Duration) {
        self.elapsed += delta;
        self.accumulator += delta;
    }

    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    pub fn fixed_timestep_seconds(&self) -> f32 {
        self.fixed_timestep.as_secs_f32()
    }

    /// Check if a fixed update should run and consume the time.
    pub fn should_fixed_update(&mut self) -> bool {
        if self.accumulator >= self.fixed_timestep {
            self.accumulator -= self.fixed_timestep;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_ticks_drain_accumulator() {
        let mut time = Time::with_fixed_rate(10.0);
        time.advance(Duration::from_millis(250));
        let mut ticks = 0;
        while time.should_fixed_update() {
            ticks += 1;
        }
        assert_eq!(ticks, 2);
        time.advance(Duration::from_millis(50));
        assert!(time.should_fixed_update());
        assert!(!time.should_fixed_update());
        assert!((time.elapsed_seconds() - 0.3).abs() < 1e-6);
    }
}
