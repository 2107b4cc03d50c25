//! Maneuver envelope: the set of positions an aircraft can reach in one turn.
//!
//! The builder does not search the whole allocation space. It walks the energy
//! coefficients through a fixed sequence of ramps that keeps the projected point on
//! the rim of the reachable set, and closes the samples into a spline polygon:
//!
//! 1. right bonus to max, then every right part up (sorted order)
//! 2. every left part up, last part first
//! 3. right bonus down, then left bonus up
//! 4. right parts down, then left parts down (last part first)
//! 5. left bonus down, right bonus up
//! 6. left parts down, right parts up
//!
//! Too few distinct samples means the aircraft can no longer maneuver; the envelope
//! then falls back to a tiny quad ahead of it.

use glam::Vec2;

use crate::config::ManeuverConfig;
use crate::energy::{Allocation, EnergyModel};
use crate::error::Result;
use crate::kinematics::KinematicProjector;
use crate::spline::SplinePolygon;

/// Fewest distinct samples a traced envelope needs.
pub const MIN_ENVELOPE_SAMPLES: usize = 5;

/// Order in which the walk visits allocations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WalkStrategy {
    /// Trace the rim of the reachable set.
    #[default]
    Perimeter,
    /// Turn everything up together, then down again.
    Monotonic,
}

/// Result of one envelope build, body-local with the nose on +X.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub polygon: SplinePolygon,
    /// Deduplicated walk samples (empty for a fallback envelope).
    pub samples: Vec<Vec2>,
    /// The walk produced too few samples and `polygon` is the fallback quad.
    pub degenerate: bool,
}

/// Walk state: the current allocation and the samples it has produced.
struct Walk<'a> {
    model: &'a EnergyModel,
    projector: &'a KinematicProjector,
    allocation: Allocation,
    samples: Vec<Vec2>,
}

impl Walk<'_> {
    fn sample(&mut self) {
        let (ekin, erot) = self.model.energies(&self.allocation);
        let point = self.projector.project(ekin, erot);
        if self.samples.last() != Some(&point) {
            self.samples.push(point);
        }
    }

    fn set_left(&mut self, j: usize, c: f32, up: bool) {
        let current = &mut self.allocation.left[j];
        if (up && *current < c) || (!up && *current > c) {
            *current = c;
            self.sample();
        }
    }

    fn set_right(&mut self, j: usize, c: f32, up: bool) {
        let current = &mut self.allocation.right[j];
        if (up && *current < c) || (!up && *current > c) {
            *current = c;
            self.sample();
        }
    }

    fn set_left_bonus(&mut self, c: f32) {
        self.allocation.left_bonus = c;
        self.sample();
    }

    fn set_right_bonus(&mut self, c: f32) {
        self.allocation.right_bonus = c;
        self.sample();
    }
}

pub struct EnvelopeBuilder<'a> {
    model: &'a EnergyModel,
    projector: KinematicProjector,
    config: &'a ManeuverConfig,
    strategy: WalkStrategy,
}

impl<'a> EnvelopeBuilder<'a> {
    pub fn new(model: &'a EnergyModel, projector: KinematicProjector, config: &'a ManeuverConfig) -> Self {
        Self {
            model,
            projector,
            config,
            strategy: WalkStrategy::default(),
        }
    }

    pub fn with_strategy(mut self, strategy: WalkStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Run the walk; returns the samples and the allocation it ended on.
    pub fn trace(&self) -> (Vec<Vec2>, Allocation) {
        let mut walk = Walk {
            model: self.model,
            projector: &self.projector,
            allocation: self.model.baseline(),
            samples: Vec::new(),
        };
        let p = self.config.partitions.max(1);
        let step = |i: u32| i as f32 / p as f32;
        let (n_left, n_right) = (self.model.left.len(), self.model.right.len());

        match self.strategy {
            WalkStrategy::Perimeter => {
                walk.allocation.right_bonus = 1.0;
                for j in 0..n_right {
                    for i in 1..=p {
                        walk.set_right(j, step(i), true);
                    }
                }
                for j in (0..n_left).rev() {
                    for i in 1..=p {
                        walk.set_left(j, step(i), true);
                    }
                }
                for i in (0..p).rev() {
                    walk.set_right_bonus(step(i));
                }
                for i in 1..=p {
                    walk.set_left_bonus(step(i));
                }
                for j in 0..n_right {
                    for i in (0..p).rev() {
                        walk.set_right(j, step(i), false);
                    }
                }
                for j in (0..n_left).rev() {
                    for i in (0..p).rev() {
                        walk.set_left(j, step(i), false);
                    }
                }
                for i in (0..p).rev() {
                    walk.set_left_bonus(step(i));
                }
                for i in 1..=p {
                    walk.set_right_bonus(step(i));
                }
                for j in 0..n_left {
                    for i in (0..p).rev() {
                        walk.set_left(j, step(i), false);
                    }
                }
                for j in 0..n_right {
                    for i in 1..=p {
                        walk.set_right(j, step(i), true);
                    }
                }
            }
            WalkStrategy::Monotonic => {
                for i in (1..=p).chain((0..p).rev()) {
                    walk.allocation = self.model.uniform(step(i));
                    walk.sample();
                }
            }
        }
        (walk.samples, walk.allocation)
    }

    /// Trace and close the envelope. `current_speed` sizes the fallback quad.
    pub fn build(&self, current_speed: f32) -> Result<Envelope> {
        let (samples, last) = self.trace();
        log::debug!("envelope walk produced {} samples", samples.len());

        let degenerate = samples.len() < MIN_ENVELOPE_SAMPLES;
        let mut polygon = if degenerate {
            let speed = current_speed.max(self.config.v_min);
            let r = speed * self.config.turn_duration * self.config.fallback_range_factor;
            SplinePolygon::new(vec![
                Vec2::new(r, 1.0),
                Vec2::new(r + 1.0, 1.0),
                Vec2::new(r + 1.0, -1.0),
                Vec2::new(r, -1.0),
            ])?
        } else {
            let polygon = SplinePolygon::new(samples.clone())?;
            if !polygon.is_simple() {
                log::warn!(
                    "envelope boundary of {} samples crosses itself",
                    samples.len()
                );
            }
            polygon
        };

        // Keep the default forward path from collapsing onto the aircraft.
        let (ekin, _) = self.model.energies(&last);
        if self.projector.project(ekin, 0.0).length() < self.config.min_clearance {
            let pivot = polygon.pivot();
            polygon.move_by(self.config.clearance_shift, 0.0);
            polygon.set_pivot(pivot);
        }

        Ok(Envelope {
            polygon,
            samples: if degenerate { Vec::new() } else { samples },
            degenerate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::part::{ManeuverAbility, Part, PartKind, PartState, PartTree};
    use engine_core::Health;

    fn part(position: Vec2, maneuver: Option<ManeuverAbility>) -> Part {
        Part {
            template: "test".into(),
            kind: PartKind::Engine,
            mass: 10.0,
            position,
            maneuver,
            health: Health::new(10.0),
            state: PartState::Active,
            parent: None,
        }
    }

    fn body() -> Part {
        Part {
            kind: PartKind::Body,
            mass: 40.0,
            ..part(Vec2::ZERO, None)
        }
    }

    fn setup(tree: &PartTree) -> (EnergyModel, KinematicProjector) {
        let com = tree.center_of_mass();
        let model = EnergyModel::new(tree, com);
        let projector = KinematicProjector::new(
            tree.mass(),
            tree.moment_of_inertia(com),
            &ManeuverConfig::default(),
        );
        (model, projector)
    }

    fn single_engine() -> PartTree {
        let mut tree = PartTree::new(body(), None);
        tree.attach(part(
            Vec2::new(-30.0, 0.0),
            Some(ManeuverAbility::power(0.0, 1.0e5).unwrap()),
        ))
        .unwrap();
        tree
    }

    #[test]
    fn powerless_aircraft_gets_the_fallback_quad() {
        let mut tree = PartTree::new(body(), None);
        tree.attach(part(Vec2::new(10.0, 20.0), None)).unwrap();
        let (model, projector) = setup(&tree);
        let config = ManeuverConfig::default();
        let envelope = EnvelopeBuilder::new(&model, projector, &config)
            .build(0.0)
            .unwrap();
        assert!(envelope.degenerate);
        assert!(envelope.samples.is_empty());
        // v_min * T * 0.4 = 32, pushed forward by the clearance shift
        let points = envelope.polygon.control_points();
        assert_eq!(points[0], Vec2::new(42.0, 1.0));
        assert_eq!(points[2], Vec2::new(43.0, -1.0));
        assert_eq!(envelope.polygon.pivot(), Vec2::ZERO);
    }

    #[test]
    fn fallback_grows_with_speed() {
        let tree = PartTree::new(body(), None);
        let (model, projector) = setup(&tree);
        let config = ManeuverConfig::default();
        let envelope = EnvelopeBuilder::new(&model, projector, &config)
            .build(100.0)
            .unwrap();
        assert_eq!(envelope.polygon.control_points()[0], Vec2::new(90.0, 1.0));
    }

    #[test]
    fn single_engine_reaches_forward_with_both_walks() {
        let tree = single_engine();
        let (model, projector) = setup(&tree);
        let config = ManeuverConfig::default();
        let perimeter = EnvelopeBuilder::new(&model, projector, &config).trace().0;
        let monotonic = EnvelopeBuilder::new(&model, projector, &config)
            .with_strategy(WalkStrategy::Monotonic)
            .trace()
            .0;
        let reach = |samples: &[Vec2]| samples.iter().map(|p| p.x).fold(f32::MIN, f32::max);
        assert!(reach(&perimeter) > 0.0);
        assert_eq!(reach(&perimeter), reach(&monotonic));
        assert_eq!(reach(&perimeter), projector.project(1.0e5, 0.0).x);
        assert!(perimeter.iter().all(|p| p.y == 0.0));

        let envelope = EnvelopeBuilder::new(&model, projector, &config).build(0.0).unwrap();
        assert!(!envelope.degenerate);
    }

    #[test]
    fn fighter_envelope_spans_both_turn_directions() {
        let tree = Catalog::default().fighter().unwrap();
        let (model, projector) = setup(&tree);
        let config = ManeuverConfig::default();
        let envelope = EnvelopeBuilder::new(&model, projector, &config).build(0.0).unwrap();
        assert!(!envelope.degenerate);
        assert!(envelope.samples.iter().any(|p| p.y > 1.0));
        assert!(envelope.samples.iter().any(|p| p.y < -1.0));
        assert!(envelope.polygon.area().abs() > 0.0);
    }

    #[test]
    fn partitions_control_density() {
        let tree = single_engine();
        let (model, projector) = setup(&tree);
        let coarse = ManeuverConfig {
            partitions: 4,
            ..Default::default()
        };
        let fine = ManeuverConfig::default();
        let n_coarse = EnvelopeBuilder::new(&model, projector, &coarse).trace().0.len();
        let n_fine = EnvelopeBuilder::new(&model, projector, &fine).trace().0.len();
        assert!(n_fine > n_coarse);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn random_tree(parts: &[(f32, f32, f32, f32, f32)]) -> PartTree {
            let mut tree = PartTree::new(body(), None);
            for &(x, y, power, extra, bonus) in parts {
                let ability = ManeuverAbility::new(power, power + extra, 0.0, bonus).unwrap();
                tree.attach(part(Vec2::new(x, y), Some(ability))).unwrap();
            }
            tree
        }

        proptest! {
            /// The same parts always trace the same envelope.
            #[test]
            fn walk_is_deterministic(
                parts in prop::collection::vec(
                    (-60.0f32..60.0, -60.0f32..60.0, 0.0f32..1.0e5, 0.0f32..1.0e5, 0.0f32..1.0e5),
                    1..6,
                )
            ) {
                let tree = random_tree(&parts);
                let (model, projector) = setup(&tree);
                let config = ManeuverConfig::default();
                let builder = EnvelopeBuilder::new(&model, projector, &config);
                prop_assert_eq!(builder.trace(), builder.trace());
            }

            /// Samples are finite and never repeat back to back.
            #[test]
            fn samples_are_finite_and_deduplicated(
                parts in prop::collection::vec(
                    (-60.0f32..60.0, -60.0f32..60.0, 0.0f32..1.0e5, 0.0f32..1.0e5, 0.0f32..1.0e5),
                    1..6,
                )
            ) {
                let tree = random_tree(&parts);
                let (model, projector) = setup(&tree);
                let config = ManeuverConfig::default();
                let (samples, _) = EnvelopeBuilder::new(&model, projector, &config).trace();
                prop_assert!(samples.iter().all(|p| p.is_finite()));
                prop_assert!(samples.windows(2).all(|w| w[0] != w[1]));
            }

            /// Whatever the walk produced, the head clamp lands inside or on the envelope.
            #[test]
            fn clamped_targets_stay_in_the_envelope(
                parts in prop::collection::vec(
                    (-60.0f32..60.0, -60.0f32..60.0, 0.0f32..1.0e5, 0.0f32..1.0e5, 0.0f32..1.0e5),
                    1..6,
                ),
                tx in -2000.0f32..2000.0,
                ty in -2000.0f32..2000.0,
            ) {
                let tree = random_tree(&parts);
                let (model, projector) = setup(&tree);
                let config = ManeuverConfig::default();
                let envelope = EnvelopeBuilder::new(&model, projector, &config).build(0.0).unwrap();
                let target = Vec2::new(tx, ty);
                let clamped = envelope.polygon.closest_point_inside(target);
                prop_assert!(clamped.is_finite());
                if envelope.polygon.contains(target) {
                    prop_assert_eq!(clamped, target);
                }
            }
        }
    }
}
