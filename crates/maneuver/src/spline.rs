//! Closed spline polygon: the shape of a maneuver envelope.
//!
//! The boundary is a uniform Catmull-Rom spline through the control points, so it
//! passes through every sample the envelope walk produced and bulges smoothly
//! between them. Geometric queries run on a dense sampling of that curve and are
//! refined on the spline parameter where precision matters (clamping the head).

use engine_core::Transform2D;
use glam::Vec2;

use crate::error::{ManeuverError, Result};

/// Fewest control points a spline polygon accepts.
pub const MIN_CONTROL_POINTS: usize = 4;
/// Boundary samples per span between two control points.
pub const SAMPLES_PER_SPAN: usize = 16;
/// Ternary-search iterations when refining a closest point on the curve.
const REFINE_ITERATIONS: usize = 32;

/// Point on a uniform Catmull-Rom segment between `p1` and `p2`.
pub fn catmull_rom(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, t: f32) -> Vec2 {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * ((2.0 * p1)
        + (p2 - p0) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (3.0 * p1 - p0 - 3.0 * p2 + p3) * t3)
}

/// Closest point to `p` on the segment `a..b` and its fraction along the segment.
pub(crate) fn closest_on_segment(a: Vec2, b: Vec2, p: Vec2) -> (Vec2, f32) {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return (a, 0.0);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    (a + ab * t, t)
}

/// Whether segments `a1..a2` and `b1..b2` cross at a single interior point.
fn segments_cross(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2) -> bool {
    let d1 = (a2 - a1).perp_dot(b1 - a1);
    let d2 = (a2 - a1).perp_dot(b2 - a1);
    let d3 = (b2 - b1).perp_dot(a1 - b1);
    let d4 = (b2 - b1).perp_dot(a2 - b1);
    d1 * d2 < 0.0 && d3 * d4 < 0.0
}

/// Closed spline through an ordered ring of control points.
///
/// Rotations and scaling act about the `pivot`; translations move the pivot along,
/// so a body-local envelope keeps turning about the aircraft after it is placed in
/// the world.
#[derive(Debug, Clone, PartialEq)]
pub struct SplinePolygon {
    points: Vec<Vec2>,
    pivot: Vec2,
    /// Dense curve samples, `SAMPLES_PER_SPAN` per control point, starting at point 0.
    boundary: Vec<Vec2>,
}

impl SplinePolygon {
    /// Build a polygon from its control points, pivoting about the origin.
    pub fn new(points: Vec<Vec2>) -> Result<Self> {
        if points.len() < MIN_CONTROL_POINTS {
            return Err(ManeuverError::TooFewControlPoints {
                got: points.len(),
                min: MIN_CONTROL_POINTS,
            });
        }
        let mut polygon = Self {
            points,
            pivot: Vec2::ZERO,
            boundary: Vec::new(),
        };
        polygon.resample();
        Ok(polygon)
    }

    /// Axis-aligned square of side `size` centred on `center`.
    pub fn square(center: Vec2, size: f32) -> Self {
        let h = size * 0.5;
        let points = vec![
            center + Vec2::new(-h, -h),
            center + Vec2::new(h, -h),
            center + Vec2::new(h, h),
            center + Vec2::new(-h, h),
        ];
        let mut polygon = Self {
            points,
            pivot: Vec2::ZERO,
            boundary: Vec::new(),
        };
        polygon.resample();
        polygon
    }

    pub fn control_points(&self) -> &[Vec2] {
        &self.points
    }

    /// Sampled boundary curve, for overlays and debugging.
    pub fn boundary(&self) -> &[Vec2] {
        &self.boundary
    }

    pub fn pivot(&self) -> Vec2 {
        self.pivot
    }

    pub fn set_pivot(&mut self, pivot: Vec2) {
        self.pivot = pivot;
    }

    /// Rotate about the pivot by `angle` radians (counter-clockwise).
    pub fn rotate_by(&mut self, angle: f32) {
        let rotation = Vec2::from_angle(angle);
        let pivot = self.pivot;
        for p in self.points.iter_mut().chain(self.boundary.iter_mut()) {
            *p = pivot + rotation.rotate(*p - pivot);
        }
    }

    /// Translate control points and pivot.
    pub fn move_by(&mut self, dx: f32, dy: f32) {
        let delta = Vec2::new(dx, dy);
        for p in self.points.iter_mut().chain(self.boundary.iter_mut()) {
            *p += delta;
        }
        self.pivot += delta;
    }

    /// Scale about the pivot.
    pub fn scale(&mut self, factor: f32) {
        let pivot = self.pivot;
        for p in self.points.iter_mut().chain(self.boundary.iter_mut()) {
            *p = pivot + (*p - pivot) * factor;
        }
    }

    /// Copy placed into the world by a body transform.
    pub fn transformed(&self, transform: &Transform2D) -> Self {
        let mut polygon = self.clone();
        polygon.rotate_by(transform.rotation);
        polygon.move_by(transform.position.x, transform.position.y);
        polygon
    }

    /// Point on the curve at parameter `u`; span `floor(u)`, wrapping around the ring.
    pub fn point_at(&self, u: f32) -> Vec2 {
        let (p0, p1, p2, p3, t) = self.span(u);
        catmull_rom(p0, p1, p2, p3, t)
    }

    fn span(&self, u: f32) -> (Vec2, Vec2, Vec2, Vec2, f32) {
        let n = self.points.len();
        let u = u.rem_euclid(n as f32);
        let i = (u.floor() as usize).min(n - 1);
        let t = u - i as f32;
        (
            self.points[(i + n - 1) % n],
            self.points[i],
            self.points[(i + 1) % n],
            self.points[(i + 2) % n],
            t,
        )
    }

    fn resample(&mut self) {
        let n = self.points.len();
        self.boundary.clear();
        self.boundary.reserve(n * SAMPLES_PER_SPAN);
        for k in 0..n * SAMPLES_PER_SPAN {
            let u = k as f32 / SAMPLES_PER_SPAN as f32;
            self.boundary.push(self.point_at(u));
        }
    }

    /// Even-odd containment against the sampled curve.
    pub fn contains(&self, p: Vec2) -> bool {
        let n = self.boundary.len();
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let a = self.boundary[i];
            let b = self.boundary[j];
            if (a.y > p.y) != (b.y > p.y) {
                let x = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if p.x < x {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }

    /// Closest point on the boundary curve to `p`.
    pub fn closest_point_on_boundary(&self, p: Vec2) -> Vec2 {
        let n = self.boundary.len();
        let mut best_index = 0;
        let mut best_dist = f32::INFINITY;
        for i in 0..n {
            let (q, _) = closest_on_segment(self.boundary[i], self.boundary[(i + 1) % n], p);
            let d = q.distance_squared(p);
            if d < best_dist {
                best_dist = d;
                best_index = i;
            }
        }

        // Refine on the curve itself around the best chord.
        let step = 1.0 / SAMPLES_PER_SPAN as f32;
        let center = best_index as f32 * step + 0.5 * step;
        let (mut lo, mut hi) = (center - 1.5 * step, center + 1.5 * step);
        for _ in 0..REFINE_ITERATIONS {
            let m1 = lo + (hi - lo) / 3.0;
            let m2 = hi - (hi - lo) / 3.0;
            if self.point_at(m1).distance_squared(p) <= self.point_at(m2).distance_squared(p) {
                hi = m2;
            } else {
                lo = m1;
            }
        }
        let refined = self.point_at(0.5 * (lo + hi));

        // The window may miss a neighbouring lobe; never do worse than the best sample.
        let nearest_sample = self.boundary[best_index..]
            .iter()
            .chain(self.boundary[..best_index].iter())
            .take(2)
            .copied()
            .min_by(|a, b| a.distance_squared(p).total_cmp(&b.distance_squared(p)))
            .unwrap_or(refined);
        if refined.distance_squared(p) <= nearest_sample.distance_squared(p) {
            refined
        } else {
            nearest_sample
        }
    }

    /// `p` itself when inside, otherwise the closest point on the boundary curve.
    pub fn closest_point_inside(&self, p: Vec2) -> Vec2 {
        if self.contains(p) {
            p
        } else {
            self.closest_point_on_boundary(p)
        }
    }

    /// Signed area of the sampled curve (positive when counter-clockwise).
    pub fn area(&self) -> f32 {
        let n = self.boundary.len();
        let twice: f32 = (0..n)
            .map(|i| self.boundary[i].perp_dot(self.boundary[(i + 1) % n]))
            .sum();
        0.5 * twice
    }

    /// Whether the control ring is free of proper self-crossings.
    ///
    /// Touching or overlapping collinear edges are not counted; a straight-only
    /// envelope traced back and forth along one line is still simple.
    pub fn is_simple(&self) -> bool {
        let n = self.points.len();
        for i in 0..n {
            let (a1, a2) = (self.points[i], self.points[(i + 1) % n]);
            for j in i + 2..n {
                if i == 0 && j == n - 1 {
                    continue;
                }
                let (b1, b2) = (self.points[j], self.points[(j + 1) % n]);
                if segments_cross(a1, a2, b1, b2) {
                    return false;
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_3;

    fn diamond() -> SplinePolygon {
        SplinePolygon::new(vec![
            Vec2::new(100.0, 0.0),
            Vec2::new(0.0, 100.0),
            Vec2::new(-100.0, 0.0),
            Vec2::new(0.0, -100.0),
        ])
        .unwrap()
    }

    #[test]
    fn rejects_too_few_points() {
        let err = SplinePolygon::new(vec![Vec2::ZERO, Vec2::X, Vec2::Y]).unwrap_err();
        assert!(matches!(err, ManeuverError::TooFewControlPoints { got: 3, min: 4 }));
    }

    #[test]
    fn curve_passes_through_control_points() {
        let polygon = diamond();
        for (i, p) in polygon.control_points().iter().enumerate() {
            assert!((polygon.point_at(i as f32) - *p).length() < 1e-4);
        }
    }

    #[test]
    fn inside_point_is_unchanged() {
        let polygon = diamond();
        let p = Vec2::new(10.0, -20.0);
        assert!(polygon.contains(p));
        assert_eq!(polygon.closest_point_inside(p), p);
    }

    #[test]
    fn outside_point_clamps_to_curve_not_chord() {
        let polygon = diamond();
        let p = Vec2::new(300.0, 0.0);
        let q = polygon.closest_point_inside(p);
        // The tip of the diamond is a control point; the curve passes through it.
        assert!((q - Vec2::new(100.0, 0.0)).length() < 0.5, "got {q:?}");

        // Off a flank the spline bulges past the straight chord x + y = 100.
        let flank = polygon.closest_point_inside(Vec2::new(200.0, 200.0));
        assert!(flank.x + flank.y > 100.0);
        let on_curve = (0..4000)
            .map(|k| polygon.point_at(k as f32 / 1000.0))
            .map(|c| c.distance(Vec2::new(200.0, 200.0)))
            .fold(f32::INFINITY, f32::min);
        assert!(flank.distance(Vec2::new(200.0, 200.0)) <= on_curve + 1e-2);
    }

    #[test]
    fn rotation_roundtrip_restores_points() {
        let mut polygon = diamond();
        polygon.move_by(5.0, 7.0);
        polygon.set_pivot(Vec2::new(1.0, 2.0));
        let before = polygon.control_points().to_vec();
        polygon.rotate_by(FRAC_PI_3);
        polygon.rotate_by(-FRAC_PI_3);
        for (a, b) in before.iter().zip(polygon.control_points()) {
            assert!((*a - *b).length() < 1e-3);
        }
    }

    #[test]
    fn move_carries_pivot_and_scale_uses_it() {
        let mut polygon = SplinePolygon::square(Vec2::new(10.0, 0.0), 2.0);
        polygon.move_by(5.0, 0.0);
        assert_eq!(polygon.pivot(), Vec2::new(5.0, 0.0));
        polygon.scale(2.0);
        assert!((polygon.control_points()[0] - Vec2::new(23.0, -2.0)).length() < 1e-5);
    }

    #[test]
    fn transformed_places_body_local_shape() {
        let polygon = SplinePolygon::square(Vec2::new(50.0, 0.0), 4.0);
        let t = Transform2D::from_position_rotation(Vec2::new(100.0, 100.0), std::f32::consts::FRAC_PI_2);
        let world = polygon.transformed(&t);
        assert!(world.contains(Vec2::new(100.0, 150.0)));
        assert!(!world.contains(Vec2::new(150.0, 100.0)));
        assert_eq!(world.pivot(), Vec2::new(100.0, 100.0));
    }

    #[test]
    fn bowtie_is_not_simple() {
        let bowtie = SplinePolygon::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(0.0, 10.0),
        ])
        .unwrap();
        assert!(!bowtie.is_simple());
        assert!(diamond().is_simple());
        assert!(diamond().area() > 0.0);
    }
}
