//! Open travel path from the aircraft to its head.
//!
//! The path is a quadratic Bezier whose first control leg lies along the current
//! heading, so the aircraft leaves its pose without a kink. It is sampled once into
//! an arc-length table; advancing and direction queries work in distance along the
//! curve, so the aircraft moves at constant speed for the whole turn. Positions are
//! read off the sampled curve so that projecting a position back onto the path
//! yields the same distance it was produced from.

use glam::Vec2;

use crate::spline::closest_on_segment;

/// Samples along the path (segments = samples - 1).
pub const PATH_SAMPLES: usize = 64;
/// Remaining distance below which an advance snaps onto the end point.
const END_SNAP: f32 = 1e-3;
/// Snap distance relative to the path length, for long paths where f32 drift adds up.
const END_SNAP_RELATIVE: f32 = 1e-4;

#[derive(Debug, Clone, PartialEq)]
pub struct TravelPath {
    start: Vec2,
    control: Vec2,
    end: Vec2,
    heading: f32,
    points: Vec<Vec2>,
    /// Cumulative arc length at each sample.
    lengths: Vec<f32>,
}

impl TravelPath {
    /// Path leaving `start` along `heading` (radians) and ending at `end`.
    pub fn new(start: Vec2, heading: f32, end: Vec2) -> Self {
        let chord = end.distance(start);
        let control = start + Vec2::from_angle(heading) * chord * 0.5;
        let mut path = Self {
            start,
            control,
            end,
            heading,
            points: Vec::with_capacity(PATH_SAMPLES),
            lengths: Vec::with_capacity(PATH_SAMPLES),
        };
        if chord <= f32::EPSILON {
            path.points.resize(PATH_SAMPLES, start);
            path.lengths.resize(PATH_SAMPLES, 0.0);
            return path;
        }
        let mut total = 0.0;
        for i in 0..PATH_SAMPLES {
            let t = i as f32 / (PATH_SAMPLES - 1) as f32;
            let p = path.point_at_param(t);
            if let Some(prev) = path.points.last() {
                total += p.distance(*prev);
            }
            path.points.push(p);
            path.lengths.push(total);
        }
        // Pin the ends exactly; arriving must compare equal to `end_point`.
        path.points[0] = start;
        path.points[PATH_SAMPLES - 1] = end;
        path
    }

    /// Zero-length path parked at `position`.
    pub fn stationary(position: Vec2, heading: f32) -> Self {
        Self::new(position, heading, position)
    }

    fn point_at_param(&self, t: f32) -> Vec2 {
        self.start
            .lerp(self.control, t)
            .lerp(self.control.lerp(self.end, t), t)
    }

    fn tangent_at_param(&self, t: f32) -> Vec2 {
        2.0 * (1.0 - t) * (self.control - self.start) + 2.0 * t * (self.end - self.control)
    }

    /// Sampled points, for drawing the path.
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn start_point(&self) -> Vec2 {
        self.start
    }

    pub fn end_point(&self) -> Vec2 {
        self.end
    }

    pub fn total_length(&self) -> f32 {
        self.lengths[PATH_SAMPLES - 1]
    }

    /// Curve parameter at arc distance `d` (clamped to the path).
    fn param_at_distance(&self, d: f32) -> f32 {
        let total = self.total_length();
        if total <= 0.0 {
            return 0.0;
        }
        let d = d.clamp(0.0, total);
        let i = self.lengths.partition_point(|&l| l < d).clamp(1, PATH_SAMPLES - 1);
        let (l0, l1) = (self.lengths[i - 1], self.lengths[i]);
        let frac = if l1 > l0 { (d - l0) / (l1 - l0) } else { 0.0 };
        (i as f32 - 1.0 + frac) / (PATH_SAMPLES - 1) as f32
    }

    /// Point at arc distance `d`, on the sampled curve.
    pub fn point_at_distance(&self, d: f32) -> Vec2 {
        let total = self.total_length();
        if d >= total {
            return self.end;
        }
        if d <= 0.0 {
            return self.start;
        }
        let i = self.lengths.partition_point(|&l| l < d).clamp(1, PATH_SAMPLES - 1);
        let (l0, l1) = (self.lengths[i - 1], self.lengths[i]);
        let frac = if l1 > l0 { (d - l0) / (l1 - l0) } else { 0.0 };
        self.points[i - 1].lerp(self.points[i], frac)
    }

    /// Heading (radians) of the path at arc distance `d`.
    pub fn direction_at_distance(&self, d: f32) -> f32 {
        let tangent = self.tangent_at_param(self.param_at_distance(d));
        if tangent.length_squared() <= f32::EPSILON {
            self.heading
        } else {
            tangent.to_angle()
        }
    }

    /// Heading the aircraft has when it arrives.
    pub fn end_direction(&self) -> f32 {
        let tangent = self.tangent_at_param(1.0);
        if tangent.length_squared() <= f32::EPSILON {
            self.heading
        } else {
            tangent.to_angle()
        }
    }

    /// Arc distance of the point on the path closest to `p`.
    pub fn distance_of(&self, p: Vec2) -> f32 {
        let mut best = (f32::INFINITY, 0.0);
        for i in 0..PATH_SAMPLES - 1 {
            let (q, t) = closest_on_segment(self.points[i], self.points[i + 1], p);
            let dist = q.distance_squared(p);
            if dist < best.0 {
                best = (dist, self.lengths[i] + t * (self.lengths[i + 1] - self.lengths[i]));
            }
        }
        best.1
    }

    /// Move `distance` further along the path from `origin` (a point on the path).
    /// Returns the new point and the heading there; at or past the end the exact end
    /// point is returned.
    pub fn advance(&self, origin: Vec2, distance: f32) -> (Vec2, f32) {
        let target = self.distance_of(origin) + distance.max(0.0);
        let snap = END_SNAP.max(self.total_length() * END_SNAP_RELATIVE);
        if target >= self.total_length() - snap {
            (self.end, self.end_direction())
        } else {
            (self.point_at_distance(target), self.direction_at_distance(target))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn straight_path_has_chord_length() {
        let path = TravelPath::new(Vec2::ZERO, 0.0, Vec2::new(100.0, 0.0));
        assert!((path.total_length() - 100.0).abs() < 1e-3);
        assert!(path.end_direction().abs() < 1e-6);
        let (p, dir) = path.advance(Vec2::ZERO, 25.0);
        assert!((p - Vec2::new(25.0, 0.0)).length() < 1e-2);
        assert!(dir.abs() < 1e-6);
    }

    #[test]
    fn leaves_along_heading_and_curves_left() {
        let path = TravelPath::new(Vec2::ZERO, 0.0, Vec2::new(60.0, 60.0));
        assert!(path.direction_at_distance(0.0).abs() < 1e-4);
        let end = path.end_direction();
        assert!(end > 0.0 && end < std::f32::consts::PI);
        assert!(path.total_length() > Vec2::new(60.0, 60.0).length());
    }

    #[test]
    fn advancing_past_the_end_lands_exactly_on_it() {
        let path = TravelPath::new(Vec2::new(5.0, 5.0), FRAC_PI_2, Vec2::new(40.0, 90.0));
        let (p, dir) = path.advance(path.start_point(), path.total_length());
        assert_eq!(p, path.end_point());
        assert_eq!(dir, path.end_direction());
        let (q, _) = path.advance(Vec2::new(5.0, 5.0), 1.0e6);
        assert_eq!(q, path.end_point());
    }

    #[test]
    fn stepping_in_chunks_reaches_the_end() {
        let path = TravelPath::new(Vec2::ZERO, 0.3, Vec2::new(80.0, -30.0));
        let step = path.total_length() / 10.0;
        let mut pos = path.start_point();
        for _ in 0..10 {
            pos = path.advance(pos, step).0;
        }
        assert_eq!(pos, path.end_point());
    }

    #[test]
    fn stationary_path_is_already_finished() {
        let path = TravelPath::stationary(Vec2::new(3.0, 4.0), 1.0);
        assert_eq!(path.total_length(), 0.0);
        assert_eq!(path.advance(Vec2::new(3.0, 4.0), 0.0), (Vec2::new(3.0, 4.0), 1.0));
    }

    #[test]
    fn stationary_path_far_from_origin_has_no_length() {
        let at = Vec2::new(1234.5, -987.1);
        let path = TravelPath::stationary(at, 1.0);
        assert_eq!(path.total_length(), 0.0);
        assert!(path.points().iter().all(|&p| p == at));
        assert_eq!(path.advance(at, 0.0), (at, 1.0));
    }
}
