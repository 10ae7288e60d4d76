//! 2-D field geometry in feet.
//!
//! Home plate sits at the origin; straightaway center field is +y. Field
//! angle 0 points at center field, negative toward the third-base line,
//! positive toward first.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coord {
    pub x: f64,
    pub y: f64,
}

impl Coord {
    pub const ORIGIN: Coord = Coord { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point at `distance` feet from the origin along `field_angle` radians
    /// (0 = center field, positive toward the first-base line).
    pub fn from_polar(field_angle: f64, distance: f64) -> Self {
        Self {
            x: distance * field_angle.sin(),
            y: distance * field_angle.cos(),
        }
    }

    pub fn distance(&self, other: Coord) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Field angle of this point as seen from home plate, radians.
    pub fn bearing(&self) -> f64 {
        self.x.atan2(self.y)
    }

    pub fn lerp(&self, other: Coord, t: f64) -> Coord {
        Coord {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }

    /// Step up to `step` feet toward `target`, stopping exactly on it.
    pub fn move_toward(&self, target: Coord, step: f64) -> Coord {
        let d = self.distance(target);
        if d <= step || d < f64::EPSILON {
            target
        } else {
            self.lerp(target, step / d)
        }
    }
}

/// Shortest distance from `point` to the segment `a`..`b`.
pub fn distance_to_segment(point: Coord, a: Coord, b: Coord) -> f64 {
    let len_sq = (b.x - a.x).powi(2) + (b.y - a.y).powi(2);
    if len_sq < 1e-9 {
        return point.distance(a);
    }
    let t = (((point.x - a.x) * (b.x - a.x) + (point.y - a.y) * (b.y - a.y)) / len_sq)
        .clamp(0.0, 1.0);
    point.distance(a.lerp(b, t))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polar_round_trip() {
        let p = Coord::from_polar(0.5, 200.0);
        assert!((p.bearing() - 0.5).abs() < 1e-9);
        assert!((p.distance(Coord::ORIGIN) - 200.0).abs() < 1e-9);
    }

    #[test]
    fn center_field_is_straight_ahead() {
        let p = Coord::from_polar(0.0, 100.0);
        assert!(p.x.abs() < 1e-9);
        assert!((p.y - 100.0).abs() < 1e-9);
    }

    #[test]
    fn move_toward_overshoot_stops_on_target() {
        let from = Coord::new(0.0, 0.0);
        let to = Coord::new(3.0, 4.0);
        assert_eq!(from.move_toward(to, 10.0), to);
        let mid = from.move_toward(to, 2.5);
        assert!((from.distance(mid) - 2.5).abs() < 1e-9);
    }

    #[test]
    fn segment_distance() {
        let a = Coord::new(0.0, 0.0);
        let b = Coord::new(10.0, 0.0);
        assert!((distance_to_segment(Coord::new(5.0, 3.0), a, b) - 3.0).abs() < 1e-9);
        assert!((distance_to_segment(Coord::new(-4.0, 0.0), a, b) - 4.0).abs() < 1e-9);
    }
}
