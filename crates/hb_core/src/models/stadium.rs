//! Stadium geometry: base coordinates, the outfield fence polygon and the
//! wall shell used for deflections.

use serde::{Deserialize, Serialize};

use crate::engine::geometry::{distance_to_segment, Coord};

/// Thickness of the wall shell, feet. A ball landing inside the field but
/// within this band of the fence is treated as having struck the wall.
pub const WALL_SHELL_FEET: f64 = 8.0;

/// Half-angle of fair territory, radians (foul lines at ±45°).
pub const FOUL_LINE_ANGLE: f64 = std::f64::consts::FRAC_PI_4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stadium {
    pub name: String,
    /// Bases excluding home. Home is base 0; scoring crosses base
    /// `base_count + 1`.
    pub base_count: u8,
    /// Distance between consecutive bases, feet.
    pub basepath_length: f64,
    /// Fence polygon enclosing fair territory, starting and ending at home.
    pub fence: Vec<Coord>,
}

impl Stadium {
    /// The classic diamond: three bases, 90-foot paths, foul poles at
    /// 330 feet and a 400-foot center field.
    pub fn standard() -> Self {
        Self::with_fence("Standard Field", 3, 90.0, 330.0, 400.0)
    }

    pub fn with_fence(
        name: impl Into<String>,
        base_count: u8,
        basepath_length: f64,
        foul_pole_distance: f64,
        center_field_distance: f64,
    ) -> Self {
        // Fence arc sampled every ~7.5 degrees between the foul poles,
        // bulging from the poles out to center field.
        let mut fence = vec![Coord::ORIGIN];
        let steps = 12;
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            let angle = -FOUL_LINE_ANGLE + t * 2.0 * FOUL_LINE_ANGLE;
            let bulge = (t * std::f64::consts::PI).sin();
            let distance =
                foul_pole_distance + (center_field_distance - foul_pole_distance) * bulge;
            fence.push(Coord::from_polar(angle, distance));
        }
        fence.push(Coord::ORIGIN);
        Self {
            name: name.into(),
            base_count,
            basepath_length,
            fence,
        }
    }

    /// Coordinate of base `b` (0 = home). The circuit is a regular polygon
    /// with `base_count + 1` corners and `basepath_length` sides: for the
    /// standard diamond, first at 45° right, second straight away, third at
    /// 45° left.
    pub fn base_coord(&self, base: u8) -> Coord {
        let corners = (self.base_count + 1) as f64;
        let b = (base % (self.base_count + 1)) as f64;
        let circumradius = self.basepath_length / (2.0 * (std::f64::consts::PI / corners).sin());
        let step = 2.0 * std::f64::consts::PI / corners;
        let angle = -std::f64::consts::FRAC_PI_2 + b * step;
        Coord::new(
            circumradius * angle.cos(),
            circumradius + circumradius * angle.sin(),
        )
    }

    /// Even-odd ray cast. Points outside the fence polygon have left the
    /// field of play (home run when reached on the fly).
    pub fn contains(&self, point: Coord) -> bool {
        let mut inside = false;
        let n = self.fence.len();
        let mut j = n - 1;
        for i in 0..n {
            let a = self.fence[i];
            let b = self.fence[j];
            if (a.y > point.y) != (b.y > point.y) {
                let x_cross = (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x;
                if point.x < x_cross {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }

    /// True when the point is in play but inside the wall shell.
    pub fn hits_wall(&self, point: Coord) -> bool {
        if !self.contains(point) {
            return false;
        }
        self.wall_distance(point) <= WALL_SHELL_FEET
    }

    /// Distance from the point to the nearest fence segment.
    pub fn wall_distance(&self, point: Coord) -> f64 {
        let mut best = f64::INFINITY;
        for pair in self.fence.windows(2) {
            let d = distance_to_segment(point, pair[0], pair[1]);
            if d < best {
                best = d;
            }
        }
        best
    }

    /// Total feet a runner covers from home back to home.
    pub fn circuit_length(&self) -> f64 {
        self.basepath_length * (self.base_count + 1) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_bases_are_ninety_feet_apart() {
        let stadium = Stadium::standard();
        let home = stadium.base_coord(0);
        let first = stadium.base_coord(1);
        let second = stadium.base_coord(2);
        assert!((home.distance(first) - 90.0).abs() < 1e-6);
        assert!((first.distance(second) - 90.0).abs() < 1e-6);
    }

    #[test]
    fn infield_is_in_play() {
        let stadium = Stadium::standard();
        assert!(stadium.contains(Coord::new(0.0, 150.0)));
        assert!(stadium.contains(stadium.base_coord(2)));
    }

    #[test]
    fn deep_center_is_out_of_play() {
        let stadium = Stadium::standard();
        assert!(!stadium.contains(Coord::new(0.0, 420.0)));
    }

    #[test]
    fn behind_home_is_out_of_play() {
        let stadium = Stadium::standard();
        assert!(!stadium.contains(Coord::new(0.0, -30.0)));
    }

    #[test]
    fn warning_track_ball_hits_wall() {
        let stadium = Stadium::standard();
        // Just inside the 400-foot center field fence.
        let point = Coord::new(0.0, 395.0);
        assert!(stadium.contains(point));
        assert!(stadium.hits_wall(point));
        assert!(!stadium.hits_wall(Coord::new(0.0, 200.0)));
    }
}
