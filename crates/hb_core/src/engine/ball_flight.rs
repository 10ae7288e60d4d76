//! Ball flight: converts a swing outcome into a landing point and a
//! flight duration.
//!
//! Closed-form projectile motion with a wind-resistance correction
//! proportional to flight time squared. Negative launch angle is the
//! grounder convention: the ball loses half its speed and can no longer
//! be caught in the air.

use serde::{Deserialize, Serialize};

use crate::engine::constants::flight;
use crate::engine::geometry::Coord;
use crate::engine::rng::Roller;
use crate::models::player::PlayerAttributes;
use crate::models::stadium::{Stadium, FOUL_LINE_ANGLE};

/// Immutable flight state of a hit ball. A deflection builds a new
/// instance rather than mutating this one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveBall {
    /// Radians above the horizontal; negative means a grounder.
    pub launch_angle: f64,
    /// Radians from straightaway center, positive toward first base.
    pub field_angle: f64,
    /// Feet per second off the bat (after the grounder halving).
    pub exit_speed: f64,
    pub origin: Coord,
    /// Whether catching it on the fly records an out.
    pub catchable: bool,
    /// Seconds until the ball is playable on the ground.
    pub duration: f64,
    /// Carry in feet from the origin.
    pub distance: f64,
    pub landing: Coord,
}

impl LiveBall {
    /// Roll a fresh ball off the bat.
    ///
    /// `quality` is the swing's contact quality (≥ 1 for a fair ball);
    /// `reduction` is the pitch's power offset and may be negative.
    pub fn from_swing(
        batter: &PlayerAttributes,
        quality: f64,
        reduction: f64,
        roller: &mut dyn Roller,
    ) -> Self {
        let quality = quality.max(0.0);

        let launch_mean =
            flight::LAUNCH_MEAN_BASE + (batter.power - 1.0) * flight::LAUNCH_MEAN_POWER;
        let launch_spread = flight::LAUNCH_SPREAD / (1.0 + quality * flight::LAUNCH_SPREAD_QUALITY);
        let launch_angle = roller.normal(launch_mean, launch_spread);

        let field_mean = (batter.pull - 1.0) * flight::PULL_SCALE;
        let field_spread = flight::FIELD_SPREAD / (0.5 + 0.5 * quality);
        let mut field_angle = roller.normal(field_mean, field_spread);
        if quality >= flight::CLEAN_QUALITY && field_angle.abs() > FOUL_LINE_ANGLE {
            // A clean hit hooking foul gets exactly one more chance.
            field_angle = roller.normal(field_mean, field_spread);
        }
        // The swing already ruled the ball fair; keep it inside the lines.
        field_angle = field_angle.clamp(-FOUL_LINE_ANGLE + 0.01, FOUL_LINE_ANGLE - 0.01);

        let net_power = (batter.power - reduction).max(0.0);
        let exit_speed = flight::EXIT_SPEED_BASE * net_power * quality.powf(flight::QUALITY_EXP);

        Self::resolve(launch_angle, field_angle, exit_speed, Coord::ORIGIN)
    }

    /// Derive duration, distance and landing point from launch parameters.
    pub fn resolve(launch_angle: f64, field_angle: f64, exit_speed: f64, origin: Coord) -> Self {
        let (catchable, exit_speed, duration, distance) = if launch_angle < 0.0 {
            let speed = exit_speed * flight::GROUNDER_SPEED_FACTOR;
            let duration = speed / flight::GROUND_FRICTION;
            let distance = speed * speed / (2.0 * flight::GROUND_FRICTION);
            (false, speed, duration, distance)
        } else {
            let duration = 2.0 * exit_speed * launch_angle.sin() / flight::GRAVITY;
            let carry = exit_speed * exit_speed * (2.0 * launch_angle).sin() / flight::GRAVITY;
            let distance = (carry - flight::DRAG_PER_T2 * duration * duration).max(0.0);
            (true, exit_speed, duration, distance)
        };

        let offset = Coord::from_polar(field_angle, distance);
        let landing = Coord::new(origin.x + offset.x, origin.y + offset.y);
        Self {
            launch_angle,
            field_angle,
            exit_speed,
            origin,
            catchable,
            duration,
            distance,
            landing,
        }
    }

    /// Carom off the wall: a new ball dropped in front of the fence, with
    /// retrieval time added and no fly-out available.
    pub fn deflected(&self, stadium: &Stadium) -> Self {
        let wall_distance = self.distance - stadium.wall_distance(self.landing);
        let distance = (wall_distance - flight::WALL_DROP_FEET).max(0.0);
        let offset = Coord::from_polar(self.field_angle, distance);
        Self {
            launch_angle: self.launch_angle,
            field_angle: self.field_angle,
            exit_speed: self.exit_speed,
            origin: self.origin,
            catchable: false,
            duration: self.duration + flight::WALL_RETRIEVE_SECONDS,
            distance,
            landing: Coord::new(self.origin.x + offset.x, self.origin.y + offset.y),
        }
    }
}
