//! Pitch model: where the catcher calls for the ball, where it actually
//! goes, and how hard it is to read and to square up.
//!
//! Location is a scalar: 0 at the center of the zone, 1 at the edge,
//! beyond 1 outside. The calling modifier aggregates game pressure into a
//! target strike probability, which is inverted through the pitcher's
//! accuracy spread into a target location.

use serde::{Deserialize, Serialize};

use crate::engine::baserunning::BaseSummary;
use crate::engine::constants::pitching;
use crate::engine::rng::Roller;
use crate::models::player::PlayerAttributes;
use crate::models::rules::GameRules;

/// Read-only inputs for one pitch.
pub struct PitchInput<'a> {
    pub pitcher: &'a PlayerAttributes,
    pub catcher: &'a PlayerAttributes,
    pub batter: &'a PlayerAttributes,
    pub on_deck: &'a PlayerAttributes,
    pub balls: u8,
    pub strikes: u8,
    pub outs: u8,
    pub rules: &'a GameRules,
    pub bases: &'a BaseSummary,
}

/// One resolved pitch. Immutable once rolled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pitch {
    /// Unitless pressure aggregate behind the call.
    pub calling_modifier: f64,
    /// Location the catcher asked for.
    pub target: f64,
    /// Location the ball actually crossed (signed).
    pub location: f64,
    pub strike: bool,
    /// How hard the pitch is to read.
    pub obscurity: f64,
    /// How hard the pitch is to square up.
    pub difficulty: f64,
    /// Power offset applied to the batter downstream; may be negative.
    pub reduction: f64,
}

/// Aggregate count/bases/outs pressure into the calling modifier.
/// Positive means "attack the zone", negative means "work the edges".
pub fn calling_modifier(input: &PitchInput) -> f64 {
    let rules = input.rules;

    let count_pressure = input.balls as f64 / (rules.ball_count - 1).max(1) as f64
        - input.strikes as f64 / (rules.strike_count - 1).max(1) as f64;

    let batter_bias = input.batter.power - input.batter.discipline;

    // Contiguous runners from first base are walked in by a free pass.
    let base_count = input.bases.slots().len() as u8 - 1;
    let mut runners_to_walk = 0u8;
    while runners_to_walk < base_count && input.bases.occupant(runners_to_walk + 1).is_some() {
        runners_to_walk += 1;
    }
    let walk_pressure = runners_to_walk as f64 / base_count.max(1) as f64;

    // Runners in scoring position, exponentially weighted by closeness.
    let mut risp = 0.0;
    for base in 2..=base_count {
        if input.bases.occupant(base).is_some() {
            risp += pitching::RISP_EXP_BASE.powi((base - 2) as i32);
        }
    }

    let outs_pressure =
        2.0 * (input.outs as f64 / (rules.outs_count - 1).max(1) as f64 - 0.5);

    let on_deck_differential =
        input.on_deck.batting_quality() - input.batter.batting_quality();

    pitching::COUNT_WEIGHT * count_pressure
        - pitching::BATTER_BIAS_WEIGHT * batter_bias
        + pitching::RUNNER_WALK_WEIGHT * walk_pressure
        - pitching::RISP_WEIGHT * risp
        + pitching::OUTS_WEIGHT * outs_pressure
        + pitching::ON_DECK_WEIGHT * on_deck_differential
}

/// Compress the modifier through a bounded S-curve into a strike target.
pub fn target_strike_probability(modifier: f64) -> f64 {
    let sigmoid = 1.0 / (1.0 + (-pitching::CURVE_GAIN * modifier).exp());
    pitching::STRIKE_PROB_MIN
        + (pitching::STRIKE_PROB_MAX - pitching::STRIKE_PROB_MIN) * sigmoid
}

/// Effective zone edge after catcher framing.
pub fn zone_edge(catcher: &PlayerAttributes) -> f64 {
    1.0 + (catcher.calling - 1.0) * pitching::FRAMING_FACTOR
}

/// Throw one pitch: call a target, roll the actual location, derive the
/// read/contact scalars.
pub fn throw_pitch(input: &PitchInput, roller: &mut dyn Roller) -> Pitch {
    let modifier = calling_modifier(input);
    let strike_probability = target_strike_probability(modifier);

    let spread =
        (pitching::BASE_SPREAD / input.pitcher.accuracy.max(0.1)).max(pitching::MIN_SPREAD);
    let edge = zone_edge(input.catcher);

    // Aim so the accuracy spread leaves `strike_probability` mass inside
    // the near edge of the zone.
    let target = edge - probit(strike_probability) * spread;

    let location = roller.normal(target, spread);
    let strike = location.abs() <= edge;

    let edge_distance = (location.abs() - 1.0).abs();
    let obscurity = (pitching::EDGE_OBSCURITY * (-pitching::EDGE_DECAY * edge_distance).exp()
        + (input.pitcher.trickery - 1.0) * pitching::TRICKERY_OBSCURITY
        + pitching::OBSCURITY_FLOOR)
        .max(0.0);

    let difficulty = (pitching::DIFFICULTY_SCALE
        * location.abs().powf(pitching::DIFFICULTY_EXP)
        + (input.pitcher.throwing - 1.0) * pitching::FORCE_WEIGHT)
        .max(0.0);

    let reduction = roller.normal(
        (input.pitcher.trickery - 1.0) * pitching::REDUCTION_MEAN_SCALE,
        pitching::REDUCTION_SPREAD,
    );

    Pitch {
        calling_modifier: modifier,
        target,
        location,
        strike,
        obscurity,
        difficulty,
        reduction,
    }
}

/// Inverse of the standard normal CDF (Acklam's rational approximation,
/// relative error below 1.15e-9 over the open unit interval).
pub fn probit(p: f64) -> f64 {
    let p = p.clamp(1e-9, 1.0 - 1e-9);

    const A: [f64; 6] = [
        -3.969683028665376e+01,
        2.209460984245205e+02,
        -2.759285104469687e+02,
        1.383577518672690e+02,
        -3.066479806614716e+01,
        2.506628277459239e+00,
    ];
    const B: [f64; 5] = [
        -5.447609879822406e+01,
        1.615858368580409e+02,
        -1.556989798598866e+02,
        6.680131188771972e+01,
        -1.328068155288572e+01,
    ];
    const C: [f64; 6] = [
        -7.784894002430293e-03,
        -3.223964580411365e-01,
        -2.400758277161838e+00,
        -2.549732539343734e+00,
        4.374664141464968e+00,
        2.938163982698783e+00,
    ];
    const D: [f64; 4] = [
        7.784695709041462e-03,
        3.224671290700398e-01,
        2.445134137142996e+00,
        3.754408661907416e+00,
    ];
    const P_LOW: f64 = 0.02425;

    if p < P_LOW {
        let q = (-2.0 * p.ln()).sqrt();
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    } else if p <= 1.0 - P_LOW {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    } else {
        let q = (-2.0 * (1.0 - p).ln()).sqrt();
        -(((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    }
}
