//! Tuning constants for the simulation models.
//!
//! Units: feet, seconds, radians. Attribute ratings center on 1.0, so most
//! attribute terms appear as `(rating - 1.0) * weight`.

/// Event bus dispatch limits.
pub mod bus {
    /// Maximum nested `send` depth before dispatch is treated as a cycle.
    pub const MAX_DISPATCH_DEPTH: usize = 32;
}

/// Pitch calling and location model.
pub mod pitching {
    // Calling-modifier component weights. Positive modifier = attack the
    // zone, negative = work the edges.
    pub const COUNT_WEIGHT: f64 = 0.25;
    pub const BATTER_BIAS_WEIGHT: f64 = 0.15;
    pub const RUNNER_WALK_WEIGHT: f64 = 0.30;
    pub const RISP_WEIGHT: f64 = 0.18;
    /// Base of the exponential weighting on runners in scoring position.
    pub const RISP_EXP_BASE: f64 = 1.6;
    pub const OUTS_WEIGHT: f64 = 0.10;
    pub const ON_DECK_WEIGHT: f64 = 0.10;

    // Bounded S-curve from the modifier to a target strike probability.
    pub const STRIKE_PROB_MIN: f64 = 0.25;
    pub const STRIKE_PROB_MAX: f64 = 0.85;
    pub const CURVE_GAIN: f64 = 2.0;

    /// Location spread at accuracy 1.0; scales down with accuracy.
    pub const BASE_SPREAD: f64 = 0.35;
    /// Floor keeps an absurd accuracy rating from collapsing the roll.
    pub const MIN_SPREAD: f64 = 0.04;

    /// Catcher framing widens (or shrinks) the effective zone edge.
    pub const FRAMING_FACTOR: f64 = 0.10;

    // Obscurity: hardest to read at the zone edge, decaying away from it,
    // plus a flat trickery term.
    pub const EDGE_OBSCURITY: f64 = 0.80;
    pub const EDGE_DECAY: f64 = 2.5;
    pub const TRICKERY_OBSCURITY: f64 = 0.30;
    pub const OBSCURITY_FLOOR: f64 = 0.10;

    // Difficulty grows superlinearly with distance from the zone center.
    pub const DIFFICULTY_SCALE: f64 = 0.45;
    pub const DIFFICULTY_EXP: f64 = 1.8;
    pub const FORCE_WEIGHT: f64 = 0.15;

    // Reduction roll: trickery shaves (or feeds) batter power.
    pub const REDUCTION_MEAN_SCALE: f64 = 0.20;
    pub const REDUCTION_SPREAD: f64 = 0.15;
}

/// Swing decision and contact model.
pub mod swinging {
    // Desperation from the count; peaks around 1.14 at two strikes.
    pub const DESPERATION_BASE: f64 = 0.70;
    pub const DESPERATION_PER_STRIKE: f64 = 0.22;
    pub const DESPERATION_PER_BALL: f64 = 0.10;
    pub const DESPERATION_MAX: f64 = 1.14;
    /// BONUS shift applied to both count components before clipping.
    pub const COUNT_BONUS: f64 = 0.0;

    /// Obscurity discount divided by discipline when computing read chance.
    pub const READ_SCALE: f64 = 0.60;

    // Contact quality draw: Normal(bias + net * scale, spread).
    pub const QUALITY_BIAS: f64 = 0.25;
    pub const QUALITY_NET_SCALE: f64 = 0.75;
    pub const QUALITY_SPREAD: f64 = 0.45;
}

/// Ball flight projectile model.
pub mod flight {
    /// Gravity, ft/s^2.
    pub const GRAVITY: f64 = 32.17;

    // Launch angle draw, radians.
    pub const LAUNCH_MEAN_BASE: f64 = 0.30;
    pub const LAUNCH_MEAN_POWER: f64 = 0.12;
    pub const LAUNCH_SPREAD: f64 = 0.35;
    /// Spread shrinks as quality rises: spread / (1 + quality * this).
    pub const LAUNCH_SPREAD_QUALITY: f64 = 1.0;

    // Field angle draw, radians.
    pub const PULL_SCALE: f64 = 0.50;
    pub const FIELD_SPREAD: f64 = 0.35;
    /// A clean hit at or above this quality that rolls foul is rerolled once.
    pub const CLEAN_QUALITY: f64 = 1.2;

    // Exit velocity, ft/s.
    pub const EXIT_SPEED_BASE: f64 = 110.0;
    pub const QUALITY_EXP: f64 = 0.8;

    /// Wind-resistance correction subtracted from carry, ft per s^2 of
    /// flight time squared.
    pub const DRAG_PER_T2: f64 = 1.5;

    /// Rolling friction deceleration for grounders, ft/s^2.
    pub const GROUND_FRICTION: f64 = 25.7;
    /// Grounder convention: halve the exit speed.
    pub const GROUNDER_SPEED_FACTOR: f64 = 0.5;

    /// Wall deflections drop the ball this far in front of the fence.
    pub const WALL_DROP_FEET: f64 = 12.0;
    /// Extra seconds the defense spends playing a carom.
    pub const WALL_RETRIEVE_SECONDS: f64 = 1.2;
}

/// Baserunning decision and motion model.
pub mod running {
    /// Sprint speed at rating 1.0, ft/s.
    pub const BASE_SPEED: f64 = 27.0;
    /// Within this many feet of a base while not advancing, snap on.
    pub const SNAP_DISTANCE: f64 = 1.0;
    /// Multiplicative timing fuzz on the available window: sd / timing.
    pub const TIMING_FUZZ: f64 = 0.20;
    /// A runner demands this margin of spare time before advancing...
    pub const BRAVERY_THRESHOLD: f64 = 1.15;
    /// ...less this much per point of bravery above average.
    pub const BRAVERY_SCALE: f64 = 0.25;
    pub const BRAVERY_FUZZ: f64 = 0.15;
    /// Past this fraction of the basepath a runner always commits forward.
    pub const MIDPOINT_COMMIT: f64 = 0.5;
    /// Defensive guard: decision/move loop iterations per advance call.
    pub const MAX_ADVANCE_STEPS: usize = 64;
}

/// Catch, throw, fielder's choice and rundown model.
pub mod fielding {
    /// Catch probability standing under the ball.
    pub const CATCH_BASE: f64 = 0.95;
    /// Feet of range at reach 1.0; the distance penalty is quadratic in
    /// dist / (reach * this).
    pub const REACH_RANGE: f64 = 80.0;
    pub const GRABBINESS_WEIGHT: f64 = 0.15;
    pub const CATCH_PROB_MIN: f64 = 0.02;
    pub const CATCH_PROB_MAX: f64 = 0.99;

    /// Bobble penalty added to the ball's effective duration on a miss.
    pub const ERROR_SECONDS: f64 = 1.8;

    /// Glove-to-hand transfer and windup; also the floor for a throw of
    /// zero distance (the zero-division fallback).
    pub const MIN_THROW_SECONDS: f64 = 0.8;
    /// Throw speed at rating 1.0, ft/s.
    pub const THROW_SPEED: f64 = 120.0;

    /// A runner this close to the target base is tagged on a beaten throw.
    pub const TAG_OUT_DISTANCE: f64 = 6.0;

    // Fielder's choice target scoring.
    pub const ADVANCE_VALUE_WEIGHT: f64 = 0.6;
    pub const DEFENSE_ODDS_WEIGHT: f64 = 0.4;
    pub const AWARENESS_FUZZ: f64 = 0.20;

    // Rundowns.
    pub const RUNDOWN_WASTE_SECONDS: f64 = 0.9;
    /// Iteration guard; a rundown never legitimately lasts this long.
    pub const MAX_RUNDOWN_FLIPS: usize = 16;

    /// Guard on fielder's-choice throw cycles per play.
    pub const MAX_THROW_CYCLES: usize = 12;
}
