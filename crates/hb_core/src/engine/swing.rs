//! Swing model: whether the batter offers, and what the bat finds.

use serde::{Deserialize, Serialize};

use crate::engine::constants::swinging;
use crate::engine::pitch::Pitch;
use crate::engine::rng::Roller;
use crate::models::events::SwingOutcome;
use crate::models::player::PlayerAttributes;
use crate::models::rules::GameRules;

/// One resolved plate decision. Immutable once rolled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Swing {
    pub desperation: f64,
    pub read_chance: f64,
    pub swung: bool,
    /// Contact quality; only meaningful when `swung`.
    pub quality: f64,
    pub outcome: SwingOutcome,
}

/// Count pressure to offer at the pitch. Peaks around 1.14 with two
/// strikes and no balls; a full count of balls calms the batter down.
pub fn desperation(balls: u8, strikes: u8, rules: &GameRules) -> f64 {
    let s = (strikes.min(rules.strike_count.saturating_sub(1)) as f64 + swinging::COUNT_BONUS)
        .max(0.0);
    let b = (balls.min(rules.ball_count.saturating_sub(1)) as f64 + swinging::COUNT_BONUS)
        .max(0.0);
    (swinging::DESPERATION_BASE + s * swinging::DESPERATION_PER_STRIKE
        - b * swinging::DESPERATION_PER_BALL)
        .clamp(0.0, swinging::DESPERATION_MAX)
}

/// Chance the batter reads the pitch for what it is.
pub fn read_chance(obscurity: f64, batter: &PlayerAttributes) -> f64 {
    (1.0 - obscurity * swinging::READ_SCALE / batter.discipline.max(0.1)).clamp(0.0, 1.0)
}

/// Resolve the batter's reaction to a pitch.
pub fn resolve_swing(
    batter: &PlayerAttributes,
    pitch: &Pitch,
    balls: u8,
    strikes: u8,
    rules: &GameRules,
    roller: &mut dyn Roller,
) -> Swing {
    let desperation = desperation(balls, strikes, rules);
    let read = read_chance(pitch.obscurity, batter);

    // The batter swings at what it believes is a strike.
    let believes_strike = if pitch.strike { read } else { 1.0 - read };
    let swing_probability = (believes_strike * desperation).clamp(0.0, 1.0);
    let swung = roller.chance(swing_probability);

    if !swung {
        let outcome = if pitch.strike {
            SwingOutcome::StrikeLooking
        } else {
            SwingOutcome::Ball
        };
        return Swing {
            desperation,
            read_chance: read,
            swung: false,
            quality: 0.0,
            outcome,
        };
    }

    let net_contact = batter.contact - pitch.difficulty;
    let quality = roller.normal(
        swinging::QUALITY_BIAS + net_contact * swinging::QUALITY_NET_SCALE,
        swinging::QUALITY_SPREAD,
    );
    let outcome = if quality <= 0.0 {
        SwingOutcome::StrikeSwinging
    } else if quality >= 1.0 {
        SwingOutcome::Fair
    } else {
        SwingOutcome::Foul
    };

    Swing {
        desperation,
        read_chance: read,
        swung: true,
        quality,
        outcome,
    }
}
