//! Immutable game rule constants, created once per game.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRules {
    /// Balls that complete a walk.
    pub ball_count: u8,
    /// Strikes that complete a strikeout.
    pub strike_count: u8,
    /// Outs that end a half-inning.
    pub outs_count: u8,
    /// Scheduled innings; play continues past this while tied.
    pub innings: u16,
    /// Hard ceiling on pitch cycles. The game ends here regardless of
    /// score, guaranteeing termination under pathological inputs.
    pub max_ticks: u32,
}

impl GameRules {
    pub fn standard() -> Self {
        Self {
            ball_count: 4,
            strike_count: 3,
            outs_count: 3,
            innings: 9,
            max_ticks: 3000,
        }
    }
}

impl Default for GameRules {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_rules() {
        let rules = GameRules::standard();
        assert_eq!(rules.ball_count, 4);
        assert_eq!(rules.strike_count, 3);
        assert_eq!(rules.outs_count, 3);
        assert_eq!(rules.innings, 9);
        assert!(rules.max_ticks > 0);
    }
}
