//! Per-runner decision and motion model.
//!
//! A runner's position is `base` (the last base touched) plus `remainder`
//! feet advanced toward the next. Every decision step recomputes the
//! derived flags (`forward`, `force`, `safe`) from intents and the legal
//! base window handed down by the basepaths collection.

use serde::{Deserialize, Serialize};

use crate::engine::constants::running;
use crate::engine::rng::Roller;
use crate::error::{GameError, Result};
use crate::models::player::{PlayerAttributes, PlayerId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Runner {
    pub player: PlayerId,
    // Attribute scalars copied at creation; the roster is not consulted
    // again while the play runs.
    pub speed: f64,
    pub bravery: f64,
    pub timing: f64,

    /// Last base touched; 0 is home (a batter leaving the box).
    pub base: u8,
    /// Feet advanced past `base` toward the next one.
    pub remainder: f64,

    // Intents.
    pub tagging_up: bool,
    pub holding: bool,
    pub always_run: bool,

    // Derived every decision step.
    pub forward: bool,
    pub force: bool,
    pub safe: bool,
}

impl Runner {
    /// A batter leaving the box. The force chain (home is occupied) is
    /// what pushes the batter to first; no standing intent needed.
    pub fn batter(player: PlayerId, attrs: &PlayerAttributes) -> Self {
        Self {
            player,
            speed: attrs.speed,
            bravery: attrs.bravery,
            timing: attrs.timing,
            base: 0,
            remainder: 0.0,
            tagging_up: false,
            holding: false,
            always_run: false,
            forward: true,
            force: true,
            safe: false,
        }
    }

    /// A runner standing safe on `base`.
    pub fn on_base(player: PlayerId, attrs: &PlayerAttributes, base: u8) -> Self {
        Self {
            player,
            speed: attrs.speed,
            bravery: attrs.bravery,
            timing: attrs.timing,
            base,
            remainder: 0.0,
            tagging_up: false,
            holding: false,
            always_run: false,
            forward: false,
            force: false,
            safe: true,
        }
    }

    /// Feet per second; floored so a pathological rating cannot stall the
    /// motion loop.
    pub fn speed_fps(&self) -> f64 {
        (running::BASE_SPEED * self.speed).max(1.0)
    }

    /// Seconds to reach the next base from the current spot.
    pub fn time_to_next_base(&self, path_length: f64) -> f64 {
        (path_length - self.remainder).max(0.0) / self.speed_fps()
    }

    /// Total feet advanced around the circuit.
    pub fn position_feet(&self, path_length: f64) -> f64 {
        self.base as f64 * path_length + self.remainder
    }

    /// Touch `base`: idempotent landing. Remainder zeroes, the runner is
    /// safe, no longer forced, no longer tagging up.
    pub fn touch_base(&mut self, base: u8) {
        self.base = base;
        self.remainder = 0.0;
        self.safe = true;
        self.force = false;
        self.tagging_up = false;
        self.forward = false;
    }

    /// One decision step. `window` is the time the runner believes it has;
    /// `min_base ..= max_base` is the legal range of bases to end on.
    pub fn decide(
        &mut self,
        window: f64,
        min_base: u8,
        max_base: u8,
        bonus: f64,
        path_length: f64,
        roller: &mut dyn Roller,
    ) -> Result<()> {
        if self.tagging_up {
            if self.base == 0 {
                return Err(GameError::Invariant(format!(
                    "runner {:?} tagging up from home",
                    self.player
                )));
            }
            if self.base < min_base || self.base > max_base {
                return Err(GameError::Invariant(format!(
                    "runner {:?} tagging up on base {} outside [{}, {}]",
                    self.player, self.base, min_base, max_base
                )));
            }
            self.forward = false;
            self.force = true;
            return Ok(());
        }

        if self.base < min_base {
            if min_base - self.base > 1 {
                return Err(GameError::Invariant(format!(
                    "runner {:?} forced {} bases ahead (base {} -> {})",
                    self.player,
                    min_base - self.base,
                    self.base,
                    min_base
                )));
            }
            self.forward = true;
            self.force = true;
            self.safe = false;
            return Ok(());
        }

        if self.base > max_base {
            if self.base - max_base > 1 {
                return Err(GameError::Invariant(format!(
                    "runner {:?} forced {} bases back (base {} -> {})",
                    self.player,
                    self.base - max_base,
                    self.base,
                    max_base
                )));
            }
            self.forward = false;
            self.force = true;
            return Ok(());
        }

        if self.base == max_base {
            // Blocked by the runner ahead: nowhere to go.
            self.forward = false;
            self.force = true;
            return Ok(());
        }

        // Free decision.
        self.force = false;
        if self.remainder > path_length * running::MIDPOINT_COMMIT {
            // Committed: no backing up past halfway.
            self.forward = true;
            return Ok(());
        }
        if self.always_run {
            self.forward = true;
            self.safe = false;
            return Ok(());
        }
        if self.holding {
            self.forward = false;
            return Ok(());
        }

        let effective = (window + bonus)
            * roller.normal(1.0, running::TIMING_FUZZ / self.timing.max(0.1));
        let demanded_margin = roller.normal(
            running::BRAVERY_THRESHOLD - (self.bravery - 1.0) * running::BRAVERY_SCALE,
            running::BRAVERY_FUZZ,
        );
        let needed = self.time_to_next_base(path_length) * demanded_margin.max(0.5);
        self.forward = effective > needed;
        if self.forward {
            self.safe = false;
        }
        Ok(())
    }

    /// Continuous motion: loop decision → move in sub-steps bounded by
    /// `duration`, touching each base reached, until time runs out (partial
    /// remainder kept) or the runner settles safe with zero remainder.
    pub fn advance(
        &mut self,
        duration: f64,
        min_base: u8,
        max_base: u8,
        bonus: f64,
        path_length: f64,
        roller: &mut dyn Roller,
    ) -> Result<()> {
        let mut remaining = duration.max(0.0);
        for _ in 0..running::MAX_ADVANCE_STEPS {
            let was_tagging = self.tagging_up;
            self.decide(remaining, min_base, max_base, bonus, path_length, roller)?;

            if self.forward {
                let to_next = (path_length - self.remainder).max(0.0);
                let dt = to_next / self.speed_fps();
                if dt <= remaining {
                    remaining -= dt;
                    let next = self.base + 1;
                    self.touch_base(next);
                    if self.base >= max_base {
                        // Reached the ceiling (or scored); settled.
                        return Ok(());
                    }
                    continue;
                }
                self.remainder += remaining * self.speed_fps();
                return Ok(());
            }

            // Holding or retreating toward the last touched base.
            if self.remainder <= running::SNAP_DISTANCE {
                // Close enough while not advancing: snap on.
                self.touch_base(self.base);
                if was_tagging && remaining > 0.0 {
                    // Tag satisfied; the runner may now choose to go.
                    continue;
                }
                return Ok(());
            }
            let dt = self.remainder / self.speed_fps();
            if dt <= remaining {
                remaining -= dt;
                self.touch_base(self.base);
                if was_tagging && remaining > 0.0 {
                    continue;
                }
                return Ok(());
            }
            self.remainder -= remaining * self.speed_fps();
            return Ok(());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::rng::ScriptedRoller;
    use crate::models::player::TeamSide;

    const PATH: f64 = 90.0;

    fn runner_on(base: u8) -> Runner {
        Runner::on_base(
            PlayerId::new(TeamSide::Away, 1),
            &PlayerAttributes::average(),
            base,
        )
    }

    #[test]
    fn touch_base_is_idempotent() {
        let mut runner = runner_on(1);
        runner.remainder = 30.0;
        runner.force = true;
        runner.tagging_up = true;
        runner.touch_base(2);
        let after_first = runner.clone();
        runner.touch_base(2);
        assert_eq!(runner, after_first);
        assert_eq!(runner.remainder, 0.0);
        assert!(runner.safe && !runner.force && !runner.tagging_up);
    }

    #[test]
    fn forced_runner_has_no_choice() {
        let mut runner = runner_on(1);
        let mut roller = ScriptedRoller::constant(0.5);
        runner
            .decide(10.0, 2, 3, 0.0, PATH, &mut roller)
            .unwrap();
        assert!(runner.forward && runner.force);
    }

    #[test]
    fn force_two_bases_ahead_is_an_invariant_violation() {
        let mut runner = runner_on(1);
        let mut roller = ScriptedRoller::constant(0.5);
        let err = runner.decide(10.0, 3, 3, 0.0, PATH, &mut roller);
        assert!(matches!(err, Err(GameError::Invariant(_))));
    }

    #[test]
    fn tagging_up_from_home_is_an_invariant_violation() {
        let mut runner = Runner::batter(
            PlayerId::new(TeamSide::Away, 1),
            &PlayerAttributes::average(),
        );
        runner.tagging_up = true;
        let mut roller = ScriptedRoller::constant(0.5);
        let err = runner.decide(10.0, 0, 1, 0.0, PATH, &mut roller);
        assert!(matches!(err, Err(GameError::Invariant(_))));
    }

    #[test]
    fn past_midpoint_always_commits() {
        let mut runner = runner_on(1);
        runner.remainder = 50.0;
        runner.safe = false;
        // Rolls that would otherwise say "stay".
        let mut roller = ScriptedRoller::new([-3.0, 3.0]);
        runner.decide(0.1, 1, 3, 0.0, PATH, &mut roller).unwrap();
        assert!(runner.forward);
        assert!(!runner.force);
    }

    #[test]
    fn generous_window_advances_a_full_base() {
        let mut runner = runner_on(1);
        runner.always_run = true;
        let mut roller = ScriptedRoller::constant(0.0);
        runner.advance(4.0, 1, 2, 0.0, PATH, &mut roller).unwrap();
        assert_eq!(runner.base, 2);
        assert_eq!(runner.remainder, 0.0);
        assert!(runner.safe);
    }

    #[test]
    fn short_window_leaves_partial_remainder() {
        let mut runner = runner_on(1);
        runner.always_run = true;
        let mut roller = ScriptedRoller::constant(0.0);
        runner.advance(1.0, 1, 3, 0.0, PATH, &mut roller).unwrap();
        assert_eq!(runner.base, 1);
        assert!((runner.remainder - runner.speed_fps()).abs() < 1e-9);
        assert!(!runner.safe);
    }

    #[test]
    fn tag_up_returns_to_base_before_anything_else() {
        let mut runner = runner_on(2);
        runner.remainder = 20.0;
        runner.safe = false;
        runner.tagging_up = true;
        runner.holding = true; // stay put after the tag
        let mut roller = ScriptedRoller::constant(0.0);
        runner.advance(5.0, 2, 3, 0.0, PATH, &mut roller).unwrap();
        assert_eq!(runner.base, 2);
        assert_eq!(runner.remainder, 0.0);
        assert!(runner.safe && !runner.tagging_up);
    }

    #[test]
    fn snap_distance_pulls_a_loitering_runner_onto_the_base() {
        let mut runner = runner_on(1);
        runner.remainder = 0.5;
        runner.safe = false;
        runner.holding = true;
        let mut roller = ScriptedRoller::constant(0.0);
        runner.advance(0.01, 1, 3, 0.0, PATH, &mut roller).unwrap();
        assert_eq!(runner.base, 1);
        assert_eq!(runner.remainder, 0.0);
        assert!(runner.safe);
    }

    #[test]
    fn blocked_runner_stays_on_its_base() {
        let mut runner = runner_on(2);
        let mut roller = ScriptedRoller::constant(0.5);
        runner.advance(10.0, 2, 2, 0.0, PATH, &mut roller).unwrap();
        assert_eq!(runner.base, 2);
        assert!(runner.safe);
    }
}
