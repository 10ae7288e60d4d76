//! The live, ordered collection of runners.
//!
//! Runners are held lead-first: index 0 is the runner closest to scoring,
//! the last index is the one closest to the batter. The ordering invariant
//! (`runner[i].base >= runner[i+1].base`) is asserted explicitly after
//! every whole-set operation rather than trusted to insertion order.

use serde::{Deserialize, Serialize};

use crate::engine::baserunning::runner::Runner;
use crate::engine::geometry::Coord;
use crate::engine::rng::Roller;
use crate::error::{GameError, Result};
use crate::models::player::PlayerId;
use crate::models::stadium::Stadium;

/// Immutable, fixed-length view of base occupancy: one slot per base plus
/// the unused home slot 0. This is what crosses the bus; live runner
/// internals never leave the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseSummary {
    slots: Vec<Option<PlayerId>>,
}

impl BaseSummary {
    pub fn empty(base_count: u8) -> Self {
        Self {
            slots: vec![None; base_count as usize + 1],
        }
    }

    pub fn occupant(&self, base: u8) -> Option<PlayerId> {
        self.slots.get(base as usize).copied().flatten()
    }

    pub fn slots(&self) -> &[Option<PlayerId>] {
        &self.slots
    }

    pub fn runners_on(&self) -> usize {
        self.slots.iter().flatten().count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Basepaths {
    base_count: u8,
    path_length: f64,
    /// Lead-first. See the module invariant.
    runners: Vec<Runner>,
}

impl Basepaths {
    pub fn new(base_count: u8, path_length: f64) -> Self {
        Self {
            base_count,
            path_length,
            runners: Vec::new(),
        }
    }

    pub fn for_stadium(stadium: &Stadium) -> Self {
        Self::new(stadium.base_count, stadium.basepath_length)
    }

    pub fn base_count(&self) -> u8 {
        self.base_count
    }

    pub fn path_length(&self) -> f64 {
        self.path_length
    }

    /// First base index past the last real base; touching it scores.
    pub fn scoring_base(&self) -> u8 {
        self.base_count + 1
    }

    pub fn runners(&self) -> &[Runner] {
        &self.runners
    }

    pub fn runner_mut(&mut self, idx: usize) -> &mut Runner {
        &mut self.runners[idx]
    }

    pub fn len(&self) -> usize {
        self.runners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runners.is_empty()
    }

    /// Any runner not yet settled safe on a base.
    pub fn any_live(&self) -> bool {
        self.runners.iter().any(|r| !r.safe)
    }

    pub fn remove(&mut self, idx: usize) -> Runner {
        self.runners.remove(idx)
    }

    /// Place a runner already standing safe on a base, keeping lead order.
    pub fn put_runner(&mut self, runner: Runner) -> Result<()> {
        let pos = self
            .runners
            .iter()
            .position(|r| r.base < runner.base)
            .unwrap_or(self.runners.len());
        self.runners.insert(pos, runner);
        self.assert_ordered()
    }

    /// The batter joins at the trail end of the paths.
    pub fn push_batter(&mut self, batter: Runner) -> Result<()> {
        if batter.base != 0 {
            return Err(GameError::Invariant(format!(
                "batter runner {:?} entering on base {}",
                batter.player, batter.base
            )));
        }
        self.runners.push(batter);
        self.assert_ordered()
    }

    /// Verify the lead-to-trail ordering invariant.
    pub fn assert_ordered(&self) -> Result<()> {
        for pair in self.runners.windows(2) {
            if pair[0].position_feet(self.path_length) < pair[1].position_feet(self.path_length) {
                return Err(GameError::Invariant(format!(
                    "basepaths out of order: {:?} (base {}) trails {:?} (base {})",
                    pair[0].player, pair[0].base, pair[1].player, pair[1].base
                )));
            }
        }
        Ok(())
    }

    /// A caught fly forces every runner back to its last touched base.
    /// A runner still at home has no base to return to and is left to the
    /// force chain instead.
    pub fn tag_up_all(&mut self) {
        for runner in &mut self.runners {
            if runner.base == 0 {
                continue;
            }
            runner.tagging_up = true;
            runner.forward = false;
            runner.force = true;
            runner.safe = false;
        }
    }

    /// Play over: settle every runner onto a base, lead first, never two
    /// on one bag and never forward of where they already were. This is
    /// the end-of-play fallback; it cannot score anyone.
    pub fn settle_all(&mut self) {
        let mut next_free = self.base_count;
        for runner in &mut self.runners {
            let target = runner.base.min(next_free);
            runner.touch_base(target);
            next_free = target.saturating_sub(1);
        }
        // A batter-runner squeezed all the way back to home leaves the
        // paths; there is no bag for it.
        self.runners.retain(|r| r.base > 0);
    }

    /// Bases currently owned (last touched) by any runner.
    fn occupied_bases(&self) -> Vec<u8> {
        self.runners.iter().map(|r| r.base).collect()
    }

    /// Floor of the legal window for each runner: one past its base when a
    /// contiguous chain of occupied bases behind it forces it onward.
    fn forced_floor(&self, runner: &Runner) -> u8 {
        if runner.tagging_up {
            return runner.base;
        }
        let occupied = self.occupied_bases();
        let mut chain_end = 0u8;
        while occupied.contains(&chain_end) {
            chain_end += 1;
        }
        if runner.base < chain_end {
            runner.base + 1
        } else {
            runner.base
        }
    }

    /// Advance the whole set for `duration` seconds, lead to trail, so a
    /// trailing runner's ceiling is wherever the one ahead ended up.
    /// Runners crossing the final base score and are removed; their ids are
    /// returned in crossing order.
    pub fn advance_all(
        &mut self,
        duration: f64,
        bonus: f64,
        roller: &mut dyn Roller,
    ) -> Result<Vec<PlayerId>> {
        let scoring = self.scoring_base();
        let mut ceiling = scoring;
        let mut scored_idx = Vec::new();

        for idx in 0..self.runners.len() {
            let min_base = self.forced_floor(&self.runners[idx]);
            let runner = &mut self.runners[idx];
            runner.advance(
                duration,
                min_base,
                ceiling,
                bonus,
                self.path_length,
                roller,
            )?;
            if runner.base >= scoring {
                scored_idx.push(idx);
                ceiling = scoring;
            } else if runner.remainder > 0.0 {
                ceiling = runner.base;
            } else {
                ceiling = runner.base.saturating_sub(1);
            }
        }

        let mut scored = Vec::with_capacity(scored_idx.len());
        for idx in scored_idx.into_iter().rev() {
            scored.insert(0, self.runners.remove(idx).player);
        }
        self.assert_ordered()?;
        Ok(scored)
    }

    /// A walk: the batter takes first; only force-chained runners advance,
    /// exactly one base each. Returns runners pushed across the plate.
    pub fn walk_batter(&mut self, mut batter: Runner) -> Result<Vec<PlayerId>> {
        if batter.base != 0 {
            return Err(GameError::Invariant(format!(
                "walked batter {:?} entering on base {}",
                batter.player, batter.base
            )));
        }
        let occupied = self.occupied_bases();
        let mut chain_end = 1u8;
        while occupied.contains(&chain_end) {
            chain_end += 1;
        }

        let mut scored = Vec::new();
        for runner in &mut self.runners {
            if runner.base >= 1 && runner.base < chain_end {
                let next = runner.base + 1;
                runner.touch_base(next);
            }
        }
        let base_count = self.base_count;
        self.runners.retain(|r| {
            if r.base > base_count {
                scored.push(r.player);
                false
            } else {
                true
            }
        });

        batter.touch_base(1);
        self.runners.push(batter);
        self.assert_ordered()?;
        Ok(scored)
    }

    /// Field coordinate of a runner, interpolated along its basepath.
    pub fn runner_coord(&self, idx: usize, stadium: &Stadium) -> Coord {
        let runner = &self.runners[idx];
        let from = stadium.base_coord(runner.base);
        let to = stadium.base_coord((runner.base + 1) % (self.base_count + 1));
        from.lerp(to, (runner.remainder / self.path_length).clamp(0.0, 1.0))
    }

    /// Render the live set into the immutable published view.
    pub fn summary(&self) -> BaseSummary {
        let mut summary = BaseSummary::empty(self.base_count);
        for runner in &self.runners {
            let base = runner.base as usize;
            if base >= 1 && base <= self.base_count as usize && summary.slots[base].is_none() {
                summary.slots[base] = Some(runner.player);
            }
        }
        summary
    }
}
