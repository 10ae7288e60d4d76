//! Fielding engine: catch, throw, fielder's choice and rundown
//! resolution once a ball is live.
//!
//! The engine takes temporary ownership of the basepaths for the play and
//! reports everything that happened as an ordered list of notes; the game
//! state machine publishes them and applies outs and runs. Modeling edge
//! cases (zero throw distance, tied target weights) resolve to explicit
//! fallbacks, never to an error.

use crate::engine::ball_flight::LiveBall;
use crate::engine::baserunning::{Basepaths, Runner};
use crate::engine::constants::fielding;
use crate::engine::geometry::Coord;
use crate::engine::rng::Roller;
use crate::error::Result;
use crate::models::events::OutKind;
use crate::models::lineup::Team;
use crate::models::player::{PlayerAttributes, PlayerId, TeamSide};
use crate::models::stadium::Stadium;

/// One resolved fielding action, in play order.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldingNote {
    Catch {
        fielder: PlayerId,
        caught: bool,
        distance: f64,
    },
    Throw {
        fielder: PlayerId,
        /// Base thrown to; 0 is home plate.
        target_base: u8,
        duration: f64,
    },
    Out {
        player: PlayerId,
        kind: OutKind,
    },
    Run {
        player: PlayerId,
    },
}

/// Everything a live ball produced, in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayResolution {
    pub notes: Vec<FieldingNote>,
}

impl PlayResolution {
    pub fn outs(&self) -> u8 {
        self.notes
            .iter()
            .filter(|n| matches!(n, FieldingNote::Out { .. }))
            .count() as u8
    }

    pub fn runs(&self) -> Vec<PlayerId> {
        self.notes
            .iter()
            .filter_map(|n| match n {
                FieldingNote::Run { player } => Some(*player),
                _ => None,
            })
            .collect()
    }
}

/// Seconds for a fielder to get the ball to a spot `distance` feet away.
/// The windup floor doubles as the zero-distance fallback.
pub fn throw_seconds(thrower: &PlayerAttributes, distance: f64) -> f64 {
    fielding::MIN_THROW_SECONDS + distance.max(0.0) / (fielding::THROW_SPEED * thrower.throwing.max(0.1))
}

pub struct FieldingEngine<'a> {
    pub team: &'a Team,
    pub side: TeamSide,
    pub stadium: &'a Stadium,
}

impl<'a> FieldingEngine<'a> {
    pub fn new(team: &'a Team, side: TeamSide, stadium: &'a Stadium) -> Self {
        Self { team, side, stadium }
    }

    fn attrs(&self, roster_index: u8) -> &PlayerAttributes {
        &self.team.player(roster_index).attributes
    }

    fn player_id(&self, roster_index: u8) -> PlayerId {
        PlayerId::new(self.side, roster_index)
    }

    /// Resolve a fair ball in play. `batter` is the batter-runner leaving
    /// the box; `outs_to_end` caps the outs this play may add before the
    /// half-inning is over and resolution stops.
    pub fn resolve_hit(
        &self,
        ball: &LiveBall,
        batter: Runner,
        paths: &mut Basepaths,
        outs_to_end: u8,
        roller: &mut dyn Roller,
    ) -> Result<PlayResolution> {
        let mut resolution = PlayResolution::default();

        let nearest = match self.team.defense.nearest_fielder(ball.landing, self.stadium) {
            Some(d) => d,
            None => return Ok(resolution),
        };
        let fielder_attrs = self.attrs(nearest.roster_index);
        let distance = nearest.coord.distance(ball.landing);

        let reach_range = (fielder_attrs.reach.max(0.1)) * fielding::REACH_RANGE;
        let catch_probability = (fielding::CATCH_BASE - (distance / reach_range).powi(2)
            + (fielder_attrs.grabbiness - 1.0) * fielding::GRABBINESS_WEIGHT)
            .clamp(fielding::CATCH_PROB_MIN, fielding::CATCH_PROB_MAX);
        let caught = roller.chance(catch_probability);

        resolution.notes.push(FieldingNote::Catch {
            fielder: self.player_id(nearest.roster_index),
            caught,
            distance,
        });

        let home = Coord::ORIGIN;
        if caught && ball.catchable {
            // Fly out: batter never reaches the paths, everyone tags up.
            resolution.notes.push(FieldingNote::Out {
                player: batter.player,
                kind: OutKind::FlyOut,
            });
            if resolution.outs() >= outs_to_end {
                return Ok(resolution);
            }
            paths.tag_up_all();
            let window = throw_seconds(fielder_attrs, nearest.coord.distance(home));
            for player in paths.advance_all(window, 0.0, roller)? {
                resolution.notes.push(FieldingNote::Run { player });
            }
        } else {
            // Ball on the ground (cleanly fielded or bobbled): the batter
            // becomes a runner and everyone moves for the effective window.
            let error_time = if caught { 0.0 } else { fielding::ERROR_SECONDS };
            let window = ball.duration
                + error_time
                + throw_seconds(fielder_attrs, ball.landing.distance(home));
            paths.push_batter(batter)?;
            for player in paths.advance_all(window, 0.0, roller)? {
                resolution.notes.push(FieldingNote::Run { player });
            }
        }

        self.throw_cycle(
            ball.landing,
            fielder_attrs.clone(),
            self.player_id(nearest.roster_index),
            paths,
            outs_to_end,
            &mut resolution,
            roller,
        )?;

        Ok(resolution)
    }

    /// Fielder's choice: while any runner is still live, pick the most
    /// valuable reachable target, throw, and resolve the play at that base.
    #[allow(clippy::too_many_arguments)]
    fn throw_cycle(
        &self,
        mut ball_pos: Coord,
        mut holder_attrs: PlayerAttributes,
        mut holder_id: PlayerId,
        paths: &mut Basepaths,
        outs_to_end: u8,
        resolution: &mut PlayResolution,
        roller: &mut dyn Roller,
    ) -> Result<()> {
        for _ in 0..fielding::MAX_THROW_CYCLES {
            if resolution.outs() >= outs_to_end || paths.is_empty() || !paths.any_live() {
                break;
            }

            let target = match self.pick_target(paths, ball_pos, &holder_attrs, roller) {
                Some(t) => t,
                None => break,
            };
            let (target_player, raw_base) = target;
            let display_base = raw_base % (paths.base_count() + 1);
            let target_coord = self.stadium.base_coord(display_base);
            let duration = throw_seconds(&holder_attrs, ball_pos.distance(target_coord));

            resolution.notes.push(FieldingNote::Throw {
                fielder: holder_id,
                target_base: display_base,
                duration,
            });

            // Everyone runs while the ball is in the air.
            for player in paths.advance_all(duration, 0.0, roller)? {
                resolution.notes.push(FieldingNote::Run { player });
            }

            // Resolve at the target base.
            if let Some(idx) = paths
                .runners()
                .iter()
                .position(|r| r.player == target_player)
            {
                let runner = &paths.runners()[idx];
                if !runner.safe {
                    let path_length = paths.path_length();
                    let gap =
                        (raw_base as f64 * path_length - runner.position_feet(path_length)).abs();
                    if gap <= fielding::TAG_OUT_DISTANCE || runner.force {
                        let kind = if runner.force {
                            OutKind::ForceOut
                        } else {
                            OutKind::TagOut
                        };
                        let out = paths.remove(idx);
                        resolution.notes.push(FieldingNote::Out {
                            player: out.player,
                            kind,
                        });
                    } else {
                        self.run_down(idx, paths, resolution, roller)?;
                    }
                }
            }

            // Ball settles with whoever covers the target base.
            ball_pos = target_coord;
            if let Some(cover) = self
                .team
                .defense
                .rundown_pair(display_base, display_base, self.stadium)
                .1
            {
                holder_attrs = self.attrs(cover.roster_index).clone();
                holder_id = self.player_id(cover.roster_index);
            }
        }

        // Play over: anything still drifting settles, one runner per bag.
        paths.settle_all();
        paths.assert_ordered()?;
        Ok(())
    }

    /// Score every live runner by the value of the base it is taking and
    /// the odds the defense wins a throw there. Ties resolve to the
    /// lowest-numbered base.
    fn pick_target(
        &self,
        paths: &Basepaths,
        ball_pos: Coord,
        holder: &PlayerAttributes,
        roller: &mut dyn Roller,
    ) -> Option<(PlayerId, u8)> {
        let scoring = paths.scoring_base();
        let path_length = paths.path_length();
        let mut best: Option<(f64, PlayerId, u8)> = None;

        // Trail-first so a tie sticks with the lowest base.
        for runner in paths.runners().iter().rev() {
            if runner.safe {
                continue;
            }
            // Forward runners draw the throw ahead of them, retreating
            // runners draw it back to the base behind them.
            let target = if runner.forward {
                (runner.base + 1).min(scoring)
            } else {
                runner.base
            };
            let advance_value = target as f64 / scoring as f64;

            let target_feet = target as f64 * path_length;
            let runner_time =
                (target_feet - runner.position_feet(path_length)).abs() / runner.speed_fps();
            let target_coord = self.stadium.base_coord(target % (paths.base_count() + 1));
            let throw_time = throw_seconds(holder, ball_pos.distance(target_coord));

            let raw_odds = runner_time / (runner_time + throw_time).max(1e-6);
            let fuzz = roller.normal(1.0, fielding::AWARENESS_FUZZ / holder.awareness.max(0.1));
            let odds = (raw_odds * fuzz).clamp(0.0, 1.0);

            let weight = fielding::ADVANCE_VALUE_WEIGHT * advance_value
                + fielding::DEFENSE_ODDS_WEIGHT * odds;
            if best.map(|(w, _, _)| weight > w).unwrap_or(true) {
                best = Some((weight, runner.player, target));
            }
        }

        best.map(|(_, player, target)| (player, target))
    }

    /// Repeated coin-flip rundown on the runner at `idx`, caught between
    /// its base and the next. Each flip wastes time that shortens the
    /// window for everyone else; the wasted window is granted to the other
    /// runners once the rundown resolves.
    fn run_down(
        &self,
        idx: usize,
        paths: &mut Basepaths,
        resolution: &mut PlayResolution,
        roller: &mut dyn Roller,
    ) -> Result<()> {
        let scoring = paths.scoring_base();
        let base_count = paths.base_count();
        let (from_base, to_base) = {
            let runner = &paths.runners()[idx];
            (runner.base, (runner.base + 1).min(scoring))
        };
        let (behind, ahead) = self.team.defense.rundown_pair(
            from_base % (base_count + 1),
            to_base % (base_count + 1),
            self.stadium,
        );
        let behind_bravery = behind
            .map(|d| self.attrs(d.roster_index).bravery)
            .unwrap_or(1.0);
        let ahead_bravery = ahead
            .map(|d| self.attrs(d.roster_index).bravery)
            .unwrap_or(1.0);
        let bracket_bravery = (behind_bravery + ahead_bravery) / 2.0;

        let mut wasted = 0.0;
        let mut removed: Option<(Runner, bool)> = None;

        for _ in 0..fielding::MAX_RUNDOWN_FLIPS {
            wasted += fielding::RUNDOWN_WASTE_SECONDS;
            let runner_bravery = paths.runners()[idx].bravery;

            let defense_wins = bracket_bravery / (bracket_bravery + runner_bravery.max(0.1));
            if roller.chance(defense_wins.clamp(0.05, 0.95)) {
                removed = Some((paths.remove(idx), false));
                break;
            }

            let escapes = runner_bravery / (runner_bravery + ahead_bravery.max(0.1));
            if roller.chance(escapes.clamp(0.05, 0.95)) {
                let runner = paths.runner_mut(idx);
                let next = runner.base + 1;
                runner.touch_base(next);
                if next >= scoring {
                    removed = Some((paths.remove(idx), true));
                }
                break;
            }
        }

        match removed {
            Some((runner, scored)) => {
                if scored {
                    resolution.notes.push(FieldingNote::Run {
                        player: runner.player,
                    });
                } else {
                    resolution.notes.push(FieldingNote::Out {
                        player: runner.player,
                        kind: OutKind::Rundown,
                    });
                }
            }
            None => {
                // Stalemate fallback: the runner dives back in.
                let runner = paths.runner_mut(idx);
                let base = runner.base;
                runner.touch_base(base);
            }
        }

        // The time burned in the rundown belongs to everyone else.
        if wasted > 0.0 && !paths.is_empty() {
            for player in paths.advance_all(wasted, 0.0, roller)? {
                resolution.notes.push(FieldingNote::Run { player });
            }
        }
        Ok(())
    }
}
