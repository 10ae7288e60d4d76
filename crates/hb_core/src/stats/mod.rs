//! Stats monitor: a bus listener that turns the narrative event stream
//! into per-player aggregates.
//!
//! Not part of the simulation core: it consumes the same events any
//! external shell would, which keeps the bus contract honest. Everything
//! it reports is derived from event payloads alone.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::engine::bus::{handler, EventBus};
use crate::models::events::{EventPayload, EventTag, OutKind, SwingOutcome};
use crate::models::lineup::Team;
use crate::models::player::{PlayerId, TeamSide};
use crate::models::rules::GameRules;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerLine {
    pub name: String,
    pub plate_appearances: u32,
    pub balls_in_play: u32,
    pub home_runs: u32,
    pub runs: u32,
    pub strikeouts: u32,
    pub walks: u32,
    pub times_out: u32,
    pub pitches_thrown: u32,
    pub strikes_thrown: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameStats {
    pub home: Vec<PlayerLine>,
    pub away: Vec<PlayerLine>,
}

impl GameStats {
    fn for_teams(home: &Team, away: &Team) -> Self {
        let line = |p: &crate::models::player::Player| PlayerLine {
            name: p.name.clone(),
            ..PlayerLine::default()
        };
        Self {
            home: home.roster.iter().map(line).collect(),
            away: away.roster.iter().map(line).collect(),
        }
    }

    pub fn line(&self, id: PlayerId) -> Option<&PlayerLine> {
        let side = match id.side {
            TeamSide::Home => &self.home,
            TeamSide::Away => &self.away,
        };
        side.get(id.index as usize)
    }

    fn line_mut(&mut self, id: PlayerId) -> Option<&mut PlayerLine> {
        let side = match id.side {
            TeamSide::Home => &mut self.home,
            TeamSide::Away => &mut self.away,
        };
        side.get_mut(id.index as usize)
    }
}

struct MonitorState {
    stats: GameStats,
    current_batter: Option<PlayerId>,
    balls_this_at_bat: u8,
    ball_count: u8,
}

/// Subscribes to the wildcard tag and aggregates as the game publishes.
pub struct StatsMonitor {
    state: Rc<RefCell<MonitorState>>,
}

impl StatsMonitor {
    pub fn attach(bus: &EventBus, home: &Team, away: &Team, rules: &GameRules) -> Self {
        let state = Rc::new(RefCell::new(MonitorState {
            stats: GameStats::for_teams(home, away),
            current_batter: None,
            balls_this_at_bat: 0,
            ball_count: rules.ball_count,
        }));

        let sink = Rc::clone(&state);
        bus.subscribe(
            EventTag::All,
            handler(move |_, event| {
                let mut state = sink.borrow_mut();
                state.observe(&event.payload);
            }),
        );

        Self { state }
    }

    pub fn snapshot(&self) -> GameStats {
        self.state.borrow().stats.clone()
    }
}

impl MonitorState {
    fn observe(&mut self, payload: &EventPayload) {
        match payload {
            EventPayload::Batter { player, .. } => {
                self.current_batter = Some(*player);
                self.balls_this_at_bat = 0;
                if let Some(line) = self.stats.line_mut(*player) {
                    line.plate_appearances += 1;
                }
            }
            EventPayload::Pitch {
                pitcher, strike, ..
            } => {
                if let Some(line) = self.stats.line_mut(*pitcher) {
                    line.pitches_thrown += 1;
                    if *strike {
                        line.strikes_thrown += 1;
                    }
                }
            }
            EventPayload::Swing { batter, outcome, .. } => {
                if *outcome == SwingOutcome::Ball {
                    self.balls_this_at_bat += 1;
                    if self.balls_this_at_bat >= self.ball_count {
                        if let Some(line) = self.stats.line_mut(*batter) {
                            line.walks += 1;
                        }
                    }
                }
            }
            EventPayload::HitBall {
                batter, home_run, ..
            } => {
                if let Some(line) = self.stats.line_mut(*batter) {
                    line.balls_in_play += 1;
                    if *home_run {
                        line.home_runs += 1;
                    }
                }
            }
            EventPayload::Out { player, kind, .. } => {
                if let Some(line) = self.stats.line_mut(*player) {
                    line.times_out += 1;
                    if *kind == OutKind::Strikeout {
                        line.strikeouts += 1;
                    }
                }
            }
            EventPayload::Run { player, .. } => {
                if let Some(line) = self.stats.line_mut(*player) {
                    line.runs += 1;
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::game::{BallGame, GamePhase};
    use crate::models::player::Player;

    fn demo_team(name: &str) -> Team {
        let roster = (0..9)
            .map(|i| Player::average(format!("{} {}", name, i)))
            .collect();
        Team::new(name, roster, 3).unwrap()
    }

    #[test]
    fn monitor_tracks_a_full_seeded_game() {
        let home = demo_team("Home");
        let away = demo_team("Away");
        let rules = GameRules::standard();
        let mut game = BallGame::seeded(home.clone(), away.clone(), 4242).unwrap();
        let monitor = StatsMonitor::attach(&game.bus(), &home, &away, &rules);
        let summary = game.run_to_completion().unwrap();
        assert_eq!(game.phase(), GamePhase::GameOver);

        let stats = monitor.snapshot();
        let total_pa: u32 = stats
            .home
            .iter()
            .chain(stats.away.iter())
            .map(|l| l.plate_appearances)
            .sum();
        assert!(total_pa > 0);

        // Whole runs in the event stream match the final score, up to the
        // fractional mercy remainder.
        let total_runs: u32 = stats
            .home
            .iter()
            .chain(stats.away.iter())
            .map(|l| l.runs)
            .sum();
        let scoreboard = summary.score_home + summary.score_away;
        assert!(scoreboard >= total_runs as f64);
        // Any excess is the fractional mercy credit for stranded runners.
        assert!(scoreboard - (total_runs as f64) < 3.0);

        // Only the two starting pitchers threw.
        let throwers = stats
            .home
            .iter()
            .chain(stats.away.iter())
            .filter(|l| l.pitches_thrown > 0)
            .count();
        assert_eq!(throwers, 2);
    }

    #[test]
    fn walks_are_reconstructed_from_the_count() {
        let home = demo_team("Home");
        let away = demo_team("Away");
        let rules = GameRules::standard();
        let bus = EventBus::new();
        let monitor = StatsMonitor::attach(&bus, &home, &away, &rules);

        let batter = PlayerId::new(TeamSide::Away, 0);
        let send = |payload: EventPayload| {
            bus.send(&crate::models::events::GameEvent {
                inning: 1,
                half: 1,
                tick: 0,
                payload,
            });
        };
        send(EventPayload::Batter {
            player: batter,
            side: TeamSide::Away,
        });
        for _ in 0..4 {
            send(EventPayload::Swing {
                batter,
                swung: false,
                quality: 0.0,
                outcome: SwingOutcome::Ball,
            });
        }
        let stats = monitor.snapshot();
        assert_eq!(stats.line(batter).unwrap().walks, 1);
        assert_eq!(stats.line(batter).unwrap().plate_appearances, 1);
    }
}
