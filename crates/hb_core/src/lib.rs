//! # hb_core - Deterministic Baseball Game Simulation Engine
//!
//! This library simulates a single game of a baseball-like sport pitch by
//! pitch, turning statistical player attributes into a play-by-play event
//! stream and a final score.
//!
//! ## Features
//! - 100% deterministic simulation (same seed = same result)
//! - Tick-driven state machine: one tick = one full pitch cycle
//! - Typed event bus for play-by-play consumers
//! - JSON API for easy integration with game shells

// Game engine APIs often require many parameters for physics, state, etc.
#![allow(clippy::too_many_arguments)]

pub mod api;
pub mod engine;
pub mod error;
pub mod models;
pub mod stats;

// Re-export main API surface
pub use api::{demo_team_data, simulate_game_json, GameRequest, GameResponse};
pub use engine::{
    handler, BallGame, BaseSummary, Basepaths, Coord, EventBus, GamePhase, GameState,
    GameSummary, LiveBall, Roller, Runner, ScriptedRoller, SeededRoller,
};
pub use error::{GameError, Result};
pub use models::{
    Attribute, Defense, EventPayload, EventTag, FieldPosition, GameEvent, GameRules, OutKind,
    Player, PlayerAttributes, PlayerId, Stadium, SwingOutcome, Team, TeamSide,
};
pub use stats::{GameStats, PlayerLine, StatsMonitor};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SCHEMA_VERSION: u8 = 1;

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_team(name: &str) -> Team {
        let data = demo_team_data(name);
        let roster = data
            .players
            .iter()
            .map(|p| Player::new(p.name.clone(), p.attributes.clone()))
            .collect();
        Team::new(data.name, roster, 3).unwrap()
    }

    #[test]
    fn a_whole_game_runs_from_the_public_surface() {
        let mut game = BallGame::seeded(demo_team("Gulls"), demo_team("Crabs"), 42).unwrap();
        let summary = game.run_to_completion().unwrap();
        assert_eq!(game.phase(), GamePhase::GameOver);
        assert!(summary.innings_played >= 1);
        assert!(summary.score_home >= 0.0);
        assert!(summary.score_away >= 0.0);
    }

    #[test]
    fn listeners_see_the_game_end() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let mut game = BallGame::seeded(demo_team("Gulls"), demo_team("Crabs"), 42).unwrap();
        let finished = Rc::new(RefCell::new(false));
        let flag = Rc::clone(&finished);
        game.bus().subscribe(
            EventTag::GameOver,
            handler(move |_, event| {
                if let EventPayload::GameOver { .. } = event.payload {
                    *flag.borrow_mut() = true;
                }
            }),
        );
        game.run_to_completion().unwrap();
        assert!(*finished.borrow());
    }
}
