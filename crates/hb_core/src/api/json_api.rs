//! JSON API for external shells.
//!
//! One call simulates one whole game: request in, play-by-play event log
//! and final score out. The schema is versioned; mismatches are rejected
//! up front rather than half-parsed.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::engine::bus::handler;
use crate::engine::game::BallGame;
use crate::engine::rng::SeededRoller;
use crate::error::{GameError, Result};
use crate::models::events::{EventTag, GameEvent};
use crate::models::lineup::Team;
use crate::models::player::{Player, PlayerAttributes};
use crate::models::rules::GameRules;
use crate::models::stadium::Stadium;
use crate::stats::{GameStats, StatsMonitor};
use crate::SCHEMA_VERSION;

#[derive(Debug, Deserialize)]
pub struct GameRequest {
    pub schema_version: u8,
    pub seed: u64,
    /// Scheduled innings; defaults to the standard nine.
    #[serde(default)]
    pub innings: Option<u16>,
    pub home_team: TeamData,
    pub away_team: TeamData,
}

#[derive(Debug, Deserialize)]
pub struct TeamData {
    pub name: String,
    pub players: Vec<PlayerData>,
}

#[derive(Debug, Deserialize)]
pub struct PlayerData {
    pub name: String,
    #[serde(default)]
    pub attributes: PlayerAttributes,
}

#[derive(Debug, Serialize)]
pub struct GameResponse {
    pub schema_version: u8,
    pub score_home: f64,
    pub score_away: f64,
    pub innings_played: u16,
    pub ticks: u32,
    pub events: Vec<GameEvent>,
    pub stats: GameStats,
}

fn build_team(data: &TeamData, stadium: &Stadium) -> Result<Team> {
    let roster: Vec<Player> = data
        .players
        .iter()
        .map(|p| Player::new(p.name.clone(), p.attributes.clone()))
        .collect();
    Team::new(data.name.clone(), roster, stadium.base_count)
}

/// Simulate a full game from a JSON request, returning the JSON response.
pub fn simulate_game_json(request_json: &str) -> Result<String> {
    let request: GameRequest = serde_json::from_str(request_json)?;
    if request.schema_version != SCHEMA_VERSION {
        return Err(GameError::InvalidParameter(format!(
            "unsupported schema_version {} (expected {})",
            request.schema_version, SCHEMA_VERSION
        )));
    }

    let stadium = Stadium::standard();
    let mut rules = GameRules::standard();
    if let Some(innings) = request.innings {
        if innings == 0 {
            return Err(GameError::InvalidParameter(
                "innings must be at least 1".to_string(),
            ));
        }
        rules.innings = innings;
    }

    let home = build_team(&request.home_team, &stadium)?;
    let away = build_team(&request.away_team, &stadium)?;

    let mut game = BallGame::new(
        home.clone(),
        away.clone(),
        stadium,
        rules,
        Box::new(SeededRoller::new(request.seed)),
    )?;

    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    game.bus().subscribe(
        EventTag::All,
        handler(move |_, event| sink.borrow_mut().push(event.clone())),
    );
    let monitor = StatsMonitor::attach(&game.bus(), &home, &away, &rules);

    let summary = game.run_to_completion()?;

    let response = GameResponse {
        schema_version: SCHEMA_VERSION,
        score_home: summary.score_home,
        score_away: summary.score_away,
        innings_played: summary.innings_played,
        ticks: summary.ticks,
        events: events.borrow().clone(),
        stats: monitor.snapshot(),
    };
    Ok(serde_json::to_string(&response)?)
}

/// Nine league-average players with light, deterministic variation; used
/// by the CLI and tests.
pub fn demo_team_data(name: &str) -> TeamData {
    let players = (0..9)
        .map(|i| {
            let mut attributes = PlayerAttributes::average();
            // Stagger a few ratings so games are not mirror matches.
            let wave = ((i as f64) * 0.7).sin() * 0.15;
            attributes.power += wave;
            attributes.contact -= wave / 2.0;
            attributes.speed += ((i as f64) * 1.3).cos() * 0.1;
            PlayerData {
                name: format!("{} #{}", name, i + 1),
                attributes,
            }
        })
        .collect();
    TeamData {
        name: name.to_string(),
        players,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn demo_request(seed: u64) -> String {
        let team = |name: &str| {
            let data = demo_team_data(name);
            json!({
                "name": data.name,
                "players": data
                    .players
                    .iter()
                    .map(|p| json!({ "name": p.name, "attributes": p.attributes }))
                    .collect::<Vec<_>>(),
            })
        };
        json!({
            "schema_version": 1,
            "seed": seed,
            "home_team": team("Gulls"),
            "away_team": team("Crabs"),
        })
        .to_string()
    }

    #[test]
    fn simulates_a_full_game() {
        let response = simulate_game_json(&demo_request(7)).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&response).unwrap();
        assert_eq!(parsed["schema_version"], 1);
        assert!(parsed["score_home"].is_number());
        assert!(parsed["score_away"].is_number());
        assert!(parsed["events"].as_array().unwrap().len() > 10);
        assert!(parsed["innings_played"].as_u64().unwrap() >= 1);
    }

    #[test]
    fn same_seed_same_response() {
        let a = simulate_game_json(&demo_request(11)).unwrap();
        let b = simulate_game_json(&demo_request(11)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn schema_version_is_enforced() {
        let request = json!({
            "schema_version": 9,
            "seed": 1,
            "home_team": { "name": "H", "players": [] },
            "away_team": { "name": "A", "players": [] },
        })
        .to_string();
        let err = simulate_game_json(&request).unwrap_err();
        assert!(matches!(err, GameError::InvalidParameter(_)));
    }

    #[test]
    fn default_attributes_fill_in() {
        let players: Vec<_> = (0..9)
            .map(|i| json!({ "name": format!("P{}", i) }))
            .collect();
        let request = json!({
            "schema_version": 1,
            "seed": 3,
            "innings": 1,
            "home_team": { "name": "H", "players": players.clone() },
            "away_team": { "name": "A", "players": players },
        })
        .to_string();
        let response = simulate_game_json(&request).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&response).unwrap();
        assert!(parsed["innings_played"].as_u64().unwrap() >= 1);
    }

    #[test]
    fn tiny_roster_is_rejected() {
        let request = json!({
            "schema_version": 1,
            "seed": 1,
            "home_team": { "name": "H", "players": [{ "name": "Solo" }] },
            "away_team": { "name": "A", "players": [{ "name": "Solo" }] },
        })
        .to_string();
        assert!(simulate_game_json(&request).is_err());
    }
}
