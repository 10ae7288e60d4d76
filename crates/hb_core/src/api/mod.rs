pub mod json_api;

pub use json_api::{
    demo_team_data, simulate_game_json, GameRequest, GameResponse, PlayerData, TeamData,
};
