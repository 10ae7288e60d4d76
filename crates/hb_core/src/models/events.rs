//! Narrative event stream.
//!
//! Every event carries structured data (ids, rolled numbers, updated
//! scores), enough for a listener to update aggregates or render play-by-
//! play without re-deriving anything from game state. Actors are always
//! identified by `PlayerId`; name resolution belongs to consumers.

use serde::{Deserialize, Serialize};

use crate::models::player::{PlayerId, TeamSide};

/// Subscription key for the event bus: one tag per event kind plus a
/// wildcard that matches everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
#[serde(rename_all = "snake_case")]
pub enum EventTag {
    All,
    Pitch,
    Swing,
    HitBall,
    Catch,
    Throw,
    Out,
    Run,
    Bases,
    Batter,
    HalfInning,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwingOutcome {
    /// Taken pitch outside the zone.
    Ball,
    StrikeLooking,
    StrikeSwinging,
    Foul,
    Fair,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutKind {
    Strikeout,
    FlyOut,
    ForceOut,
    TagOut,
    Rundown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    pub inning: u16,
    /// Half counts down: 1 = top (away bats), 0 = bottom (home bats).
    pub half: u8,
    /// Pitch cycle counter, for ordering across a whole game log.
    pub tick: u32,
    #[serde(flatten)]
    pub payload: EventPayload,
}

impl GameEvent {
    pub fn tag(&self) -> EventTag {
        self.payload.tag()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventPayload {
    Pitch {
        pitcher: PlayerId,
        /// 0 = center of the zone, 1 = edge, beyond 1 = outside.
        location: f64,
        strike: bool,
        obscurity: f64,
        difficulty: f64,
    },
    Swing {
        batter: PlayerId,
        swung: bool,
        /// Contact quality rolled for the swing; meaningless when not swung.
        quality: f64,
        outcome: SwingOutcome,
    },
    HitBall {
        batter: PlayerId,
        exit_speed: f64,
        launch_angle: f64,
        field_angle: f64,
        distance: f64,
        duration: f64,
        home_run: bool,
        #[serde(skip_serializing_if = "std::ops::Not::not", default)]
        off_the_wall: bool,
    },
    Catch {
        fielder: PlayerId,
        caught: bool,
        /// Feet between the fielder's station and the landing point.
        distance: f64,
    },
    Throw {
        fielder: PlayerId,
        target_base: u8,
        duration: f64,
    },
    Out {
        player: PlayerId,
        kind: OutKind,
        outs: u8,
    },
    Run {
        player: PlayerId,
        score_home: f64,
        score_away: f64,
    },
    Bases {
        /// Slot per base, home (slot 0) unused.
        occupied: Vec<Option<PlayerId>>,
    },
    Batter {
        player: PlayerId,
        side: TeamSide,
    },
    HalfInning {
        /// Half/inning now starting.
        inning: u16,
        half: u8,
    },
    GameOver {
        score_home: f64,
        score_away: f64,
        innings_played: u16,
    },
}

impl EventPayload {
    pub fn tag(&self) -> EventTag {
        match self {
            EventPayload::Pitch { .. } => EventTag::Pitch,
            EventPayload::Swing { .. } => EventTag::Swing,
            EventPayload::HitBall { .. } => EventTag::HitBall,
            EventPayload::Catch { .. } => EventTag::Catch,
            EventPayload::Throw { .. } => EventTag::Throw,
            EventPayload::Out { .. } => EventTag::Out,
            EventPayload::Run { .. } => EventTag::Run,
            EventPayload::Bases { .. } => EventTag::Bases,
            EventPayload::Batter { .. } => EventTag::Batter,
            EventPayload::HalfInning { .. } => EventTag::HalfInning,
            EventPayload::GameOver { .. } => EventTag::GameOver,
        }
    }
}
