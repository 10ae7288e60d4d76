//! Game Simulation Engine
//!
//! Core pitch-by-pitch simulation. The module orchestrates one game as a
//! chain of probabilistic sub-simulations that agree on timing (seconds),
//! geometry (feet) and game state (outs/strikes/balls/bases/score):
//!
//! - `bus`: synchronous publish/subscribe channel between components
//! - `geometry`: 2-D coordinate math shared by flight and fielding
//! - `ball_flight`: swing outcome → landing point and flight duration
//! - `pitch`: call, location, obscurity/difficulty/reduction
//! - `swing`: swing decision and contact quality
//! - `baserunning`: per-runner decisions and the ordered basepaths
//! - `fielding`: catch/throw/fielder's choice/rundown resolution
//! - `game`: the state machine driving one tick per pitch cycle
//!
//! ## Data flow
//!
//! ```text
//! BallGame::tick()
//!   ├─ pitch::throw_pitch       (reads GameState)         → Pitch
//!   ├─ swing::resolve_swing     (reads Pitch, count)      → Swing
//!   ├─ ball_flight::from_swing  (fair balls only)         → LiveBall
//!   ├─ fielding::resolve_hit    (owns Basepaths briefly)  → PlayResolution
//!   └─ GameState mutation + event publication on the bus
//! ```
//!
//! Everything probabilistic draws from the injected `rng::Roller`, one
//! seeded stream per game: same seed, same rosters, same game.

pub mod ball_flight;
pub mod baserunning;
pub mod bus;
pub mod constants;
pub mod fielding;
pub mod game;
pub mod geometry;
pub mod pitch;
pub mod rng;
pub mod swing;

pub use ball_flight::LiveBall;
pub use baserunning::{BaseSummary, Basepaths, Runner};
pub use bus::{handler, EventBus, SharedHandler, SubscriptionId};
pub use fielding::{FieldingEngine, FieldingNote, PlayResolution};
pub use game::{BallGame, GamePhase, GameState, GameSummary};
pub use geometry::Coord;
pub use pitch::{throw_pitch, Pitch, PitchInput};
pub use rng::{Roller, ScriptedRoller, SeededRoller};
pub use swing::{resolve_swing, Swing};
