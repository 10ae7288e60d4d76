pub mod events;
pub mod lineup;
pub mod player;
pub mod rules;
pub mod stadium;

pub use events::{EventPayload, EventTag, GameEvent, OutKind, SwingOutcome};
pub use lineup::{Defense, DefenderRef, FieldPosition, Team};
pub use player::{Attribute, Player, PlayerAttributes, PlayerId, TeamSide};
pub use rules::GameRules;
pub use stadium::Stadium;
