//! Player model: fixed attribute set and match-scoped identifiers.
//!
//! Attributes are scalar ratings centered near 1.0 with no hard upper
//! bound. Access inside the engine goes through struct fields or the
//! `Attribute` enum accessor; name-based lookup exists only for the
//! describe/debug boundary.

use serde::{Deserialize, Serialize};

/// Side identifier. Home bats in the bottom half, away in the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamSide {
    Home,
    Away,
}

impl TeamSide {
    pub fn opponent(self) -> Self {
        match self {
            TeamSide::Home => TeamSide::Away,
            TeamSide::Away => TeamSide::Home,
        }
    }

    /// Index into per-side arrays: home = 0, away = 1.
    pub fn index(self) -> usize {
        match self {
            TeamSide::Home => 0,
            TeamSide::Away => 1,
        }
    }
}

/// Player identifier within one game: side + roster slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId {
    pub side: TeamSide,
    pub index: u8,
}

impl PlayerId {
    pub fn new(side: TeamSide, index: u8) -> Self {
        Self { side, index }
    }
}

/// The full rating set every player carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerAttributes {
    // Baserunning
    pub speed: f64,
    pub bravery: f64,
    pub timing: f64,

    // Defense
    pub throwing: f64,
    pub awareness: f64,
    pub reach: f64,
    pub grabbiness: f64,
    pub calling: f64,

    // Pitching
    pub accuracy: f64,
    pub trickery: f64,

    // Batting
    pub discipline: f64,
    pub power: f64,
    pub pull: f64,
    pub contact: f64,
}

impl PlayerAttributes {
    /// League-average player: every rating at 1.0.
    pub fn average() -> Self {
        Self {
            speed: 1.0,
            bravery: 1.0,
            timing: 1.0,
            throwing: 1.0,
            awareness: 1.0,
            reach: 1.0,
            grabbiness: 1.0,
            calling: 1.0,
            accuracy: 1.0,
            trickery: 1.0,
            discipline: 1.0,
            power: 1.0,
            pull: 1.0,
            contact: 1.0,
        }
    }

    pub fn get(&self, attr: Attribute) -> f64 {
        match attr {
            Attribute::Speed => self.speed,
            Attribute::Bravery => self.bravery,
            Attribute::Timing => self.timing,
            Attribute::Throwing => self.throwing,
            Attribute::Awareness => self.awareness,
            Attribute::Reach => self.reach,
            Attribute::Grabbiness => self.grabbiness,
            Attribute::Calling => self.calling,
            Attribute::Accuracy => self.accuracy,
            Attribute::Trickery => self.trickery,
            Attribute::Discipline => self.discipline,
            Attribute::Power => self.power,
            Attribute::Pull => self.pull,
            Attribute::Contact => self.contact,
        }
    }

    /// Rough batting quality, used for on-deck comparisons.
    pub fn batting_quality(&self) -> f64 {
        (self.power + self.contact + self.discipline) / 3.0
    }
}

impl Default for PlayerAttributes {
    fn default() -> Self {
        Self::average()
    }
}

/// Enum-indexed attribute access. The string form is reserved for the
/// external describe surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Speed,
    Bravery,
    Timing,
    Throwing,
    Awareness,
    Reach,
    Grabbiness,
    Calling,
    Accuracy,
    Trickery,
    Discipline,
    Power,
    Pull,
    Contact,
}

impl Attribute {
    pub const ALL: [Attribute; 14] = [
        Attribute::Speed,
        Attribute::Bravery,
        Attribute::Timing,
        Attribute::Throwing,
        Attribute::Awareness,
        Attribute::Reach,
        Attribute::Grabbiness,
        Attribute::Calling,
        Attribute::Accuracy,
        Attribute::Trickery,
        Attribute::Discipline,
        Attribute::Power,
        Attribute::Pull,
        Attribute::Contact,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Attribute::Speed => "speed",
            Attribute::Bravery => "bravery",
            Attribute::Timing => "timing",
            Attribute::Throwing => "throwing",
            Attribute::Awareness => "awareness",
            Attribute::Reach => "reach",
            Attribute::Grabbiness => "grabbiness",
            Attribute::Calling => "calling",
            Attribute::Accuracy => "accuracy",
            Attribute::Trickery => "trickery",
            Attribute::Discipline => "discipline",
            Attribute::Power => "power",
            Attribute::Pull => "pull",
            Attribute::Contact => "contact",
        }
    }

    /// Name-based lookup for the debug/describe boundary.
    pub fn from_name(name: &str) -> Option<Self> {
        Attribute::ALL.iter().copied().find(|a| a.name() == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    #[serde(default)]
    pub attributes: PlayerAttributes,
}

impl Player {
    pub fn new(name: impl Into<String>, attributes: PlayerAttributes) -> Self {
        Self {
            name: name.into(),
            attributes,
        }
    }

    pub fn average(name: impl Into<String>) -> Self {
        Self::new(name, PlayerAttributes::average())
    }

    /// Debug/describe surface: attribute by name.
    pub fn describe(&self, attribute_name: &str) -> Option<f64> {
        Attribute::from_name(attribute_name).map(|a| self.attributes.get(a))
    }
}
