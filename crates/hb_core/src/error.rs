use std::fmt;

#[derive(Debug)]
pub enum GameError {
    /// An upstream logic bug surfaced mid-play (force/ordering invariant
    /// broken). The current play must abort; never clamp and continue.
    Invariant(String),
    InvalidLineup { reason: String },
    InvalidTeamSize { expected: usize, found: usize },
    InvalidParameter(String),
    SerializationError(String),
    DeserializationError(String),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GameError::Invariant(msg) => {
                write!(f, "Simulation invariant violated: {}", msg)
            }
            GameError::InvalidLineup { reason } => {
                write!(f, "Invalid lineup: {}", reason)
            }
            GameError::InvalidTeamSize { expected, found } => {
                write!(f, "Invalid team size: expected {}, found {}", expected, found)
            }
            GameError::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            GameError::SerializationError(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
            GameError::DeserializationError(msg) => {
                write!(f, "Deserialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for GameError {}

impl From<serde_json::Error> for GameError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() {
            GameError::DeserializationError(err.to_string())
        } else {
            GameError::SerializationError(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, GameError>;
