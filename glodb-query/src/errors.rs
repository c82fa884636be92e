use glodb_core::TrackError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Cannot evaluate an empty expression")]
    EmptyExpression,

    #[error("Operation at position {position} has no operator")]
    MissingOperator { position: usize },

    #[error("Operator {0} is not supported")]
    UnsupportedOperator(String),

    #[error("Unknown operator code: {0}")]
    UnknownOperatorCode(i32),

    #[error("Unknown operator: {0}")]
    UnknownOperator(String),

    #[error("Invalid {kind} bounds: max ({max}) is less than min ({min})")]
    InvalidBounds { kind: String, min: i64, max: i64 },

    #[error(
        "Interval end {end} on sequence {sequence} exceeds the sequence length {length}"
    )]
    BoundsExceeded {
        sequence: String,
        end: u32,
        length: u32,
    },

    #[error("Unknown track: {0}")]
    UnknownTrack(String),

    #[error("Invalid query plan: {0}")]
    Plan(String),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Track(#[from] TrackError),
}

pub type Result<T> = std::result::Result<T, QueryError>;
