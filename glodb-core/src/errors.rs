use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackError {
    #[error("Can't read file: {0}")]
    FileReadError(String),

    #[error("Error parsing region: {0}")]
    RegionParseError(String),

    #[error("Corrupted file. 0 regions found in the file: {0}")]
    EmptyTrack(String),

    #[error("Error parsing chrom sizes line: {0}")]
    ChromSizesParseError(String),

    #[error("Id \"{0}\" is already in use")]
    DuplicateId(String),

    #[error("Unknown sequence: {0}")]
    UnknownSequence(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TrackError>;
