use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("No game in progress")]
    NotStarted,
    #[error("Game already ended, no new guesses are accepted")]
    AlreadyEnded,
    #[error("Country {0} was already guessed this round")]
    AlreadyGuessed(String),
    #[error("Match bitmap has {actual} cells, expected {expected}")]
    BitmapSizeMismatch { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, GameError>;

/// Failures while producing a country pool. The display text is shown to the player as is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Unable to load countries: {0}")]
    Fetch(String),
    #[error("Country data is malformed: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
