use serde::{Deserialize, Serialize};

pub use bitmap::*;
pub use catalog::*;
pub use collation::*;
pub use country::*;
pub use difficulty::*;
pub use engine::*;
pub use error::*;
pub use locale::*;
pub use observer::*;
pub use pool::*;
pub use selector::*;
pub use snapshot::*;
pub use types::*;

mod bitmap;
mod catalog;
mod collation;
mod country;
mod difficulty;
mod engine;
mod error;
mod locale;
mod observer;
mod pool;
mod selector;
mod snapshot;
mod types;

/// Guesses allowed per round.
pub const MAX_ATTEMPTS: Attempt = 5;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub max_attempts: Attempt,
    /// Comparison grid the match bitmaps are computed on.
    pub grid: GridSize,
}

impl EngineConfig {
    pub const fn new(max_attempts: Attempt, grid: GridSize) -> Self {
        Self {
            max_attempts: if max_attempts == 0 { 1 } else { max_attempts },
            grid,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new(MAX_ATTEMPTS, GridSize::default())
    }
}
