use serde::Serialize;

use crate::*;

/// What the presentation layer may know about the target.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TargetView {
    /// Round still running: only the code, which is enough to load the flag image.
    Hidden { code: String },
    /// Round over: the full entity, name included.
    Revealed(CountryEntity),
}

impl TargetView {
    pub fn code(&self) -> &str {
        match self {
            Self::Hidden { code } => code,
            Self::Revealed(entity) => &entity.code,
        }
    }
}

/// Read-only view of the current round for rendering.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub target: Option<TargetView>,
    pub attempts: Attempt,
    pub max_attempts: Attempt,
    pub guesses: Vec<Guess>,
    pub is_over: bool,
    pub is_won: bool,
    pub last_accuracy: Option<Accuracy>,
    pub match_bitmap: Option<MatchBitmap>,
    pub matched_ratio: f64,
    pub difficulty: DifficultyBand,
}

impl SessionSnapshot {
    pub fn new(session: &GameSession, config: EngineConfig, difficulty: DifficultyBand) -> Self {
        let target = session.target().map(|target| {
            if session.is_over() {
                TargetView::Revealed(target.clone())
            } else {
                TargetView::Hidden {
                    code: target.code.clone(),
                }
            }
        });
        let match_bitmap = session.match_bitmap().cloned();
        Self {
            state: session.state(),
            target,
            attempts: session.attempts(),
            max_attempts: config.max_attempts,
            guesses: session.guesses().to_vec(),
            is_over: session.is_over(),
            is_won: session.is_won(),
            last_accuracy: session.last_accuracy(),
            matched_ratio: match_bitmap.as_ref().map_or(0.0, MatchBitmap::matched_ratio),
            match_bitmap,
            difficulty,
        }
    }

    pub fn remaining_attempts(&self) -> Attempt {
        self.max_attempts.saturating_sub(self.attempts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn france() -> CountryEntity {
        CountryEntity {
            code: "FR".to_string(),
            name: "France".to_string(),
            flag: "https://flagcdn.com/fr.svg".to_string(),
            emoji: "🇫🇷".to_string(),
        }
    }

    fn engine() -> GuessEngine {
        let config = EngineConfig {
            max_attempts: 3,
            grid: GridSize::new(2, 1),
        };
        GuessEngine::with_seed(config, 3)
    }

    fn pool() -> CountryPool {
        CountryPool::from_sorted(Locale::Eng, vec![france()])
    }

    #[test]
    fn target_is_hidden_while_in_progress() {
        let mut engine = engine();
        engine.start_new_game(&pool());

        let snapshot = engine.snapshot();

        assert_eq!(
            snapshot.target,
            Some(TargetView::Hidden {
                code: "FR".to_string()
            })
        );
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(!json.contains("France"));
        assert_eq!(snapshot.remaining_attempts(), 3);
    }

    #[test]
    fn target_is_revealed_after_game_end() {
        let mut engine = engine();
        engine.start_new_game(&pool());
        engine.record_guess(&france(), 100.0).unwrap();
        engine.merge_match_bitmap(&[1, 0]).unwrap();

        let snapshot = engine.snapshot();

        assert_eq!(snapshot.target, Some(TargetView::Revealed(france())));
        assert!(snapshot.is_over);
        assert!(snapshot.is_won);
        assert_eq!(snapshot.matched_ratio, 0.5);
        assert_eq!(snapshot.guesses.len(), 1);
        assert_eq!(snapshot.target.as_ref().map(TargetView::code), Some("FR"));
    }

    #[test]
    fn snapshot_bitmap_shares_engine_allocation() {
        let mut engine = engine();
        engine.start_new_game(&pool());
        engine.merge_match_bitmap(&[0, 1]).unwrap();

        let before = engine.snapshot();
        assert!(before.match_bitmap.as_ref().unwrap().same_allocation(
            engine.session().match_bitmap().unwrap()
        ));

        engine.merge_match_bitmap(&[0, 0]).unwrap();
        let after = engine.snapshot();

        assert!(!before
            .match_bitmap
            .unwrap()
            .same_allocation(after.match_bitmap.as_ref().unwrap()));
    }

    #[test]
    fn not_started_snapshot_is_empty() {
        let snapshot = engine().snapshot();

        assert_eq!(snapshot.state, SessionState::NotStarted);
        assert_eq!(snapshot.target, None);
        assert_eq!(snapshot.match_bitmap, None);
        assert_eq!(snapshot.matched_ratio, 0.0);
    }
}
