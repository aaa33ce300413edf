use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    #[default]
    NotStarted,
    InProgress,
    Won,
    Lost,
}

impl SessionState {
    pub const fn is_in_progress(self) -> bool {
        matches!(self, Self::InProgress)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GuessOutcome {
    Incorrect { remaining: Attempt },
    Won,
    Lost,
}

impl GuessOutcome {
    pub const fn ends_game(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// A submitted guess together with the accuracy of its flag against the target's.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Guess {
    pub country: CountryEntity,
    pub accuracy: Accuracy,
}

/// State of one round. A new round always starts from a fresh session.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GameSession {
    target: Option<CountryEntity>,
    attempts: Attempt,
    guesses: Vec<Guess>,
    guessed_codes: HashSet<String>,
    state: SessionState,
    last_accuracy: Option<Accuracy>,
    match_bitmap: Option<MatchBitmap>,
}

impl GameSession {
    fn new(target: Option<CountryEntity>) -> Self {
        let state = if target.is_some() {
            SessionState::InProgress
        } else {
            SessionState::NotStarted
        };
        Self {
            target,
            state,
            ..Default::default()
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The country to find. Presentation code should prefer [`SessionSnapshot`], which hides it until the end.
    pub fn target(&self) -> Option<&CountryEntity> {
        self.target.as_ref()
    }

    pub fn target_code(&self) -> Option<&str> {
        self.target.as_ref().map(|target| target.code.as_str())
    }

    pub fn attempts(&self) -> Attempt {
        self.attempts
    }

    pub fn guesses(&self) -> &[Guess] {
        &self.guesses
    }

    /// Codes are matched ignoring case and surrounding whitespace, like [`CountryPool::get`].
    pub fn has_guessed(&self, code: &str) -> bool {
        self.guessed_codes
            .contains(code.trim().to_ascii_uppercase().as_str())
    }

    pub fn is_over(&self) -> bool {
        self.state.is_finished()
    }

    pub fn is_won(&self) -> bool {
        matches!(self.state, SessionState::Won)
    }

    pub fn last_accuracy(&self) -> Option<Accuracy> {
        self.last_accuracy
    }

    pub fn match_bitmap(&self) -> Option<&MatchBitmap> {
        self.match_bitmap.as_ref()
    }
}

/// Runs rounds of the flag guessing game over pools supplied by the caller.
pub struct GuessEngine<S = RandomTargetSelector> {
    config: EngineConfig,
    selector: S,
    difficulty: DifficultyBand,
    session: GameSession,
    observers: Vec<Box<dyn SessionObserver>>,
}

impl GuessEngine<RandomTargetSelector> {
    pub fn with_seed(config: EngineConfig, seed: u64) -> Self {
        Self::new(config, RandomTargetSelector::new(seed))
    }
}

impl<S: TargetSelector> GuessEngine<S> {
    pub fn new(config: EngineConfig, selector: S) -> Self {
        Self {
            config,
            selector,
            difficulty: Default::default(),
            session: Default::default(),
            observers: Vec::new(),
        }
    }

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn state(&self) -> SessionState {
        self.session.state
    }

    pub fn difficulty(&self) -> DifficultyBand {
        self.difficulty
    }

    pub fn subscribe(&mut self, observer: impl SessionObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn select_target(&mut self, pool: &CountryPool) -> Option<CountryEntity> {
        self.selector.select(pool.as_slice()).cloned()
    }

    /// Replaces the current session with a fresh one targeting a random pool entity.
    ///
    /// With an empty pool there is no target and the session stays [`SessionState::NotStarted`].
    pub fn start_new_game(&mut self, pool: &CountryPool) -> Option<&CountryEntity> {
        let target = self.select_target(pool);
        if target.is_some() {
            log::info!("new game started among {} countries", pool.len());
        } else {
            log::warn!("no country to play with, pool is empty");
        }
        self.session = GameSession::new(target);
        let playable = self.session.target.is_some();
        emit(&mut self.observers, SessionEvent::Started { playable });
        self.session.target.as_ref()
    }

    pub fn is_guess_allowed(&self, code: &str) -> bool {
        self.session.state.is_in_progress() && !self.session.has_guessed(code)
    }

    pub fn record_guess(&mut self, country: &CountryEntity, accuracy: Accuracy) -> Result<GuessOutcome> {
        let target_code = match (&self.session.target, self.session.state) {
            (None, _) => return Err(invariant(GameError::NotStarted)),
            (Some(_), state) if state.is_finished() => return Err(invariant(GameError::AlreadyEnded)),
            (Some(target), _) => target.code.clone(),
        };
        if self.session.has_guessed(&country.code) {
            return Err(invariant(GameError::AlreadyGuessed(country.code.clone())));
        }

        let session = &mut self.session;
        session.attempts += 1;
        session
            .guessed_codes
            .insert(country.code.trim().to_ascii_uppercase());
        session.last_accuracy = Some(accuracy);
        session.guesses.push(Guess {
            country: country.clone(),
            accuracy,
        });

        // a correct guess on the last attempt is still a win
        let outcome = if country.code == target_code {
            session.state = SessionState::Won;
            GuessOutcome::Won
        } else if session.attempts >= self.config.max_attempts {
            session.state = SessionState::Lost;
            GuessOutcome::Lost
        } else {
            GuessOutcome::Incorrect {
                remaining: self.config.max_attempts - session.attempts,
            }
        };
        log::debug!(
            "guess {}/{}: {} at {:.1}% -> {:?}",
            session.attempts,
            self.config.max_attempts,
            country.code,
            accuracy,
            outcome
        );
        if outcome.ends_game() {
            log::info!("game over after {} guesses: {:?}", session.attempts, outcome);
        }

        emit(
            &mut self.observers,
            SessionEvent::GuessRecorded {
                code: &country.code,
                accuracy,
                outcome,
            },
        );
        Ok(outcome)
    }

    /// Folds the pixel comparison of the latest guess into the round's match bitmap.
    ///
    /// Also accepted after the game ended, since the final guess's comparison may arrive after its bookkeeping.
    pub fn merge_match_bitmap(&mut self, matches: &[u8]) -> Result<()> {
        if self.session.target.is_none() {
            return Err(invariant(GameError::NotStarted));
        }

        let merged = match &self.session.match_bitmap {
            Some(bitmap) => bitmap.merged(matches),
            None => MatchBitmap::from_matches(self.config.grid, matches),
        }
        .map_err(invariant)?;

        let matched = merged.matched_count();
        log::trace!("match bitmap now has {} matched pixels", matched);
        self.session.match_bitmap = Some(merged);
        emit(&mut self.observers, SessionEvent::MatchesMerged { matched });
        Ok(())
    }

    /// Only records the band; filtering the pool and starting a new round are up to the caller.
    pub fn set_difficulty(&mut self, band: DifficultyBand) {
        if self.difficulty != band {
            log::debug!("difficulty set to {}", band.tag());
            self.difficulty = band;
            emit(&mut self.observers, SessionEvent::DifficultyChanged(band));
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::new(&self.session, self.config, self.difficulty)
    }
}

fn emit(observers: &mut [Box<dyn SessionObserver>], event: SessionEvent<'_>) {
    for observer in observers {
        observer.notify(&event);
    }
}

fn invariant(err: GameError) -> GameError {
    log::error!("rejected engine call: {}", err);
    err
}
