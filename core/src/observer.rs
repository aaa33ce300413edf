use crate::*;

/// Changes to the engine's state, in the order they happen.
///
/// Events never name the target country, so forwarding them to a presentation layer cannot leak the answer.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent<'a> {
    /// A new round replaced the previous one. `playable` is false when the pool was empty.
    Started { playable: bool },
    GuessRecorded {
        code: &'a str,
        accuracy: Accuracy,
        outcome: GuessOutcome,
    },
    /// The match bitmap was replaced by a new merge, `matched` pixels are now set.
    MatchesMerged { matched: usize },
    DifficultyChanged(DifficultyBand),
}

pub trait SessionObserver {
    fn notify(&mut self, event: &SessionEvent<'_>);
}

impl<F> SessionObserver for F
where
    F: FnMut(&SessionEvent<'_>),
{
    fn notify(&mut self, event: &SessionEvent<'_>) {
        self(event)
    }
}
