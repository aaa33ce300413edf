use crate::*;
pub use random::*;

mod random;

/// Strategy picking the country a round is played for.
pub trait TargetSelector {
    /// Returns `None` only when `candidates` is empty.
    fn select<'a>(&mut self, candidates: &'a [CountryEntity]) -> Option<&'a CountryEntity>;
}

impl<T: TargetSelector + ?Sized> TargetSelector for &mut T {
    fn select<'a>(&mut self, candidates: &'a [CountryEntity]) -> Option<&'a CountryEntity> {
        (**self).select(candidates)
    }
}
