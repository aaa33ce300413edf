use rand::prelude::*;
use rand::rngs::SmallRng;

use super::*;

/// Picks uniformly among the candidates.
#[derive(Clone, Debug)]
pub struct RandomTargetSelector {
    rng: SmallRng,
}

impl RandomTargetSelector {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl TargetSelector for RandomTargetSelector {
    fn select<'a>(&mut self, candidates: &'a [CountryEntity]) -> Option<&'a CountryEntity> {
        if candidates.is_empty() {
            return None;
        }
        let index = self.rng.random_range(0..candidates.len());
        candidates.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(code: &str) -> CountryEntity {
        CountryEntity {
            code: code.to_string(),
            name: code.to_string(),
            flag: format!("{code}.svg"),
            emoji: PLACEHOLDER_EMOJI.to_string(),
        }
    }

    #[test]
    fn empty_candidates_select_nothing() {
        let mut selector = RandomTargetSelector::new(7);

        assert_eq!(selector.select(&[]), None);
    }

    #[test]
    fn same_seed_selects_same_sequence() {
        let candidates: Vec<_> = ["FR", "DE", "IT", "ES"].into_iter().map(entity).collect();
        let mut a = RandomTargetSelector::new(42);
        let mut b = RandomTargetSelector::new(42);

        for _ in 0..20 {
            assert_eq!(a.select(&candidates), b.select(&candidates));
        }
    }

    #[test]
    fn selection_is_roughly_uniform() {
        const DRAWS: usize = 30_000;
        let candidates: Vec<_> = ["FR", "DE", "IT"].into_iter().map(entity).collect();
        let mut selector = RandomTargetSelector::new(0xf1a6);
        let mut counts = [0usize; 3];

        for _ in 0..DRAWS {
            let picked = selector.select(&candidates).unwrap();
            let index = candidates.iter().position(|c| c == picked).unwrap();
            counts[index] += 1;
        }

        // each bucket expects 10_000 draws, the bound is far outside sampling noise
        for count in counts {
            assert!((9_000..=11_000).contains(&count), "{counts:?}");
        }
    }
}
