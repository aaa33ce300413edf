use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};

use crate::*;

/// Restricts the pool to countries at least as large as a band's threshold; larger countries are easier to
/// recognize.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyBand {
    Easy,
    #[default]
    Medium,
    Hard,
    Extreme,
}

impl DifficultyBand {
    pub const ALL: [Self; 4] = [Self::Easy, Self::Medium, Self::Hard, Self::Extreme];

    /// Minimum land area in km², inclusive.
    pub const fn min_area(self) -> f64 {
        use DifficultyBand::*;
        match self {
            Easy => 500_000.0,
            Medium => 100_000.0,
            Hard => 10_000.0,
            Extreme => 0.0,
        }
    }

    pub const fn tag(self) -> &'static str {
        use DifficultyBand::*;
        match self {
            Easy => "easy",
            Medium => "medium",
            Hard => "hard",
            Extreme => "extreme",
        }
    }

    /// Unrecognized tags select the most permissive band.
    pub fn from_tag(tag: &str) -> Self {
        let tag = tag.trim();
        Self::ALL
            .into_iter()
            .find(|band| tag.eq_ignore_ascii_case(band.tag()))
            .unwrap_or_else(|| {
                log::debug!("unknown difficulty {:?}, including every country", tag);
                Self::Extreme
            })
    }
}

/// Land area per country code, taken from the same raw records the pool was built from.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AreaIndex {
    areas: HashMap<String, Option<f64>>,
}

impl AreaIndex {
    /// Skips unplayable records, so each code keeps the area of the record its pool entity came from.
    pub fn from_raw(raw: &[RawCountry]) -> Self {
        let mut areas = HashMap::with_capacity(raw.len());
        for record in raw.iter().filter(|record| record.is_playable()) {
            areas
                .entry(record.code())
                .or_insert_with(|| record.known_area());
        }
        Self { areas }
    }

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.areas.contains_key(code)
    }

    /// `None` both for unknown codes and for codes without a known area.
    pub fn area_of(&self, code: &str) -> Option<f64> {
        self.areas.get(code).copied().flatten()
    }

    /// Codes whose area is at least `min_area`. A missing area counts as infinitely large.
    pub fn codes_at_least(&self, min_area: f64) -> HashSet<&str> {
        self.areas
            .iter()
            .filter(|(_, area)| area.is_none_or(|area| area >= min_area))
            .map(|(code, _)| code.as_str())
            .collect()
    }
}

/// Pool entities large enough for `band`, in pool order.
pub fn filter_by_difficulty(pool: &CountryPool, areas: &AreaIndex, band: DifficultyBand) -> CountryPool {
    let eligible = areas.codes_at_least(band.min_area());
    let countries: Vec<_> = pool
        .iter()
        .filter(|entity| eligible.contains(entity.code.as_str()))
        .cloned()
        .collect();
    log::debug!(
        "difficulty {}: {} of {} countries",
        band.tag(),
        countries.len(),
        pool.len()
    );
    CountryPool::from_sorted(pool.locale(), countries)
}
