use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::*;

/// Candidate countries for one locale: deduplicated by code and sorted by display name.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CountryPool {
    locale: Locale,
    countries: Vec<CountryEntity>,
}

impl CountryPool {
    /// Normalizes every record for `locale`, drops the unplayable and duplicate ones, and sorts by name.
    ///
    /// When two records share a code the first one wins. Names that collate equal keep their input order.
    pub fn build(raw: &[RawCountry], locale: Locale) -> Self {
        let mut seen = HashSet::with_capacity(raw.len());
        let mut countries: Vec<_> = raw
            .iter()
            .map(|record| normalize(record, locale))
            .filter(CountryEntity::is_playable)
            .filter(|entity| seen.insert(entity.code.clone()))
            .collect();

        let dropped = raw.len() - countries.len();
        if dropped > 0 {
            log::warn!(
                "dropped {} of {} country records without code, flag or with duplicate code",
                dropped,
                raw.len()
            );
        }

        let collator = Collator::for_locale(locale);
        countries.sort_by(|a, b| collator.compare(&a.name, &b.name));

        Self { locale, countries }
    }

    pub(crate) fn from_sorted(locale: Locale, countries: Vec<CountryEntity>) -> Self {
        Self { locale, countries }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    pub fn as_slice(&self) -> &[CountryEntity] {
        &self.countries
    }

    pub fn iter(&self) -> core::slice::Iter<'_, CountryEntity> {
        self.countries.iter()
    }

    pub fn get(&self, code: &str) -> Option<&CountryEntity> {
        self.countries
            .iter()
            .find(|entity| entity.code.eq_ignore_ascii_case(code))
    }

    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.countries.iter().map(|entity| entity.code.as_str())
    }
}

impl<'a> IntoIterator for &'a CountryPool {
    type Item = &'a CountryEntity;
    type IntoIter = core::slice::Iter<'a, CountryEntity>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
