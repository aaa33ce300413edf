//! Locale-aware ordering of display names, backed by the CLDR collation tables.
//!
//! Names are compared on three levels: base letters first (ignoring case and accents), then
//! accents, then case. Names equal on every level compare [`Ordering::Equal`], and callers
//! sorting with a stable sort keep such names in input order.

use core::cmp::Ordering;
use core::fmt;

use icu_collator::options::CollatorOptions;
use icu_collator::{CollatorBorrowed, Collator as IcuCollator};
use icu_locale_core::locale;

use crate::Locale;

/// Compares strings the way readers of a locale expect them ordered.
pub struct Collator {
    locale: Locale,
    inner: Option<CollatorBorrowed<'static>>,
}

impl Collator {
    pub fn for_locale(locale: Locale) -> Self {
        let inner = IcuCollator::try_new(icu_locale(locale).into(), CollatorOptions::default())
            .map_err(|err| {
                log::error!("no collation data for {}, using code point order: {}", locale.tag(), err);
            })
            .ok();
        Self { locale, inner }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        match &self.inner {
            Some(collator) => collator.compare(a, b),
            None => a.cmp(b),
        }
    }
}

impl fmt::Debug for Collator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collator")
            .field("locale", &self.locale)
            .field("has_data", &self.inner.is_some())
            .finish()
    }
}

fn icu_locale(locale: Locale) -> icu_locale_core::Locale {
    use Locale::*;
    match locale {
        Eng => locale!("en"),
        Fra => locale!("fr"),
        Esp => locale!("es"),
        Deu => locale!("de"),
        Ita => locale!("it"),
        Por => locale!("pt"),
        Nld => locale!("nl"),
        Jap => locale!("ja"),
        // pinyin is the default Chinese collation
        Zho => locale!("zh"),
    }
}
