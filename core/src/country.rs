use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::*;

/// Glyph shown when a record carries no emoji flag.
pub const PLACEHOLDER_EMOJI: &str = "🏳️";

/// Display name used when a record carries no name at all.
pub const UNKNOWN_NAME: &str = "Unknown";

/// A guessable country, as exposed to the engine and the presentation layer.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CountryEntity {
    /// Two-letter country code, unique within a pool.
    pub code: String,
    /// Name in the pool's locale.
    pub name: String,
    /// Locator of the flag image, vector format when available.
    pub flag: String,
    pub emoji: String,
}

impl CountryEntity {
    /// Whether this entity may appear in a pool or be picked as a target.
    pub fn is_playable(&self) -> bool {
        !self.code.is_empty() && !self.flag.is_empty()
    }
}

/// Country record as served by the REST Countries API (`/v3.1/all`). Any field may be missing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCountry {
    pub cca2: Option<String>,
    pub name: Option<RawName>,
    #[serde(default)]
    pub translations: BTreeMap<String, RawName>,
    pub flags: Option<RawFlags>,
    /// Emoji flag.
    pub flag: Option<String>,
    /// Land area in km².
    pub area: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawName {
    pub common: Option<String>,
    pub official: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawFlags {
    pub svg: Option<String>,
    pub png: Option<String>,
    pub alt: Option<String>,
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}

impl RawCountry {
    /// Decodes a JSON array of records.
    pub fn parse_list(json: &str) -> core::result::Result<Vec<Self>, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Normalized code, empty when the record has none.
    pub fn code(&self) -> String {
        non_blank(self.cca2.as_ref())
            .map(str::to_ascii_uppercase)
            .unwrap_or_default()
    }

    fn common_name(&self) -> Option<&str> {
        non_blank(self.name.as_ref().and_then(|name| name.common.as_ref()))
    }

    fn translated_name(&self, locale: Locale) -> Option<&str> {
        let translation = self.translations.get(locale.translation_key())?;
        non_blank(translation.common.as_ref())
    }

    /// Display name in `locale`, falling back to the common name and then to [`UNKNOWN_NAME`].
    pub fn display_name(&self, locale: Locale) -> &str {
        let translated = if locale.is_default() {
            None
        } else {
            self.translated_name(locale)
        };
        translated
            .or_else(|| self.common_name())
            .unwrap_or(UNKNOWN_NAME)
    }

    /// Flag image locator, preferring the vector image.
    pub fn flag_image(&self) -> Option<&str> {
        let flags = self.flags.as_ref()?;
        non_blank(flags.svg.as_ref()).or_else(|| non_blank(flags.png.as_ref()))
    }

    pub fn emoji(&self) -> &str {
        non_blank(self.flag.as_ref()).unwrap_or(PLACEHOLDER_EMOJI)
    }

    /// Whether [`normalize`] turns this record into a playable entity.
    pub fn is_playable(&self) -> bool {
        !self.code().is_empty() && self.flag_image().is_some()
    }

    /// Known land area. Non-finite values are treated as unknown.
    pub fn known_area(&self) -> Option<f64> {
        self.area.filter(|area| area.is_finite())
    }
}

/// Maps a raw record to the uniform entity shape, without filtering it.
///
/// The result may fail [`CountryEntity::is_playable`]; pool building discards those.
pub fn normalize(raw: &RawCountry, locale: Locale) -> CountryEntity {
    CountryEntity {
        code: raw.code(),
        name: raw.display_name(locale).to_string(),
        flag: raw.flag_image().unwrap_or_default().to_string(),
        emoji: raw.emoji().to_string(),
    }
}
