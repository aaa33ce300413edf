use serde::{Deserialize, Serialize};

/// Languages country names can be displayed in.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Eng,
    Fra,
    Esp,
    Deu,
    Ita,
    Por,
    Nld,
    Jap,
    Zho,
}

impl Locale {
    pub const DEFAULT: Self = Self::Eng;

    pub const ALL: [Self; 9] = [
        Self::Eng,
        Self::Fra,
        Self::Esp,
        Self::Deu,
        Self::Ita,
        Self::Por,
        Self::Nld,
        Self::Jap,
        Self::Zho,
    ];

    /// Tag used for persistence and by the presentation layer.
    pub const fn tag(self) -> &'static str {
        use Locale::*;
        match self {
            Eng => "eng",
            Fra => "fra",
            Esp => "esp",
            Deu => "deu",
            Ita => "ita",
            Por => "por",
            Nld => "nld",
            Jap => "jap",
            Zho => "zho",
        }
    }

    /// Key of this language in the `translations` map of raw country records.
    pub const fn translation_key(self) -> &'static str {
        use Locale::*;
        match self {
            Eng => "eng",
            Fra => "fra",
            Esp => "spa",
            Deu => "deu",
            Ita => "ita",
            Por => "por",
            Nld => "nld",
            Jap => "jpn",
            Zho => "zho",
        }
    }

    pub const fn label(self) -> &'static str {
        use Locale::*;
        match self {
            Eng => "🇬🇧 English",
            Fra => "🇫🇷 Français",
            Esp => "🇪🇸 Español",
            Deu => "🇩🇪 Deutsch",
            Ita => "🇮🇹 Italiano",
            Por => "🇵🇹 Português",
            Nld => "🇳🇱 Nederlands",
            Jap => "🇯🇵 日本語",
            Zho => "🇨🇳 中文",
        }
    }

    pub const fn is_default(self) -> bool {
        matches!(self, Self::Eng)
    }

    /// Accepts either the tag or the translation key, ignoring case.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL.into_iter().find(|locale| {
            value.eq_ignore_ascii_case(locale.tag())
                || value.eq_ignore_ascii_case(locale.translation_key())
        })
    }

    /// Like [`Locale::parse`], but unsupported values fall back to the default locale.
    pub fn parse_or_default(value: &str) -> Self {
        Self::parse(value).unwrap_or_else(|| {
            log::debug!("unsupported locale {:?}, using {}", value, Self::DEFAULT.tag());
            Self::DEFAULT
        })
    }
}

/// Key/value storage that survives between visits, typically the browser's local storage.
pub trait PreferenceStore {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&mut self, key: &str, value: &str);
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PreferenceState {
    #[default]
    NotLoaded,
    Loaded(Locale),
}

/// The player's chosen display language.
///
/// Starts out [`PreferenceState::NotLoaded`]; the application loads it once at startup with
/// [`LocalePreference::load`]. Until then [`LocalePreference::locale`] reports the default locale.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LocalePreference {
    state: PreferenceState,
}

impl LocalePreference {
    pub const STORAGE_KEY: &'static str = "flaggle-language";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PreferenceState {
        self.state
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, PreferenceState::Loaded(_))
    }

    pub fn locale(&self) -> Locale {
        match self.state {
            PreferenceState::NotLoaded => Locale::DEFAULT,
            PreferenceState::Loaded(locale) => locale,
        }
    }

    /// Reads the stored preference. Only the first call consults the store, later calls return the loaded value.
    pub fn load(&mut self, store: &impl PreferenceStore) -> Locale {
        if let PreferenceState::Loaded(locale) = self.state {
            return locale;
        }

        let locale = store
            .read(Self::STORAGE_KEY)
            .and_then(|stored| Locale::parse(&stored))
            .unwrap_or(Locale::DEFAULT);
        log::debug!("locale preference loaded: {}", locale.tag());
        self.state = PreferenceState::Loaded(locale);
        locale
    }

    pub fn set(&mut self, locale: Locale, store: &mut impl PreferenceStore) {
        self.state = PreferenceState::Loaded(locale);
        store.write(Self::STORAGE_KEY, locale.tag());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemoryStore {
        values: HashMap<String, String>,
        reads: std::cell::Cell<usize>,
    }

    impl PreferenceStore for MemoryStore {
        fn read(&self, key: &str) -> Option<String> {
            self.reads.set(self.reads.get() + 1);
            self.values.get(key).cloned()
        }

        fn write(&mut self, key: &str, value: &str) {
            self.values.insert(key.to_string(), value.to_string());
        }
    }

    #[test]
    fn parse_accepts_tags_and_translation_keys() {
        assert_eq!(Locale::parse("fra"), Some(Locale::Fra));
        assert_eq!(Locale::parse("SPA"), Some(Locale::Esp));
        assert_eq!(Locale::parse("jpn"), Some(Locale::Jap));
        assert_eq!(Locale::parse("klingon"), None);
        assert_eq!(Locale::parse_or_default("klingon"), Locale::Eng);
    }

    #[test]
    fn not_loaded_preference_reports_default_locale() {
        let preference = LocalePreference::new();

        assert_eq!(preference.state(), PreferenceState::NotLoaded);
        assert_eq!(preference.locale(), Locale::DEFAULT);
    }

    #[test]
    fn load_reads_store_once() {
        let mut store = MemoryStore::default();
        store
            .values
            .insert(LocalePreference::STORAGE_KEY.to_string(), "deu".to_string());
        let mut preference = LocalePreference::new();

        assert_eq!(preference.load(&store), Locale::Deu);
        store
            .values
            .insert(LocalePreference::STORAGE_KEY.to_string(), "ita".to_string());
        assert_eq!(preference.load(&store), Locale::Deu);
        assert_eq!(store.reads.get(), 1);
    }

    #[test]
    fn load_ignores_unsupported_stored_value() {
        let mut store = MemoryStore::default();
        store
            .values
            .insert(LocalePreference::STORAGE_KEY.to_string(), "xx".to_string());
        let mut preference = LocalePreference::new();

        assert_eq!(preference.load(&store), Locale::Eng);
        assert!(preference.is_loaded());
    }

    #[test]
    fn set_persists_tag() {
        let mut store = MemoryStore::default();
        let mut preference = LocalePreference::new();

        preference.set(Locale::Esp, &mut store);

        assert_eq!(preference.locale(), Locale::Esp);
        assert_eq!(
            store.values.get(LocalePreference::STORAGE_KEY).map(String::as_str),
            Some("esp")
        );
    }
}
