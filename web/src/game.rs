use std::cell::{Cell, RefCell};
use std::rc::Rc;

use flaggle_core::{
    CountryCatalog, CountryPool, DifficultyBand, EngineConfig, GuessEngine, Locale, LocalePreference,
    SessionEvent,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::source::WebCountrySource;
use crate::storage::LocalStorageStore;
use crate::utils::js_random_seed;

thread_local! {
    static FORCED_SEED: Cell<Option<u64>> = const { Cell::new(None) };
}

/// Makes every game created afterwards use `seed`, for reproducible sessions.
pub(crate) fn force_seed(seed: u64) {
    FORCED_SEED.with(|forced| forced.set(Some(seed)));
}

#[derive(Serialize)]
struct LocaleOption {
    tag: &'static str,
    label: &'static str,
}

/// Game state driven by the page: it loads countries, runs rounds and answers with JSON snapshots.
///
/// Rendering, flag comparison and input handling stay in JavaScript.
#[wasm_bindgen]
pub struct FlagGame {
    catalog: Rc<CountryCatalog<WebCountrySource>>,
    engine: Rc<RefCell<GuessEngine>>,
    targets: Rc<RefCell<CountryPool>>,
    preference: LocalePreference,
    store: LocalStorageStore,
}

#[wasm_bindgen]
impl FlagGame {
    /// Countries come from `fetch` when given, otherwise from REST Countries.
    #[wasm_bindgen(constructor)]
    pub fn new(fetch: Option<js_sys::Function>) -> FlagGame {
        let seed = FORCED_SEED.with(Cell::get).unwrap_or_else(js_random_seed);
        Self::with_seed(fetch, seed)
    }

    #[wasm_bindgen(js_name = withSeed)]
    pub fn with_seed(fetch: Option<js_sys::Function>, seed: u64) -> FlagGame {
        log::debug!("seed: {}", seed);
        let source = match fetch {
            Some(callback) => WebCountrySource::Callback(callback),
            None => WebCountrySource::rest_countries(),
        };
        let store = LocalStorageStore;
        let mut preference = LocalePreference::new();
        preference.load(&store);

        let mut engine = GuessEngine::with_seed(EngineConfig::default(), seed);
        engine.subscribe(|event: &SessionEvent<'_>| log::trace!("{:?}", event));

        FlagGame {
            catalog: Rc::new(CountryCatalog::new(source)),
            engine: Rc::new(RefCell::new(engine)),
            targets: Rc::new(RefCell::new(CountryPool::default())),
            preference,
            store,
        }
    }

    pub fn locale(&self) -> String {
        self.preference.locale().tag().to_string()
    }

    /// JSON list of `{ tag, label }`.
    #[wasm_bindgen(js_name = availableLocales)]
    pub fn available_locales(&self) -> Result<String, JsError> {
        let options: Vec<_> = Locale::ALL
            .into_iter()
            .map(|locale| LocaleOption {
                tag: locale.tag(),
                label: locale.label(),
            })
            .collect();
        Ok(serde_json::to_string(&options)?)
    }

    /// Saves the preference and returns the tag actually used. Call `loadCountries` afterwards.
    #[wasm_bindgen(js_name = setLocale)]
    pub fn set_locale(&mut self, tag: &str) -> String {
        let locale = Locale::parse_or_default(tag);
        self.preference.set(locale, &mut self.store);
        locale.tag().to_string()
    }

    pub fn difficulty(&self) -> String {
        self.engine.borrow().difficulty().tag().to_string()
    }

    /// Returns the number of countries targets are now drawn from. The running round is left alone.
    #[wasm_bindgen(js_name = setDifficulty)]
    pub fn set_difficulty(&mut self, tag: &str) -> usize {
        let band = DifficultyBand::from_tag(tag);
        self.engine.borrow_mut().set_difficulty(band);
        if let Some(loaded) = self.catalog.current() {
            self.targets.replace(loaded.filtered(band));
        }
        self.targets.borrow().len()
    }

    /// Loads the pool for the preferred locale and resolves to the number of possible targets.
    #[wasm_bindgen(js_name = loadCountries)]
    pub fn load_countries(&self) -> js_sys::Promise {
        let locale = self.preference.locale();
        let catalog = Rc::clone(&self.catalog);
        let engine = Rc::clone(&self.engine);
        let targets = Rc::clone(&self.targets);
        wasm_bindgen_futures::future_to_promise(async move {
            let loaded = catalog
                .load(locale)
                .await
                .map_err(|err| JsValue::from(JsError::new(&err.to_string())))?;
            if !catalog.is_current(&loaded) {
                // another locale was requested meanwhile, its load installs the targets
                log::debug!("ignoring superseded {} pool", loaded.locale().tag());
                return Ok(JsValue::from(targets.borrow().len() as u32));
            }
            let band = engine.borrow().difficulty();
            let filtered = loaded.filtered(band);
            let count = filtered.len();
            targets.replace(filtered);
            Ok(JsValue::from(count as u32))
        })
    }

    #[wasm_bindgen(js_name = isLoading)]
    pub fn is_loading(&self) -> bool {
        self.catalog.is_loading()
    }

    /// User-facing message for the last failed load, cleared by the next successful one.
    #[wasm_bindgen(js_name = loadError)]
    pub fn load_error(&self) -> Option<String> {
        self.catalog.last_error().map(|err| err.to_string())
    }

    /// Every guessable country for the current locale, as a JSON array sorted by name.
    pub fn countries(&self) -> Result<String, JsError> {
        let pool = self
            .catalog
            .current()
            .map(|loaded| loaded.pool.clone())
            .unwrap_or_default();
        Ok(serde_json::to_string(&pool.as_slice())?)
    }

    /// Starts a round and returns the target's code, or nothing when no country is loaded.
    #[wasm_bindgen(js_name = startNewGame)]
    pub fn start_new_game(&mut self) -> Option<String> {
        let targets = self.targets.borrow();
        let mut engine = self.engine.borrow_mut();
        engine.start_new_game(&targets).map(|target| target.code.clone())
    }

    #[wasm_bindgen(js_name = isGuessAllowed)]
    pub fn is_guess_allowed(&self, code: &str) -> bool {
        self.engine.borrow().is_guess_allowed(code)
    }

    /// Records a guess of the country with `code`, whose flag scored `accuracy` against the target's.
    ///
    /// Returns the outcome as JSON.
    #[wasm_bindgen(js_name = recordGuess)]
    pub fn record_guess(&mut self, code: &str, accuracy: f64) -> Result<String, JsError> {
        let country = self
            .catalog
            .current()
            .and_then(|loaded| loaded.pool.get(code).cloned())
            .ok_or_else(|| JsError::new(&format!("Unknown country: {}", code)))?;
        let outcome = self.engine.borrow_mut().record_guess(&country, accuracy)?;
        Ok(serde_json::to_string(&outcome)?)
    }

    /// Merges one pixel comparison, one byte per pixel of the comparison grid, `1` for equal pixels.
    #[wasm_bindgen(js_name = mergeMatches)]
    pub fn merge_matches(&mut self, matches: &[u8]) -> Result<(), JsError> {
        self.engine.borrow_mut().merge_match_bitmap(matches)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = gridWidth)]
    pub fn grid_width(&self) -> u16 {
        self.engine.borrow().config().grid.width
    }

    #[wasm_bindgen(js_name = gridHeight)]
    pub fn grid_height(&self) -> u16 {
        self.engine.borrow().config().grid.height
    }

    /// The current round as JSON; the target's name stays hidden until the round is over.
    pub fn snapshot(&self) -> Result<String, JsError> {
        Ok(serde_json::to_string(&self.engine.borrow().snapshot())?)
    }
}
