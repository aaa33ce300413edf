use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures_util::future::{self, FutureExt, LocalBoxFuture, Shared};
use hashbrown::HashMap;

use crate::*;

type FetchResult = core::result::Result<Vec<RawCountry>, CatalogError>;
type BuildResult = core::result::Result<Rc<LoadedCatalog>, CatalogError>;
type PendingBuild = Shared<LocalBoxFuture<'static, BuildResult>>;

/// Where raw country records come from. Network access, retries and timeouts are the source's business.
pub trait CountrySource {
    fn fetch(&self) -> LocalBoxFuture<'static, FetchResult>;
}

/// Records compiled into the binary, for offline play and tests.
#[derive(Copy, Clone, Debug, Default)]
pub struct BundledSource;

impl BundledSource {
    const JSON: &'static str = include_str!("../data/countries.json");

    pub fn records(&self) -> FetchResult {
        RawCountry::parse_list(Self::JSON)
    }
}

impl CountrySource for BundledSource {
    fn fetch(&self) -> LocalBoxFuture<'static, FetchResult> {
        future::ready(self.records()).boxed_local()
    }
}

/// Everything derived from one fetch for one locale.
#[derive(Clone, Debug, PartialEq)]
pub struct LoadedCatalog {
    pub pool: CountryPool,
    pub areas: AreaIndex,
}

impl LoadedCatalog {
    pub fn build(raw: &[RawCountry], locale: Locale) -> Self {
        Self {
            pool: CountryPool::build(raw, locale),
            areas: AreaIndex::from_raw(raw),
        }
    }

    pub fn locale(&self) -> Locale {
        self.pool.locale()
    }

    pub fn filtered(&self, band: DifficultyBand) -> CountryPool {
        filter_by_difficulty(&self.pool, &self.areas, band)
    }
}

/// Builds country pools from a [`CountrySource`] and caches the latest one.
///
/// The cache holds a single locale: asking for another locale rebuilds, and the new pool replaces the old one
/// once it is ready. Callers asking for a locale whose build is already running wait for that same build.
pub struct CountryCatalog<S> {
    source: S,
    cached: RefCell<Option<Rc<LoadedCatalog>>>,
    pending: RefCell<HashMap<Locale, PendingBuild>>,
    requested: Cell<Option<Locale>>,
    last_error: RefCell<Option<CatalogError>>,
    builds_started: Cell<usize>,
}

impl<S: CountrySource> CountryCatalog<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            cached: RefCell::new(None),
            pending: RefCell::new(HashMap::new()),
            requested: Cell::new(None),
            last_error: RefCell::new(None),
            builds_started: Cell::new(0),
        }
    }

    /// Pool for `locale`, from cache when possible.
    pub async fn load(&self, locale: Locale) -> BuildResult {
        self.requested.set(Some(locale));
        if let Some(cached) = self.cached_for(locale) {
            log::trace!("country pool for {} served from cache", locale.tag());
            return Ok(cached);
        }

        let build = self.pending_build(locale);
        let result = build.clone().await;
        self.finish_build(locale, &build, &result);
        result
    }

    /// Most recently cached catalog, whatever its locale. Stays available when a later build fails.
    pub fn current(&self) -> Option<Rc<LoadedCatalog>> {
        self.cached.borrow().clone()
    }

    /// Whether `catalog` is the cached one. Builds for a locale that was superseded before they finished are not.
    pub fn is_current(&self, catalog: &Rc<LoadedCatalog>) -> bool {
        self.cached
            .borrow()
            .as_ref()
            .is_some_and(|cached| Rc::ptr_eq(cached, catalog))
    }

    pub fn last_error(&self) -> Option<CatalogError> {
        self.last_error.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        !self.pending.borrow().is_empty()
    }

    /// Number of fetches issued so far.
    pub fn builds_started(&self) -> usize {
        self.builds_started.get()
    }

    fn cached_for(&self, locale: Locale) -> Option<Rc<LoadedCatalog>> {
        self.cached
            .borrow()
            .as_ref()
            .filter(|catalog| catalog.locale() == locale && !catalog.pool.is_empty())
            .cloned()
    }

    fn pending_build(&self, locale: Locale) -> PendingBuild {
        let mut pending = self.pending.borrow_mut();
        if let Some(build) = pending.get(&locale) {
            log::debug!("joining country pool build for {}", locale.tag());
            return build.clone();
        }

        log::debug!("building country pool for {}", locale.tag());
        self.builds_started.set(self.builds_started.get() + 1);
        let fetch = self.source.fetch();
        let build = async move {
            let raw = fetch.await?;
            Ok::<_, CatalogError>(Rc::new(LoadedCatalog::build(&raw, locale)))
        }
        .boxed_local()
        .shared();
        pending.insert(locale, build.clone());
        build
    }

    fn finish_build(&self, locale: Locale, build: &PendingBuild, result: &BuildResult) {
        {
            let mut pending = self.pending.borrow_mut();
            match pending.get(&locale) {
                Some(current) if current.ptr_eq(build) => {
                    pending.remove(&locale);
                }
                // another waiter of this build already recorded the outcome
                _ => return,
            }
        }

        match result {
            Ok(catalog) if catalog.pool.is_empty() => {
                log::warn!("country pool for {} is empty, not caching it", locale.tag());
            }
            Ok(catalog) => {
                self.last_error.replace(None);
                if self.requested.get() == Some(locale) {
                    log::info!(
                        "cached {} countries for {}",
                        catalog.pool.len(),
                        locale.tag()
                    );
                    self.cached.replace(Some(Rc::clone(catalog)));
                } else {
                    log::debug!("discarding stale country pool for {}", locale.tag());
                }
            }
            Err(err) => {
                log::error!("country pool for {} failed: {}", locale.tag(), err);
                self.last_error.replace(Some(err.clone()));
            }
        }
    }
}
