use flaggle_core::{CatalogError, CountrySource, RawCountry};
use futures_util::future::{FutureExt, LocalBoxFuture};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use crate::utils::describe_js_error;

/// REST Countries endpoint restricted to the fields the catalog reads.
pub const REST_COUNTRIES_URL: &str =
    "https://restcountries.com/v3.1/all?fields=cca2,name,translations,flags,flag,area";

type FetchResult = Result<Vec<RawCountry>, CatalogError>;

/// Where the page gets its raw country records from.
pub enum WebCountrySource {
    /// A JS function returning the records, or a promise of them.
    Callback(js_sys::Function),
    /// A `fetch` of a JSON array of records.
    Http { url: String },
}

impl WebCountrySource {
    pub fn rest_countries() -> Self {
        Self::Http {
            url: REST_COUNTRIES_URL.to_string(),
        }
    }
}

impl CountrySource for WebCountrySource {
    fn fetch(&self) -> LocalBoxFuture<'static, FetchResult> {
        match self {
            Self::Callback(callback) => {
                let returned = callback.call0(&JsValue::NULL);
                async move {
                    let value = resolve(returned.map_err(fetch_error)?).await?;
                    decode(&value)
                }
                .boxed_local()
            }
            Self::Http { url } => {
                let url = url.clone();
                async move {
                    let value = http_json(&url).await?;
                    decode(&value)
                }
                .boxed_local()
            }
        }
    }
}

async fn resolve(value: JsValue) -> Result<JsValue, CatalogError> {
    let promise = js_sys::Promise::resolve(&value);
    JsFuture::from(promise).await.map_err(fetch_error)
}

async fn http_json(url: &str) -> Result<JsValue, CatalogError> {
    log::debug!("fetching countries from {}", url);
    let response = resolve(gloo::utils::window().fetch_with_str(url).into()).await?;
    let response: web_sys::Response = response.dyn_into().map_err(fetch_error)?;
    if !response.ok() {
        return Err(CatalogError::Fetch(format!(
            "HTTP {} {}",
            response.status(),
            response.status_text()
        )));
    }
    resolve(response.json().map_err(fetch_error)?.into()).await
}

fn decode(value: &JsValue) -> FetchResult {
    let json = js_sys::JSON::stringify(value)
        .map_err(|err| CatalogError::Decode(describe_js_error(&err)))?;
    RawCountry::parse_list(&String::from(json))
}

fn fetch_error(err: JsValue) -> CatalogError {
    CatalogError::Fetch(describe_js_error(&err))
}
