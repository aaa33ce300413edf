use clap::Parser;
use wasm_bindgen::prelude::*;

pub use game::FlagGame;
pub use source::{REST_COUNTRIES_URL, WebCountrySource};
pub use storage::LocalStorageStore;

mod game;
mod source;
mod storage;
mod utils;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<String>,
}

#[wasm_bindgen(start)]
pub fn run_app() {
    use gloo::utils::window;

    #[cfg(feature = "console_error_panic_hook")]
    {
        console_error_panic_hook::set_once();
    }

    let location_hash = window()
        .location()
        .hash()
        .unwrap_or_else(|_| "".to_string());

    let args = match Args::try_parse_from(location_hash.split(['#', '&'])) {
        Ok(args) => args,
        Err(err) => {
            web_sys::console::warn_1(&format!("ignoring location hash: {}", err).into());
            Args::parse_from([""])
        }
    };
    if let Some(log_level) = args.verbose.log_level() {
        if let Err(err) = console_log::init_with_level(log_level) {
            web_sys::console::error_1(&format!("Error initializing logger: {}", err).into());
        }
    }
    log::debug!("seed: {:?}", args.seed);
    if let Some(seed) = args.seed.as_deref() {
        game::force_seed(utils::parse_seed(seed));
    }

    log::debug!("App started");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(hash: &str) -> Args {
        Args::try_parse_from(hash.split(['#', '&'])).unwrap()
    }

    #[test]
    fn empty_hash_uses_defaults() {
        let args = parse("");
        assert_eq!(args.seed, None);
        assert_eq!(args.verbose.log_level(), Some(log::Level::Error));
    }

    #[test]
    fn hash_sets_verbosity_and_seed() {
        let args = parse("#-vv&--seed=42");
        assert_eq!(args.seed.as_deref(), Some("42"));
        assert_eq!(args.verbose.log_level(), Some(log::Level::Info));
    }
}
