use flaggle_core::PreferenceStore;
use gloo::storage::{LocalStorage, Storage};

/// Preferences kept in `window.localStorage` as plain strings.
///
/// Values are not JSON-encoded so that previously stored tags such as `fra` keep working.
#[derive(Copy, Clone, Debug, Default)]
pub struct LocalStorageStore;

impl PreferenceStore for LocalStorageStore {
    fn read(&self, key: &str) -> Option<String> {
        match LocalStorage::raw().get_item(key) {
            Ok(value) => value,
            Err(err) => {
                log::warn!("failed to read {}: {:?}", key, err);
                None
            }
        }
    }

    fn write(&mut self, key: &str, value: &str) {
        if let Err(err) = LocalStorage::raw().set_item(key, value) {
            log::error!("failed to save {}: {:?}", key, err);
        }
    }
}
