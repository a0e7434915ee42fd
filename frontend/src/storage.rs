use seed::prelude::*;
use shared::{StorageError, session::SessionStorage};

/// `window.localStorage`, looked up on every call so a disabled store only
/// fails the operation at hand.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserStorage;

impl BrowserStorage {
    fn local() -> Result<web_sys::Storage, StorageError> {
        seed::window()
            .local_storage()
            .map_err(|err| StorageError::Unavailable(format!("{err:?}")))?
            .ok_or_else(|| StorageError::Unavailable("window.localStorage is null".into()))
    }
}

impl SessionStorage for BrowserStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Self::local()?
            .get_item(key)
            .map_err(|err| StorageError::Unavailable(format!("{err:?}")))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        Self::local()?
            .set_item(key, value)
            .map_err(|err| StorageError::Write {
                key: key.to_string(),
                reason: format!("{err:?}"),
            })
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        Self::local()?
            .remove_item(key)
            .map_err(|err| StorageError::Write {
                key: key.to_string(),
                reason: format!("{err:?}"),
            })
    }
}
