use std::path::PathBuf;

use crate::{consts::consts::DEFAULT_DATA_DIRECTORY, persistence::storage::StorageEngine};

#[derive(Debug, Clone)]
pub struct DatabaseOptions {
    pub restore: bool,
    pub storage_engine: StorageEngine,
}

// Implements: https://rust-unofficial.github.io/patterns/patterns/creational/builder.html
impl DatabaseOptions {
    /// Defines whether the address book and preferences are loaded from storage on startup
    pub fn set_restore(mut self, restore: bool) -> Self {
        self.restore = restore;
        self
    }

    pub fn set_storage_engine(mut self, storage_engine: StorageEngine) -> Self {
        self.storage_engine = storage_engine;
        self
    }
}

impl Default for DatabaseOptions {
    fn default() -> Self {
        Self {
            storage_engine: StorageEngine::File(PathBuf::from(DEFAULT_DATA_DIRECTORY)),
            restore: true,
        }
    }
}

#[cfg(test)]
impl DatabaseOptions {
    /// Fresh directory per test, nothing restored
    pub fn new_test() -> Self {
        DatabaseOptions::default()
            .set_storage_engine(StorageEngine::File(test_directory()))
            .set_restore(false)
    }
}

#[cfg(test)]
pub fn test_directory() -> PathBuf {
    ["/", "tmp", "trackup", &uuid::Uuid::new_v4().to_string()]
        .iter()
        .collect()
}
