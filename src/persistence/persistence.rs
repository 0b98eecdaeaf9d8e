use serde::{de::DeserializeOwned, Serialize};

use crate::database::{model::Visibility, table::table::PersonTable};

use super::{
    snapshot::{AddressBookSnapshot, LoadError},
    storage::{ReadBlobState, Storage, StorageEngine, StorageError, StorageResult},
};

#[derive(Debug, Clone, Copy)]
enum FileType {
    AddressBook,
    Preferences,
}

impl FileType {
    fn as_str(&self) -> &'static str {
        match self {
            FileType::AddressBook => "addressbook.json",
            FileType::Preferences => "preferences.json",
        }
    }
}

/// Reads and writes the address book and preferences documents. Each save replaces the whole file.
pub struct Persistence {
    storage: Box<dyn Storage>,
}

impl Persistence {
    pub fn new(storage_engine: &StorageEngine) -> Self {
        Self {
            storage: storage_engine.get_engine(),
        }
    }

    pub fn init(&mut self) -> StorageResult<()> {
        self.storage.init()
    }

    /// A missing file is an empty address book, anything unreadable is an error
    #[tracing::instrument(skip(self))]
    pub fn load_address_book(&self) -> Result<PersonTable, LoadError> {
        let snapshot: AddressBookSnapshot = self.read_file(FileType::AddressBook)?;

        snapshot.to_table()
    }

    #[tracing::instrument(skip(self, table))]
    pub fn save_address_book(&mut self, table: &PersonTable) -> StorageResult<()> {
        self.write_file(FileType::AddressBook, &AddressBookSnapshot::from(table))
    }

    #[tracing::instrument(skip(self))]
    pub fn load_preferences(&self) -> Result<Visibility, LoadError> {
        self.read_file(FileType::Preferences)
    }

    #[tracing::instrument(skip(self, visibility))]
    pub fn save_preferences(&mut self, visibility: &Visibility) -> StorageResult<()> {
        self.write_file(FileType::Preferences, visibility)
    }

    fn read_file<T: DeserializeOwned + Default>(&self, file_type: FileType) -> Result<T, LoadError> {
        match self.storage.read_blob(file_type.as_str())? {
            ReadBlobState::Found(file_contents) => Ok(serde_json::from_slice(&file_contents)?),
            ReadBlobState::NotFound => Ok(T::default()),
        }
    }

    fn write_file<T: Serialize>(&mut self, file_type: FileType, data: &T) -> StorageResult<()> {
        let serialized_bytes = serde_json::to_vec_pretty(data)
            .map_err(|e| StorageError::UnableToWriteBlob(anyhow::Error::new(e)))?;

        self.storage.write_blob(file_type.as_str(), serialized_bytes)
    }
}
