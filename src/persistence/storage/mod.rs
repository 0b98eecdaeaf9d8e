use std::path::PathBuf;

use thiserror::Error;

use self::{file::FileStorage, memory::MemoryStorage};

pub mod file;
pub mod memory;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Unable to initialize persistence: {0}")]
    UnableToInitializePersistence(anyhow::Error),

    #[error("Unable to read blob: {0}")]
    UnableToReadBlob(anyhow::Error),

    #[error("Unable to write blob: {0}")]
    UnableToWriteBlob(anyhow::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

pub fn io_to_generic_error(error: std::io::Error) -> anyhow::Error {
    anyhow::Error::new(error)
}

#[derive(Debug, PartialEq, Eq)]
pub enum ReadBlobState {
    Found(Vec<u8>),
    NotFound,
}

/// Whole-blob key/value storage. Every write replaces the blob.
pub trait Storage {
    /// Called on startup, should be idempotent
    fn init(&mut self) -> StorageResult<()>;
    fn write_blob(&mut self, path: &str, bytes: Vec<u8>) -> StorageResult<()>;
    fn read_blob(&self, path: &str) -> StorageResult<ReadBlobState>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageEngine {
    /// Blobs are files in this directory
    File(PathBuf),
    /// Nothing survives the process
    Memory,
}

impl StorageEngine {
    pub fn get_engine(&self) -> Box<dyn Storage> {
        match self {
            StorageEngine::File(path) => Box::new(FileStorage::new(path.clone())),
            StorageEngine::Memory => Box::new(MemoryStorage::new()),
        }
    }

    /// Where data lives, for logging
    pub fn location(&self) -> String {
        match self {
            StorageEngine::File(path) => path.display().to_string(),
            StorageEngine::Memory => "memory".to_string(),
        }
    }
}
