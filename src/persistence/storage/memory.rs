use std::collections::HashMap;

use super::{ReadBlobState, Storage, StorageResult};

#[derive(Default)]
pub struct MemoryStorage {
    blobs: HashMap<String, Vec<u8>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn init(&mut self) -> StorageResult<()> {
        Ok(())
    }

    fn write_blob(&mut self, path: &str, bytes: Vec<u8>) -> StorageResult<()> {
        self.blobs.insert(path.to_string(), bytes);

        Ok(())
    }

    fn read_blob(&self, path: &str) -> StorageResult<ReadBlobState> {
        match self.blobs.get(path) {
            Some(bytes) => Ok(ReadBlobState::Found(bytes.clone())),
            None => Ok(ReadBlobState::NotFound),
        }
    }
}
