//! Best score kept in a small JSON file.

use std::{fs, io, path::PathBuf};

use pastel_2048::store::{BestScoreStore, StoreError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
struct Record {
    best_score: u32,
}

#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl BestScoreStore for FileStore {
    fn load(&self) -> Result<u32, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };
        let record: Record =
            serde_json::from_str(&raw).map_err(|_| StoreError::Malformed(raw.clone()))?;
        Ok(record.best_score)
    }

    fn save(&mut self, best: u32) -> Result<(), StoreError> {
        let json = serde_json::to_string(&Record { best_score: best })
            .map_err(|e| StoreError::Io(e.into()))?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}
