//! Persistence boundary for the best score, the only state kept between games.

use std::io;

/// Key the browser shell stores the best score under.
pub const BEST_SCORE_KEY: &str = "2048-best-score";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("stored best score {0:?} is not a number")]
    Malformed(String),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

pub trait BestScoreStore {
    fn load(&self) -> Result<u32, StoreError>;
    fn save(&mut self, best: u32) -> Result<(), StoreError>;
}

/// Parse a raw stored value. Nothing stored means no best score yet.
pub fn parse_best_score(raw: Option<&str>) -> Result<u32, StoreError> {
    match raw {
        None => Ok(0),
        Some(s) => s
            .trim()
            .parse()
            .map_err(|_| StoreError::Malformed(s.to_owned())),
    }
}

/// Keeps the best score in memory only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    best: u32,
    saves: usize,
}

impl MemoryStore {
    pub fn new(best: u32) -> Self {
        Self { best, saves: 0 }
    }

    /// How many times `save` has been called.
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl BestScoreStore for MemoryStore {
    fn load(&self) -> Result<u32, StoreError> {
        Ok(self.best)
    }

    fn save(&mut self, best: u32) -> Result<(), StoreError> {
        self.best = best;
        self.saves += 1;
        Ok(())
    }
}

impl<S: BestScoreStore + ?Sized> BestScoreStore for Box<S> {
    fn load(&self) -> Result<u32, StoreError> {
        (**self).load()
    }

    fn save(&mut self, best: u32) -> Result<(), StoreError> {
        (**self).save(best)
    }
}

#[cfg(test)]
mod test {
    use super::{parse_best_score, BestScoreStore, MemoryStore, StoreError};

    #[test]
    fn parses_stored_values() {
        assert_eq!(parse_best_score(None).unwrap(), 0);
        assert_eq!(parse_best_score(Some("1234")).unwrap(), 1234);
        assert_eq!(parse_best_score(Some(" 56\n")).unwrap(), 56);
        assert!(matches!(
            parse_best_score(Some("lots")),
            Err(StoreError::Malformed(s)) if s == "lots"
        ));
        assert!(parse_best_score(Some("-4")).is_err());
    }

    #[test]
    fn memory_store_round_trip() {
        let mut store = MemoryStore::new(10);
        assert_eq!(store.load().unwrap(), 10);
        store.save(42).unwrap();
        assert_eq!(store.load().unwrap(), 42);
        assert_eq!(store.saves(), 1);
    }
}
