//! Injectable load/save persistence for small pieces of state.
//!
//! Callers depend on [`Store`] rather than a global location, so a host can
//! swap the JSON file store for anything else.

use std::{fs::File, io::BufReader, marker::PhantomData, path::PathBuf};

use anyhow::{Context, Result};
use serde::{Serialize, de::DeserializeOwned};

pub trait Store<T> {
    fn load(&self) -> Result<Option<T>>;
    fn save(&self, value: &T) -> Result<()>;
}

/// Stores a value as pretty-printed JSON at a fixed path.
#[derive(Debug, Clone)]
pub struct JsonFileStore<T> {
    path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonFileStore<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _marker: PhantomData,
        }
    }
}

impl<T> Store<T> for JsonFileStore<T>
where
    T: Serialize + DeserializeOwned,
{
    fn load(&self) -> Result<Option<T>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let file = File::open(&self.path)
            .with_context(|| format!("Opening profile {:?}", self.path))?;
        let value = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Parsing profile {:?}", self.path))?;
        Ok(Some(value))
    }

    fn save(&self, value: &T) -> Result<()> {
        let file = File::create(&self.path)
            .with_context(|| format!("Creating profile {:?}", self.path))?;
        serde_json::to_writer_pretty(file, value)
            .with_context(|| format!("Writing profile {:?}", self.path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{fields::CanonicalField, mapping::ColumnMapping};
    use tempfile::tempdir;

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempdir().expect("temp dir");
        let store = JsonFileStore::<ColumnMapping>::new(dir.path().join("absent.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn mapping_survives_save_and_load() {
        let dir = tempdir().expect("temp dir");
        let store = JsonFileStore::new(dir.path().join("profile.json"));
        let mapping: ColumnMapping = [
            ("Client", CanonicalField::Name),
            ("Tel", CanonicalField::Phone),
        ]
        .into_iter()
        .collect();
        store.save(&mapping).unwrap();
        assert_eq!(store.load().unwrap(), Some(mapping));
    }
}
