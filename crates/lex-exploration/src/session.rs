//! Exploration session state.
//!
//! A [`Session`] owns the table most recently loaded, its column profiles
//! and a load cache. It is passed by reference to every render pass; a new
//! upload replaces the table and invalidates the cache.
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │ Session                                       │
//! │ - config: ProfilerConfig                      │
//! │ - loaded: Option<LoadedTable>                 │
//! │     ├─ df: DataFrame                          │
//! │     ├─ source: SourceInfo                     │
//! │     └─ profiles: Vec<ColumnProfile>           │
//! │ - cache: TableCache                           │
//! │     (SourceId, row_limit) -> DataFrame        │
//! └───────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::path::{Path, PathBuf};

use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::ProfilerConfig;
use crate::error::{ProfilerError, Result};
use crate::loader::{LoadOptions, load_csv_bytes, load_csv_path};
use crate::profiler::TableProfiler;
use crate::types::ColumnProfile;

/// Identity of a data source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceId {
    /// A file on disk.
    Path(PathBuf),
    /// Uploaded content, identified by name, size and content digest.
    Upload { name: String, len: usize, digest: u64 },
}

impl SourceId {
    pub fn upload(name: &str, bytes: &[u8]) -> Self {
        let mut hasher = DefaultHasher::new();
        bytes.hash(&mut hasher);
        SourceId::Upload {
            name: name.to_string(),
            len: bytes.len(),
            digest: hasher.finish(),
        }
    }

    /// Display name of the source.
    pub fn name(&self) -> String {
        match self {
            SourceId::Path(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            SourceId::Upload { name, .. } => name.clone(),
        }
    }
}

/// Metadata about the loaded source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceInfo {
    pub id: SourceId,
    pub name: String,
    pub row_limit: Option<usize>,
    pub row_count: usize,
    pub column_count: usize,
}

/// The loaded table bundled with its cached profiles.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub df: DataFrame,
    pub source: SourceInfo,
    /// Computed once per load, served from here thereafter.
    pub profiles: Vec<ColumnProfile>,
}

impl LoadedTable {
    /// Profile `df` and bundle it with its source metadata.
    pub fn new(df: DataFrame, id: SourceId, row_limit: Option<usize>) -> Result<Self> {
        let profiles = TableProfiler::profile(&df)?;
        let source = SourceInfo {
            name: id.name(),
            id,
            row_limit,
            row_count: df.height(),
            column_count: df.width(),
        };

        Ok(Self {
            df,
            source,
            profiles,
        })
    }
}

type CacheKey = (SourceId, Option<usize>);

/// Decoded tables keyed by (source identity, row limit).
#[derive(Debug, Default)]
pub struct TableCache {
    entries: HashMap<CacheKey, DataFrame>,
}

impl TableCache {
    pub fn get(&self, id: &SourceId, row_limit: Option<usize>) -> Option<DataFrame> {
        self.entries.get(&(id.clone(), row_limit)).cloned()
    }

    pub fn insert(&mut self, id: SourceId, row_limit: Option<usize>, df: DataFrame) {
        self.entries.insert((id, row_limit), df);
    }

    /// Whether any entry belongs to a different source than `id`.
    pub fn holds_other_source(&self, id: &SourceId) -> bool {
        self.entries.keys().any(|(cached, _)| cached != id)
    }

    pub fn invalidate(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A single exploration session.
#[derive(Debug, Default)]
pub struct Session {
    config: ProfilerConfig,
    loaded: Option<LoadedTable>,
    cache: TableCache,
}

impl Session {
    pub fn new(config: ProfilerConfig) -> Self {
        Self {
            config,
            loaded: None,
            cache: TableCache::default(),
        }
    }

    pub fn config(&self) -> &ProfilerConfig {
        &self.config
    }

    /// Change the row limit used by subsequent loads.
    pub fn set_row_limit(&mut self, row_limit: Option<usize>) {
        self.config.row_limit = row_limit;
    }

    /// Load a CSV file from disk.
    pub fn load_path(&mut self, path: impl AsRef<Path>) -> Result<&LoadedTable> {
        let path = path.as_ref();
        let id = SourceId::Path(path.to_path_buf());
        let options = LoadOptions::from(&self.config);
        self.load_with(id, || load_csv_path(path, options))
    }

    /// Load uploaded CSV content.
    pub fn load_upload(&mut self, name: &str, bytes: &[u8]) -> Result<&LoadedTable> {
        let id = SourceId::upload(name, bytes);
        let options = LoadOptions::from(&self.config);
        self.load_with(id, || load_csv_bytes(bytes, options))
    }

    fn load_with<F>(&mut self, id: SourceId, load: F) -> Result<&LoadedTable>
    where
        F: FnOnce() -> Result<DataFrame>,
    {
        let row_limit = self.config.row_limit;

        if self.cache.holds_other_source(&id) {
            info!("New source '{}': resetting session", id.name());
            self.cache.invalidate();
        }

        let df = match self.cache.get(&id, row_limit) {
            Some(df) => {
                debug!("Cache hit for '{}' (row limit {:?})", id.name(), row_limit);
                df
            }
            None => {
                let df = load()?;
                self.cache.insert(id.clone(), row_limit, df.clone());
                df
            }
        };

        let loaded = LoadedTable::new(df, id, row_limit)?;
        Ok(&*self.loaded.insert(loaded))
    }

    /// The loaded table, or `NoDataLoaded`.
    pub fn loaded(&self) -> Result<&LoadedTable> {
        self.loaded.as_ref().ok_or(ProfilerError::NoDataLoaded)
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    pub fn cache(&self) -> &TableCache {
        &self.cache
    }

    /// Drop the loaded table and every cached load.
    pub fn reset(&mut self) {
        self.loaded = None;
        self.cache.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIRST: &[u8] = b"a,b\n1,x\n2,y\n,z\n";
    const SECOND: &[u8] = b"c\n1.5\n2.5\n";

    #[test]
    fn test_not_loaded() {
        let session = Session::default();
        assert!(!session.is_loaded());
        assert!(matches!(session.loaded(), Err(ProfilerError::NoDataLoaded)));
    }

    #[test]
    fn test_load_upload_profiles_table() {
        let mut session = Session::default();
        let loaded = session.load_upload("first.csv", FIRST).unwrap();

        assert_eq!(loaded.source.name, "first.csv");
        assert_eq!(loaded.source.row_count, 3);
        assert_eq!(loaded.source.column_count, 2);
        assert_eq!(loaded.profiles.len(), 2);
        assert_eq!(loaded.profiles[0].missing_count, 1);
    }

    #[test]
    fn test_cache_keyed_by_source_and_row_limit() {
        let mut session = Session::default();
        session.load_upload("first.csv", FIRST).unwrap();
        session.load_upload("first.csv", FIRST).unwrap();
        assert_eq!(session.cache().len(), 1);

        session.set_row_limit(Some(2));
        let loaded = session.load_upload("first.csv", FIRST).unwrap();
        assert_eq!(loaded.source.row_count, 2);
        assert_eq!(session.cache().len(), 2);
    }

    #[test]
    fn test_new_upload_invalidates_cache() {
        let mut session = Session::default();
        session.load_upload("first.csv", FIRST).unwrap();
        session.set_row_limit(Some(1));
        session.load_upload("first.csv", FIRST).unwrap();
        assert_eq!(session.cache().len(), 2);

        let loaded = session.load_upload("second.csv", SECOND).unwrap();
        assert_eq!(loaded.source.name, "second.csv");
        assert_eq!(session.cache().len(), 1);
    }

    #[test]
    fn test_same_name_different_content_is_new_source() {
        let a = SourceId::upload("data.csv", FIRST);
        let b = SourceId::upload("data.csv", SECOND);
        assert_ne!(a, b);
        assert_eq!(a, SourceId::upload("data.csv", FIRST));
    }

    #[test]
    fn test_reset() {
        let mut session = Session::default();
        session.load_upload("first.csv", FIRST).unwrap();
        session.reset();

        assert!(!session.is_loaded());
        assert!(session.cache().is_empty());
    }

    #[test]
    fn test_source_name_from_path() {
        let id = SourceId::Path(PathBuf::from("/data/titanic.csv"));
        assert_eq!(id.name(), "titanic.csv");
    }
}
