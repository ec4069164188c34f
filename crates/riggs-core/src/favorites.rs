//! Favorites set and its persistence.
//!
//! The persisted form is one key-value entry, [`FAVORITES_KEY`], whose value is
//! a JSON-encoded list of channel ids.  [`FileFavoritesStore`] keeps that entry
//! in a small JSON document on disk; [`MemoryFavoritesStore`] keeps it in a map.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::FavoritesError;

pub const FAVORITES_KEY: &str = "riggs_favorites";

/// Persistence capability for the favorites set.
pub trait FavoritesStore: Send {
    fn load(&self) -> Result<Vec<String>, FavoritesError>;
    fn save(&mut self, ids: &[String]) -> Result<(), FavoritesError>;
}

impl<T: FavoritesStore + ?Sized> FavoritesStore for Box<T> {
    fn load(&self) -> Result<Vec<String>, FavoritesError> {
        (**self).load()
    }

    fn save(&mut self, ids: &[String]) -> Result<(), FavoritesError> {
        (**self).save(ids)
    }
}

/// Ordered, duplicate-free set of channel ids.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Favorites {
    ids: Vec<String>,
    members: HashSet<String>,
}

impl Favorites {
    /// Keeps the first occurrence of each id.
    pub fn from_ids(ids: impl IntoIterator<Item = String>) -> Self {
        let mut favorites = Self::default();
        for id in ids {
            if favorites.members.insert(id.clone()) {
                favorites.ids.push(id);
            }
        }
        favorites
    }

    /// Reads the store; an unreadable or corrupt entry starts an empty set.
    pub fn load_or_default(store: &dyn FavoritesStore) -> Self {
        match store.load() {
            Ok(ids) => {
                let favorites = Self::from_ids(ids);
                debug!("loaded {} favorites", favorites.len());
                favorites
            }
            Err(e) => {
                warn!("could not load favorites, starting empty: {}", e);
                Self::default()
            }
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.members.contains(id)
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The set with `id` flipped, plus its new membership.  `self` is untouched
    /// so callers can persist first and commit after.
    pub fn toggled(&self, id: &str) -> (Self, bool) {
        let mut next = self.clone();
        if next.members.remove(id) {
            next.ids.retain(|x| x != id);
            (next, false)
        } else {
            next.members.insert(id.to_string());
            next.ids.push(id.to_string());
            (next, true)
        }
    }
}

/// Favorites entry inside a JSON key-value document on disk.  Other keys in
/// the document are preserved on save.
#[derive(Debug, Clone)]
pub struct FileFavoritesStore {
    path: PathBuf,
}

impl FileFavoritesStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<Map<String, Value>, FavoritesError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(Map::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Map::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl FavoritesStore for FileFavoritesStore {
    fn load(&self) -> Result<Vec<String>, FavoritesError> {
        let doc = self.read_document()?;
        match doc.get(FAVORITES_KEY) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::String(encoded)) => Ok(serde_json::from_str(encoded)?),
            // Tolerate a hand-edited file holding the list directly.
            Some(other) => Ok(serde_json::from_value(other.clone())?),
        }
    }

    fn save(&mut self, ids: &[String]) -> Result<(), FavoritesError> {
        let mut doc = match self.read_document() {
            Ok(doc) => doc,
            Err(FavoritesError::Corrupt(e)) => {
                let backup = self.path.with_extension("json.bak");
                warn!(
                    "favorites document {} is corrupt ({}), moving it to {} and starting fresh",
                    self.path.display(),
                    e,
                    backup.display()
                );
                std::fs::rename(&self.path, &backup)?;
                Map::new()
            }
            Err(e) => return Err(e),
        };
        doc.insert(
            FAVORITES_KEY.to_string(),
            Value::String(serde_json::to_string(ids)?),
        );

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        // Write-then-rename so a failed write never truncates the old entry.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_string_pretty(&doc)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// In-process key-value store, e.g. for embedding or tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryFavoritesStore {
    entries: HashMap<String, String>,
}

impl MemoryFavoritesStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ids(ids: &[&str]) -> Self {
        let mut store = Self::new();
        let ids: Vec<String> = ids.iter().map(|s| s.to_string()).collect();
        // Serializing a list of strings cannot fail.
        if let Ok(encoded) = serde_json::to_string(&ids) {
            store.entries.insert(FAVORITES_KEY.to_string(), encoded);
        }
        store
    }

    /// Raw persisted value, as a browser key-value store would hold it.
    pub fn raw(&self) -> Option<&str> {
        self.entries.get(FAVORITES_KEY).map(String::as_str)
    }
}

impl FavoritesStore for MemoryFavoritesStore {
    fn load(&self) -> Result<Vec<String>, FavoritesError> {
        match self.entries.get(FAVORITES_KEY) {
            Some(encoded) => Ok(serde_json::from_str(encoded)?),
            None => Ok(Vec::new()),
        }
    }

    fn save(&mut self, ids: &[String]) -> Result<(), FavoritesError> {
        self.entries
            .insert(FAVORITES_KEY.to_string(), serde_json::to_string(ids)?);
        Ok(())
    }
}
