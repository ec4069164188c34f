use thiserror::Error;

use crate::loader::Collection;

/// Why a single collection could not be obtained.
#[derive(Debug, Error)]
pub enum LoadErrorKind {
    /// Transport failure: connect/timeout, non-success HTTP status, or an
    /// unreadable local file.
    #[error("network error: {0}")]
    Network(String),
    /// The bytes arrived but do not decode into the collection's records.
    #[error("parse error: {0}")]
    Parse(String),
}

/// A whole-load failure, naming the first collection that failed.
#[derive(Debug, Error)]
#[error("failed to load {collection}: {kind}")]
pub struct LoadError {
    pub collection: Collection,
    pub kind: LoadErrorKind,
}

impl LoadError {
    pub fn network(collection: Collection, msg: impl ToString) -> Self {
        Self {
            collection,
            kind: LoadErrorKind::Network(msg.to_string()),
        }
    }

    pub fn parse(collection: Collection, msg: impl ToString) -> Self {
        Self {
            collection,
            kind: LoadErrorKind::Parse(msg.to_string()),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("region {0:?} not found in regions collection")]
    RegionNotFound(String),
}

#[derive(Debug, Error, PartialEq)]
pub enum ResolveError {
    #[error("no playable stream for channel {0:?}")]
    NotFound(String),
}

#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("country {0:?} is not part of the catalog")]
    UnknownCountry(String),
    #[error("catalog has no channels to pick from")]
    NoChannels,
}

#[derive(Debug, Error)]
pub enum FavoritesError {
    #[error("favorites storage I/O: {0}")]
    Io(#[from] std::io::Error),
    #[error("favorites storage is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}
