//! Regional IPTV catalog: dataset loading, cross-referenced indices, stream
//! resolution, selection state and favorites.
//!
//! The flow is one-way: [`loader`] fetches the raw collections, [`catalog`]
//! filters them to one region and indexes them, and everything else reads the
//! resulting [`Catalog`] snapshot.

pub mod catalog;
pub mod config;
pub mod error;
pub mod favorites;
pub mod geo;
pub mod loader;
pub mod locale;
pub mod model;
pub mod platform;
pub mod resolver;
pub mod selection;

pub use catalog::Catalog;
pub use error::{CatalogError, FavoritesError, LoadError, LoadErrorKind, ResolveError, SelectionError};
pub use favorites::{FavoritesStore, FileFavoritesStore, MemoryFavoritesStore};
pub use loader::{Collection, DatasetSource, RawCollections};
pub use resolver::{MatchPass, ResolvedStream};
pub use selection::{Selection, SelectionState};
