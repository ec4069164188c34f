//! Shared daemon state: the current catalog snapshot and the selection state,
//! behind one lock.
//!
//! Every public method holds the lock for its whole body, so one API call
//! always sees a single snapshot.  Results are returned as owned rows so no
//! borrow of the catalog outlives the guard.

use std::sync::Arc;

use anyhow::Context;
use riggs_core::catalog::CatalogStats;
use riggs_core::geo::{self, Marker};
use riggs_core::locale::{self, ResolvedZone};
use riggs_core::model::{flag_url, Category};
use riggs_core::resolver::{self, ResolvedStream};
use riggs_core::selection::ChannelSummary;
use riggs_core::{
    loader, Catalog, DatasetSource, FavoritesError, FavoritesStore, ResolveError, Selection,
    SelectionError, SelectionState,
};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::clock::{Clock, ClockReading};

/// Favorites backend as the daemon holds it.
pub type DynStore = Box<dyn FavoritesStore + Sync>;

pub struct Session {
    pub catalog: Arc<Catalog>,
    pub selection: SelectionState<DynStore>,
    /// Bumped on every successful reload.
    pub revision: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CountryRow {
    pub code: String,
    pub name: String,
    pub flag: Option<String>,
    pub flag_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StreamInfo {
    pub channel_id: String,
    pub url: String,
    pub pass: resolver::MatchPass,
    pub referrer: Option<String>,
    pub user_agent: Option<String>,
}

impl StreamInfo {
    fn new(channel_id: &str, resolved: &ResolvedStream<'_>) -> Self {
        Self {
            channel_id: channel_id.to_string(),
            url: resolved.url().to_string(),
            pass: resolved.pass,
            referrer: resolved.stream.referrer.clone(),
            user_agent: resolved.stream.user_agent.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RandomChoice {
    pub channel: ChannelSummary,
    /// `None` when the picked channel has no playable stream.
    pub stream: Option<StreamInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SelectionView {
    pub selection: Selection,
    pub generation: u64,
    pub clock: Option<ClockReading>,
    pub favorites: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NumericLookup {
    pub numeric: u16,
    pub alpha2: String,
    pub in_region: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Status {
    pub region: String,
    pub revision: u64,
    pub source: String,
    pub stats: CatalogStats,
}

#[derive(Clone)]
pub struct SessionManager {
    session: Arc<RwLock<Session>>,
    source: Arc<DatasetSource>,
    region: String,
    clock: Clock,
}

impl SessionManager {
    pub fn new(
        catalog: Catalog,
        store: DynStore,
        local_zone: String,
        source: DatasetSource,
        clock: Clock,
    ) -> Self {
        let region = catalog.region().code.clone();
        let session = Session {
            catalog: Arc::new(catalog),
            selection: SelectionState::new(store, local_zone),
            revision: 0,
        };
        Self {
            session: Arc::new(RwLock::new(session)),
            source: Arc::new(source),
            region,
            clock,
        }
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub async fn status(&self) -> Status {
        let session = self.session.read().await;
        Status {
            region: self.region.clone(),
            revision: session.revision,
            source: self.source.describe(),
            stats: session.catalog.stats().clone(),
        }
    }

    pub async fn countries(&self) -> Vec<CountryRow> {
        let session = self.session.read().await;
        session
            .catalog
            .countries()
            .iter()
            .map(|c| CountryRow {
                code: c.code.clone(),
                name: c.name.clone(),
                flag: c.flag.clone(),
                flag_url: flag_url(&c.code),
            })
            .collect()
    }

    pub async fn categories(&self) -> Vec<Category> {
        self.session.read().await.catalog.categories().to_vec()
    }

    pub async fn select_country(&self, code: &str) -> Result<Vec<ChannelSummary>, SelectionError> {
        let mut guard = self.session.write().await;
        let session = &mut *guard;
        let catalog = Arc::clone(&session.catalog);
        let channels = session.selection.select_country(&catalog, code)?;
        let rows = session.selection.summarize(&catalog, &channels);
        self.clock
            .follow(session.selection.clock().cloned(), Arc::clone(&self.session));
        Ok(rows)
    }

    pub async fn select_category(&self, id: &str) -> Vec<ChannelSummary> {
        let mut guard = self.session.write().await;
        let session = &mut *guard;
        let catalog = Arc::clone(&session.catalog);
        let channels = session.selection.select_category(&catalog, id);
        self.clock.follow(None, Arc::clone(&self.session));
        session.selection.summarize(&catalog, &channels)
    }

    pub async fn select_favorites(&self) -> Vec<ChannelSummary> {
        let mut guard = self.session.write().await;
        let session = &mut *guard;
        let catalog = Arc::clone(&session.catalog);
        let channels = session.selection.select_favorites(&catalog);
        self.clock.follow(None, Arc::clone(&self.session));
        session.selection.summarize(&catalog, &channels)
    }

    pub async fn select_random(&self) -> Result<RandomChoice, SelectionError> {
        let mut guard = self.session.write().await;
        let session = &mut *guard;
        let catalog = Arc::clone(&session.catalog);
        let pick = session.selection.select_random(&catalog)?;
        self.clock.follow(None, Arc::clone(&self.session));

        let stream = match &pick.stream {
            Ok(resolved) => Some(StreamInfo::new(&pick.channel.id, resolved)),
            Err(e) => {
                info!("random pick has no stream: {}", e);
                None
            }
        };
        let channel = session
            .selection
            .summarize(&catalog, &[pick.channel])
            .remove(0);
        Ok(RandomChoice { channel, stream })
    }

    /// Returns the new membership of `channel_id`.
    pub async fn toggle_favorite(&self, channel_id: &str) -> Result<bool, FavoritesError> {
        let mut session = self.session.write().await;
        session.selection.toggle_favorite(channel_id)
    }

    pub async fn resolve(&self, channel_id: &str) -> Result<StreamInfo, ResolveError> {
        let session = self.session.read().await;
        let resolved = resolver::resolve_id(&session.catalog, channel_id)?;
        Ok(StreamInfo::new(channel_id, &resolved))
    }

    pub async fn timezone(&self, country_code: &str) -> Result<ResolvedZone, SelectionError> {
        let session = self.session.read().await;
        if session.catalog.country(country_code).is_none() {
            return Err(SelectionError::UnknownCountry(country_code.to_string()));
        }
        Ok(locale::timezone_for(
            &session.catalog,
            country_code,
            session.selection.local_zone(),
        ))
    }

    pub async fn selection(&self) -> SelectionView {
        let session = self.session.read().await;
        SelectionView {
            selection: session.selection.selection().clone(),
            generation: session.selection.generation(),
            clock: self
                .clock
                .current()
                .filter(|r| session.selection.is_current(r.generation)),
            favorites: session.selection.favorites().ids().to_vec(),
        }
    }

    pub async fn markers(&self) -> Vec<Marker> {
        geo::markers(&self.session.read().await.catalog)
    }

    pub async fn lookup_numeric(&self, numeric: u16) -> Option<NumericLookup> {
        let alpha2 = geo::alpha2_from_numeric(numeric)?;
        let session = self.session.read().await;
        Some(NumericLookup {
            numeric,
            alpha2: alpha2.to_string(),
            in_region: geo::region_contains_numeric(&session.catalog, numeric),
        })
    }

    /// Loads and builds a fresh snapshot outside the lock, then swaps it in and
    /// resets the selection.  On failure the current snapshot stays.
    pub async fn reload(&self) -> anyhow::Result<CatalogStats> {
        info!("reloading datasets from {}", self.source.describe());
        let raw = loader::load_all(&self.source).await.map_err(|e| {
            warn!("reload failed: {}", e);
            e
        })?;
        let catalog = Catalog::build(&self.region, raw)
            .with_context(|| format!("rebuilding catalog for {}", self.region))?;
        let stats = catalog.stats().clone();

        let mut session = self.session.write().await;
        session.catalog = Arc::new(catalog);
        session.selection.reset();
        session.revision += 1;
        self.clock.follow(None, Arc::clone(&self.session));
        info!("catalog revision {} live ({} channels)", session.revision, stats.channels);
        Ok(stats)
    }

    pub fn shutdown(&self) {
        self.clock.stop();
    }
}
