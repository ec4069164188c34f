//! Exclusive selection state (country | category | favorites | random) and the
//! favorites set it owns.
//!
//! Every `select_*` call bumps a generation counter.  A country selection also
//! installs a [`ClockSubscription`] for that country's zone; timers holding an
//! older generation must drop their tick.

use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::error::{FavoritesError, ResolveError, SelectionError};
use crate::favorites::{Favorites, FavoritesStore};
use crate::locale::{self, ResolvedZone};
use crate::model::{flag_url, Channel};
use crate::resolver::{self, ResolvedStream};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "mode", content = "value", rename_all = "lowercase")]
pub enum Selection {
    #[default]
    None,
    Country(String),
    Category(String),
    Favorites,
    /// Holds the id of the channel that was picked.
    Random(String),
}

/// "Current time in zone" refresh tied to one country selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClockSubscription {
    pub country_code: String,
    pub zone: ResolvedZone,
    pub generation: u64,
}

pub struct RandomPick<'c> {
    pub channel: &'c Channel,
    pub stream: Result<ResolvedStream<'c>, ResolveError>,
}

/// List row for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelSummary {
    pub id: String,
    pub name: String,
    pub country: String,
    pub flag_url: String,
    pub languages: Vec<String>,
    pub categories: Vec<String>,
    pub favorite: bool,
}

pub struct SelectionState<S> {
    selection: Selection,
    favorites: Favorites,
    store: S,
    generation: u64,
    clock: Option<ClockSubscription>,
    local_zone: String,
}

impl<S: FavoritesStore> SelectionState<S> {
    /// Reads the favorites once from `store`.
    pub fn new(store: S, local_zone: impl Into<String>) -> Self {
        let favorites = Favorites::load_or_default(&store);
        Self {
            selection: Selection::None,
            favorites,
            store,
            generation: 0,
            clock: None,
            local_zone: local_zone.into(),
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn clock(&self) -> Option<&ClockSubscription> {
        self.clock.as_ref()
    }

    /// False once any later selection has replaced the one that scheduled
    /// the update.
    pub fn is_current(&self, generation: u64) -> bool {
        self.clock
            .as_ref()
            .is_some_and(|c| c.generation == generation)
    }

    pub fn local_zone(&self) -> &str {
        &self.local_zone
    }

    pub fn favorites(&self) -> &Favorites {
        &self.favorites
    }

    pub fn is_favorite(&self, channel_id: &str) -> bool {
        self.favorites.contains(channel_id)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn switch(&mut self, selection: Selection) {
        self.generation += 1;
        self.clock = None;
        debug!("selection {:?} -> {:?} (gen {})", self.selection, selection, self.generation);
        self.selection = selection;
    }

    /// Back to `None`, e.g. after the catalog snapshot was replaced.
    pub fn reset(&mut self) {
        self.switch(Selection::None);
    }

    pub fn select_country<'c>(
        &mut self,
        catalog: &'c Catalog,
        code: &str,
    ) -> Result<Vec<&'c Channel>, SelectionError> {
        if catalog.country(code).is_none() {
            return Err(SelectionError::UnknownCountry(code.to_string()));
        }
        self.switch(Selection::Country(code.to_string()));
        self.clock = Some(ClockSubscription {
            country_code: code.to_string(),
            zone: locale::timezone_for(catalog, code, &self.local_zone),
            generation: self.generation,
        });
        Ok(catalog.channels_for_country(code))
    }

    pub fn select_category<'c>(&mut self, catalog: &'c Catalog, id: &str) -> Vec<&'c Channel> {
        self.switch(Selection::Category(id.to_string()));
        catalog.channels_for_category(id)
    }

    /// Favorites order; ids no longer in the catalog are skipped.
    pub fn select_favorites<'c>(&mut self, catalog: &'c Catalog) -> Vec<&'c Channel> {
        self.switch(Selection::Favorites);
        self.favorites
            .ids()
            .iter()
            .filter_map(|id| catalog.channel(id))
            .collect()
    }

    pub fn select_random<'c>(&mut self, catalog: &'c Catalog) -> Result<RandomPick<'c>, SelectionError> {
        self.select_random_with(catalog, &mut rand::thread_rng())
    }

    pub fn select_random_with<'c, R: Rng + ?Sized>(
        &mut self,
        catalog: &'c Catalog,
        rng: &mut R,
    ) -> Result<RandomPick<'c>, SelectionError> {
        let channels = catalog.channels();
        if channels.is_empty() {
            return Err(SelectionError::NoChannels);
        }
        let channel = &channels[rng.gen_range(0..channels.len())];
        self.switch(Selection::Random(channel.id.clone()));
        info!("random pick: {} ({})", channel.name, channel.id);
        Ok(RandomPick {
            channel,
            stream: resolver::resolve(catalog, channel),
        })
    }

    /// Flip membership and persist.  On a persistence failure the in-memory
    /// set is unchanged.  The active selection is never touched.
    pub fn toggle_favorite(&mut self, channel_id: &str) -> Result<bool, FavoritesError> {
        let (next, member) = self.favorites.toggled(channel_id);
        self.store.save(next.ids())?;
        self.favorites = next;
        debug!("favorite {} -> {}", channel_id, member);
        Ok(member)
    }

    pub fn summarize(&self, catalog: &Catalog, channels: &[&Channel]) -> Vec<ChannelSummary> {
        channels
            .iter()
            .map(|ch| ChannelSummary {
                id: ch.id.clone(),
                name: ch.name.clone(),
                country: ch.country_code.clone(),
                flag_url: flag_url(&ch.country_code),
                languages: ch.languages.iter().take(3).map(|l| l.to_uppercase()).collect(),
                categories: ch
                    .category_ids
                    .iter()
                    .filter_map(|id| catalog.category(id))
                    .take(2)
                    .map(|c| c.name.clone())
                    .collect(),
                favorite: self.is_favorite(&ch.id),
            })
            .collect()
    }
}
