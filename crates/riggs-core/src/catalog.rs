//! Regional catalog index.
//!
//! Built once from [`RawCollections`] and read-only afterwards.  Everything is
//! scoped to one region: countries, channels, feeds and streams that do not
//! belong to it are dropped at build time so later lookups never see them.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::{error, info, warn};

use crate::error::CatalogError;
use crate::loader::RawCollections;
use crate::model::{Category, Channel, Country, Feed, Region, Stream, TimezoneEntry, ADULT_CATEGORY_ID};

/// Counts reported after a build.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct CatalogStats {
    pub countries: usize,
    pub categories: usize,
    pub channels: usize,
    pub feeds: usize,
    pub streams: usize,
    pub timezones: usize,
    /// Outside the region or adult.
    pub excluded_channels: usize,
    pub duplicate_channels: usize,
    /// Linked to a channel/feed outside the region.
    pub dropped_streams: usize,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    region: Region,
    countries: Vec<Country>,
    categories: Vec<Category>,
    channels: Vec<Channel>,
    channel_index: HashMap<String, usize>,
    feeds: Vec<Feed>,
    feeds_by_channel: HashMap<String, Vec<usize>>,
    streams: Vec<Stream>,
    timezones: Vec<TimezoneEntry>,
    stats: CatalogStats,
}

impl Catalog {
    pub fn build(region_code: &str, raw: RawCollections) -> Result<Self, CatalogError> {
        let RawCollections {
            regions,
            countries,
            channels,
            feeds,
            streams,
            categories,
            timezones,
        } = raw;

        let Some(region) = regions.into_iter().find(|r| r.code == region_code) else {
            error!("region {:?} missing from regions collection, refusing to build catalog", region_code);
            return Err(CatalogError::RegionNotFound(region_code.to_string()));
        };
        let member: HashSet<&str> = region.country_codes.iter().map(String::as_str).collect();

        let mut countries: Vec<Country> = countries
            .into_iter()
            .filter(|c| member.contains(c.code.as_str()))
            .collect();
        countries.sort_by(|a, b| name_order(&a.name, &b.name));

        let mut categories: Vec<Category> = categories
            .into_iter()
            .filter(|c| c.id != ADULT_CATEGORY_ID)
            .collect();
        categories.sort_by(|a, b| name_order(&a.name, &b.name));

        let mut stats = CatalogStats::default();
        let mut kept_channels = Vec::new();
        let mut channel_index = HashMap::new();
        for ch in channels {
            if !member.contains(ch.country_code.as_str()) || ch.is_adult_content() {
                stats.excluded_channels += 1;
                continue;
            }
            if channel_index.contains_key(&ch.id) {
                stats.duplicate_channels += 1;
                continue;
            }
            channel_index.insert(ch.id.clone(), kept_channels.len());
            kept_channels.push(ch);
        }
        if stats.duplicate_channels > 0 {
            warn!("skipped {} duplicate channel ids", stats.duplicate_channels);
        }

        let mut kept_feeds = Vec::new();
        let mut feeds_by_channel: HashMap<String, Vec<usize>> = HashMap::new();
        for feed in feeds {
            if !channel_index.contains_key(&feed.channel_id) {
                continue;
            }
            feeds_by_channel
                .entry(feed.channel_id.clone())
                .or_default()
                .push(kept_feeds.len());
            kept_feeds.push(feed);
        }

        let regional_feed_ids: HashSet<&str> = kept_feeds.iter().map(|f| f.id.as_str()).collect();
        let total_streams = streams.len();
        let kept_streams: Vec<Stream> = streams
            .into_iter()
            .filter(|s| match (s.channel_id.as_deref(), s.feed_id.as_deref()) {
                (None, None) => true,
                (channel, feed) => {
                    channel.is_some_and(|id| channel_index.contains_key(id))
                        || feed.is_some_and(|id| regional_feed_ids.contains(id))
                }
            })
            .collect();
        stats.dropped_streams = total_streams - kept_streams.len();

        stats.countries = countries.len();
        stats.categories = categories.len();
        stats.channels = kept_channels.len();
        stats.feeds = kept_feeds.len();
        stats.streams = kept_streams.len();
        stats.timezones = timezones.len();

        info!(
            "catalog {}: {} countries, {} channels ({} excluded), {} feeds, {} streams ({} dropped), {} categories",
            region.code,
            stats.countries,
            stats.channels,
            stats.excluded_channels,
            stats.feeds,
            stats.streams,
            stats.dropped_streams,
            stats.categories,
        );

        Ok(Self {
            region,
            countries,
            categories,
            channels: kept_channels,
            channel_index,
            feeds: kept_feeds,
            feeds_by_channel,
            streams: kept_streams,
            timezones,
            stats,
        })
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn stats(&self) -> &CatalogStats {
        &self.stats
    }

    /// Sorted by name.
    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    pub fn country(&self, code: &str) -> Option<&Country> {
        self.countries.iter().find(|c| c.code == code)
    }

    /// Sorted by name; never contains the adult category.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Every regional channel in upstream order.
    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn channel(&self, id: &str) -> Option<&Channel> {
        self.channel_index.get(id).map(|&idx| &self.channels[idx])
    }

    pub fn contains_channel(&self, id: &str) -> bool {
        self.channel_index.contains_key(id)
    }

    pub fn channels_for_country(&self, code: &str) -> Vec<&Channel> {
        let mut out: Vec<&Channel> = self
            .channels
            .iter()
            .filter(|ch| ch.country_code == code)
            .collect();
        out.sort_by(|a, b| name_order(&a.name, &b.name));
        out
    }

    /// Upstream order, not sorted.
    pub fn channels_for_category(&self, id: &str) -> Vec<&Channel> {
        self.channels
            .iter()
            .filter(|ch| ch.category_ids.iter().any(|c| c == id))
            .collect()
    }

    /// Feeds of one channel in their original listing order.
    pub fn feeds_for(&self, channel_id: &str) -> impl Iterator<Item = &Feed> {
        self.feeds_by_channel
            .get(channel_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(|&idx| &self.feeds[idx])
    }

    pub fn feeds(&self) -> &[Feed] {
        &self.feeds
    }

    pub fn streams(&self) -> &[Stream] {
        &self.streams
    }

    pub fn timezones(&self) -> &[TimezoneEntry] {
        &self.timezones
    }
}

/// Case-insensitive name order with a case-sensitive tie-break.
fn name_order(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
