//! Dataset loader.
//!
//! Fetches every collection concurrently and joins them all-or-nothing: the
//! first failing collection fails the whole load and no partial result is
//! returned.  Records are handed back exactly as decoded.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use futures_util::future::try_join_all;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::config::DatasetConfig;
use crate::error::LoadError;
use crate::model::{Category, Channel, Country, Feed, Region, Stream, TimezoneEntry};

/// The named upstream collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Regions,
    Countries,
    Channels,
    Feeds,
    Streams,
    Categories,
    Timezones,
}

impl Collection {
    pub const ALL: [Collection; 7] = [
        Collection::Regions,
        Collection::Countries,
        Collection::Channels,
        Collection::Feeds,
        Collection::Streams,
        Collection::Categories,
        Collection::Timezones,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Regions => "regions",
            Self::Countries => "countries",
            Self::Channels => "channels",
            Self::Feeds => "feeds",
            Self::Streams => "streams",
            Self::Categories => "categories",
            Self::Timezones => "timezones",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.json", self.name())
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything the catalog build needs, unmodified from upstream.
#[derive(Debug, Clone, Default)]
pub struct RawCollections {
    pub regions: Vec<Region>,
    pub countries: Vec<Country>,
    pub channels: Vec<Channel>,
    pub feeds: Vec<Feed>,
    pub streams: Vec<Stream>,
    pub categories: Vec<Category>,
    pub timezones: Vec<TimezoneEntry>,
}

/// Where the collections come from: an http(s) base URL or a local directory
/// holding the same `<collection>.json` files.
#[derive(Debug, Clone)]
pub enum DatasetSource {
    Remote {
        base_url: String,
        client: reqwest::Client,
    },
    Local(PathBuf),
}

impl DatasetSource {
    pub fn remote(
        base_url: impl Into<String>,
        timeout: Duration,
        user_agent: &str,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self::Remote {
            base_url: base_url.into(),
            client,
        })
    }

    pub fn local(dir: impl Into<PathBuf>) -> Self {
        Self::Local(dir.into())
    }

    /// A configured `local_dir` takes priority over the remote base URL.
    pub fn from_config(cfg: &DatasetConfig) -> anyhow::Result<Self> {
        if let Some(dir) = &cfg.local_dir {
            return Ok(Self::local(dir.clone()));
        }
        Ok(Self::remote(cfg.base_url.clone(), cfg.timeout(), &cfg.user_agent)?)
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Remote { base_url, .. } => base_url.clone(),
            Self::Local(dir) => dir.display().to_string(),
        }
    }

    async fn fetch(&self, collection: Collection) -> Result<(Collection, Vec<u8>), LoadError> {
        let bytes = match self {
            Self::Remote { base_url, client } => {
                let url = format!("{}/{}", base_url.trim_end_matches('/'), collection.file_name());
                let response = client
                    .get(&url)
                    .send()
                    .await
                    .map_err(|e| LoadError::network(collection, e))?;
                if !response.status().is_success() {
                    return Err(LoadError::network(
                        collection,
                        format!("HTTP {} from {}", response.status(), url),
                    ));
                }
                response
                    .bytes()
                    .await
                    .map_err(|e| LoadError::network(collection, e))?
                    .to_vec()
            }
            Self::Local(dir) => {
                let path = dir.join(collection.file_name());
                tokio::fs::read(&path)
                    .await
                    .map_err(|e| LoadError::network(collection, format!("{}: {}", path.display(), e)))?
            }
        };
        debug!("fetched {} ({} bytes)", collection, bytes.len());
        Ok((collection, bytes))
    }
}

/// Fetch all collections concurrently and decode them.
pub async fn load_all(source: &DatasetSource) -> Result<RawCollections, LoadError> {
    info!("loading {} collections from {}", Collection::ALL.len(), source.describe());

    let fetched = try_join_all(Collection::ALL.iter().map(|c| source.fetch(*c))).await?;

    let mut raw = RawCollections::default();
    for (collection, bytes) in fetched {
        match collection {
            Collection::Regions => raw.regions = decode(collection, &bytes)?,
            Collection::Countries => raw.countries = decode(collection, &bytes)?,
            Collection::Channels => raw.channels = decode(collection, &bytes)?,
            Collection::Feeds => raw.feeds = decode(collection, &bytes)?,
            Collection::Streams => raw.streams = decode(collection, &bytes)?,
            Collection::Categories => raw.categories = decode(collection, &bytes)?,
            Collection::Timezones => raw.timezones = decode(collection, &bytes)?,
        }
    }

    info!(
        "loaded regions={} countries={} channels={} feeds={} streams={} categories={} timezones={}",
        raw.regions.len(),
        raw.countries.len(),
        raw.channels.len(),
        raw.feeds.len(),
        raw.streams.len(),
        raw.categories.len(),
        raw.timezones.len(),
    );
    Ok(raw)
}

fn decode<T: DeserializeOwned>(collection: Collection, bytes: &[u8]) -> Result<Vec<T>, LoadError> {
    let records: Vec<T> =
        serde_json::from_slice(bytes).map_err(|e| LoadError::parse(collection, e))?;
    debug!("decoded {} {} records", records.len(), collection);
    Ok(records)
}
