//! Stream resolution for a single channel.
//!
//! Three passes in fixed priority, stopping at the first that yields a stream
//! with a URL:
//!
//!   1. direct: `stream.channel == channel.id`
//!   2. feed: `stream.feed` is one of the channel's feeds, feeds tried in
//!      listing order
//!   3. title: lower-cased `stream.title` contains the lower-cased channel
//!      name
//!
//! Inside a pass, records sharing `(channel, feed, title)` are mirrors and only
//! the first one is considered.

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use crate::catalog::Catalog;
use crate::error::ResolveError;
use crate::model::{Channel, Stream};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchPass {
    Direct,
    Feed,
    Title,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStream<'a> {
    pub stream: &'a Stream,
    pub pass: MatchPass,
}

impl ResolvedStream<'_> {
    /// The stream URL without surrounding whitespace.
    pub fn url(&self) -> &str {
        self.stream.url.trim()
    }
}

/// Resolve by channel id; ids outside the catalog are `NotFound`.
pub fn resolve_id<'a>(catalog: &'a Catalog, channel_id: &str) -> Result<ResolvedStream<'a>, ResolveError> {
    match catalog.channel(channel_id) {
        Some(channel) => resolve(catalog, channel),
        None => Err(ResolveError::NotFound(channel_id.to_string())),
    }
}

pub fn resolve<'a>(catalog: &'a Catalog, channel: &Channel) -> Result<ResolvedStream<'a>, ResolveError> {
    if !catalog.contains_channel(&channel.id) {
        return Err(ResolveError::NotFound(channel.id.clone()));
    }
    let streams = catalog.streams();

    let direct = streams
        .iter()
        .filter(|s| s.channel_id.as_deref() == Some(channel.id.as_str()));
    if let Some(stream) = first_playable(direct) {
        return Ok(found(channel, stream, MatchPass::Direct));
    }

    let by_feed = catalog.feeds_for(&channel.id).flat_map(|feed| {
        streams.iter().filter(move |s| {
            s.feed_id.as_deref() == Some(feed.id.as_str())
                && s.channel_id.as_deref().map_or(true, |id| id == channel.id)
        })
    });
    if let Some(stream) = first_playable(by_feed) {
        return Ok(found(channel, stream, MatchPass::Feed));
    }

    let needle = channel.name.trim().to_lowercase();
    if !needle.is_empty() {
        let by_title = streams.iter().filter(|s| {
            s.title
                .as_deref()
                .is_some_and(|t| t.to_lowercase().contains(&needle))
        });
        if let Some(stream) = first_playable(by_title) {
            return Ok(found(channel, stream, MatchPass::Title));
        }
    }

    debug!("no stream for {} ({})", channel.id, channel.name);
    Err(ResolveError::NotFound(channel.id.clone()))
}

/// First candidate with a URL, skipping repeated dedup keys.
fn first_playable<'a>(candidates: impl Iterator<Item = &'a Stream>) -> Option<&'a Stream> {
    let mut seen = HashSet::new();
    for stream in candidates {
        if !seen.insert(stream.dedup_key()) {
            continue;
        }
        if stream.has_url() {
            return Some(stream);
        }
    }
    None
}

fn found<'a>(channel: &Channel, stream: &'a Stream, pass: MatchPass) -> ResolvedStream<'a> {
    debug!("resolved {} via {:?}: {}", channel.id, pass, stream.url);
    ResolvedStream { stream, pass }
}
