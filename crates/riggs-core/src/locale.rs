//! Country → timezone lookup and "time in zone" formatting.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::catalog::Catalog;

/// Which data produced a zone id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneSource {
    Timezones,
    Feed,
    Local,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedZone {
    pub zone: String,
    pub source: ZoneSource,
}

/// Looks up, in order: the timezones collection, then a feed broadcasting to
/// the country (`c/<code>` area tag), then `local_zone`.
pub fn timezone_for(catalog: &Catalog, country_code: &str, local_zone: &str) -> ResolvedZone {
    if let Some(entry) = catalog
        .timezones()
        .iter()
        .find(|tz| tz.country_codes.iter().any(|c| c == country_code))
    {
        return ResolvedZone {
            zone: entry.id.clone(),
            source: ZoneSource::Timezones,
        };
    }

    if let Some(zone) = catalog
        .feeds()
        .iter()
        .filter(|f| f.broadcasts_to(country_code))
        .find_map(|f| f.timezones.first())
    {
        return ResolvedZone {
            zone: zone.clone(),
            source: ZoneSource::Feed,
        };
    }

    ResolvedZone {
        zone: local_zone.to_string(),
        source: ZoneSource::Local,
    }
}

/// `HH:MM <abbrev>` at `instant` in `zone`; unknown zone ids render in UTC.
pub fn format_local_time(zone: &str, instant: DateTime<Utc>) -> String {
    let tz: Tz = zone.parse().unwrap_or(Tz::UTC);
    instant.with_timezone(&tz).format("%H:%M %Z").to_string()
}
