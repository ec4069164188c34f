use serde::{Deserialize, Deserializer, Serialize};

/// Category id used by the upstream datasets for adult content.  Channels and
/// categories carrying it never enter the catalog.
pub const ADULT_CATEGORY_ID: &str = "xxx";

/// Small flag image for a country code, as the presentation layer shows it.
pub fn flag_url(country_code: &str) -> String {
    format!("https://flagcdn.com/16x12/{}.png", country_code.to_lowercase())
}

/// A named grouping of countries (e.g. `AMER`).
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Region {
    pub code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// ISO alpha-2 codes of the member countries.
    #[serde(rename = "countries", default, deserialize_with = "null_as_default")]
    pub country_codes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Country {
    /// ISO alpha-2, unique.
    pub code: String,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub languages: Vec<String>,
    /// Emoji flag as shipped by the dataset.
    #[serde(default)]
    pub flag: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Channel {
    pub id: String,
    pub name: String,
    #[serde(rename = "country", default, deserialize_with = "null_as_default")]
    pub country_code: String,
    /// Ordered as listed upstream; may be empty.
    #[serde(rename = "categories", default, deserialize_with = "null_as_default")]
    pub category_ids: Vec<String>,
    #[serde(rename = "is_nsfw", default, deserialize_with = "null_as_default")]
    pub is_adult: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub languages: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub alt_names: Vec<String>,
    #[serde(default)]
    pub network: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub closed: Option<String>,
    #[serde(default)]
    pub replaced_by: Option<String>,
}

impl Channel {
    /// Adult either by flag or by carrying the adult category.
    pub fn is_adult_content(&self) -> bool {
        self.is_adult || self.category_ids.iter().any(|c| c == ADULT_CATEGORY_ID)
    }
}

/// A broadcast variant of a channel (regional or language variant).
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Feed {
    pub id: String,
    #[serde(rename = "channel", default, deserialize_with = "null_as_default")]
    pub channel_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_main: bool,
    /// IANA zone ids, ordered as listed upstream.
    #[serde(default, deserialize_with = "null_as_default")]
    pub timezones: Vec<String>,
    /// Area tags such as `c/US`, `r/AMER` or `s/US-CA`.
    #[serde(rename = "broadcast_area", default, deserialize_with = "null_as_default")]
    pub broadcast_area_tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub languages: Vec<String>,
    #[serde(default)]
    pub format: Option<String>,
}

impl Feed {
    /// True when one of the area tags is the country tag `c/<code>`.
    pub fn broadcasts_to(&self, country_code: &str) -> bool {
        self.broadcast_area_tags
            .iter()
            .any(|tag| tag.strip_prefix("c/") == Some(country_code))
    }
}

/// A playable URL keyed to a channel, a feed, or only a free-text title.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Stream {
    #[serde(rename = "channel", default)]
    pub channel_id: Option<String>,
    #[serde(rename = "feed", default)]
    pub feed_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default)]
    pub referrer: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub quality: Option<String>,
}

impl Stream {
    pub fn has_url(&self) -> bool {
        !self.url.trim().is_empty()
    }

    /// Identity used to collapse mirrors of the same record.
    pub fn dedup_key(&self) -> (&str, &str, &str) {
        (
            self.channel_id.as_deref().unwrap_or(""),
            self.feed_id.as_deref().unwrap_or(""),
            self.title.as_deref().unwrap_or(""),
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TimezoneEntry {
    /// IANA zone name.
    pub id: String,
    #[serde(default)]
    pub utc_offset: Option<String>,
    #[serde(rename = "countries", default, deserialize_with = "null_as_default")]
    pub country_codes: Vec<String>,
}

/// Upstream files use `null` and absent interchangeably.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
