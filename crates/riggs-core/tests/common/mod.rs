#![allow(dead_code)]

use std::path::Path;

use riggs_core::loader::Collection;
use serde_json::{json, Value};

/// A small two-region dataset shaped like the upstream files.
pub fn fixture() -> Vec<(Collection, Value)> {
    vec![
        (
            Collection::Regions,
            json!([
                {"code": "AMER", "name": "Americas", "countries": ["US", "CA", "BR"]},
                {"code": "EUR", "name": "Europe", "countries": ["FR", "DE"]}
            ]),
        ),
        (
            Collection::Countries,
            json!([
                {"name": "United States", "code": "US", "languages": ["eng"], "flag": "🇺🇸"},
                {"name": "Canada", "code": "CA", "languages": ["eng", "fra"], "flag": "🇨🇦"},
                {"name": "Brazil", "code": "BR", "languages": ["por"], "flag": "🇧🇷"},
                {"name": "France", "code": "FR", "languages": ["fra"], "flag": "🇫🇷"},
                {"name": "Germany", "code": "DE", "languages": ["deu"], "flag": "🇩🇪"}
            ]),
        ),
        (
            Collection::Channels,
            json!([
                {"id": "CH1", "name": "News1", "country": "US", "categories": ["news"], "is_nsfw": false},
                {"id": "CBC.ca", "name": "CBC", "country": "CA", "categories": ["general"], "is_nsfw": false},
                {"id": "Globo.br", "name": "Globo", "country": "BR", "categories": ["general", "entertainment"], "is_nsfw": false},
                {"id": "Late.us", "name": "Late Night", "country": "US", "categories": ["xxx"], "is_nsfw": false},
                {"id": "Flag.br", "name": "Flagged", "country": "BR", "categories": [], "is_nsfw": true},
                {"id": "TF1.fr", "name": "TF1", "country": "FR", "categories": ["general"], "is_nsfw": false},
                {"id": "ZDF.de", "name": "ZDF", "country": "DE", "categories": ["news"], "is_nsfw": false},
                {"id": "Weather.us", "name": "Weather Now", "country": "US", "categories": [], "is_nsfw": false}
            ]),
        ),
        (
            Collection::Feeds,
            json!([
                {"channel": "CH1", "id": "F1", "name": "East", "is_main": true,
                 "broadcast_area": ["c/US"], "timezones": ["America/New_York"], "languages": ["eng"], "format": "1080i"},
                {"channel": "Globo.br", "id": "SP", "name": "São Paulo", "is_main": true,
                 "broadcast_area": ["c/BR"], "timezones": ["America/Sao_Paulo"], "languages": ["por"], "format": "1080i"},
                {"channel": "TF1.fr", "id": "Paris", "name": "Paris", "is_main": true,
                 "broadcast_area": ["c/FR"], "timezones": ["Europe/Paris"], "languages": ["fra"], "format": "1080i"}
            ]),
        ),
        (
            Collection::Streams,
            json!([
                {"channel": null, "feed": "F1", "title": "News 1 East", "url": "http://x/a.m3u8", "referrer": null, "user_agent": null, "quality": "720p"},
                {"channel": "TF1.fr", "feed": "Paris", "title": "TF1", "url": "http://fr/tf1.m3u8", "referrer": null, "user_agent": null, "quality": null},
                {"channel": null, "feed": null, "title": "Globo Internacional", "url": "http://br/globo.m3u8", "referrer": "https://globo.com", "user_agent": null, "quality": null},
                {"channel": "CBC.ca", "feed": null, "title": "CBC", "url": "", "referrer": null, "user_agent": null, "quality": null}
            ]),
        ),
        (
            Collection::Categories,
            json!([
                {"id": "news", "name": "News", "description": "Programming is mostly news"},
                {"id": "general", "name": "General", "description": null},
                {"id": "entertainment", "name": "Entertainment", "description": null},
                {"id": "xxx", "name": "XXX", "description": null}
            ]),
        ),
        (
            Collection::Timezones,
            json!([
                {"id": "America/New_York", "utc_offset": "-05:00", "countries": ["US"]},
                {"id": "America/Toronto", "utc_offset": "-05:00", "countries": ["CA"]},
                {"id": "Europe/Paris", "utc_offset": "+01:00", "countries": ["FR"]}
            ]),
        ),
    ]
}

pub fn write_fixture(dir: &Path) {
    for (collection, value) in fixture() {
        std::fs::write(dir.join(collection.file_name()), value.to_string()).unwrap();
    }
}
