//! Fixture dataset and a ready session for the daemon's tests.

use std::path::Path;
use std::time::Duration;

use riggs_core::{loader, Catalog, DatasetSource, FileFavoritesStore};
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::clock::Clock;
use crate::session::SessionManager;

fn fixture() -> Vec<(&'static str, Value)> {
    vec![
        (
            "regions",
            json!([{"code": "AMER", "name": "Americas", "countries": ["US", "CA", "BR"]}]),
        ),
        (
            "countries",
            json!([
                {"name": "United States", "code": "US", "languages": ["eng"], "flag": "🇺🇸"},
                {"name": "Canada", "code": "CA", "languages": ["eng", "fra"], "flag": "🇨🇦"},
                {"name": "Brazil", "code": "BR", "languages": ["por"], "flag": "🇧🇷"},
                {"name": "France", "code": "FR", "languages": ["fra"], "flag": "🇫🇷"}
            ]),
        ),
        (
            "channels",
            json!([
                {"id": "CH1", "name": "News1", "country": "US", "categories": ["news"], "is_nsfw": false},
                {"id": "CBC.ca", "name": "CBC", "country": "CA", "categories": ["general"], "is_nsfw": false},
                {"id": "Globo.br", "name": "Globo", "country": "BR", "categories": ["general"], "is_nsfw": false},
                {"id": "TF1.fr", "name": "TF1", "country": "FR", "categories": ["general"], "is_nsfw": false}
            ]),
        ),
        (
            "feeds",
            json!([
                {"channel": "CH1", "id": "F1", "name": "East", "is_main": true,
                 "broadcast_area": ["c/US"], "timezones": ["America/New_York"], "languages": ["eng"]}
            ]),
        ),
        (
            "streams",
            json!([
                {"channel": null, "feed": "F1", "title": "News 1 East", "url": "http://x/a.m3u8"},
                {"channel": "Globo.br", "feed": null, "title": "Globo", "url": "http://br/globo.m3u8",
                 "referrer": "https://globo.com", "user_agent": "Mozilla/5.0"}
            ]),
        ),
        (
            "categories",
            json!([
                {"id": "news", "name": "News"},
                {"id": "general", "name": "General"}
            ]),
        ),
        (
            "timezones",
            json!([{"id": "America/New_York", "utc_offset": "-05:00", "countries": ["US"]}]),
        ),
    ]
}

fn data_dir(root: &Path) -> std::path::PathBuf {
    root.join("data")
}

pub fn write_fixture(root: &Path) {
    let dir = data_dir(root);
    std::fs::create_dir_all(&dir).unwrap();
    for (name, value) in fixture() {
        std::fs::write(dir.join(format!("{name}.json")), value.to_string()).unwrap();
    }
}

/// Appends a channel to the on-disk channels collection.
pub fn add_channel(root: &Path, id: &str, name: &str, country: &str) {
    let path = data_dir(root).join("channels.json");
    let mut channels: Vec<Value> =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    channels.push(json!({"id": id, "name": name, "country": country, "categories": [], "is_nsfw": false}));
    std::fs::write(&path, Value::Array(channels).to_string()).unwrap();
}

pub async fn manager() -> (SessionManager, TempDir) {
    manager_with_refresh(Duration::from_secs(60)).await
}

/// Session over the fixture with the favorites file in the same temp dir and
/// a local zone of `UTC`.
pub async fn manager_with_refresh(refresh: Duration) -> (SessionManager, TempDir) {
    let root = tempfile::tempdir().unwrap();
    write_fixture(root.path());

    let source = DatasetSource::local(data_dir(root.path()));
    let raw = loader::load_all(&source).await.unwrap();
    let catalog = Catalog::build("AMER", raw).unwrap();
    let store = Box::new(FileFavoritesStore::new(root.path().join("favorites.json")));
    let manager = SessionManager::new(catalog, store, "UTC".to_string(), source, Clock::new(refresh));
    (manager, root)
}
