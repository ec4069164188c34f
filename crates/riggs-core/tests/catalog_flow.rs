mod common;

use riggs_core::favorites::{FileFavoritesStore, MemoryFavoritesStore};
use riggs_core::loader::{self, DatasetSource, RawCollections};
use riggs_core::locale::{self, ZoneSource};
use riggs_core::model::{Channel, Country, Region, Stream, ADULT_CATEGORY_ID};
use riggs_core::resolver::{self, MatchPass};
use riggs_core::{Catalog, ResolveError, Selection, SelectionState};

async fn load_fixture() -> RawCollections {
    let dir = tempfile::tempdir().unwrap();
    common::write_fixture(dir.path());
    loader::load_all(&DatasetSource::local(dir.path())).await.unwrap()
}

#[tokio::test]
async fn every_region_keeps_only_its_own_non_adult_channels() {
    let raw = load_fixture().await;
    for region in &raw.regions {
        let catalog = Catalog::build(&region.code, raw.clone()).unwrap();
        assert!(!catalog.channels().is_empty());
        for ch in catalog.channels() {
            assert!(region.country_codes.contains(&ch.country_code), "{} leaked", ch.id);
            assert!(!ch.is_adult);
            assert!(!ch.category_ids.iter().any(|c| c == ADULT_CATEGORY_ID));
        }
        assert!(catalog.category(ADULT_CATEGORY_ID).is_none());
    }
}

#[tokio::test]
async fn feed_pass_resolves_channel_without_direct_stream() {
    let catalog = Catalog::build("AMER", load_fixture().await).unwrap();
    let resolved = resolver::resolve_id(&catalog, "CH1").unwrap();
    assert_eq!(resolved.url(), "http://x/a.m3u8");
    assert_eq!(resolved.pass, MatchPass::Feed);
}

#[tokio::test]
async fn title_pass_is_last_resort() {
    let catalog = Catalog::build("AMER", load_fixture().await).unwrap();
    let resolved = resolver::resolve_id(&catalog, "Globo.br").unwrap();
    assert_eq!(resolved.url(), "http://br/globo.m3u8");
    assert_eq!(resolved.pass, MatchPass::Title);
    assert_eq!(resolved.stream.referrer.as_deref(), Some("https://globo.com"));
}

#[tokio::test]
async fn urlless_and_out_of_region_channels_are_not_found() {
    let catalog = Catalog::build("AMER", load_fixture().await).unwrap();
    assert_eq!(
        resolver::resolve_id(&catalog, "CBC.ca").unwrap_err(),
        ResolveError::NotFound("CBC.ca".into())
    );
    assert!(resolver::resolve_id(&catalog, "Weather.us").is_err());
    assert!(resolver::resolve_id(&catalog, "TF1.fr").is_err());
    assert_eq!(catalog.stats().dropped_streams, 1);
}

#[test]
fn fuzzy_title_match_from_unlinked_stream() {
    let raw = RawCollections {
        regions: vec![Region {
            code: "AMER".into(),
            country_codes: vec!["US".into()],
            ..Region::default()
        }],
        countries: vec![Country { code: "US".into(), name: "United States".into(), ..Country::default() }],
        channels: vec![Channel {
            id: "CH1".into(),
            name: "News1".into(),
            country_code: "US".into(),
            category_ids: vec!["news".into()],
            ..Channel::default()
        }],
        streams: vec![Stream {
            title: Some("Breaking News1 HD".into()),
            url: "http://x/b.m3u8".into(),
            ..Stream::default()
        }],
        ..RawCollections::default()
    };
    let catalog = Catalog::build("AMER", raw).unwrap();
    let resolved = resolver::resolve_id(&catalog, "CH1").unwrap();
    assert_eq!(resolved.url(), "http://x/b.m3u8");
    assert_eq!(resolved.pass, MatchPass::Title);
}

#[tokio::test]
async fn timezone_lookup_order() {
    let catalog = Catalog::build("AMER", load_fixture().await).unwrap();
    let us = locale::timezone_for(&catalog, "US", "Asia/Tokyo");
    assert_eq!((us.zone.as_str(), us.source), ("America/New_York", ZoneSource::Timezones));
    let br = locale::timezone_for(&catalog, "BR", "Asia/Tokyo");
    assert_eq!((br.zone.as_str(), br.source), ("America/Sao_Paulo", ZoneSource::Feed));
}

#[tokio::test]
async fn favorites_survive_restart_and_skip_deleted_channels() {
    let catalog = Catalog::build("AMER", load_fixture().await).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("favorites.json");
    std::fs::write(&path, r#"{"riggs_favorites":"[\"CH1\",\"CH2\"]"}"#).unwrap();

    let mut state = SelectionState::new(FileFavoritesStore::new(&path), "UTC");
    let favs = state.select_favorites(&catalog);
    assert_eq!(favs.len(), 1);
    assert_eq!(favs[0].id, "CH1");

    assert!(state.toggle_favorite("Globo.br").unwrap());
    assert!(state.toggle_favorite("Globo.br").is_ok_and(|now| !now));
    assert!(state.toggle_favorite("CBC.ca").unwrap());

    let reopened = SelectionState::new(FileFavoritesStore::new(&path), "UTC");
    assert_eq!(reopened.favorites().ids(), &["CH1", "CH2", "CBC.ca"]);
}

#[tokio::test]
async fn only_one_selection_is_active() {
    let catalog = Catalog::build("AMER", load_fixture().await).unwrap();
    let mut state = SelectionState::new(MemoryFavoritesStore::new(), "UTC");

    let us = state.select_country(&catalog, "US").unwrap();
    let names: Vec<&str> = us.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["News1", "Weather Now"]);
    assert!(state.clock().is_some());

    let general = state.select_category(&catalog, "general");
    assert_eq!(general.len(), 2);
    assert_eq!(state.selection(), &Selection::Category("general".into()));
    assert!(state.clock().is_none());
}
