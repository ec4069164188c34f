mod clock;
mod http;
mod session;
#[cfg(test)]
mod testutil;

use std::time::Duration;

use anyhow::Context;
use riggs_core::config::Config;
use riggs_core::{loader, platform, Catalog, DatasetSource, FileFavoritesStore};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::clock::Clock;
use crate::session::SessionManager;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // File logging + stderr
    let data_dir = platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;
    let log_path = data_dir.join("riggsd.log");

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(log_file)
        .with_ansi(false);
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(
                    "info,riggs_core=debug,riggs_daemon=debug,hyper=warn,reqwest=warn",
                )
            }),
        )
        .init();

    info!("Log file: {:?}", log_path);

    let config = Config::load()?;
    info!("Config loaded from: {:?}", Config::config_path());

    let source = DatasetSource::from_config(&config.dataset)?;
    let raw = loader::load_all(&source)
        .await
        .context("initial dataset load failed")?;
    let catalog = Catalog::build(&config.dataset.region, raw)?;
    let stats = catalog.stats();
    info!(
        "Catalog {} ready: {} countries, {} categories, {} channels, {} streams",
        catalog.region().code,
        stats.countries,
        stats.categories,
        stats.channels,
        stats.streams
    );

    let store = Box::new(FileFavoritesStore::new(&config.paths.favorites_file));
    info!("Favorites file: {:?}", config.paths.favorites_file);
    let clock = Clock::new(Duration::from_secs(config.clock.refresh_secs.max(1)));
    let sessions = SessionManager::new(catalog, store, platform::local_zone(), source, clock);

    if config.http.enabled {
        let _http_handle =
            http::start_server(config.http.bind_address.clone(), config.http.port, sessions.clone());
    } else {
        info!("HTTP API disabled in config");
    }

    tokio::signal::ctrl_c().await?;
    info!("Shutting down");
    sessions.shutdown();

    Ok(())
}
