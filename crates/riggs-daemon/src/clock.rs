//! "Current time in the selected country" ticker.
//!
//! At most one ticker runs.  Each selection change cancels it through its
//! [`CancellationToken`]; a tick that races a selection change is still
//! dropped because the ticker re-checks its generation under the session lock
//! before publishing.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use riggs_core::locale::{self, ZoneSource};
use riggs_core::selection::ClockSubscription;
use serde::Serialize;
use tokio::sync::{watch, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::session::Session;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClockReading {
    pub country_code: String,
    pub zone: String,
    pub source: ZoneSource,
    /// `HH:MM <abbrev>`
    pub time: String,
    pub generation: u64,
}

impl ClockReading {
    pub fn at(subscription: &ClockSubscription, instant: DateTime<Utc>) -> Self {
        Self {
            country_code: subscription.country_code.clone(),
            zone: subscription.zone.zone.clone(),
            source: subscription.zone.source,
            time: locale::format_local_time(&subscription.zone.zone, instant),
            generation: subscription.generation,
        }
    }
}

#[derive(Clone)]
pub struct Clock {
    refresh: Duration,
    readings: Arc<watch::Sender<Option<ClockReading>>>,
    ticker: Arc<Mutex<CancellationToken>>,
}

impl Clock {
    pub fn new(refresh: Duration) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            refresh,
            readings: Arc::new(tx),
            ticker: Arc::new(Mutex::new(CancellationToken::new())),
        }
    }

    pub fn current(&self) -> Option<ClockReading> {
        self.readings.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<ClockReading>> {
        self.readings.subscribe()
    }

    /// Replace the running ticker with one for `subscription` (or none).
    /// Called with the session write lock held.
    pub fn follow(&self, subscription: Option<ClockSubscription>, session: Arc<RwLock<Session>>) {
        let token = CancellationToken::new();
        self.replace_token(token.clone()).cancel();

        let Some(subscription) = subscription else {
            self.readings.send_replace(None);
            return;
        };
        self.readings
            .send_replace(Some(ClockReading::at(&subscription, Utc::now())));
        debug!(
            "clock following {} in {} (gen {})",
            subscription.country_code, subscription.zone.zone, subscription.generation
        );
        tokio::spawn(run_ticker(
            subscription,
            session,
            Arc::clone(&self.readings),
            self.refresh,
            token,
        ));
    }

    pub fn stop(&self) {
        self.replace_token(CancellationToken::new()).cancel();
        self.readings.send_replace(None);
    }

    fn replace_token(&self, next: CancellationToken) -> CancellationToken {
        let mut current = self.ticker.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *current, next)
    }
}

async fn run_ticker(
    subscription: ClockSubscription,
    session: Arc<RwLock<Session>>,
    readings: Arc<watch::Sender<Option<ClockReading>>>,
    refresh: Duration,
    token: CancellationToken,
) {
    let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + refresh, refresh);
    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = interval.tick() => {
                let session = session.read().await;
                if !session.selection.is_current(subscription.generation) {
                    break;
                }
                readings.send_replace(Some(ClockReading::at(&subscription, Utc::now())));
            }
        }
    }
    debug!("clock for gen {} stopped", subscription.generation);
}
