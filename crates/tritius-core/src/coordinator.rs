//! Polling coordinator
//!
//! Runs one authenticated fetch cycle per interval (or on demand),
//! aggregates the results into an immutable [`Snapshot`] and maps client
//! errors onto the two signals the host framework understands: needs
//! re-authentication, or update failed and may be retried next cycle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use crate::error::TritiusError;
use crate::scraper::TritiusScraper;
use crate::types::Snapshot;

/// Interval between scheduled poll cycles.
pub const UPDATE_INTERVAL: Duration = Duration::from_secs(3600);

/// Coordinator-level failure signal
#[derive(Error, Debug)]
pub enum UpdateError {
    /// Credentials no longer work, the user has to re-authenticate
    #[error("Authentication failed: {0}")]
    AuthFailed(#[source] TritiusError),

    /// Cycle failed, data stays stale until a later cycle succeeds
    #[error("Update failed: {0}")]
    UpdateFailed(#[source] TritiusError),
}

impl From<TritiusError> for UpdateError {
    fn from(error: TritiusError) -> Self {
        match error {
            TritiusError::Authentication => UpdateError::AuthFailed(error),
            _ => UpdateError::UpdateFailed(error),
        }
    }
}

/// Coordinates periodic fetching into one shared snapshot
///
/// One coordinator drives one sequential cycle at a time; the caller is
/// responsible for not running two cycles concurrently. The last
/// successful snapshot is kept through failed cycles so consumers render
/// stale data instead of nothing.
pub struct TritiusCoordinator {
    scraper: TritiusScraper,
    update_interval: Duration,
    data: RwLock<Option<Snapshot>>,
    last_update_success: AtomicBool,
}

impl TritiusCoordinator {
    /// Create a coordinator polling at [`UPDATE_INTERVAL`].
    pub fn new(scraper: TritiusScraper) -> Self {
        Self::with_interval(scraper, UPDATE_INTERVAL)
    }

    /// Create a coordinator with a custom interval.
    pub fn with_interval(scraper: TritiusScraper, update_interval: Duration) -> Self {
        Self {
            scraper,
            update_interval,
            data: RwLock::new(None),
            last_update_success: AtomicBool::new(false),
        }
    }

    /// The scraper driven by this coordinator.
    pub fn scraper(&self) -> &TritiusScraper {
        &self.scraper
    }

    /// Latest snapshot, `None` until the first successful cycle.
    pub fn data(&self) -> Option<Snapshot> {
        self.data.read().expect("snapshot lock poisoned").clone()
    }

    /// Whether the most recent cycle succeeded.
    pub fn last_update_success(&self) -> bool {
        self.last_update_success.load(Ordering::SeqCst)
    }

    /// Run one fetch cycle now, out-of-band cycles do not reschedule the
    /// interval.
    ///
    /// # Errors
    /// `UpdateError::AuthFailed` when any inner call failed
    /// authentication, `UpdateError::UpdateFailed` otherwise. The stored
    /// snapshot is left untouched on failure.
    pub async fn refresh(&self) -> Result<Snapshot, UpdateError> {
        match self.update().await {
            Ok(snapshot) => {
                *self.data.write().expect("snapshot lock poisoned") = Some(snapshot.clone());
                self.last_update_success.store(true, Ordering::SeqCst);
                debug!(
                    borrowings = snapshot.borrowing_count(),
                    "poll cycle finished"
                );
                Ok(snapshot)
            }
            Err(error) => {
                self.last_update_success.store(false, Ordering::SeqCst);
                Err(UpdateError::from(error))
            }
        }
    }

    /// One authenticated fetch cycle producing a full snapshot.
    async fn update(&self) -> Result<Snapshot, TritiusError> {
        let _scope = self.scraper.authorized().await?;

        let borrowings = self.scraper.get_borrowings().await?;
        let user = self.scraper.get_user_profile().await?;
        let borrowing_expiration = borrowings.first().map(|b| b.due_date);

        Ok(Snapshot {
            user: Some(user),
            borrowings: Some(borrowings),
            borrowing_expiration,
        })
    }

    /// Drive scheduled cycles forever.
    ///
    /// The first cycle runs immediately. Failures are logged and the loop
    /// keeps going, the next tick is the retry. The host cancels the loop
    /// by dropping the future.
    pub async fn run(&self) {
        let mut interval = tokio::time::interval(self.update_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            if let Err(error) = self.refresh().await {
                warn!(%error, "scheduled poll cycle failed");
            }
        }
    }
}
