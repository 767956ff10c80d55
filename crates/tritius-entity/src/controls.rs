//! Renew button and auto-renew switch
//!
//! Both controls drive the scraper's renew-all action through the shared
//! coordinator and trigger an out-of-band refresh afterwards, the timer
//! schedule is left alone.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;

use tritius_core::{Result, Snapshot, TritiusCoordinator};

/// Manual "renew everything now" action.
pub struct RenewButton {
    coordinator: Arc<TritiusCoordinator>,
}

impl RenewButton {
    pub fn new(coordinator: Arc<TritiusCoordinator>) -> Self {
        Self { coordinator }
    }

    /// Renew all borrowings and refresh the snapshot.
    ///
    /// # Errors
    /// Renewal failures propagate; a failed follow-up refresh is only
    /// logged, the next scheduled cycle will catch up.
    pub async fn press(&self) -> Result<()> {
        debug!("renew pressed");
        self.coordinator.scraper().renew_all().await?;
        if let Err(error) = self.coordinator.refresh().await {
            debug!(%error, "refresh after renewal failed");
        }
        Ok(())
    }
}

/// Automatic renewal gated to one attempt per calendar day.
///
/// The host calls [`handle_coordinator_update`](Self::handle_coordinator_update)
/// after every poll cycle. The switch renews only while enabled, only
/// when the snapshot carries a borrowing alert, and only once per day no
/// matter how many update callbacks fire. The host restores `enabled` and
/// `last_run` across restarts and persists them from the accessors.
pub struct AutoRenewSwitch {
    coordinator: Arc<TritiusCoordinator>,
    enabled: bool,
    last_run: Option<NaiveDate>,
}

impl AutoRenewSwitch {
    pub fn new(coordinator: Arc<TritiusCoordinator>) -> Self {
        Self::restore(coordinator, false, None)
    }

    /// Rebuild the switch from persisted host state.
    pub fn restore(
        coordinator: Arc<TritiusCoordinator>,
        enabled: bool,
        last_run: Option<NaiveDate>,
    ) -> Self {
        Self {
            coordinator,
            enabled,
            last_run,
        }
    }

    pub fn is_on(&self) -> bool {
        self.enabled
    }

    /// Day of the most recent renewal attempt, successful or not.
    pub fn last_run(&self) -> Option<NaiveDate> {
        self.last_run
    }

    pub fn turn_on(&mut self) {
        self.enabled = true;
    }

    pub fn turn_off(&mut self) {
        self.enabled = false;
    }

    /// React to a finished poll cycle, renewing at most once per day.
    ///
    /// The attempt day is recorded whether or not the renewal succeeded,
    /// a failing portal is retried tomorrow rather than on every cycle.
    pub async fn handle_coordinator_update(&mut self, today: NaiveDate) {
        let Some(snapshot) = self.coordinator.data() else {
            return;
        };
        if !self.should_renew(&snapshot, today) {
            return;
        }

        match self.coordinator.scraper().renew_all().await {
            Ok(true) => {
                if let Err(error) = self.coordinator.refresh().await {
                    debug!(%error, "refresh after automatic renewal failed");
                }
            }
            Ok(false) => debug!("nothing to renew"),
            Err(error) => debug!(%error, "unable to renew borrowings"),
        }
        self.last_run = Some(today);
    }

    fn should_renew(&self, snapshot: &Snapshot, today: NaiveDate) -> bool {
        self.enabled && snapshot.has_borrowing_alert(today) && self.last_run != Some(today)
    }
}
