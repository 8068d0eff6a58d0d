//! Per-page politeness pacing
//!
//! The seed page gets exactly one reservation attempt: if the host was
//! visited too recently the run is rejected with a retry hint. Sibling pages
//! wait out the remaining interval and try again.

use crate::politeness::{PolitenessController, PolitenessOutcome};
use crate::ScoutError;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Added to each wait so the retry lands after the interval has elapsed
const WAIT_SLACK: Duration = Duration::from_millis(10);

/// Hands out fetch slots on one site's host
#[derive(Clone)]
pub struct PageScheduler {
    politeness: Arc<PolitenessController>,
    min_interval: Duration,
}

impl PageScheduler {
    /// Creates a scheduler
    ///
    /// # Arguments
    ///
    /// * `politeness` - The process-wide politeness controller
    /// * `min_interval` - Spacing between fetches to one host
    pub fn new(politeness: Arc<PolitenessController>, min_interval: Duration) -> Self {
        Self {
            politeness,
            min_interval,
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Reserves the slot for the seed page or fails with `RateLimited`
    pub fn reserve_seed(&self, url: &Url) -> Result<(), ScoutError> {
        let host = host_key(url)?;
        match self.politeness.check_and_reserve(&host, self.min_interval) {
            PolitenessOutcome::Proceed => {
                tracing::debug!("Seed slot reserved on {}", host);
                Ok(())
            }
            PolitenessOutcome::MustWait(wait) => {
                tracing::info!("Seed page {} rate limited, {:?} remaining", url, wait);
                Err(ScoutError::rate_limited(&host, wait))
            }
        }
    }

    /// Waits until a slot on the page's host is reserved
    ///
    /// # Returns
    ///
    /// The total time spent waiting
    pub async fn acquire(&self, url: &Url) -> Result<Duration, ScoutError> {
        let host = host_key(url)?;
        let mut waited = Duration::ZERO;

        loop {
            match self.politeness.check_and_reserve(&host, self.min_interval) {
                PolitenessOutcome::Proceed => return Ok(waited),
                PolitenessOutcome::MustWait(wait) => {
                    tracing::trace!("Waiting {:?} for a slot on {}", wait, host);
                    let wait = wait + WAIT_SLACK;
                    tokio::time::sleep(wait).await;
                    waited += wait;
                }
            }
        }
    }
}

fn host_key(url: &Url) -> Result<String, ScoutError> {
    url.host_str()
        .map(str::to_lowercase)
        .ok_or_else(|| ScoutError::InvalidTarget(format!("{} has no host", url)))
}
