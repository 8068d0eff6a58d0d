use std::time::{Duration, Instant};

/// Tracks visits to one host for the lifetime of the process
///
/// Owned exclusively by the politeness controller. The timestamp only ever
/// moves forward.
#[derive(Debug, Clone)]
pub struct HostVisitState {
    /// Lowercase host name
    pub host: String,

    /// When the last fetch to this host was reserved
    pub last_visit: Option<Instant>,

    /// Number of reservations granted for this host
    pub visit_count: u32,
}

impl HostVisitState {
    /// Creates a state for a host that has never been visited
    pub fn new(host: &str) -> Self {
        Self {
            host: host.to_string(),
            last_visit: None,
            visit_count: 0,
        }
    }

    /// Calculates the time until the next visit may start
    ///
    /// Returns None if a request can be made now, or the duration to wait otherwise.
    ///
    /// # Arguments
    ///
    /// * `min_interval` - Minimum spacing between two visits to this host
    /// * `now` - The current time instant
    pub fn time_until_next_visit(&self, min_interval: Duration, now: Instant) -> Option<Duration> {
        let last = self.last_visit?;
        let elapsed = now.saturating_duration_since(last);
        if elapsed < min_interval {
            Some(min_interval - elapsed)
        } else {
            None
        }
    }

    /// Records that a visit was reserved at `now`
    ///
    /// An earlier `now` than the stored timestamp leaves the timestamp as is.
    pub fn record_visit(&mut self, now: Instant) {
        self.visit_count += 1;
        self.last_visit = Some(match self.last_visit {
            Some(last) if last > now => last,
            _ => now,
        });
    }
}
