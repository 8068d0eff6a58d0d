use crate::robots::{fetch_robots, CachedRobots};
use crate::state::{Clock, HostVisitState, SystemClock};
use crate::url::origin_of;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

/// Longest robots.txt `Crawl-delay` we are willing to honor
const MAX_CRAWL_DELAY: Duration = Duration::from_secs(60);

/// Result of asking for a fetch slot on a host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolitenessOutcome {
    /// The slot is reserved; fetch now
    Proceed,
    /// Too soon after the previous fetch; nothing was reserved
    MustWait(Duration),
}

/// Per-host request spacing and robots.txt checks
///
/// One instance is shared by every analysis in the process. The host map is the
/// only mutable state shared between concurrent page analyses; check and
/// reserve happen under a single lock.
pub struct PolitenessController {
    clock: Arc<dyn Clock>,
    hosts: Mutex<HashMap<String, HostVisitState>>,
    robots: Mutex<HashMap<String, CachedRobots>>,
    client: Client,
    agent_token: String,
    robots_timeout: Duration,
}

impl PolitenessController {
    /// Creates a controller using the system clock
    ///
    /// # Arguments
    ///
    /// * `client` - HTTP client used for robots.txt fetches
    /// * `agent_token` - Our robots.txt product token (the crawler name)
    /// * `robots_timeout` - Timeout for each robots.txt fetch
    pub fn new(client: Client, agent_token: &str, robots_timeout: Duration) -> Self {
        Self {
            clock: Arc::new(SystemClock),
            hosts: Mutex::new(HashMap::new()),
            robots: Mutex::new(HashMap::new()),
            client,
            agent_token: agent_token.to_string(),
            robots_timeout,
        }
    }

    /// Replaces the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Reserves a fetch slot on `host` if `min_interval` has passed since the last one
    ///
    /// On `Proceed` the visit timestamp is updated before the caller's request
    /// starts, so a burst of concurrent callers cannot all pass. On `MustWait`
    /// nothing is recorded and the caller may retry after the returned wait.
    pub fn check_and_reserve(&self, host: &str, min_interval: Duration) -> PolitenessOutcome {
        let host = host.to_lowercase();
        let mut hosts = self.hosts.lock().unwrap_or_else(|e| e.into_inner());
        let now = self.clock.now();

        let state = hosts
            .entry(host.clone())
            .or_insert_with(|| HostVisitState::new(&host));

        match state.time_until_next_visit(min_interval, now) {
            Some(wait) => {
                tracing::debug!("{} visited too recently, must wait {:?}", host, wait);
                PolitenessOutcome::MustWait(wait)
            }
            None => {
                state.record_visit(now);
                PolitenessOutcome::Proceed
            }
        }
    }

    /// Returns a snapshot of the visit state for a host
    pub fn visit_state(&self, host: &str) -> Option<HostVisitState> {
        let hosts = self.hosts.lock().unwrap_or_else(|e| e.into_inner());
        hosts.get(&host.to_lowercase()).cloned()
    }

    /// Returns robots.txt for the origin of `url`, fetching it when not cached or stale
    pub async fn robots_for(&self, url: &Url) -> CachedRobots {
        let origin = origin_of(url);

        {
            let cache = self.robots.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(cached) = cache.get(&origin).filter(|c| !c.is_stale()) {
                tracing::debug!("Using cached robots.txt for {}", origin);
                return cached.clone();
            }
        }

        tracing::debug!("Fetching robots.txt for {}", origin);
        let fetched = fetch_robots(&self.client, url, self.robots_timeout).await;

        let mut cache = self.robots.lock().unwrap_or_else(|e| e.into_inner());
        cache.insert(origin, fetched.clone());
        fetched
    }

    /// Checks whether robots.txt lets this crawler onto the site at all
    ///
    /// Only a file that names our agent and disallows the site root says no.
    /// Fetch failures of any kind count as allowed.
    pub async fn check_robots_allowed(&self, base_url: &Url) -> bool {
        let robots = self.robots_for(base_url).await;
        let root = format!("{}/", origin_of(base_url));
        let allowed = !robots.content.denies_agent(&root, &self.agent_token);
        if !allowed {
            tracing::info!("robots.txt at {} disallows {}", root, self.agent_token);
        }
        allowed
    }

    /// The spacing to use for a host: the configured interval or the robots
    /// `Crawl-delay`, whichever is longer
    pub async fn effective_interval(&self, url: &Url, configured: Duration) -> Duration {
        let robots = self.robots_for(url).await;
        let crawl_delay = robots
            .content
            .crawl_delay(&self.agent_token)
            .filter(|d| d.is_finite() && *d > 0.0)
            .and_then(|d| Duration::try_from_secs_f64(d).ok())
            .map(|d| d.min(MAX_CRAWL_DELAY));

        match crawl_delay {
            Some(delay) if delay > configured => delay,
            _ => configured,
        }
    }
}
