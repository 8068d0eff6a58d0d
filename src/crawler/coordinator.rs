//! Analysis orchestration
//!
//! Sequences one run: compliance gate, seed-page politeness, robots.txt,
//! seed fetch, discovery, bounded-concurrency page analysis, lead
//! extraction, site probes, and scoring. Only compliance rejection, rate
//! limiting, robots denial and a failed seed fetch end a run early; every
//! failure below the seed page is folded into the report.

use crate::audit::{
    analyze, finish, inspect, page_failure, AnalyzerOptions, PageAnalysis, PageInspection,
};
use crate::collaborators::{
    AreaQuery, MemoryUsageStore, NoPlaces, PerformanceInsights, PerformanceProvider,
    PlacesProvider, UnavailablePerformance, UsageStore,
};
use crate::compliance::{ComplianceDecision, ComplianceGate, RequestKind, ScrapeRequest};
use crate::config::Config;
use crate::crawler::scheduler::PageScheduler;
use crate::crawler::{
    build_http_client, discover, fetch_page, resource_exists, FetchedPage, PageDocument,
};
use crate::leads::{extract, extract_from_document, lead_from_place, ExtractedLead};
use crate::politeness::PolitenessController;
use crate::scoring::{score, AreaReport, CandidateFailure, SiteScoreReport, SiteSignals};
use crate::state::{Clock, SystemClock};
use crate::url::parse_target_url;
use crate::{FetchError, ScoutError};
use chrono::Utc;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use url::Url;

/// A unit of page work inside one site analysis
enum PageWork {
    /// The seed page, already fetched and inspected
    Seed(Box<PageInspection>, Option<ExtractedLead>),
    /// A discovered sibling page still to fetch
    Sibling(Url),
}

/// Runs analyses against the configured collaborators
///
/// Cheap to share behind an `Arc`; concurrent runs share one politeness
/// controller and therefore one host-visit map.
pub struct Orchestrator {
    config: Arc<Config>,
    gate: ComplianceGate,
    client: Client,
    politeness: Arc<PolitenessController>,
    usage: Arc<dyn UsageStore>,
    performance: Arc<dyn PerformanceProvider>,
    places: Arc<dyn PlacesProvider>,
    options: AnalyzerOptions,
}

/// Builder for [`Orchestrator`]
///
/// Collaborators left unset fall back to the in-memory usage store, an
/// unavailable performance provider and no places provider.
pub struct OrchestratorBuilder {
    config: Config,
    client: Option<Client>,
    politeness: Option<Arc<PolitenessController>>,
    usage: Option<Arc<dyn UsageStore>>,
    performance: Option<Arc<dyn PerformanceProvider>>,
    places: Option<Arc<dyn PlacesProvider>>,
    clock: Option<Arc<dyn Clock>>,
}

impl OrchestratorBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            client: None,
            politeness: None,
            usage: None,
            performance: None,
            places: None,
            clock: None,
        }
    }

    /// Uses a prebuilt HTTP client instead of one built from the config
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Shares an existing politeness controller (and its host-visit map)
    pub fn politeness(mut self, politeness: Arc<PolitenessController>) -> Self {
        self.politeness = Some(politeness);
        self
    }

    pub fn usage_store(mut self, usage: Arc<dyn UsageStore>) -> Self {
        self.usage = Some(usage);
        self
    }

    pub fn performance_provider(mut self, performance: Arc<dyn PerformanceProvider>) -> Self {
        self.performance = Some(performance);
        self
    }

    pub fn places_provider(mut self, places: Arc<dyn PlacesProvider>) -> Self {
        self.places = Some(places);
        self
    }

    /// Time source for a politeness controller created by the builder
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Builds the orchestrator
    ///
    /// # Returns
    ///
    /// * `Ok(Orchestrator)` - Ready to run analyses
    /// * `Err(ScoutError)` - The HTTP client could not be built
    pub fn build(self) -> Result<Orchestrator, ScoutError> {
        let config = self.config;
        let client = match self.client {
            Some(client) => client,
            None => build_http_client(&config.user_agent, config.crawler.max_redirects)?,
        };

        let politeness = match self.politeness {
            Some(politeness) => politeness,
            None => {
                let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
                Arc::new(
                    PolitenessController::new(
                        client.clone(),
                        &config.user_agent.crawler_name,
                        config.crawler.robots_timeout(),
                    )
                    .with_clock(clock),
                )
            }
        };

        Ok(Orchestrator {
            gate: ComplianceGate::from_config(&config),
            options: AnalyzerOptions::from_config(&config.crawler),
            client,
            politeness,
            usage: self
                .usage
                .unwrap_or_else(|| Arc::new(MemoryUsageStore::new())),
            performance: self
                .performance
                .unwrap_or_else(|| Arc::new(UnavailablePerformance)),
            places: self.places.unwrap_or_else(|| Arc::new(NoPlaces)),
            config: Arc::new(config),
        })
    }
}

impl Orchestrator {
    pub fn builder(config: Config) -> OrchestratorBuilder {
        OrchestratorBuilder::new(config)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn politeness(&self) -> &Arc<PolitenessController> {
        &self.politeness
    }

    /// Evaluates a request against today's usage without any network I/O
    pub async fn evaluate(
        &self,
        request: &ScrapeRequest,
    ) -> Result<ComplianceDecision, ScoutError> {
        let scope = self.usage_scope(request);
        let today = self.usage.today_count(&scope).await.map_err(|e| {
            tracing::warn!("Usage store unavailable for {}: {}", scope, e);
            match e {
                ScoutError::Collaborator(_) => e,
                other => ScoutError::Collaborator(other.to_string()),
            }
        })?;

        let decision = self.gate.evaluate(request, today);
        if decision.allowed {
            tracing::info!(
                "Compliance passed for {} in {} ({} requests today)",
                request.target,
                decision.jurisdiction_rules.code,
                today
            );
        } else {
            tracing::info!(
                "Compliance rejected {}: {}",
                request.target,
                decision.violated_rules.join("; ")
            );
        }
        Ok(decision)
    }

    /// Analyzes one website
    ///
    /// # Arguments
    ///
    /// * `request` - An individual (single URL) request
    ///
    /// # Returns
    ///
    /// * `Ok(SiteScoreReport)` - The scored site
    /// * `Err(ScoutError::ComplianceRejected)` - The gate said no; nothing was fetched
    /// * `Err(ScoutError::RateLimited)` - The host was visited too recently
    /// * `Err(ScoutError::SeedFetch)` - The seed page could not be loaded
    pub async fn run_analysis(
        &self,
        request: &ScrapeRequest,
    ) -> Result<SiteScoreReport, ScoutError> {
        if request.kind != RequestKind::Individual {
            return Err(ScoutError::InvalidTarget(format!(
                "{:?} requests are analyzed by area, not by URL",
                request.kind
            )));
        }

        let decision = self.evaluate(request).await?;
        if !decision.allowed {
            return Err(ScoutError::ComplianceRejected(decision));
        }

        let url = parse_target_url(&request.target)?;
        let report = self.analyze_site(&url, &decision).await?;

        self.record_usage(&decision.jurisdiction_rules.code, report.leads.len())
            .await;
        Ok(report)
    }

    /// Like [`run_analysis`](Self::run_analysis), abandoned as soon as `cancel` fires
    ///
    /// Cancellation drops the pipeline, and with it every in-flight page
    /// fetch and link check.
    pub async fn run_analysis_with_cancel(
        &self,
        request: &ScrapeRequest,
        cancel: CancellationToken,
    ) -> Result<SiteScoreReport, ScoutError> {
        cancellable(self.run_analysis(request), cancel).await
    }

    /// Analyzes the businesses a places search finds for a location or keyword
    ///
    /// Up to `max-candidate-sites` candidates with a website get a full site
    /// analysis; a failed candidate is recorded and falls back to its places
    /// data. The remaining candidates become leads straight from places data.
    pub async fn run_area_analysis(
        &self,
        request: &ScrapeRequest,
    ) -> Result<AreaReport, ScoutError> {
        if request.kind == RequestKind::Individual {
            return Err(ScoutError::InvalidTarget(
                "individual requests are analyzed by URL".to_string(),
            ));
        }

        let decision = self.evaluate(request).await?;
        if !decision.allowed {
            return Err(ScoutError::ComplianceRejected(decision));
        }

        let mut candidates = self.places.search(&AreaQuery::from(request)).await?;
        if let Some(max) = request.max_results {
            candidates.truncate(max as usize);
        }
        tracing::info!("{} candidate(s) for {}", candidates.len(), request.target);

        let source = format!("places:{}", request.target);
        let rules = &decision.jurisdiction_rules;
        let mut sites = Vec::new();
        let mut place_leads = Vec::new();
        let mut failures = Vec::new();
        let mut analyzed = 0;

        for candidate in &candidates {
            let website = candidate
                .website
                .as_deref()
                .and_then(|w| parse_target_url(w).ok());

            let within_budget = analyzed < self.config.compliance.max_candidate_sites;
            if let Some(url) = website.filter(|_| within_budget) {
                analyzed += 1;
                match self.analyze_site(&url, &decision).await {
                    Ok(report) => {
                        sites.push(report);
                        continue;
                    }
                    Err(e) => {
                        tracing::warn!("Candidate {} ({}) failed: {}", candidate.name, url, e);
                        failures.push(CandidateFailure {
                            business_name: candidate.name.clone(),
                            website: url.to_string(),
                            reason: e.to_string(),
                        });
                    }
                }
            }

            if let Some(lead) = lead_from_place(candidate, &source).and_then(|l| l.redact(rules)) {
                place_leads.push(lead);
            }
        }

        let report = AreaReport {
            query: request.target.clone(),
            sites,
            place_leads,
            failures,
            advisories: decision.advisories.clone(),
            generated_at: Utc::now(),
        };

        self.record_usage(&decision.jurisdiction_rules.code, report.all_leads().count())
            .await;
        Ok(report)
    }

    /// Like [`run_area_analysis`](Self::run_area_analysis), abandoned as soon as
    /// `cancel` fires
    pub async fn run_area_analysis_with_cancel(
        &self,
        request: &ScrapeRequest,
        cancel: CancellationToken,
    ) -> Result<AreaReport, ScoutError> {
        cancellable(self.run_area_analysis(request), cancel).await
    }

    /// Runs the site pipeline for a URL that already passed compliance
    async fn analyze_site(
        &self,
        url: &Url,
        decision: &ComplianceDecision,
    ) -> Result<SiteScoreReport, ScoutError> {
        let crawler = &self.config.crawler;
        PageScheduler::new(self.politeness.clone(), crawler.minimum_interval())
            .reserve_seed(url)?;

        if !self.politeness.check_robots_allowed(url).await {
            return Err(ScoutError::RobotsDenied {
                url: url.to_string(),
            });
        }

        let seed = fetch_page(&self.client, url, crawler.page_timeout())
            .await
            .map_err(|source| {
                tracing::warn!("Seed page {} failed: {}", url, source);
                ScoutError::SeedFetch {
                    url: url.to_string(),
                    source,
                }
            })?;
        tracing::info!(
            "Fetched seed page {} ({} bytes in {:?})",
            seed.final_url,
            seed.size_bytes(),
            seed.elapsed
        );

        let (pages, seed_inspection, seed_lead) = {
            let doc = PageDocument::parse(&seed.body);
            (
                discover(&seed.final_url, &seed.body, crawler.max_pages),
                inspect(&doc, &seed, &self.options),
                extract_from_document(&doc, &seed.final_url),
            )
        };
        // A redirected seed moves the run to the final host and its robots.txt
        let site = &seed.final_url;
        if site.origin() != url.origin() {
            tracing::info!("Seed {} redirected to {}", url, site);
        }
        let robots = self.politeness.robots_for(site).await;

        let agent = &self.config.user_agent.crawler_name;
        let pages: Vec<Url> = pages
            .into_iter()
            .enumerate()
            .filter(|(index, page)| {
                let allowed = *index == 0 || robots.content.is_allowed(page.as_str(), agent);
                if !allowed {
                    tracing::debug!("Skipping {} (disallowed by robots.txt)", page);
                }
                allowed
            })
            .map(|(_, page)| page)
            .collect();
        tracing::info!("Analyzing {} page(s) of {}", pages.len(), site);

        let interval = self
            .politeness
            .effective_interval(site, crawler.minimum_interval())
            .await;
        let scheduler = PageScheduler::new(self.politeness.clone(), interval);

        let work = std::iter::once(PageWork::Seed(Box::new(seed_inspection), seed_lead))
            .chain(pages.into_iter().skip(1).map(PageWork::Sibling));
        let outcomes: Vec<(PageAnalysis, Option<ExtractedLead>)> = stream::iter(work)
            .map(|work| self.run_page(work, &scheduler))
            .buffered(crawler.max_concurrent_pages.max(1))
            .filter_map(|outcome| async move { outcome })
            .collect()
            .await;

        let pages_analyzed = outcomes.len();
        let seed_metrics = outcomes
            .first()
            .and_then(|(analysis, _)| analysis.metrics.clone())
            .unwrap_or_default();

        let mut issues = Vec::new();
        let mut broken_links = Vec::new();
        let mut leads = Vec::new();
        for (analysis, lead) in outcomes {
            issues.extend(analysis.issues);
            broken_links.extend(analysis.broken_links);
            if let Some(lead) = lead.and_then(|l| l.redact(&decision.jurisdiction_rules)) {
                if !leads.contains(&lead) {
                    leads.push(lead);
                }
            }
        }

        let has_sitemap = match seed.final_url.join("/sitemap.xml") {
            Ok(sitemap) => {
                resource_exists(&self.client, &sitemap, crawler.link_check_timeout()).await
            }
            Err(_) => false,
        };
        let insights = self.performance_insights(&seed).await;

        let signals = SiteSignals::collect(
            &seed_metrics,
            seed.final_url.scheme() == "https",
            has_sitemap,
            robots.present,
            seed.elapsed,
            seed.size_bytes(),
            insights.as_ref(),
        );

        let mut report = score(seed.final_url.as_str(), &signals, issues, broken_links);
        report.leads = leads;
        report.advisories = decision.advisories.clone();
        report.pages_analyzed = pages_analyzed;
        report.performance_insights = insights;

        tracing::info!(
            "Scored {}: {} ({} issues, {} broken links, {} leads)",
            report.url,
            report.overall_score,
            report.issues.len(),
            report.broken_links.len(),
            report.leads.len()
        );
        Ok(report)
    }

    /// Analyzes one page; failures degrade to a single issue
    ///
    /// Returns `None` for a sibling link that turned out not to be an HTML page.
    async fn run_page(
        &self,
        work: PageWork,
        scheduler: &PageScheduler,
    ) -> Option<(PageAnalysis, Option<ExtractedLead>)> {
        let url = match work {
            PageWork::Seed(inspection, lead) => {
                return Some((finish(&self.client, *inspection, &self.options).await, lead));
            }
            PageWork::Sibling(url) => url,
        };

        if let Err(e) = scheduler.acquire(&url).await {
            let error = FetchError::ConnectionFailed {
                url: url.to_string(),
                reason: e.to_string(),
            };
            return Some((page_failure(&url, &error), None));
        }

        let page = match fetch_page(&self.client, &url, self.config.crawler.page_timeout()).await {
            Ok(page) => page,
            Err(FetchError::NotHtml { content_type, .. }) => {
                tracing::debug!("Skipping {} (not a page: {})", url, content_type);
                return None;
            }
            Err(e) => return Some((page_failure(&url, &e), None)),
        };
        tracing::debug!("Fetched {} in {:?}", page.final_url, page.elapsed);

        let lead = extract(&page);
        Some((analyze(&self.client, &page, &self.options).await, lead))
    }

    async fn performance_insights(&self, seed: &FetchedPage) -> Option<PerformanceInsights> {
        match self.performance.insights(&seed.final_url).await {
            Ok(insights) => Some(insights),
            Err(e) => {
                tracing::info!(
                    "Scoring degraded for {}: performance insights unavailable ({})",
                    seed.final_url,
                    e
                );
                None
            }
        }
    }

    /// The usage bucket a request counts against
    ///
    /// Usage is counted per applied rule set, so every unknown code shares the
    /// fallback's daily limit.
    pub fn usage_scope(&self, request: &ScrapeRequest) -> String {
        self.gate.rules().lookup(&request.jurisdiction).code.clone()
    }

    async fn record_usage(&self, scope: &str, result_count: usize) {
        if let Err(e) = self.usage.record_activity(scope, result_count).await {
            tracing::warn!("Failed to record usage for {}: {}", scope, e);
        }
    }
}

async fn cancellable<T>(
    run: impl Future<Output = Result<T, ScoutError>>,
    cancel: CancellationToken,
) -> Result<T, ScoutError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            tracing::info!("Analysis cancelled");
            Err(ScoutError::Cancelled)
        }
        result = run => result,
    }
}
