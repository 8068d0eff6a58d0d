//! Crawler module for fetching, parsing and orchestrating site analyses
//!
//! This module contains:
//! - HTTP fetching of pages and lightweight link checks
//! - The parsed-document capability shared by the analyzer and lead extractor
//! - Same-site page discovery from the seed page
//! - Per-page politeness pacing
//! - The orchestrator that runs a whole analysis

mod coordinator;
mod discovery;
mod fetcher;
mod parser;
mod scheduler;

pub use coordinator::{Orchestrator, OrchestratorBuilder};
pub use discovery::discover;
pub use fetcher::{
    build_http_client, check_link, fetch_page, resource_exists, FetchedPage, LinkStatus,
};
pub use parser::{collapse_whitespace, Anchor, Heading, PageDocument};
pub use scheduler::PageScheduler;
