//! Interfaces to the services the crawler consumes but does not own
//!
//! The usage counter, the performance-insights provider and the places
//! provider live outside this crate. Each is an async trait so the
//! orchestrator can be wired to real backends or to the in-memory
//! implementations used by the CLI and the tests.

mod insights;
mod places;
mod usage;

pub use insights::{PerformanceInsights, PerformanceProvider, UnavailablePerformance};
pub use places::{AreaQuery, NoPlaces, PlaceCandidate, PlacesProvider};
pub use usage::{MemoryUsageStore, UsageStore};
