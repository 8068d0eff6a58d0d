//! Compliance gate
//!
//! Decides whether a scrape request may proceed in its jurisdiction. The gate
//! is a pure function over the request and the day's usage count; a rejected
//! decision must stop the pipeline before any network I/O.

mod gate;
mod rules;

pub use gate::{ComplianceDecision, ComplianceGate, RequestKind, ScrapeRequest};
pub use rules::{DataField, JurisdictionRuleSet, RuleBook, DEFAULT_JURISDICTION};
