//! Politeness controller
//!
//! Per-host request spacing plus the robots.txt gate. The controller is an
//! explicit object injected into the orchestrator; nothing here is global.

mod controller;

pub use controller::{PolitenessController, PolitenessOutcome};
