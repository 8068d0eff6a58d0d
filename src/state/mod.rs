//! State module for politeness bookkeeping
//!
//! # Components
//!
//! - `HostVisitState`: per-host visit timestamp used for request spacing
//! - `Clock`: time source, swappable for a `ManualClock` in tests

mod clock;
mod host_state;

// Re-export main types
pub use clock::{Clock, ManualClock, SystemClock};
pub use host_state::HostVisitState;
