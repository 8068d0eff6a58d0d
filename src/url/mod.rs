//! URL handling module for Sumi-Scout
//!
//! Target parsing, link resolution, and the host/origin helpers shared by
//! discovery and the politeness controller.

mod domain;
mod normalize;

pub use domain::{extract_domain, is_same_site, origin_of};
pub use normalize::{parse_target_url, resolve_link};
