//! Integration tests for Sumi-Scout
//!
//! These tests use wiremock to stand in for the audited sites and run the
//! full analysis pipeline end-to-end.

mod analysis_tests;
mod area_tests;
mod common;
mod fetch_tests;
mod scoring_tests;
