//! Usage-counter store

use crate::ScoutError;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Counts compliance-relevant requests per scope (jurisdiction code) per day
#[async_trait]
pub trait UsageStore: Send + Sync {
    /// Number of requests already recorded today for `scope`
    async fn today_count(&self, scope: &str) -> Result<u32, ScoutError>;

    /// Records one completed request and how many results it produced
    async fn record_activity(&self, scope: &str, result_count: usize) -> Result<(), ScoutError>;
}

#[derive(Debug, Default, Clone, Copy)]
struct DailyUsage {
    requests: u32,
    results: usize,
}

/// Process-lifetime usage store keyed by (scope, UTC date)
#[derive(Debug, Default)]
pub struct MemoryUsageStore {
    usage: Mutex<HashMap<(String, NaiveDate), DailyUsage>>,
}

impl MemoryUsageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `requests` for `scope` today
    pub fn with_count(scope: &str, requests: u32) -> Self {
        let mut usage = HashMap::new();
        usage.insert(
            (scope.to_uppercase(), Utc::now().date_naive()),
            DailyUsage {
                requests,
                results: 0,
            },
        );
        Self {
            usage: Mutex::new(usage),
        }
    }

    /// Total results recorded today for `scope`
    pub async fn today_results(&self, scope: &str) -> usize {
        let usage = self.usage.lock().await;
        usage
            .get(&(scope.to_uppercase(), Utc::now().date_naive()))
            .map_or(0, |u| u.results)
    }
}

#[async_trait]
impl UsageStore for MemoryUsageStore {
    async fn today_count(&self, scope: &str) -> Result<u32, ScoutError> {
        let usage = self.usage.lock().await;
        Ok(usage
            .get(&(scope.to_uppercase(), Utc::now().date_naive()))
            .map_or(0, |u| u.requests))
    }

    async fn record_activity(&self, scope: &str, result_count: usize) -> Result<(), ScoutError> {
        let mut usage = self.usage.lock().await;
        let entry = usage
            .entry((scope.to_uppercase(), Utc::now().date_naive()))
            .or_default();
        entry.requests = entry.requests.saturating_add(1);
        entry.results += result_count;
        Ok(())
    }
}
