//! Geocoding/places provider

use crate::compliance::{RequestKind, ScrapeRequest};
use crate::ScoutError;
use async_trait::async_trait;
use serde::Serialize;

/// A business returned by a places search
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaceCandidate {
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
}

/// What to search for around a location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaQuery {
    /// Free-text location ("Austin, TX", "78701") or keyword phrase
    pub target: String,
    pub kind: RequestKind,
    pub radius_miles: Option<u32>,
    pub max_results: Option<u32>,
}

impl From<&ScrapeRequest> for AreaQuery {
    fn from(request: &ScrapeRequest) -> Self {
        Self {
            target: request.target.clone(),
            kind: request.kind,
            radius_miles: request.radius_miles,
            max_results: request.max_results,
        }
    }
}

/// Finds candidate businesses for a location or keyword request
#[async_trait]
pub trait PlacesProvider: Send + Sync {
    async fn search(&self, query: &AreaQuery) -> Result<Vec<PlaceCandidate>, ScoutError>;
}

/// Provider used when no places service is configured
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPlaces;

#[async_trait]
impl PlacesProvider for NoPlaces {
    async fn search(&self, _query: &AreaQuery) -> Result<Vec<PlaceCandidate>, ScoutError> {
        Err(ScoutError::Collaborator(
            "no places provider configured".to_string(),
        ))
    }
}
