//! External data collaborator contracts
//!
//! The engine consumes typed candidate collections through these traits and
//! does not know how they are fetched, cached, or rate-limited beyond the
//! per-call timeout it applies itself. Implementations live outside this
//! crate.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{AreaCandidate, HotelCandidate, RestaurantCandidate};

/// A raw social-discussion post returned by evidence search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPost {
    pub title: String,
    pub body: String,
    pub url: String,
    /// Source community/forum name
    pub source: String,
    /// Upvote/score count
    pub score: u32,
}

/// A positive match from the mapping/places service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceMatch {
    pub place_id: String,
    pub name: String,
    #[serde(default)]
    pub rating: Option<f64>,
}

/// Discovers candidate areas for a destination
#[async_trait]
pub trait AreaDiscovery: Send + Sync {
    async fn discover_areas(&self, destination: &str) -> eyre::Result<Vec<AreaCandidate>>;
}

/// Looks up lodging options for an area
#[async_trait]
pub trait LodgingLookup: Send + Sync {
    async fn lookup_lodging(&self, area_id: &str, dates: Option<(chrono::NaiveDate, chrono::NaiveDate)>)
    -> eyre::Result<Vec<HotelCandidate>>;
}

/// Looks up dining options for an area
#[async_trait]
pub trait DiningLookup: Send + Sync {
    async fn lookup_dining(&self, area_id: &str) -> eyre::Result<Vec<RestaurantCandidate>>;
}

/// Searches social-discussion evidence
#[async_trait]
pub trait EvidenceSearch: Send + Sync {
    async fn search_evidence(&self, query: &str, sources: &[String]) -> eyre::Result<Vec<RawPost>>;
}

/// Resolves a name against the mapping/places service
#[async_trait]
pub trait PlaceLookup: Send + Sync {
    async fn lookup_place(&self, name: &str, location: &str) -> eyre::Result<Option<PlaceMatch>>;
}
