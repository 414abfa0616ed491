// src/repositories/places.rs - Common seam over both Places API generations
use async_trait::async_trait;

use crate::errors::RepositoryError;
use crate::models::PlaceDetails;

type Result<T> = std::result::Result<T, RepositoryError>;

/// Which upstream API generation a repository talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacesGeneration {
    Current,
    Legacy,
}

impl PlacesGeneration {
    /// Prefix for per-query search diagnostics
    pub fn search_label(&self) -> &'static str {
        match self {
            PlacesGeneration::Current => "v1 search",
            PlacesGeneration::Legacy => "legacy find-place",
        }
    }

    /// Prefix for everything after the search step
    pub fn api_label(&self) -> &'static str {
        match self {
            PlacesGeneration::Current => "Google Places v1",
            PlacesGeneration::Legacy => "Legacy Places",
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlacesRepositoryTrait: Send + Sync {
    fn generation(&self) -> PlacesGeneration;

    /// Converts an operator-configured place ID into this generation's reference form
    fn place_ref_from_id(&self, place_id: &str) -> String;

    /// Runs a text search and returns the reference of the best match
    ///
    /// ### Returns
    /// * `Result<Option<String>>` - the place reference, or `None` when nothing matched
    ///
    /// ### Errors
    /// * `RepositoryError::Status` - non-success HTTP status
    /// * `RepositoryError::Upstream` - the API reported an error in its payload
    /// * `RepositoryError::Transport` / `RepositoryError::Decode` - no usable response
    async fn search_place(&self, query: &str) -> Result<Option<String>>;

    /// Fetches rating, rating count, canonical URL and reviews for a place
    ///
    /// ### Errors
    /// Same variants as `search_place`
    async fn fetch_details(&self, place_ref: &str) -> Result<PlaceDetails>;
}
