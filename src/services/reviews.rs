// src/services/reviews.rs - Testimonials pipeline over both Places API generations
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use log::{debug, info, warn};
use reqwest::Client;

use crate::config::PlacesConfig;
use crate::errors::RepositoryError;
use crate::models::{ReviewOrder, ReviewSummary};
use crate::repositories::{
    LegacyPlacesRepository, PlacesGeneration, PlacesRepositoryTrait, PlacesV1Repository,
};

/// Tried after the configured business query, in order
pub const FALLBACK_BUSINESS_QUERIES: [&str; 4] = [
    "Blue Bunny Rental Cleaners Orlando",
    "Blue Bunny Rental Cleaners",
    "Blue Bunny Turnover Services Orlando",
    "Blue Bunny Turnover Services",
];

const MISSING_API_KEY: &str = "Missing GOOGLE_PLACES_API_KEY.";
const NOTHING_LOADED: &str = "Unable to load Google reviews.";
const LEGACY_NO_REVIEW_TEXT: &str = "Legacy Places returned no review text.";

/// Search queries with blanks and duplicates removed, first occurrence kept
pub fn search_queries(business_query: &str) -> Vec<String> {
    let mut queries: Vec<String> = Vec::new();
    for query in std::iter::once(business_query).chain(FALLBACK_BUSINESS_QUERIES) {
        let query = query.trim();
        if !query.is_empty() && !queries.iter().any(|q| q == query) {
            queries.push(query.to_string());
        }
    }
    queries
}

/// Where the "see all reviews" link points when upstream gives no URL
pub fn default_reviews_url(business_query: &str) -> String {
    format!(
        "https://www.google.com/search?q={}",
        urlencoding::encode(business_query)
    )
}

/// Both upstream generations, current first
pub struct ReviewSources {
    pub current: Arc<dyn PlacesRepositoryTrait>,
    pub legacy: Arc<dyn PlacesRepositoryTrait>,
}

struct CachedSummary {
    summary: ReviewSummary,
    fetched_at: Instant,
}

pub struct ReviewService {
    sources: Option<ReviewSources>,
    place_id: Option<String>,
    search_queries: Vec<String>,
    default_reviews_url: String,
    revalidate: Duration,
    cache: DashMap<ReviewOrder, CachedSummary>,
}

impl ReviewService {
    pub fn new(
        sources: Option<ReviewSources>,
        place_id: Option<String>,
        business_query: &str,
        revalidate: Duration,
    ) -> Self {
        Self {
            sources,
            place_id,
            search_queries: search_queries(business_query),
            default_reviews_url: default_reviews_url(business_query),
            revalidate,
            cache: DashMap::new(),
        }
    }

    /// Wires the real repositories; without an API key no upstream is ever called
    pub fn from_config(config: &PlacesConfig, client: Client) -> Self {
        let sources = config.api_key.as_deref().map(|api_key| ReviewSources {
            current: Arc::new(PlacesV1Repository::new(
                client.clone(),
                &config.api_base_url,
                api_key,
            )) as Arc<dyn PlacesRepositoryTrait>,
            legacy: Arc::new(LegacyPlacesRepository::new(
                client,
                &config.legacy_api_base_url,
                api_key,
            )),
        });

        Self::new(
            sources,
            config.place_id.clone(),
            &config.business_query,
            Duration::from_secs(config.revalidate_secs),
        )
    }

    /// Summary for one page. Never fails: every problem ends up in `error`.
    pub async fn get_reviews_data(&self, order: ReviewOrder) -> ReviewSummary {
        if let Some(cached) = self.cache.get(&order) {
            if cached.fetched_at.elapsed() < self.revalidate {
                debug!("Serving cached testimonials for {:?}", order);
                return cached.summary.clone();
            }
        }

        let summary = self.fetch_summary(order).await;

        // Degraded results are retried on the next request instead of pinned for hours
        if summary.has_content() {
            self.cache.insert(
                order,
                CachedSummary {
                    summary: summary.clone(),
                    fetched_at: Instant::now(),
                },
            );
        } else {
            warn!(
                "Testimonials unavailable: {}",
                summary.error.as_deref().unwrap_or(NOTHING_LOADED)
            );
        }

        summary
    }

    async fn fetch_summary(&self, order: ReviewOrder) -> ReviewSummary {
        let Some(sources) = &self.sources else {
            return self.empty(Some(MISSING_API_KEY.to_string()));
        };

        let current = self.fetch_generation(sources.current.as_ref(), order).await;
        if current.has_content() {
            info!("Loaded {} testimonials from Places v1", current.reviews.len());
            return current;
        }

        let legacy = self.fetch_generation(sources.legacy.as_ref(), order).await;
        if legacy.has_content() {
            info!("Loaded {} testimonials from legacy Places", legacy.reviews.len());
            return legacy;
        }

        let combined = [current.error, legacy.error]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" | ");
        let combined = if combined.is_empty() {
            NOTHING_LOADED.to_string()
        } else {
            combined
        };
        self.empty(Some(combined))
    }

    async fn fetch_generation(
        &self,
        repository: &dyn PlacesRepositoryTrait,
        order: ReviewOrder,
    ) -> ReviewSummary {
        let generation = repository.generation();

        let place_ref = match self.resolve_place(repository).await {
            Ok(place_ref) => place_ref,
            Err(diagnostic) => return self.empty(Some(diagnostic)),
        };

        let details = match repository.fetch_details(&place_ref).await {
            Ok(details) => details,
            Err(err) => return self.empty(Some(details_diagnostic(generation, &err))),
        };

        let place = details.normalize();
        let reviews = order.arrange(place.reviews);
        let error = (generation == PlacesGeneration::Legacy && reviews.is_empty())
            .then(|| LEGACY_NO_REVIEW_TEXT.to_string());

        ReviewSummary {
            rating: place.rating,
            total_ratings: place.total_ratings,
            reviews_url: place
                .reviews_url
                .unwrap_or_else(|| self.default_reviews_url.clone()),
            reviews,
            error,
        }
    }

    /// Configured place ID first, then each search query until one matches
    async fn resolve_place(&self, repository: &dyn PlacesRepositoryTrait) -> Result<String, String> {
        if let Some(place_id) = &self.place_id {
            return Ok(repository.place_ref_from_id(place_id));
        }

        let generation = repository.generation();
        let label = generation.search_label();
        let mut errors = Vec::new();

        for query in &self.search_queries {
            match repository.search_place(query).await {
                Ok(Some(place_ref)) => return Ok(place_ref),
                Ok(None) => debug!("{} found nothing for \"{}\"", label, query),
                Err(RepositoryError::Status(status)) => {
                    errors.push(format!("{} HTTP {} for \"{}\"", label, status, query))
                }
                Err(RepositoryError::Upstream(message)) => {
                    errors.push(format!("{} error for \"{}\": {}", label, query, message))
                }
                Err(err) => errors.push(format!("{} failed for \"{}\": {}", label, query, err)),
            }
        }

        if errors.is_empty() {
            Err(format!(
                "{} search returned no matching place.",
                generation.api_label()
            ))
        } else {
            Err(errors.join(" | "))
        }
    }

    fn empty(&self, error: Option<String>) -> ReviewSummary {
        ReviewSummary::empty(&self.default_reviews_url, error)
    }
}

fn details_diagnostic(generation: PlacesGeneration, err: &RepositoryError) -> String {
    let api = generation.api_label();
    match err {
        RepositoryError::Status(status) => format!("{} details request failed ({}).", api, status),
        RepositoryError::Upstream(message) => format!("{} error: {}", api, message),
        RepositoryError::UnexpectedStatus(status) => format!("{} returned status {}.", api, status),
        RepositoryError::Transport(_) | RepositoryError::Decode(_) => {
            format!("{} request failed unexpectedly.", api)
        }
    }
}
